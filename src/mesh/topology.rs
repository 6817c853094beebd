// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use std::ops::{Deref, DerefMut};

use ahash::{AHashMap, AHashSet};
use rand::{SeedableRng, rngs::StdRng};
use smallvec::SmallVec;

use crate::error::MeshError;
use crate::geometry::Point2;
use crate::kernel::{Orientation, orient2d};
use crate::mesh::segment::{NO_SUBSEG, NO_SUBSEG_HANDLE, Osub, Subseg};
use crate::mesh::triangle::{MINUS1, OUTER, OUTER_HANDLE, Otri, PLUS1, Triangle};
use crate::mesh::vertex::{VertId, Vertex};

/// Arena-backed planar triangulation.
///
/// Triangles and subsegments live in flat vectors addressed by index. Slot 0
/// of each arena is a sentinel: the "outer" triangle every hull edge points
/// at, and the "no constraint" subsegment every unconstrained edge points at.
/// Freed slots are recycled.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) triangles: Vec<Triangle>,
    pub(crate) subsegs: Vec<Subseg>,
    free_triangles: Vec<usize>,
    free_subsegs: Vec<usize>,
    pub(crate) n_vertex_attributes: usize,
    pub(crate) n_triangle_attributes: usize,
    pub(crate) track_constraints: bool,
    /// False once triangles have been carved away; walks that leave
    /// through the hull are then rechecked.
    pub(crate) convex: bool,
    /// Last triangle touched by location or insertion.
    pub(crate) recent: usize,
    pub(crate) rng: StdRng,
    pub(crate) next_hash: usize,
    pub(crate) live_triangles: usize,
    pub(crate) live_subsegs: usize,
    pub(crate) steiner_points: usize,
    pub(crate) warnings: Vec<MeshError>,
}

impl Mesh {
    pub(crate) fn empty(
        n_vertex_attributes: usize,
        n_triangle_attributes: usize,
        track_constraints: bool,
        seed: u64,
    ) -> Self {
        Mesh {
            vertices: Vec::new(),
            triangles: vec![Triangle::sentinel()],
            subsegs: vec![Subseg::sentinel()],
            free_triangles: Vec::new(),
            free_subsegs: Vec::new(),
            n_vertex_attributes,
            n_triangle_attributes,
            track_constraints,
            convex: true,
            recent: OUTER,
            rng: StdRng::seed_from_u64(seed),
            next_hash: 1,
            live_triangles: 0,
            live_subsegs: 0,
            steiner_points: 0,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn add_vertex(&mut self, v: Vertex) -> VertId {
        self.vertices.push(v);
        self.vertices.len() - 1
    }

    #[inline(always)]
    pub(crate) fn point(&self, v: VertId) -> &Point2 {
        &self.vertices[v].point
    }

    // ---- oriented triangle navigation -------------------------------------

    #[inline(always)]
    pub(crate) fn org(&self, o: Otri) -> VertId {
        self.triangles[o.tri].vertices[PLUS1[o.orient]]
    }

    #[inline(always)]
    pub(crate) fn dest(&self, o: Otri) -> VertId {
        self.triangles[o.tri].vertices[MINUS1[o.orient]]
    }

    #[inline(always)]
    pub(crate) fn apex(&self, o: Otri) -> VertId {
        self.triangles[o.tri].vertices[o.orient]
    }

    /// The same edge seen from the neighboring triangle.
    #[inline(always)]
    pub(crate) fn sym(&self, o: Otri) -> Otri {
        self.triangles[o.tri].neighbors[o.orient]
    }

    /// Next edge counter-clockwise around the origin.
    #[inline(always)]
    pub(crate) fn onext(&self, o: Otri) -> Otri {
        self.sym(o.lprev())
    }

    /// Next edge clockwise around the origin.
    #[inline]
    pub(crate) fn oprev(&self, o: Otri) -> Otri {
        let s = self.sym(o);
        if s.is_outer() { s } else { s.lnext() }
    }

    #[inline(always)]
    pub(crate) fn tspivot(&self, o: Otri) -> Osub {
        self.triangles[o.tri].subsegs[o.orient]
    }

    #[inline(always)]
    pub(crate) fn has_subseg(&self, o: Otri) -> bool {
        !self.tspivot(o).is_none()
    }

    #[inline(always)]
    pub(crate) fn sorg(&self, os: Osub) -> VertId {
        self.subsegs[os.seg].vertices[os.orient]
    }

    #[inline(always)]
    pub(crate) fn sdest(&self, os: Osub) -> VertId {
        self.subsegs[os.seg].vertices[1 - os.orient]
    }

    /// Next piece of the same input segment beyond the destination, oriented
    /// onward. `None` at the end of the segment.
    pub(crate) fn snext(&self, os: Osub) -> Option<Osub> {
        let n = self.subsegs[os.seg].adjoining[1 - os.orient];
        if n == NO_SUBSEG {
            return None;
        }
        let dest = self.sdest(os);
        self.subsegs[n].orient_from(dest).map(|k| Osub::new(n, k))
    }

    /// Previous piece of the same input segment before the origin, oriented
    /// so that it ends there.
    pub(crate) fn sprev(&self, os: Osub) -> Option<Osub> {
        let p = self.subsegs[os.seg].adjoining[os.orient];
        if p == NO_SUBSEG {
            return None;
        }
        let org = self.sorg(os);
        self.subsegs[p].orient_from(org).map(|k| Osub::new(p, k).ssym())
    }

    /// Triangle on the left of an oriented subsegment.
    #[inline(always)]
    pub(crate) fn stpivot(&self, os: Osub) -> Otri {
        self.subsegs[os.seg].triangles[os.orient]
    }

    pub(crate) fn is_live(&self, t: usize) -> bool {
        t != OUTER && t < self.triangles.len() && self.triangles[t].alive
    }

    pub(crate) fn live_triangle_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.triangles
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, t)| t.alive)
            .map(|(i, _)| i)
    }

    pub(crate) fn live_subseg_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.subsegs
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, s)| s.alive)
            .map(|(i, _)| i)
    }

    pub(crate) fn any_live_triangle(&self) -> Option<usize> {
        if self.is_live(self.recent) {
            return Some(self.recent);
        }
        self.live_triangle_ids().next()
    }

    /// Corner positions of a triangle.
    pub(crate) fn corners(&self, t: usize) -> [Point2; 3] {
        let v = self.triangles[t].vertices;
        [*self.point(v[0]), *self.point(v[1]), *self.point(v[2])]
    }

    // ---- arena management -------------------------------------------------

    pub(crate) fn make_triangle(&mut self) -> usize {
        let hash = self.next_hash;
        self.next_hash += 1;
        self.live_triangles += 1;
        let n = self.n_triangle_attributes;
        if let Some(t) = self.free_triangles.pop() {
            self.triangles[t].reset(hash, n);
            t
        } else {
            let mut tri = Triangle::sentinel();
            tri.reset(hash, n);
            self.triangles.push(tri);
            self.triangles.len() - 1
        }
    }

    pub(crate) fn kill_triangle(&mut self, t: usize) {
        debug_assert!(self.is_live(t), "killing dead triangle {t}");
        self.triangles[t].alive = false;
        self.free_triangles.push(t);
        self.live_triangles -= 1;
        if self.recent == t {
            self.recent = OUTER;
        }
    }

    pub(crate) fn make_subseg(&mut self, seg: Subseg) -> usize {
        self.live_subsegs += 1;
        if let Some(s) = self.free_subsegs.pop() {
            self.subsegs[s] = seg;
            s
        } else {
            self.subsegs.push(seg);
            self.subsegs.len() - 1
        }
    }

    pub(crate) fn kill_subseg(&mut self, s: usize) {
        debug_assert!(s != NO_SUBSEG && self.subsegs[s].alive);
        for n in self.subsegs[s].adjoining {
            if n != NO_SUBSEG {
                self.subsegs[n].replace_adjoining(s, NO_SUBSEG);
            }
        }
        self.subsegs[s].adjoining = [NO_SUBSEG; 2];
        self.subsegs[s].alive = false;
        self.free_subsegs.push(s);
        self.live_subsegs -= 1;
    }

    /// Writes corners so that `Otri { tri: t, orient: 0 }` runs `org -> dest`
    /// with `apex` opposite. The record gets a fresh hash.
    pub(crate) fn set_tri(&mut self, t: usize, org: VertId, dest: VertId, apex: VertId) {
        let hash = self.next_hash;
        self.next_hash += 1;
        let tri = &mut self.triangles[t];
        tri.vertices = [apex, org, dest];
        tri.hash = hash;
        for v in [org, dest, apex] {
            self.vertices[v].tri = t;
        }
    }

    // ---- bonding ----------------------------------------------------------

    /// Glues two edges together. Writes into the sentinel are dropped.
    #[inline]
    pub(crate) fn bond(&mut self, a: Otri, b: Otri) {
        if !a.is_outer() {
            self.triangles[a.tri].neighbors[a.orient] = b;
        }
        if !b.is_outer() {
            self.triangles[b.tri].neighbors[b.orient] = a;
        }
    }

    /// Turns an edge into a hull edge.
    #[inline]
    pub(crate) fn dissolve(&mut self, o: Otri) {
        if !o.is_outer() {
            self.triangles[o.tri].neighbors[o.orient] = OUTER_HANDLE;
        }
    }

    /// Attaches subsegment `seg` to edge `o`, orienting it to match.
    pub(crate) fn tsbond(&mut self, o: Otri, seg: usize) {
        if o.is_outer() {
            return;
        }
        if seg == NO_SUBSEG {
            self.triangles[o.tri].subsegs[o.orient] = NO_SUBSEG_HANDLE;
            return;
        }
        let org = self.org(o);
        let Some(orient) = self.subsegs[seg].orient_from(org) else {
            unreachable!("subsegment {seg} does not have vertex {org} as an endpoint");
        };
        self.triangles[o.tri].subsegs[o.orient] = Osub::new(seg, orient);
        self.subsegs[seg].triangles[orient] = o;
    }

    pub(crate) fn tsdissolve(&mut self, o: Otri) {
        if !o.is_outer() {
            self.triangles[o.tri].subsegs[o.orient] = NO_SUBSEG_HANDLE;
        }
    }

    /// Attaches `seg` to both sides of the edge `o`.
    pub(crate) fn attach_subseg(&mut self, o: Otri, seg: usize) {
        self.tsbond(o, seg);
        let s = self.sym(o);
        if !s.is_outer() {
            self.tsbond(s, seg);
        }
    }

    // ---- vertex stars -----------------------------------------------------

    /// A handle whose origin is `v`.
    pub(crate) fn vertex_handle(&self, v: VertId) -> Option<Otri> {
        let hint = self.vertices[v].tri;
        if self.is_live(hint) {
            if let Some(c) = self.triangles[hint].corner_of(v) {
                return Some(Otri::new(hint, MINUS1[c]));
            }
        }
        self.live_triangle_ids().find_map(|t| {
            self.triangles[t]
                .corner_of(v)
                .map(|c| Otri::new(t, MINUS1[c]))
        })
    }

    /// Every handle with origin `v`, rotating counter-clockwise and then
    /// clockwise when the vertex sits on the boundary.
    pub(crate) fn vertex_star(&self, v: VertId) -> SmallVec<[Otri; 12]> {
        let mut star = SmallVec::new();
        let Some(start) = self.vertex_handle(v) else {
            return star;
        };
        star.push(start);
        let mut o = start;
        loop {
            let n = self.onext(o);
            if n.is_outer() {
                break;
            }
            if n.tri == start.tri {
                return star;
            }
            star.push(n);
            o = n;
        }
        let mut o = start;
        loop {
            let n = self.oprev(o);
            if n.is_outer() || n.tri == start.tri {
                break;
            }
            star.push(n);
            o = n;
        }
        star
    }

    /// Refreshes every vertex's triangle hint.
    pub(crate) fn rebuild_vertex_hints(&mut self) {
        for t in 1..self.triangles.len() {
            if !self.triangles[t].alive {
                continue;
            }
            for c in 0..3 {
                let v = self.triangles[t].vertices[c];
                self.vertices[v].tri = t;
            }
        }
    }

    // ---- local restructuring ----------------------------------------------

    /// Swaps the diagonal of the quadrilateral formed by `e`'s triangle and
    /// its neighbor. With `a, b, c` the origin, destination and apex of `e`
    /// and `d` the far apex, the records become `(a, d, c)` and `(d, b, c)`.
    ///
    /// Returns `None` without touching anything when the quadrilateral is
    /// not strictly convex.
    pub(crate) fn flip(&mut self, e: Otri) -> Option<(usize, usize)> {
        let n = self.sym(e);
        assert!(!n.is_outer(), "flip across a hull edge");
        let (a, b, c, d) = (self.org(e), self.dest(e), self.apex(e), self.apex(n));
        let (pa, pb, pc, pd) = (*self.point(a), *self.point(b), *self.point(c), *self.point(d));
        if orient2d(&pa, &pd, &pc) != Orientation::CounterClockwise
            || orient2d(&pd, &pb, &pc) != Orientation::CounterClockwise
        {
            return None;
        }

        let outer_edges = [e.lnext(), e.lprev(), n.lnext(), n.lprev()];
        let [bc, ca, ad, db] = outer_edges.map(|o| (self.sym(o), self.tspivot(o).seg));

        let (t1, t2) = (e.tri, n.tri);
        self.set_tri(t1, a, d, c);
        self.set_tri(t2, d, b, c);

        let glue = [
            (Otri::new(t1, 0), ad),
            (Otri::new(t1, 2), ca),
            (Otri::new(t2, 0), db),
            (Otri::new(t2, 1), bc),
        ];
        for (o, (ext, seg)) in glue {
            self.bond(o, ext);
            self.tsbond(o, seg);
        }
        self.bond(Otri::new(t1, 1), Otri::new(t2, 2));
        self.tsdissolve(Otri::new(t1, 1));
        self.tsdissolve(Otri::new(t2, 2));
        tracing::trace!(a, b, c, d, "flip");
        Some((t1, t2))
    }

    /// Replaces the triangles `old` by `new` (counter-clockwise corner
    /// triples) covering the same region.
    ///
    /// Edges shared by two new triangles are glued to each other, edges on
    /// the region boundary are glued to whatever the old triangles bordered,
    /// and any remaining edge becomes a hull edge. Subsegments in
    /// `new_subsegs` are attached to the new edges they coincide with. Each
    /// new triangle inherits attributes and area constraint from the old
    /// triangle paired with it.
    pub(crate) fn replace_triangles(
        &mut self,
        old: &[usize],
        new: &[([VertId; 3], usize)],
        new_subsegs: &[usize],
    ) -> SmallVec<[usize; 16]> {
        let old_set: AHashSet<usize> = old.iter().copied().collect();
        let mut boundary: AHashMap<(VertId, VertId), (Otri, usize)> =
            AHashMap::with_capacity(old.len() + 2);
        for &t in old {
            for k in 0..3 {
                let o = Otri::new(t, k);
                let s = self.sym(o);
                if s.is_outer() || !old_set.contains(&s.tri) {
                    boundary.insert((self.org(o), self.dest(o)), (s, self.tspivot(o).seg));
                }
            }
        }
        let inherited: AHashMap<usize, (Vec<f64>, f64)> = new
            .iter()
            .map(|&(_, parent)| parent)
            .filter(|&parent| parent != OUTER)
            .map(|parent| {
                let tri = &self.triangles[parent];
                (parent, (tri.attributes.clone(), tri.area))
            })
            .collect();
        for &t in old {
            self.kill_triangle(t);
        }

        let mut seg_edges: AHashMap<(VertId, VertId), usize> =
            AHashMap::with_capacity(new_subsegs.len() * 2);
        for &s in new_subsegs {
            let [a, b] = self.subsegs[s].vertices;
            seg_edges.insert((a, b), s);
            seg_edges.insert((b, a), s);
        }

        let mut created: SmallVec<[usize; 16]> = SmallVec::with_capacity(new.len());
        let mut edges: AHashMap<(VertId, VertId), Otri> = AHashMap::with_capacity(new.len() * 3);
        for &([a, b, c], parent) in new {
            let t = self.make_triangle();
            self.set_tri(t, a, b, c);
            if let Some((attributes, area)) = inherited.get(&parent) {
                self.triangles[t].attributes.clone_from(attributes);
                self.triangles[t].area = *area;
            }
            for k in 0..3 {
                let o = Otri::new(t, k);
                edges.insert((self.org(o), self.dest(o)), o);
            }
            created.push(t);
        }

        for &t in &created {
            for k in 0..3 {
                let o = Otri::new(t, k);
                let (u, v) = (self.org(o), self.dest(o));
                if let Some(&twin) = edges.get(&(v, u)) {
                    self.bond(o, twin);
                } else if let Some(&(ext, seg)) = boundary.get(&(u, v)) {
                    self.bond(o, ext);
                    self.tsbond(o, seg);
                } else {
                    self.dissolve(o);
                }
                if let Some(&s) = seg_edges.get(&(u, v)) {
                    self.tsbond(o, s);
                }
            }
        }
        if let Some(&t) = created.first() {
            self.recent = t;
        }
        created
    }

    /// Every hull edge, oriented with the mesh on its left.
    pub(crate) fn hull_edges(&self) -> Vec<Otri> {
        let mut hull = Vec::new();
        for t in self.live_triangle_ids() {
            for k in 0..3 {
                let o = Otri::new(t, k);
                if self.sym(o).is_outer() {
                    hull.push(o);
                }
            }
        }
        hull
    }
}

/// Scoped owner of the per-triangle flood-fill flags.
///
/// Every mark set through the guard is cleared when it is released or
/// dropped, including on early returns.
pub(crate) struct FloodMarks<'m> {
    mesh: &'m mut Mesh,
    marked: Vec<usize>,
}

impl<'m> FloodMarks<'m> {
    pub(crate) fn new(mesh: &'m mut Mesh) -> Self {
        FloodMarks {
            mesh,
            marked: Vec::new(),
        }
    }

    /// Marks `t`; false if it already was.
    pub(crate) fn mark(&mut self, t: usize) -> bool {
        let tri = &mut self.mesh.triangles[t];
        if tri.mark {
            return false;
        }
        tri.mark = true;
        self.marked.push(t);
        true
    }

    pub(crate) fn is_marked(&self, t: usize) -> bool {
        t != OUTER && self.mesh.triangles[t].mark
    }

    pub(crate) fn marked(&self) -> &[usize] {
        &self.marked
    }

    /// Clears every mark and hands back the marked triangles.
    pub(crate) fn release(mut self) -> Vec<usize> {
        let marked = std::mem::take(&mut self.marked);
        for &t in &marked {
            self.mesh.triangles[t].mark = false;
        }
        marked
    }
}

impl Deref for FloodMarks<'_> {
    type Target = Mesh;
    fn deref(&self) -> &Mesh {
        self.mesh
    }
}

impl DerefMut for FloodMarks<'_> {
    fn deref_mut(&mut self) -> &mut Mesh {
        self.mesh
    }
}

impl Drop for FloodMarks<'_> {
    fn drop(&mut self) {
        for &t in &self.marked {
            self.mesh.triangles[t].mark = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::vertex::VertexKind;

    fn square_mesh() -> Mesh {
        let mut mesh = Mesh::empty(0, 0, true, 1);
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            mesh.add_vertex(Vertex::new(Point2::new(x, y), 0, Vec::new(), VertexKind::Input));
        }
        // (0, 1, 2) and (0, 2, 3) sharing the diagonal 0-2
        let t1 = mesh.make_triangle();
        let t2 = mesh.make_triangle();
        mesh.set_tri(t1, 0, 1, 2);
        mesh.set_tri(t2, 2, 3, 0);
        let e1 = (0..3).map(|k| Otri::new(t1, k)).find(|&o| mesh.org(o) == 2).unwrap();
        let e2 = (0..3).map(|k| Otri::new(t2, k)).find(|&o| mesh.org(o) == 0).unwrap();
        mesh.bond(e1, e2);
        mesh
    }

    #[test]
    fn navigation_follows_ccw_convention() {
        let mesh = square_mesh();
        let o = Otri::new(1, 0);
        assert_eq!((mesh.org(o), mesh.dest(o), mesh.apex(o)), (0, 1, 2));
        assert_eq!(mesh.org(o.lnext()), 1);
        assert_eq!(mesh.org(o.lprev()), 2);
    }

    #[test]
    fn flip_swaps_the_diagonal() {
        let mut mesh = square_mesh();
        let diag = (0..3)
            .map(|k| Otri::new(1, k))
            .find(|&o| !mesh.sym(o).is_outer())
            .unwrap();
        assert!(mesh.flip(diag).is_some());
        let mut corners: Vec<[usize; 3]> = mesh
            .live_triangle_ids()
            .map(|t| {
                let mut v = mesh.triangles[t].vertices;
                v.sort();
                v
            })
            .collect();
        corners.sort();
        assert_eq!(corners, vec![[0, 1, 3], [1, 2, 3]]);
    }

    #[test]
    fn flood_marks_clear_on_drop() {
        let mut mesh = square_mesh();
        {
            let mut marks = FloodMarks::new(&mut mesh);
            assert!(marks.mark(1));
            assert!(!marks.mark(1));
            assert!(marks.is_marked(1));
        }
        assert!(mesh.live_triangle_ids().all(|t| !mesh.triangles[t].mark));
    }

    #[test]
    #[should_panic(expected = "does not have vertex")]
    fn binding_a_foreign_subsegment_panics() {
        let mut mesh = square_mesh();
        let s = mesh.make_subseg(Subseg::new(1, 3, [1, 3], 1));
        // edge 0 -> 1 of the first triangle
        mesh.tsbond(Otri::new(1, 0), s);
    }

    #[test]
    fn star_of_boundary_vertex() {
        let mesh = square_mesh();
        assert_eq!(mesh.vertex_star(0).len(), 2);
        assert_eq!(mesh.vertex_star(1).len(), 1);
    }
}
