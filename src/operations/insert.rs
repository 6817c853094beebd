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

use ahash::AHashSet;
use smallvec::{SmallVec, smallvec};

use crate::error::MeshError;
use crate::geometry::Point2;
use crate::kernel::predicates::{barycentric, in_diametral_circle};
use crate::kernel::{CircleSide, incircle};
use crate::mesh::Mesh;
use crate::mesh::segment::{NO_SUBSEG, Subseg};
use crate::mesh::triangle::{OUTER_HANDLE, Otri};
use crate::mesh::vertex::{VertId, Vertex, VertexKind};
use crate::operations::locate::Location;

/// Outcome of an insertion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InsertOutcome {
    Inserted(VertId),
    Duplicate(VertId),
    /// Refused: the point lies in the diametral circle of this subsegment.
    Encroaches(usize),
    Outside,
}

/// Public result of [`Mesh::insert_checked`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Inserted { vertex: usize },
    /// The point would encroach the segment with these endpoint ids; the
    /// mesh is unchanged.
    Encroaches { segment: [usize; 2] },
}

/// Undirected edge key with the smaller vertex id first. Cocircular
/// configurations keep whichever diagonal has the smaller key.
#[inline]
pub(crate) fn diagonal_key(a: VertId, b: VertId) -> (VertId, VertId) {
    if a < b { (a, b) } else { (b, a) }
}

impl Mesh {
    /// Inserts a vertex at `(x, y)` and restores the Delaunay property.
    /// A point on a segment splits it.
    pub fn insert(&mut self, x: f64, y: f64) -> Result<usize, MeshError> {
        match self.insert_checked(x, y, false)? {
            Insertion::Inserted { vertex } => Ok(vertex),
            Insertion::Encroaches { segment } => Err(MeshError::invalid(format!(
                "insertion refused by segment {}-{}",
                segment[0], segment[1]
            ))),
        }
    }

    /// Like [`Mesh::insert`], optionally refusing points that would land
    /// inside the diametral circle of a segment.
    pub fn insert_checked(
        &mut self,
        x: f64,
        y: f64,
        check_encroachment: bool,
    ) -> Result<Insertion, MeshError> {
        let p = Point2::new(x, y);
        if !p.is_finite() {
            return Err(MeshError::invalid("cannot insert a non-finite point"));
        }
        let loc = self.locate_point(&p, false);
        match self.insert_at(p, loc, check_encroachment, VertexKind::Steiner) {
            InsertOutcome::Inserted(v) => {
                tracing::debug!(vertex = v, x, y, "inserted vertex");
                self.renumber();
                Ok(Insertion::Inserted { vertex: v })
            }
            InsertOutcome::Duplicate(v) => Err(MeshError::invalid(format!(
                "point ({x}, {y}) coincides with vertex {v}"
            ))),
            InsertOutcome::Encroaches(s) => Ok(Insertion::Encroaches {
                segment: self.subsegs[s].vertices,
            }),
            InsertOutcome::Outside => Err(MeshError::PointOutsideDomain { x, y }),
        }
    }

    /// Inserts `p` at an already computed location. Nothing is mutated unless
    /// the outcome is `Inserted`.
    pub(crate) fn insert_at(
        &mut self,
        p: Point2,
        loc: Location,
        check_encroachment: bool,
        kind: VertexKind,
    ) -> InsertOutcome {
        match loc {
            Location::OnVertex(o) => return InsertOutcome::Duplicate(self.org(o)),
            Location::Outside(_) | Location::Blocked(_) => return InsertOutcome::Outside,
            Location::InTriangle(_) | Location::OnEdge(_) => {}
        }
        if check_encroachment {
            if let Some(s) = self.encroached_by(&p, loc) {
                return InsertOutcome::Encroaches(s);
            }
        }

        let mut vertex = Vertex::new(p, 0, Vec::new(), kind);
        let created = match loc {
            Location::OnEdge(o) => {
                let (a, b) = (self.org(o), self.dest(o));
                let (pa, pb) = (*self.point(a), *self.point(b));
                let len = pa.distance_to(&pb);
                let t = if len > 0.0 { pa.distance_to(&p) / len } else { 0.5 };
                vertex.attributes = self.lerp_attributes(a, b, t);
                let os = self.tspivot(o);
                if !os.is_none() {
                    let seg = &self.subsegs[os.seg];
                    vertex.marker = seg.marker;
                    vertex.on_segment = Some(seg.seg_endpoints);
                }
                let v = self.add_vertex(vertex);
                self.split_edge(o, v)
            }
            _ => {
                let o = loc.handle();
                let corners = self.triangles[o.tri].vertices;
                let [pa, pb, pc] = self.corners(o.tri);
                let w = barycentric(&p, &pa, &pb, &pc);
                vertex.attributes = (0..self.n_vertex_attributes)
                    .map(|i| {
                        (0..3)
                            .map(|k| w[k] * self.vertices[corners[k]].attributes[i])
                            .sum::<f64>()
                    })
                    .collect();
                let v = self.add_vertex(vertex);
                self.split_triangle(o.tri, v)
            }
        };
        let v = self.vertices.len() - 1;
        self.legalize(v, created);
        InsertOutcome::Inserted(v)
    }

    pub(crate) fn lerp_attributes(&self, a: VertId, b: VertId, t: f64) -> Vec<f64> {
        let (aa, ba) = (&self.vertices[a].attributes, &self.vertices[b].attributes);
        aa.iter().zip(ba).map(|(x, y)| x + t * (y - x)).collect()
    }

    /// 1 -> 3 split around `v`.
    pub(crate) fn split_triangle(&mut self, t: usize, v: VertId) -> SmallVec<[usize; 16]> {
        let o = Otri::new(t, 0);
        let (a, b, c) = (self.org(o), self.dest(o), self.apex(o));
        self.replace_triangles(&[t], &[([a, b, v], t), ([b, c, v], t), ([c, a, v], t)], &[])
    }

    /// Splits edge `o` at `v`: 2 -> 4 inside the mesh, 1 -> 2 on the hull.
    /// A subsegment on the edge is split into a chained pair.
    pub(crate) fn split_edge(&mut self, o: Otri, v: VertId) -> SmallVec<[usize; 16]> {
        let (a, b, c) = (self.org(o), self.dest(o), self.apex(o));
        let n = self.sym(o);
        let seg = self.tspivot(o).seg;
        let pieces: SmallVec<[usize; 2]> = if seg != NO_SUBSEG {
            SmallVec::from_slice(&self.split_subseg_record(seg, v))
        } else {
            SmallVec::new()
        };
        if n.is_outer() {
            self.replace_triangles(&[o.tri], &[([a, v, c], o.tri), ([v, b, c], o.tri)], &pieces)
        } else {
            let d = self.apex(n);
            self.replace_triangles(
                &[o.tri, n.tri],
                &[
                    ([a, v, c], o.tri),
                    ([v, b, c], o.tri),
                    ([b, v, d], n.tri),
                    ([v, a, d], n.tri),
                ],
                &pieces,
            )
        }
    }

    /// Cuts subsegment `seg` at `v`; `seg` keeps the part at `vertices[0]`.
    pub(crate) fn split_subseg_record(&mut self, seg: usize, v: VertId) -> [usize; 2] {
        let (far, endpoints, marker, tail) = {
            let s = &self.subsegs[seg];
            (s.vertices[1], s.seg_endpoints, s.marker, s.adjoining[1])
        };
        let mut piece = Subseg::new(v, far, endpoints, marker);
        piece.adjoining = [seg, tail];
        let new = self.make_subseg(piece);
        let s = &mut self.subsegs[seg];
        s.vertices[1] = v;
        s.adjoining[1] = new;
        s.triangles = [OUTER_HANDLE; 2];
        if tail != NO_SUBSEG {
            self.subsegs[tail].replace_adjoining(seg, new);
        }
        [seg, new]
    }

    /// Lawson flips around the freshly inserted `v`, starting from the edges
    /// opposite `v` in `triangles`.
    pub(crate) fn legalize(&mut self, v: VertId, triangles: impl IntoIterator<Item = usize>) {
        let mut stack: Vec<usize> = triangles.into_iter().collect();
        while let Some(t) = stack.pop() {
            if !self.is_live(t) {
                continue;
            }
            let Some(c) = self.triangles[t].corner_of(v) else {
                continue;
            };
            let e = Otri::new(t, c);
            let n = self.sym(e);
            if n.is_outer() || self.has_subseg(e) {
                continue;
            }
            let (a, b, d) = (self.org(e), self.dest(e), self.apex(n));
            let swap = match incircle(self.point(a), self.point(b), self.point(v), self.point(d)) {
                CircleSide::Inside => true,
                CircleSide::OnCircle => diagonal_key(v, d) < diagonal_key(a, b),
                CircleSide::Outside => false,
            };
            if swap {
                if let Some((t1, t2)) = self.flip(e) {
                    stack.push(t1);
                    stack.push(t2);
                }
            }
        }
    }

    /// First subsegment whose diametral circle would contain `p` once `p`
    /// is inserted at `loc`: the cavity of triangles whose circumcircle
    /// holds `p` is grown without crossing subsegments, and every
    /// subsegment on its boundary is tested.
    pub(crate) fn encroached_by(&self, p: &Point2, loc: Location) -> Option<usize> {
        let start = loc.handle();
        let mut queue: SmallVec<[usize; 16]> = smallvec![start.tri];
        if let Location::OnEdge(o) = loc {
            let s = self.sym(o);
            if !s.is_outer() {
                queue.push(s.tri);
            }
        }
        let mut visited: AHashSet<usize> = queue.iter().copied().collect();
        while let Some(t) = queue.pop() {
            for k in 0..3 {
                let o = Otri::new(t, k);
                let os = self.tspivot(o);
                if !os.is_none() {
                    if in_diametral_circle(self.point(self.sorg(os)), self.point(self.sdest(os)), p) {
                        return Some(os.seg);
                    }
                    continue;
                }
                let n = self.sym(o);
                if n.is_outer() || visited.contains(&n.tri) {
                    continue;
                }
                let [a, b, c] = self.corners(n.tri);
                if incircle(&a, &b, &c, p) == CircleSide::Inside {
                    visited.insert(n.tri);
                    queue.push(n.tri);
                }
            }
        }
        None
    }
}
