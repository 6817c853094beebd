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

use crate::error::MeshError;
use crate::kernel::predicates::is_point_on_segment;
use crate::kernel::{CircleSide, Orientation, incircle, orient2d};
use crate::mesh::segment::{NO_SUBSEG, Subseg};
use crate::mesh::topology::FloodMarks;
use crate::mesh::triangle::Otri;
use crate::mesh::vertex::{VertId, VertexKind};
use crate::mesh::Mesh;

/// How a segment leaves its current origin.
enum Direction {
    /// An existing edge runs from the origin to this vertex along the
    /// segment.
    Along(VertId),
    /// The segment enters the triangle of this handle (origin at the
    /// segment origin) and crosses the opposite edge.
    Crossing(Otri),
}

/// Triangles crossed by `from -> to` and the vertices left and right of it,
/// in walk order.
struct Cavity {
    from: VertId,
    to: VertId,
    crossed: Vec<usize>,
    left: Vec<VertId>,
    right: Vec<VertId>,
}

enum Piece {
    Existing { from: VertId, to: VertId },
    Cavity(Cavity),
}

impl Mesh {
    /// Forces the segment `a`-`b` (vertex ids) into the mesh.
    pub fn insert_segment(&mut self, a: usize, b: usize, marker: i32) -> Result<(), MeshError> {
        let n = self.vertices.len();
        if a >= n || b >= n {
            return Err(MeshError::invalid(format!("segment {a}-{b} references a missing vertex")));
        }
        if a == b {
            return Err(MeshError::invalid(format!("segment {a}-{b} has zero length")));
        }
        for v in [a, b] {
            if self.vertices[v].kind == VertexKind::Free {
                return Err(MeshError::invalid(format!("vertex {v} is not part of the mesh")));
            }
        }
        self.track_constraints = true;
        self.recover_segment(a, b, marker)?;
        self.renumber();
        Ok(())
    }

    /// Makes `v1`-`v2` a chain of constrained edges.
    ///
    /// The whole chain is planned before anything is mutated, so a crossing
    /// segment found halfway leaves the mesh untouched.
    pub(crate) fn recover_segment(&mut self, v1: VertId, v2: VertId, marker: i32) -> Result<(), MeshError> {
        let mut pieces = Vec::new();
        let mut from = v1;
        while from != v2 {
            if pieces.len() > self.vertices.len() {
                return Err(MeshError::unresolvable(v1, v2, "segment walk does not terminate"));
            }
            let direction = self
                .find_direction(from, v2)
                .map_err(|reason| MeshError::unresolvable(v1, v2, reason))?;
            match direction {
                Direction::Along(w) => {
                    pieces.push(Piece::Existing { from, to: w });
                    from = w;
                }
                Direction::Crossing(o) => {
                    let cavity = self
                        .trace_crossing(o, from, v2)
                        .map_err(|reason| MeshError::unresolvable(v1, v2, reason))?;
                    from = cavity.to;
                    pieces.push(Piece::Cavity(cavity));
                }
            }
        }

        let mut prev = NO_SUBSEG;
        for piece in pieces {
            let start = match &piece {
                Piece::Existing { from, .. } => *from,
                Piece::Cavity(cavity) => cavity.from,
            };
            let seg = match piece {
                Piece::Existing { from, to } => {
                    let Some(o) = self.find_edge(from, to) else {
                        unreachable!("edge {from}-{to} vanished during segment recovery");
                    };
                    let existing = self.tspivot(o);
                    if existing.is_none() {
                        let s = self.make_subseg(Subseg::new(from, to, [v1, v2], marker));
                        self.attach_subseg(o, s);
                        s
                    } else {
                        if marker != 0 {
                            self.subsegs[existing.seg].marker = marker;
                        }
                        existing.seg
                    }
                }
                Piece::Cavity(cavity) => {
                    let s = self.make_subseg(Subseg::new(cavity.from, cavity.to, [v1, v2], marker));
                    tracing::trace!(
                        from = cavity.from,
                        to = cavity.to,
                        crossed = cavity.crossed.len(),
                        "retriangulating segment cavity"
                    );
                    self.retriangulate_cavity(&cavity, s);
                    s
                }
            };
            if prev != NO_SUBSEG && prev != seg {
                self.link_pieces(prev, seg, start);
            }
            prev = seg;
        }
        Ok(())
    }

    /// Chains two consecutive pieces meeting at `at`. Pieces reused from an
    /// overlapping input segment keep their own chain.
    fn link_pieces(&mut self, a: usize, b: usize, at: VertId) {
        if !self.subsegs[a].same_input_segment(&self.subsegs[b]) {
            return;
        }
        for (s, other) in [(a, b), (b, a)] {
            if let Some(k) = self.subsegs[s].orient_from(at) {
                self.subsegs[s].adjoining[k] = other;
            }
        }
    }

    /// Handle for the edge `a`-`b` (either direction), if it exists.
    pub(crate) fn find_edge(&self, a: VertId, b: VertId) -> Option<Otri> {
        self.vertex_star(a).into_iter().find_map(|o| {
            if self.dest(o) == b {
                Some(o)
            } else if self.apex(o) == b {
                Some(o.lprev())
            } else {
                None
            }
        })
    }

    fn find_direction(&self, from: VertId, to: VertId) -> Result<Direction, String> {
        let star = self.vertex_star(from);
        if star.is_empty() {
            return Err(format!("vertex {from} is not part of the triangulation"));
        }
        let (pf, pt) = (*self.point(from), *self.point(to));
        for &o in &star {
            if self.dest(o) == to || self.apex(o) == to {
                return Ok(Direction::Along(to));
            }
        }
        let ahead = |w: VertId| w != from && is_point_on_segment(self.point(w), &pf, &pt);
        for &o in &star {
            let (b, c) = (self.dest(o), self.apex(o));
            if ahead(b) {
                return Ok(Direction::Along(b));
            }
            if ahead(c) {
                return Ok(Direction::Along(c));
            }
            if orient2d(&pf, self.point(b), &pt) == Orientation::CounterClockwise
                && orient2d(&pf, self.point(c), &pt) == Orientation::Clockwise
            {
                return Ok(Direction::Crossing(o));
            }
        }
        Err("segment leaves the triangulated domain".to_string())
    }

    /// Read-only walk along `from -> to` starting in the triangle of `o`.
    /// Stops at `to` or at the first vertex lying exactly on the segment.
    fn trace_crossing(&mut self, o: Otri, from: VertId, to: VertId) -> Result<Cavity, String> {
        let mut marks = FloodMarks::new(self);
        let (pf, pt) = (*marks.point(from), *marks.point(to));
        marks.mark(o.tri);
        let mut left = vec![marks.apex(o)];
        let mut right = vec![marks.dest(o)];
        // origin of `e` is right of the segment, destination left
        let mut e = o.lnext();
        let end = loop {
            let os = marks.tspivot(e);
            if !os.is_none() {
                return Err(format!(
                    "crosses segment {}-{}",
                    marks.sorg(os),
                    marks.sdest(os)
                ));
            }
            let n = marks.sym(e);
            if n.is_outer() {
                return Err("segment leaves the triangulated domain".to_string());
            }
            if !marks.mark(n.tri) {
                return Err("segment walk revisited a triangle".to_string());
            }
            let w = marks.apex(n);
            if w == to {
                break w;
            }
            match orient2d(&pf, &pt, marks.point(w)) {
                Orientation::Collinear => break w,
                Orientation::CounterClockwise => {
                    left.push(w);
                    e = n.lnext();
                }
                Orientation::Clockwise => {
                    right.push(w);
                    e = n.lprev();
                }
            }
        };
        let crossed = marks.release();
        Ok(Cavity {
            from,
            to: end,
            crossed,
            left,
            right,
        })
    }

    /// Replaces the crossed triangles by two pseudo-polygon triangulations
    /// sharing the edge `from`-`to`, which receives subsegment `seg`.
    fn retriangulate_cavity(&mut self, cavity: &Cavity, seg: usize) {
        let mut tris = Vec::with_capacity(cavity.crossed.len());
        let left: Vec<VertId> = cavity.left.iter().rev().copied().collect();
        self.triangulate_pseudo_polygon(cavity.from, cavity.to, &left, &mut tris);
        self.triangulate_pseudo_polygon(cavity.to, cavity.from, &cavity.right, &mut tris);
        debug_assert_eq!(tris.len(), cavity.crossed.len());
        let parent = cavity.crossed[0];
        let new: Vec<([VertId; 3], usize)> = tris.into_iter().map(|t| (t, parent)).collect();
        self.replace_triangles(&cavity.crossed, &new, &[seg]);
    }

    /// Triangulates the polygon `a, b, chain[0], .., chain[k-1]`
    /// (counter-clockwise) whose vertices all lie left of `a -> b`.
    /// Each step picks the chain vertex whose circle through `a` and `b`
    /// holds no other chain vertex, keeping the earlier one on ties.
    fn triangulate_pseudo_polygon(&self, a: VertId, b: VertId, chain: &[VertId], out: &mut Vec<[VertId; 3]>) {
        let mut work = vec![(a, b, chain)];
        while let Some((a, b, chain)) = work.pop() {
            if chain.is_empty() {
                continue;
            }
            let (pa, pb) = (self.point(a), self.point(b));
            let mut best = 0;
            for j in 1..chain.len() {
                if incircle(pa, pb, self.point(chain[best]), self.point(chain[j])) == CircleSide::Inside {
                    best = j;
                }
            }
            let c = chain[best];
            out.push([a, b, c]);
            work.push((c, b, &chain[..best]));
            work.push((a, c, &chain[best + 1..]));
        }
    }
}
