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

use rand::Rng;

use crate::error::MeshError;
use crate::geometry::Point2;
use crate::kernel::{Orientation, orient2d, orient2d_sign};
use crate::mesh::Mesh;
use crate::mesh::triangle::{OUTER_HANDLE, Otri};

/// Result of walking the triangulation towards a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Location {
    /// Strictly inside the triangle.
    InTriangle(Otri),
    /// On the interior of the edge.
    OnEdge(Otri),
    /// On the origin of the handle.
    OnVertex(Otri),
    /// Beyond a hull edge (the handle), or the mesh is empty.
    Outside(Otri),
    /// Beyond a subsegment the walk was not allowed to cross.
    Blocked(Otri),
}

impl Location {
    pub(crate) fn handle(self) -> Otri {
        match self {
            Location::InTriangle(o)
            | Location::OnEdge(o)
            | Location::OnVertex(o)
            | Location::Outside(o)
            | Location::Blocked(o) => o,
        }
    }
}

/// Public classification of a located point, in renumbered ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointLocation {
    InTriangle { triangle: usize },
    OnEdge { triangle: usize, edge: [usize; 2] },
    OnVertex { vertex: usize },
}

const RESTARTS: usize = 3;

impl Mesh {
    /// Finds the triangle containing `(x, y)`.
    pub fn locate(&mut self, x: f64, y: f64) -> Result<PointLocation, MeshError> {
        let p = Point2::new(x, y);
        if !p.is_finite() {
            return Err(MeshError::invalid("cannot locate a non-finite point"));
        }
        match self.locate_point(&p, false) {
            Location::InTriangle(o) => Ok(PointLocation::InTriangle {
                triangle: self.triangles[o.tri].id,
            }),
            Location::OnEdge(o) => Ok(PointLocation::OnEdge {
                triangle: self.triangles[o.tri].id,
                edge: [self.org(o), self.dest(o)],
            }),
            Location::OnVertex(o) => Ok(PointLocation::OnVertex { vertex: self.org(o) }),
            Location::Outside(_) | Location::Blocked(_) => Err(MeshError::PointOutsideDomain { x, y }),
        }
    }

    /// Stochastic remembering walk from the most recent triangle, restarted
    /// from random triangles when it runs too long and finally replaced by
    /// an exhaustive scan.
    pub(crate) fn locate_point(&mut self, p: &Point2, stop_at_subsegs: bool) -> Location {
        let Some(mut start) = self.any_live_triangle() else {
            return Location::Outside(OUTER_HANDLE);
        };
        let limit = 16 + self.live_triangles;
        for attempt in 0..=RESTARTS {
            match self.walk(start, p, stop_at_subsegs, limit) {
                Some(Location::Outside(_)) if !self.convex => break,
                Some(loc) => {
                    self.recent = loc.handle().tri;
                    return loc;
                }
                None => {}
            }
            tracing::trace!(attempt, "point location restart");
            start = self.random_live_triangle().unwrap_or(start);
        }
        let loc = self.scan_for(p);
        if !loc.handle().is_outer() {
            self.recent = loc.handle().tri;
        }
        loc
    }

    fn random_live_triangle(&mut self) -> Option<usize> {
        let len = self.triangles.len();
        if len <= 1 {
            return None;
        }
        for _ in 0..8 {
            let t = self.rng.random_range(1..len);
            if self.triangles[t].alive {
                return Some(t);
            }
        }
        self.any_live_triangle()
    }

    fn walk(&mut self, start: usize, p: &Point2, stop_at_subsegs: bool, limit: usize) -> Option<Location> {
        let mut cur = start;
        let mut entry = 3;
        for _ in 0..limit {
            let first = self.rng.random_range(0..3);
            let mut next = None;
            for i in 0..3 {
                let k = (first + i) % 3;
                if k == entry {
                    continue;
                }
                let o = Otri::new(cur, k);
                if orient2d(self.point(self.org(o)), self.point(self.dest(o)), p) == Orientation::Clockwise {
                    next = Some(o);
                    break;
                }
            }
            let Some(o) = next else {
                return Some(self.classify_inside(cur, p));
            };
            let s = self.sym(o);
            if s.is_outer() {
                return Some(Location::Outside(o));
            }
            if stop_at_subsegs && self.has_subseg(o) {
                return Some(Location::Blocked(o));
            }
            cur = s.tri;
            entry = s.orient;
        }
        None
    }

    /// Walks along the straight line from the centroid of `start` to
    /// `target`, refusing to cross subsegments.
    pub(crate) fn walk_toward(&mut self, start: usize, target: &Point2) -> Location {
        let [a, b, c] = self.corners(start);
        let src = Point2::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0);
        let mut cur = start;
        let mut entry = 3;
        for _ in 0..(16 + self.live_triangles) {
            let mut crossing = None;
            let mut fallback = None;
            for k in 0..3 {
                if k == entry {
                    continue;
                }
                let o = Otri::new(cur, k);
                let (pa, pb) = (self.point(self.org(o)), self.point(self.dest(o)));
                if orient2d(pa, pb, target) != Orientation::Clockwise {
                    continue;
                }
                if fallback.is_none() {
                    fallback = Some(o);
                }
                if orient2d_sign(&src, target, pa) * orient2d_sign(&src, target, pb) <= 0 {
                    crossing = Some(o);
                    break;
                }
            }
            let Some(o) = crossing.or(fallback) else {
                let loc = self.classify_inside(cur, target);
                self.recent = cur;
                return loc;
            };
            let s = self.sym(o);
            if s.is_outer() {
                return Location::Outside(o);
            }
            if self.has_subseg(o) {
                return Location::Blocked(o);
            }
            cur = s.tri;
            entry = s.orient;
        }
        self.locate_point(target, true)
    }

    /// Classifies `p`, known not to lie strictly outside any edge of `t`.
    fn classify_inside(&self, t: usize, p: &Point2) -> Location {
        for k in 0..3 {
            let o = Otri::new(t, k);
            if self.point(self.org(o)) == p {
                return Location::OnVertex(o);
            }
        }
        for k in 0..3 {
            let o = Otri::new(t, k);
            if orient2d(self.point(self.org(o)), self.point(self.dest(o)), p) == Orientation::Collinear {
                return Location::OnEdge(o);
            }
        }
        Location::InTriangle(Otri::new(t, 0))
    }

    fn scan_for(&self, p: &Point2) -> Location {
        for t in self.live_triangle_ids() {
            let inside = (0..3).all(|k| {
                let o = Otri::new(t, k);
                orient2d(self.point(self.org(o)), self.point(self.dest(o)), p) != Orientation::Clockwise
            });
            if inside {
                return self.classify_inside(t, p);
            }
        }
        let visible = self.hull_edges().into_iter().find(|&o| {
            orient2d(self.point(self.org(o)), self.point(self.dest(o)), p) == Orientation::Clockwise
        });
        Location::Outside(visible.unwrap_or(OUTER_HANDLE))
    }
}
