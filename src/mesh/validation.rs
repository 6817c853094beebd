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

use crate::error::TopologyViolation;
use crate::kernel::{CircleSide, Orientation, incircle, orient2d};
use crate::mesh::Mesh;
use crate::mesh::segment::{NO_SUBSEG, Osub};
use crate::mesh::triangle::Otri;

impl Mesh {
    /// Checks the structural invariants of every live triangle and returns
    /// the first violation found.
    pub fn validate(&self) -> Result<(), TopologyViolation> {
        for t in self.live_triangle_ids() {
            let triangle = self.triangles[t].id;
            let tri = &self.triangles[t];
            if tri.mark {
                return Err(TopologyViolation::MarkNotCleared { triangle });
            }
            let [a, b, c] = tri.vertices;
            if a == b || b == c || a == c {
                return Err(TopologyViolation::RepeatedCorner { triangle });
            }
            if orient2d(self.point(a), self.point(b), self.point(c)) != Orientation::CounterClockwise {
                return Err(TopologyViolation::NotCounterClockwise { triangle });
            }

            for edge in 0..3 {
                let o = Otri::new(t, edge);
                let n = self.sym(o);
                let os = self.tspivot(o);
                if !n.is_outer() {
                    if !self.is_live(n.tri) {
                        return Err(TopologyViolation::DeadNeighbor { triangle, edge });
                    }
                    if self.sym(n) != o || self.org(n) != self.dest(o) || self.dest(n) != self.org(o) {
                        return Err(TopologyViolation::AsymmetricNeighbor { triangle, edge });
                    }
                    if self.tspivot(n).seg != os.seg {
                        return Err(TopologyViolation::SegmentMismatch { triangle, edge });
                    }
                }
                if os.is_none() {
                    continue;
                }
                let seg = &self.subsegs[os.seg];
                if !seg.alive
                    || self.sorg(os) != self.org(o)
                    || self.sdest(os) != self.dest(o)
                    || self.stpivot(os) != o
                {
                    return Err(TopologyViolation::SegmentMismatch { triangle, edge });
                }
            }
        }

        for s in self.live_subseg_ids() {
            let seg = &self.subsegs[s];
            for orient in 0..2 {
                if seg.adjoining[1 - orient] == NO_SUBSEG {
                    continue;
                }
                let os = Osub::new(s, orient);
                let linked = self.snext(os).is_some_and(|n| {
                    let next = &self.subsegs[n.seg];
                    next.alive && seg.same_input_segment(next) && self.sprev(n) == Some(os)
                });
                if !linked {
                    return Err(TopologyViolation::BrokenChain { segment: seg.id });
                }
            }
        }
        Ok(())
    }

    /// Interior unconstrained edges whose opposite apex lies strictly inside
    /// the circumcircle across the edge. Zero for a constrained Delaunay mesh.
    pub fn delaunay_violations(&self) -> usize {
        let mut count = 0;
        for t in self.live_triangle_ids() {
            for k in 0..3 {
                let o = Otri::new(t, k);
                let n = self.sym(o);
                if n.is_outer() || n.tri < t || self.has_subseg(o) {
                    continue;
                }
                let (a, b, c, d) = (self.org(o), self.dest(o), self.apex(o), self.apex(n));
                if incircle(self.point(a), self.point(b), self.point(c), self.point(d)) == CircleSide::Inside {
                    count += 1;
                }
            }
        }
        count
    }
}
