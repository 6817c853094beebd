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
use crate::geometry::{Hole, Point2, Region};
use crate::mesh::Mesh;
use crate::mesh::segment::Subseg;
use crate::mesh::topology::FloodMarks;
use crate::mesh::triangle::{OUTER_HANDLE, Otri};
use crate::mesh::vertex::VertexKind;
use crate::operations::locate::Location;

impl Mesh {
    /// Removes concavities and holes, then spreads region attributes.
    ///
    /// Concavities are the triangles reachable from an unconstrained hull
    /// edge without crossing a subsegment; holes are the triangles reachable
    /// the same way from each hole point.
    pub(crate) fn carve(
        &mut self,
        holes: &[Hole],
        regions: &[Region],
        carve_concavities: bool,
    ) -> Result<(), MeshError> {
        let mut seeds = Vec::new();
        if carve_concavities {
            for o in self.hull_edges() {
                if !self.has_subseg(o) {
                    seeds.push(o.tri);
                }
            }
        }
        for (i, hole) in holes.iter().enumerate() {
            let t = self.seed_triangle(&hole.point, "hole", i)?;
            seeds.push(t);
        }

        let eaten = {
            let mut marks = FloodMarks::new(self);
            let mut stack = Vec::new();
            for t in seeds {
                if marks.mark(t) {
                    stack.push(t);
                }
            }
            spread(&mut marks, stack);
            let doomed = marks.marked().to_vec();
            for &t in &doomed {
                for k in 0..3 {
                    let o = Otri::new(t, k);
                    let os = marks.tspivot(o);
                    if !os.is_none() {
                        marks.subsegs[os.seg].triangles[os.orient] = OUTER_HANDLE;
                    }
                    let n = marks.sym(o);
                    if !n.is_outer() && !marks.is_marked(n.tri) {
                        marks.dissolve(n);
                    }
                }
            }
            for &t in &doomed {
                marks.kill_triangle(t);
            }
            doomed.len()
        };
        if eaten > 0 {
            self.convex = false;
        }

        let orphaned: Vec<usize> = self
            .live_subseg_ids()
            .filter(|&s| self.subsegs[s].triangles.iter().all(|o| o.is_outer()))
            .collect();
        for &s in &orphaned {
            self.kill_subseg(s);
        }
        tracing::debug!(
            eaten,
            orphaned_segments = orphaned.len(),
            holes = holes.len(),
            "carved holes and concavities"
        );

        for (i, region) in regions.iter().enumerate() {
            let t = self.seed_triangle(&region.point, "region", i)?;
            let mut marks = FloodMarks::new(self);
            marks.mark(t);
            spread(&mut marks, vec![t]);
            let covered = marks.marked().to_vec();
            for t in covered {
                let tri = &mut marks.triangles[t];
                if let Some(slot) = tri.attributes.first_mut() {
                    *slot = region.attribute;
                }
                if let Some(area) = region.max_area {
                    tri.area = area;
                }
            }
        }

        self.rebuild_vertex_hints();
        let mut referenced = vec![false; self.vertices.len()];
        for t in self.live_triangle_ids() {
            for &v in &self.triangles[t].vertices {
                referenced[v] = true;
            }
        }
        for (v, used) in referenced.into_iter().enumerate() {
            if !used {
                self.vertices[v].kind = VertexKind::Free;
            }
        }
        Ok(())
    }

    /// Triangle strictly containing a hole or region point.
    fn seed_triangle(&mut self, p: &Point2, what: &str, index: usize) -> Result<usize, MeshError> {
        match self.locate_point(p, false) {
            Location::InTriangle(o) => Ok(o.tri),
            Location::OnEdge(_) | Location::OnVertex(_) => Err(MeshError::invalid(format!(
                "{what} {index} at ({}, {}) lies on a mesh vertex or edge",
                p.x, p.y
            ))),
            Location::Outside(_) | Location::Blocked(_) => Err(MeshError::invalid(format!(
                "{what} {index} at ({}, {}) lies outside the triangulated domain",
                p.x, p.y
            ))),
        }
    }

    /// Gives every unconstrained boundary edge a subsegment with marker 1.
    pub(crate) fn mark_hull(&mut self) -> usize {
        let mut added = 0;
        for o in self.hull_edges() {
            if self.has_subseg(o) {
                continue;
            }
            let (a, b) = (self.org(o), self.dest(o));
            let s = self.make_subseg(Subseg::new(a, b, [a, b], 1));
            self.tsbond(o, s);
            added += 1;
        }
        added
    }

    /// Segment endpoints without a marker take the segment's marker.
    pub(crate) fn inherit_segment_markers(&mut self) {
        let segs: Vec<usize> = self.live_subseg_ids().collect();
        for s in segs {
            let (vertices, marker) = (self.subsegs[s].vertices, self.subsegs[s].marker);
            for v in vertices {
                if self.vertices[v].marker == 0 {
                    self.vertices[v].marker = marker;
                }
            }
        }
    }
}

/// Flood fill across unconstrained edges from the already marked `stack`.
fn spread(marks: &mut FloodMarks<'_>, mut stack: Vec<usize>) {
    while let Some(t) = stack.pop() {
        for k in 0..3 {
            let o = Otri::new(t, k);
            if marks.has_subseg(o) {
                continue;
            }
            let n = marks.sym(o);
            if n.is_outer() {
                continue;
            }
            if marks.mark(n.tri) {
                stack.push(n.tri);
            }
        }
    }
}
