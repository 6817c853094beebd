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

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::{MeshOptions, RELIABLE_MIN_ANGLE};
use crate::error::MeshError;
use crate::geometry::Aabb;
use crate::kernel::predicates::{circumcenter, in_diametral_circle, min_angle_cosine, triangle_area};
use crate::mesh::Mesh;
use crate::mesh::triangle::Otri;
use crate::mesh::vertex::{VertId, Vertex, VertexKind};
use crate::operations::insert::InsertOutcome;
use crate::operations::locate::Location;

/// Outcome of a refinement run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefinementResult {
    /// Steiner points inserted by this run.
    pub steiner_points: usize,
    /// `false` if the run stopped early (budget exhausted or cancelled).
    pub refinement_complete: bool,
    pub cancelled: bool,
}

/// Bad-triangle criteria derived from the options.
#[derive(Debug, Clone, Copy)]
struct Quality {
    /// Cosine of the minimum angle; smaller angles have larger cosines.
    max_cosine: Option<f64>,
    max_area: Option<f64>,
    variable_area: bool,
}

impl Quality {
    fn from_options(options: &MeshOptions) -> Self {
        Quality {
            max_cosine: options
                .min_angle
                .filter(|&a| a > 0.0)
                .map(|a| a.to_radians().cos()),
            max_area: options.max_area,
            variable_area: options.variable_area,
        }
    }
}

/// Edges shorter than this fraction of the domain diameter are never split.
const MIN_EDGE_RATIO: f64 = 1e-9;

/// Queued subsegment. `forced` entries are split even if no adjacent apex
/// encroaches them (a circumcenter was blocked by or encroached them).
#[derive(Debug, Clone, Copy)]
struct SegmentTask {
    seg: usize,
    vertices: [VertId; 2],
    forced: bool,
}

impl Mesh {
    /// Refines the mesh until no triangle violates the bounds in `options`.
    pub fn refine(&mut self, options: &MeshOptions) -> Result<RefinementResult, MeshError> {
        self.refine_with_cancel(options, &AtomicBool::new(false))
    }

    /// Like [`Mesh::refine`], polling `cancel` once per iteration.
    pub fn refine_with_cancel(
        &mut self,
        options: &MeshOptions,
        cancel: &AtomicBool,
    ) -> Result<RefinementResult, MeshError> {
        options.validate()?;
        self.track_constraints = true;
        self.mark_hull();
        let result = self.run_refinement(options, cancel);
        self.renumber();
        Ok(result)
    }

    /// Ruppert's loop: encroached subsegments are split before any bad
    /// triangle is touched.
    pub(crate) fn run_refinement(&mut self, options: &MeshOptions, cancel: &AtomicBool) -> RefinementResult {
        let quality = Quality::from_options(options);
        let start = self.steiner_points;
        let budget = options.steiner_limit(start);
        if options.max_steiner_points.is_none() && budget.is_some() {
            tracing::warn!(
                min_angle = ?options.min_angle,
                reliable = RELIABLE_MIN_ANGLE,
                "minimum angle may be unreachable, capping Steiner points"
            );
        }
        let floor = Aabb::enclosing(self.vertices.iter().map(|v| &v.point))
            .map_or(0.0, |bounds| bounds.diameter() * MIN_EDGE_RATIO);
        let mut stalled = 0;

        let mut segments: VecDeque<SegmentTask> = VecDeque::new();
        let mut skinny: VecDeque<(usize, usize)> = VecDeque::new();
        let subsegs: Vec<usize> = self.live_subseg_ids().collect();
        for s in subsegs {
            if self.subseg_encroached(s) {
                segments.push_back(self.segment_task(s, false));
            }
        }
        let tris: Vec<usize> = self.live_triangle_ids().collect();
        for t in tris {
            if self.is_bad(t, &quality) {
                skinny.push_back((t, self.triangles[t].hash));
            }
        }
        tracing::debug!(
            encroached = segments.len(),
            bad_triangles = skinny.len(),
            "refinement started"
        );

        let mut complete = true;
        let mut cancelled = false;

        loop {
            if cancel.load(Ordering::Relaxed) {
                cancelled = true;
                complete = false;
                break;
            }

            if let Some(task) = segments.pop_front() {
                let s = task.seg;
                if !self.subsegs[s].alive || self.subsegs[s].vertices != task.vertices {
                    continue;
                }
                if !task.forced && !self.subseg_encroached(s) {
                    continue;
                }
                let [a, b] = task.vertices;
                if self.point(a).distance_to(self.point(b)) < 2.0 * floor {
                    stalled += 1;
                    continue;
                }
                if self.budget_exhausted(budget) {
                    segments.push_front(task);
                    complete = false;
                    break;
                }
                let v = self.split_segment(s);
                self.steiner_points += 1;
                self.rescan_star(v, &quality, &mut segments, &mut skinny);
                continue;
            }

            let Some((t, hash)) = skinny.pop_front() else {
                break;
            };
            if !self.is_live(t) || self.triangles[t].hash != hash || !self.is_bad(t, &quality) {
                continue;
            }
            if self.spans_small_input_angle(t) {
                continue;
            }
            if self.shortest_edge(t) < floor {
                stalled += 1;
                continue;
            }
            if self.budget_exhausted(budget) {
                skinny.push_front((t, hash));
                complete = false;
                break;
            }

            let [a, b, c] = self.corners(t);
            let center = circumcenter(&a, &b, &c);
            if !center.is_finite() {
                continue;
            }
            match self.walk_toward(t, &center) {
                Location::Blocked(o) | Location::Outside(o) => {
                    let os = self.tspivot(o);
                    if os.is_none() {
                        continue;
                    }
                    segments.push_back(self.segment_task(os.seg, true));
                    skinny.push_back((t, hash));
                }
                Location::OnVertex(_) => {}
                loc => match self.insert_at(center, loc, true, VertexKind::Steiner) {
                    InsertOutcome::Inserted(v) => {
                        self.steiner_points += 1;
                        self.rescan_star(v, &quality, &mut segments, &mut skinny);
                    }
                    InsertOutcome::Encroaches(s) => {
                        segments.push_back(self.segment_task(s, true));
                        skinny.push_back((t, hash));
                    }
                    InsertOutcome::Duplicate(_) | InsertOutcome::Outside => {}
                },
            }
        }

        let steiner_points = self.steiner_points - start;
        if stalled > 0 && !cancelled {
            complete = false;
        }
        if !complete && !cancelled {
            let remaining = segments.len() + skinny.len() + stalled;
            tracing::warn!(steiner_points, remaining, stalled, "quality bound not reached");
            self.warnings.push(MeshError::QualityBoundUnreachable {
                steiner_points,
                remaining,
            });
        }
        tracing::debug!(steiner_points, complete, cancelled, "refinement finished");
        RefinementResult {
            steiner_points,
            refinement_complete: complete,
            cancelled,
        }
    }

    fn shortest_edge(&self, t: usize) -> f64 {
        let [a, b, c] = self.corners(t);
        a.distance_to(&b).min(b.distance_to(&c)).min(c.distance_to(&a))
    }

    fn budget_exhausted(&self, budget: Option<usize>) -> bool {
        budget.is_some_and(|max| self.steiner_points >= max)
    }

    fn segment_task(&self, seg: usize, forced: bool) -> SegmentTask {
        SegmentTask {
            seg,
            vertices: self.subsegs[seg].vertices,
            forced,
        }
    }

    /// A subsegment is encroached when the apex of an adjacent triangle lies
    /// strictly inside its diametral circle.
    pub(crate) fn subseg_encroached(&self, s: usize) -> bool {
        let seg = &self.subsegs[s];
        let (pa, pb) = (self.point(seg.vertices[0]), self.point(seg.vertices[1]));
        seg.triangles.iter().any(|&o| {
            !o.is_outer()
                && self.is_live(o.tri)
                && self.tspivot(o).seg == s
                && in_diametral_circle(pa, pb, self.point(self.apex(o)))
        })
    }

    fn is_bad(&self, t: usize, quality: &Quality) -> bool {
        let [a, b, c] = self.corners(t);
        if let Some(max_cosine) = quality.max_cosine {
            if min_angle_cosine(&a, &b, &c) > max_cosine {
                return true;
            }
        }
        let area = triangle_area(&a, &b, &c);
        if quality.max_area.is_some_and(|max| area > max) {
            return true;
        }
        if quality.variable_area {
            let cap = self.triangles[t].area;
            if cap > 0.0 && area > cap {
                return true;
            }
        }
        false
    }

    /// True when the shortest edge of `t` joins two split points of distinct
    /// input segments meeting at a shared input vertex, at equal distance
    /// from it; such angles cannot be improved.
    fn spans_small_input_angle(&self, t: usize) -> bool {
        let shortest = (0..3)
            .map(|k| Otri::new(t, k))
            .min_by(|&x, &y| {
                let lx = self.point(self.org(x)).distance_squared_to(self.point(self.dest(x)));
                let ly = self.point(self.org(y)).distance_squared_to(self.point(self.dest(y)));
                lx.total_cmp(&ly)
            });
        let Some(e) = shortest else {
            return false;
        };
        if self.has_subseg(e) {
            return false;
        }
        let (u, w) = (self.org(e), self.dest(e));
        let (Some(su), Some(sw)) = (self.vertices[u].on_segment, self.vertices[w].on_segment) else {
            return false;
        };
        if su == sw || su == [sw[1], sw[0]] {
            return false;
        }
        let Some(&joint) = su.iter().find(|v| sw.contains(v)) else {
            return false;
        };
        // both split points sit on the same concentric shell around the joint
        let pj = self.point(joint);
        let (du, dw) = (pj.distance_to(self.point(u)), pj.distance_to(self.point(w)));
        du < 1.001 * dw && du > 0.999 * dw
    }

    /// Splits subsegment `s`, at its midpoint or, when exactly one end is an
    /// endpoint of the input segment, at a power-of-two distance from that
    /// end (concentric shells).
    pub(crate) fn split_segment(&mut self, s: usize) -> VertId {
        let ([a, b], endpoints, marker) = {
            let seg = &self.subsegs[s];
            (seg.vertices, seg.seg_endpoints, seg.marker)
        };
        let (pa, pb) = (*self.point(a), *self.point(b));
        let (a_is_end, b_is_end) = (endpoints.contains(&a), endpoints.contains(&b));
        let (point, t) = if a_is_end != b_is_end {
            let len = pa.distance_to(&pb);
            let mut split = 1.0;
            while len > 3.0 * split {
                split *= 2.0;
            }
            while len < 1.5 * split {
                split *= 0.5;
            }
            let t = if a_is_end { split / len } else { 1.0 - split / len };
            (pa.lerp(&pb, t), t)
        } else {
            (pa.midpoint(&pb), 0.5)
        };

        let o = self.subseg_handle(s);
        let mut vertex = Vertex::new(point, marker, self.lerp_attributes(a, b, t), VertexKind::Steiner);
        vertex.on_segment = Some(endpoints);
        let v = self.add_vertex(vertex);
        let created = self.split_edge(o, v);
        self.legalize(v, created);
        tracing::trace!(segment = s, vertex = v, "split encroached segment");
        v
    }

    /// A triangle edge carrying subsegment `s`.
    fn subseg_handle(&self, s: usize) -> Otri {
        let seg = &self.subsegs[s];
        for &o in &seg.triangles {
            if !o.is_outer() && self.is_live(o.tri) && self.tspivot(o).seg == s {
                return o;
            }
        }
        let [a, b] = seg.vertices;
        match self.find_edge(a, b) {
            Some(o) => o,
            None => unreachable!("subsegment {s} is not attached to any triangle"),
        }
    }

    fn rescan_star(
        &self,
        v: VertId,
        quality: &Quality,
        segments: &mut VecDeque<SegmentTask>,
        skinny: &mut VecDeque<(usize, usize)>,
    ) {
        for o in self.vertex_star(v) {
            let t = o.tri;
            if self.is_bad(t, quality) {
                skinny.push_back((t, self.triangles[t].hash));
            }
            for k in 0..3 {
                let os = self.tspivot(Otri::new(t, k));
                if !os.is_none() && self.subseg_encroached(os.seg) {
                    segments.push_back(self.segment_task(os.seg, false));
                }
            }
        }
    }
}
