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
use std::sync::atomic::AtomicBool;

use smallvec::SmallVec;

use crate::config::MeshOptions;
use crate::error::MeshError;
use crate::geometry::InputGeometry;
use crate::kernel::{Orientation, orient2d};
use crate::mesh::Mesh;
use crate::mesh::triangle::Otri;
use crate::mesh::vertex::{VertId, Vertex, VertexKind};
use crate::operations::locate::Location;

impl Mesh {
    /// Triangulates `input` and applies segments, holes, regions and quality
    /// refinement as requested by `options`.
    ///
    /// Segments that cannot be recovered (typically because they cross an
    /// earlier segment) are skipped and reported through [`Mesh::warnings`].
    pub fn build(input: &InputGeometry, options: &MeshOptions) -> Result<Mesh, MeshError> {
        options.validate()?;
        input.validate()?;

        let constrained = !input.segments().is_empty()
            || !input.holes().is_empty()
            || !input.regions().is_empty();
        let track = options.track_constraints || constrained || options.quality_requested();
        let n_triangle_attributes = usize::from(!input.regions().is_empty());
        let mut mesh = Mesh::empty(input.num_attributes(), n_triangle_attributes, track, options.seed);
        for p in input.points() {
            mesh.add_vertex(Vertex::new(
                p.point,
                p.marker,
                p.attributes.clone(),
                VertexKind::Input,
            ));
        }

        mesh.triangulate_vertices()?;
        tracing::debug!(
            vertices = mesh.vertices.len(),
            triangles = mesh.live_triangles,
            "delaunay triangulation built"
        );

        let mut recovered = 0usize;
        for s in input.segments() {
            match mesh.recover_segment(s.a, s.b, s.marker) {
                Ok(()) => recovered += 1,
                Err(err) => {
                    tracing::warn!(%err, "skipping segment");
                    mesh.warnings.push(err);
                }
            }
        }
        if !input.segments().is_empty() {
            tracing::debug!(
                recovered,
                skipped = input.segments().len() - recovered,
                "segments recovered"
            );
        }

        let carve_concavities = options.carve_concavities && !input.segments().is_empty();
        mesh.carve(input.holes(), input.regions(), carve_concavities)?;

        if mesh.track_constraints {
            let hull = mesh.mark_hull();
            mesh.inherit_segment_markers();
            tracing::trace!(hull, "hull edges marked");
        }

        if options.quality_requested() {
            mesh.run_refinement(options, &AtomicBool::new(false));
        }

        mesh.renumber();
        tracing::debug!(
            vertices = mesh.vertices.len(),
            triangles = mesh.live_triangles,
            segments = mesh.live_subsegs,
            warnings = mesh.warnings.len(),
            "mesh built"
        );
        Ok(mesh)
    }

    /// Incremental Delaunay triangulation of every vertex in the store,
    /// growing the hull as points outside it arrive.
    fn triangulate_vertices(&mut self) -> Result<(), MeshError> {
        let n = self.vertices.len();
        if n < 3 {
            return Err(MeshError::invalid("at least three points are required"));
        }
        let (p0, p1) = (*self.point(0), *self.point(1));
        let Some((third, orientation)) = (2..n)
            .map(|k| (k, orient2d(&p0, &p1, self.point(k))))
            .find(|&(_, o)| o != Orientation::Collinear)
        else {
            return Err(MeshError::invalid("all input points are collinear"));
        };

        let t = self.make_triangle();
        if orientation == Orientation::CounterClockwise {
            self.set_tri(t, 0, 1, third);
        } else {
            self.set_tri(t, 1, 0, third);
        }
        self.recent = t;

        for v in 2..n {
            if v != third {
                self.insert_input_vertex(v)?;
            }
        }
        Ok(())
    }

    fn insert_input_vertex(&mut self, v: VertId) -> Result<(), MeshError> {
        let p = *self.point(v);
        let created = match self.locate_point(&p, false) {
            Location::InTriangle(o) => self.split_triangle(o.tri, v),
            Location::OnEdge(o) => self.split_edge(o, v),
            Location::Outside(o) if !o.is_outer() => self.extend_hull(o, v),
            Location::OnVertex(o) => {
                return Err(MeshError::invalid(format!(
                    "point {v} duplicates point {}",
                    self.org(o)
                )));
            }
            Location::Outside(_) | Location::Blocked(_) => {
                unreachable!("unconstrained walk ended without a hull edge")
            }
        };
        self.legalize(v, created);
        Ok(())
    }

    /// Fans `v` onto every hull edge it can see, starting from the visible
    /// edge `h`.
    fn extend_hull(&mut self, h: Otri, v: VertId) -> SmallVec<[usize; 16]> {
        let p = *self.point(v);
        let visible = |mesh: &Mesh, o: Otri| {
            orient2d(mesh.point(mesh.org(o)), mesh.point(mesh.dest(o)), &p) == Orientation::Clockwise
        };

        let mut chain: VecDeque<Otri> = VecDeque::from([h]);
        let mut e = self.next_hull_edge(h);
        while e != h && visible(self, e) {
            chain.push_back(e);
            e = self.next_hull_edge(e);
        }
        let mut e = self.prev_hull_edge(h);
        while e != h && visible(self, e) && !chain.contains(&e) {
            chain.push_front(e);
            e = self.prev_hull_edge(e);
        }

        let mut created: SmallVec<[usize; 16]> = SmallVec::with_capacity(chain.len());
        let mut previous: Option<usize> = None;
        for hull in chain {
            let (u, w) = (self.org(hull), self.dest(hull));
            let t = self.make_triangle();
            self.set_tri(t, w, u, v);
            self.bond(Otri::new(t, 0), hull);
            if let Some(prev) = previous {
                self.bond(Otri::new(prev, 2), Otri::new(t, 1));
            }
            previous = Some(t);
            created.push(t);
        }
        if let Some(t) = previous {
            self.recent = t;
        }
        tracing::trace!(vertex = v, fan = created.len(), "hull extended");
        created
    }

    /// Hull edge following `h` (its origin is `h`'s destination).
    fn next_hull_edge(&self, h: Otri) -> Otri {
        let mut e = h.lnext();
        loop {
            let s = self.sym(e);
            if s.is_outer() {
                return e;
            }
            e = s.lnext();
        }
    }

    /// Hull edge preceding `h` (its destination is `h`'s origin).
    fn prev_hull_edge(&self, h: Otri) -> Otri {
        let mut e = h.lprev();
        loop {
            let s = self.sym(e);
            if s.is_outer() {
                return e;
            }
            e = s.lprev();
        }
    }
}
