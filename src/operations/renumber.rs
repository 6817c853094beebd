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
use crate::mesh::Mesh;
use crate::mesh::segment::Osub;
use crate::mesh::triangle::Otri;
use crate::mesh::vertex::Vertex;

/// Read-only view of a live triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleView<'a> {
    pub id: usize,
    /// Vertex ids in counter-clockwise order.
    pub corners: [usize; 3],
    /// `neighbors[i]` lies across the edge opposite `corners[i]`; `None` on
    /// the boundary.
    pub neighbors: [Option<usize>; 3],
    pub attributes: &'a [f64],
    pub area_constraint: Option<f64>,
    pub area: f64,
}

/// An undirected mesh edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub p0: usize,
    pub p1: usize,
    pub boundary: bool,
    /// Marker of the segment covering the edge, 0 if unconstrained.
    pub marker: i32,
}

/// A recovered segment piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentView {
    pub id: usize,
    pub endpoints: [usize; 2],
    pub marker: i32,
}

/// Lazily enumerates every edge once, from the triangle with the smaller id.
pub struct Edges<'a> {
    mesh: &'a Mesh,
    tri: usize,
    orient: usize,
}

impl Iterator for Edges<'_> {
    type Item = Edge;

    fn next(&mut self) -> Option<Edge> {
        let mesh = self.mesh;
        while self.tri < mesh.triangles.len() {
            if mesh.triangles[self.tri].alive {
                while self.orient < 3 {
                    let o = Otri::new(self.tri, self.orient);
                    self.orient += 1;
                    let n = mesh.sym(o);
                    if n.is_outer() || mesh.triangles[n.tri].id > mesh.triangles[self.tri].id {
                        let os = mesh.tspivot(o);
                        return Some(Edge {
                            p0: mesh.org(o),
                            p1: mesh.dest(o),
                            boundary: n.is_outer(),
                            marker: if os.is_none() { 0 } else { mesh.subsegs[os.seg].marker },
                        });
                    }
                }
            }
            self.tri += 1;
            self.orient = 0;
        }
        None
    }
}

impl Mesh {
    /// Assigns contiguous ids to vertices, live triangles and live
    /// subsegments. Called at the end of every public mutation.
    pub(crate) fn renumber(&mut self) {
        for (i, v) in self.vertices.iter_mut().enumerate() {
            v.id = i;
        }
        let mut next = 0;
        for tri in self.triangles.iter_mut().skip(1) {
            if tri.alive {
                tri.id = next;
                tri.hash = next;
                next += 1;
            } else {
                tri.id = usize::MAX;
            }
        }
        self.next_hash = next;
        let mut next = 0;
        for seg in self.subsegs.iter_mut().skip(1) {
            if seg.alive {
                seg.id = next;
                next += 1;
            }
        }
    }

    /// Every vertex, including input points that ended up outside the mesh
    /// (see [`crate::VertexKind::Free`]).
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex(&self, id: usize) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    /// Live triangles in id order.
    pub fn triangles(&self) -> impl Iterator<Item = TriangleView<'_>> + '_ {
        self.live_triangle_ids().map(move |t| {
            let tri = &self.triangles[t];
            let [a, b, c] = self.corners(t);
            TriangleView {
                id: tri.id,
                corners: tri.vertices,
                neighbors: tri.neighbors.map(|n| {
                    if n.is_outer() {
                        None
                    } else {
                        Some(self.triangles[n.tri].id)
                    }
                }),
                attributes: &tri.attributes,
                area_constraint: (tri.area > 0.0).then_some(tri.area),
                area: crate::kernel::predicates::triangle_area(&a, &b, &c),
            }
        })
    }

    pub fn edges(&self) -> Edges<'_> {
        Edges {
            mesh: self,
            tri: 1,
            orient: 0,
        }
    }

    /// Live subsegments. Each input segment may appear as several pieces
    /// once refinement has split it.
    pub fn segments(&self) -> impl Iterator<Item = SegmentView> + '_ {
        self.live_subseg_ids()
            .map(move |s| self.segment_view(Osub::new(s, 0)))
    }

    /// Every piece of the input segment that segment `id` belongs to, in
    /// order from one input endpoint to the other, with endpoints oriented
    /// along the chain. `None` if no segment has this id.
    pub fn segment_chain(&self, id: usize) -> Option<Vec<SegmentView>> {
        let s = self.live_subseg_ids().find(|&s| self.subsegs[s].id == id)?;
        let mut first = Osub::new(s, 0);
        for _ in 0..self.live_subsegs {
            match self.sprev(first) {
                Some(p) => first = p,
                None => break,
            }
        }
        let chain = std::iter::successors(Some(first), |&os| self.snext(os))
            .take(self.live_subsegs)
            .map(|os| self.segment_view(os))
            .collect();
        Some(chain)
    }

    fn segment_view(&self, os: Osub) -> SegmentView {
        let seg = &self.subsegs[os.seg];
        SegmentView {
            id: seg.id,
            endpoints: [self.sorg(os), self.sdest(os)],
            marker: seg.marker,
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.live_triangles
    }

    pub fn num_boundary_edges(&self) -> usize {
        self.live_triangle_ids()
            .map(|t| {
                self.triangles[t]
                    .neighbors
                    .iter()
                    .filter(|n| n.is_outer())
                    .count()
            })
            .sum()
    }

    /// `(3T + B) / 2` for `T` triangles and `B` boundary edges.
    pub fn num_edges(&self) -> usize {
        (3 * self.num_triangles() + self.num_boundary_edges()) / 2
    }

    pub fn num_segments(&self) -> usize {
        self.live_subsegs
    }

    /// Non-fatal problems met while building or refining: skipped segments
    /// and unreachable quality bounds.
    pub fn warnings(&self) -> &[MeshError] {
        &self.warnings
    }

    /// Steiner points inserted over the mesh's lifetime.
    pub fn steiner_point_count(&self) -> usize {
        self.steiner_points
    }

    pub fn num_vertex_attributes(&self) -> usize {
        self.n_vertex_attributes
    }
}

#[cfg(test)]
mod tests {
    use crate::{InputGeometry, Mesh, MeshOptions};

    #[test]
    fn ids_are_contiguous_after_insertion() {
        let input = InputGeometry::from_points([(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        let mut mesh = Mesh::build(&input, &MeshOptions::default()).unwrap();
        mesh.insert(1.0, 1.0).unwrap();
        mesh.insert(3.0, 2.0).unwrap();
        let ids: Vec<usize> = mesh.triangles().map(|t| t.id).collect();
        assert_eq!(ids, (0..mesh.num_triangles()).collect::<Vec<_>>());
        for t in mesh.triangles() {
            for n in t.neighbors.into_iter().flatten() {
                assert!(n < mesh.num_triangles());
            }
        }
    }

    #[test]
    fn edges_are_listed_once() {
        let input = InputGeometry::from_points([(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (2.0, 1.0)]);
        let mesh = Mesh::build(&input, &MeshOptions::default()).unwrap();
        let edges: Vec<_> = mesh.edges().collect();
        assert_eq!(edges.len(), mesh.num_edges());
        assert_eq!(edges.iter().filter(|e| e.boundary).count(), 4);
        let mut keys: Vec<(usize, usize)> =
            edges.iter().map(|e| (e.p0.min(e.p1), e.p0.max(e.p1))).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), edges.len());
    }
}
