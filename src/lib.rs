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

//! Two-dimensional constrained Delaunay triangulation with Ruppert quality
//! refinement.
//!
//! ```
//! use trimesh2d::{InputGeometry, Mesh, MeshOptions};
//!
//! let mut input = InputGeometry::new();
//! let a = input.add_point(0.0, 0.0);
//! let b = input.add_point(1.0, 0.0);
//! let c = input.add_point(1.0, 1.0);
//! let d = input.add_point(0.0, 1.0);
//! input.add_polygon(&[a, b, c, d], 1);
//!
//! let mesh = Mesh::build(&input, &MeshOptions::new().with_min_angle(20.0)).unwrap();
//! assert!(mesh.num_triangles() >= 2);
//! assert!(mesh.statistics().unwrap().min_angle >= 20.0 - 1e-9);
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod kernel;
pub mod mesh;
pub mod numeric;
pub mod operations;

pub use config::MeshOptions;
pub use error::{MeshError, TopologyViolation};
pub use geometry::{Aabb, Hole, InputGeometry, InputPoint, InputSegment, Point2, Region};
pub use mesh::{Mesh, Vertex, VertexKind};
pub use operations::{
    Edge, Edges, Insertion, MeshStatistics, PointLocation, RefinementResult, SegmentView,
    TriangleView,
};
