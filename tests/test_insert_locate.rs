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

use approx::assert_relative_eq;
use trimesh2d::{Insertion, InputGeometry, Mesh, MeshError, MeshOptions, PointLocation, VertexKind};

fn square(side: f64) -> Mesh {
    let input = InputGeometry::from_points([(0.0, 0.0), (side, 0.0), (side, side), (0.0, side)]);
    Mesh::build(&input, &MeshOptions::default()).unwrap()
}

fn bounded_square(side: f64, marker: i32) -> Mesh {
    let mut input = InputGeometry::from_points([(0.0, 0.0), (side, 0.0), (side, side), (0.0, side)]);
    input.add_polygon(&[0, 1, 2, 3], marker);
    Mesh::build(&input, &MeshOptions::default()).unwrap()
}

#[test]
fn test_locate_classifies_points() {
    let mut mesh = square(4.0);
    assert!(matches!(
        mesh.locate(1.0, 0.5).unwrap(),
        PointLocation::InTriangle { .. }
    ));
    match mesh.locate(2.0, 2.0).unwrap() {
        PointLocation::OnEdge { triangle, edge } => {
            assert!(triangle < mesh.num_triangles());
            let mut edge = edge;
            edge.sort();
            assert_eq!(edge, [0, 2]);
        }
        other => panic!("expected an edge, got {other:?}"),
    }
    assert_eq!(mesh.locate(4.0, 4.0).unwrap(), PointLocation::OnVertex { vertex: 2 });
    assert!(matches!(
        mesh.locate(5.0, 5.0),
        Err(MeshError::PointOutsideDomain { .. })
    ));
}

#[test]
fn test_insert_interior_point() {
    let mut mesh = square(4.0);
    let v = mesh.insert(1.0, 3.0).unwrap();
    assert_eq!(v, 4);
    assert_eq!(mesh.num_vertices(), 5);
    assert_eq!(mesh.num_triangles(), 4);
    assert_eq!(mesh.vertex(v).unwrap().kind(), VertexKind::Steiner);
    assert_eq!(mesh.delaunay_violations(), 0);
    assert_eq!(mesh.validate(), Ok(()));
    assert_eq!(
        mesh.locate(1.0, 3.0).unwrap(),
        PointLocation::OnVertex { vertex: 4 }
    );
}

#[test]
fn test_insert_many_points_stays_delaunay() {
    let mut mesh = square(10.0);
    for i in 1..10 {
        for j in 1..10 {
            let x = i as f64 + 0.1 * (j % 3) as f64;
            let y = j as f64 + 0.1 * (i % 4) as f64;
            mesh.insert(x, y).unwrap();
        }
    }
    assert_eq!(mesh.num_vertices(), 85);
    assert_eq!(mesh.delaunay_violations(), 0);
    assert_eq!(mesh.validate(), Ok(()));
}

#[test]
fn test_insert_rejects_duplicates_and_outside_points() {
    let mut mesh = square(1.0);
    assert!(matches!(
        mesh.insert(0.0, 0.0),
        Err(MeshError::InvalidInput { .. })
    ));
    assert!(matches!(
        mesh.insert(2.0, 0.5),
        Err(MeshError::PointOutsideDomain { .. })
    ));
    assert!(matches!(
        mesh.insert(f64::INFINITY, 0.5),
        Err(MeshError::InvalidInput { .. })
    ));
    assert_eq!(mesh.num_triangles(), 2);
}

#[test]
fn test_insert_on_segment_splits_it() {
    let mut mesh = bounded_square(4.0, 7);
    let before = mesh.segments().filter(|s| s.marker == 7).count();
    let v = mesh.insert(2.0, 0.0).unwrap();
    assert_eq!(mesh.segments().filter(|s| s.marker == 7).count(), before + 1);
    assert_eq!(mesh.vertex(v).unwrap().marker(), 7);
    assert_eq!(mesh.num_triangles(), 3);
    assert_eq!(mesh.validate(), Ok(()));
}

#[test]
fn test_encroaching_insert_is_refused() {
    let mut mesh = bounded_square(4.0, 1);
    let triangles = mesh.num_triangles();
    match mesh.insert_checked(2.0, 0.1, true).unwrap() {
        Insertion::Encroaches { mut segment } => {
            segment.sort();
            assert_eq!(segment, [0, 1]);
        }
        other => panic!("expected a refusal, got {other:?}"),
    }
    assert_eq!(mesh.num_triangles(), triangles);
    assert_eq!(mesh.num_vertices(), 4);

    // without the check the same point goes in
    assert!(matches!(
        mesh.insert_checked(2.0, 0.1, false).unwrap(),
        Insertion::Inserted { vertex: 4 }
    ));
}

#[test]
fn test_inserted_vertex_interpolates_attributes() {
    let mut input = InputGeometry::new();
    for (x, y) in [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)] {
        input.add_point_with(x, y, 0, vec![x + 2.0 * y]);
    }
    let mut mesh = Mesh::build(&input, &MeshOptions::default()).unwrap();

    let v = mesh.insert(0.5, 1.2).unwrap();
    assert_relative_eq!(mesh.vertex(v).unwrap().attributes()[0], 2.9, epsilon = 1e-12);

    // on the boundary: linear along the edge
    let w = mesh.insert(2.0, 0.5).unwrap();
    assert_relative_eq!(mesh.vertex(w).unwrap().attributes()[0], 3.0, epsilon = 1e-12);
}
