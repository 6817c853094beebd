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
use trimesh2d::{InputGeometry, Mesh, MeshError, MeshOptions, VertexKind};

fn has_edge(mesh: &Mesh, a: usize, b: usize) -> bool {
    mesh.edges()
        .any(|e| (e.p0 == a && e.p1 == b) || (e.p0 == b && e.p1 == a))
}

fn total_area(mesh: &Mesh) -> f64 {
    mesh.triangles().map(|t| t.area).sum()
}

fn centroid(mesh: &Mesh, corners: [usize; 3]) -> (f64, f64) {
    let v = mesh.vertices();
    let x = corners.iter().map(|&c| v[c].x()).sum::<f64>() / 3.0;
    let y = corners.iter().map(|&c| v[c].y()).sum::<f64>() / 3.0;
    (x, y)
}

#[test]
fn test_forced_diagonal() {
    let mut input = InputGeometry::from_points([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    input.add_segment(1, 3, 2);
    let mesh = Mesh::build(&input, &MeshOptions::default()).unwrap();
    assert_eq!(mesh.num_triangles(), 2);
    assert!(has_edge(&mesh, 1, 3));
    assert!(!has_edge(&mesh, 0, 2));
    let diagonal = mesh.edges().find(|e| !e.boundary).unwrap();
    assert_eq!(diagonal.marker, 2);
    assert_eq!(mesh.validate(), Ok(()));
}

#[test]
fn test_non_delaunay_segment_is_kept() {
    let mut input =
        InputGeometry::from_points([(0.0, 0.0), (4.0, 0.0), (2.0, 0.5), (2.0, -0.5)]);
    input.add_segment(0, 1, 9);
    let mesh = Mesh::build(&input, &MeshOptions::default()).unwrap();
    assert!(has_edge(&mesh, 0, 1));
    assert!(!has_edge(&mesh, 2, 3));
    assert_eq!(mesh.num_triangles(), 2);
    assert_eq!(mesh.delaunay_violations(), 0);
    assert_eq!(mesh.validate(), Ok(()));
}

#[test]
fn test_segment_through_vertex_is_chained() {
    let mut input = InputGeometry::from_points([
        (0.0, 0.0),
        (2.0, 0.0),
        (4.0, 0.0),
        (2.0, 2.0),
        (2.0, -2.0),
    ]);
    input.add_segment(0, 2, 5);
    let mesh = Mesh::build(&input, &MeshOptions::default()).unwrap();
    let pieces: Vec<_> = mesh.segments().filter(|s| s.marker == 5).collect();
    assert_eq!(pieces.len(), 2);
    assert!(has_edge(&mesh, 0, 1));
    assert!(has_edge(&mesh, 1, 2));
}

#[test]
fn test_crossing_segment_becomes_warning() {
    let mut input = InputGeometry::from_points([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    input.add_segment(0, 2, 1).add_segment(1, 3, 1);
    let mesh = Mesh::build(&input, &MeshOptions::default()).unwrap();
    assert!(has_edge(&mesh, 0, 2));
    assert_eq!(mesh.warnings().len(), 1);
    assert!(matches!(
        mesh.warnings()[0],
        MeshError::UnresolvableConstraint { from: 1, to: 3, .. }
    ));
    assert_eq!(mesh.validate(), Ok(()));
}

#[test]
fn test_segment_validation() {
    let mut input = InputGeometry::from_points([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    input.add_segment(0, 7, 0);
    assert!(matches!(
        Mesh::build(&input, &MeshOptions::default()),
        Err(MeshError::InvalidInput { .. })
    ));

    let mut input = InputGeometry::from_points([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    input.add_segment(1, 1, 0);
    assert!(matches!(
        Mesh::build(&input, &MeshOptions::default()),
        Err(MeshError::InvalidInput { .. })
    ));
}

#[test]
fn test_boundary_markers() {
    let mut input = InputGeometry::new();
    let ids: Vec<usize> = [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]
        .iter()
        .map(|&(x, y)| input.add_point(x, y))
        .collect();
    input.add_polygon(&ids, 3);
    input.add_point(1.0, 0.7);
    let mesh = Mesh::build(&input, &MeshOptions::default()).unwrap();
    for e in mesh.edges() {
        if e.boundary {
            assert_eq!(e.marker, 3);
        } else {
            assert_eq!(e.marker, 0);
        }
    }
    for v in &ids {
        assert_eq!(mesh.vertex(*v).unwrap().marker(), 3);
    }
    assert_eq!(mesh.vertex(4).unwrap().marker(), 0);
}

#[test]
fn test_unconstrained_hull_gets_marker_one() {
    let input = InputGeometry::from_points([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.3, 0.3)]);
    let mesh = Mesh::build(&input, &MeshOptions::default()).unwrap();
    assert_eq!(mesh.num_segments(), 3);
    assert!(mesh.edges().filter(|e| e.boundary).all(|e| e.marker == 1));
}

#[test]
fn test_hole_is_removed() {
    let mut input = InputGeometry::new();
    let outer: Vec<usize> = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]
        .iter()
        .map(|&(x, y)| input.add_point(x, y))
        .collect();
    let inner: Vec<usize> = [(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)]
        .iter()
        .map(|&(x, y)| input.add_point(x, y))
        .collect();
    input.add_polygon(&outer, 1).add_polygon(&inner, 2);
    input.add_hole(5.2, 4.6);
    let mesh = Mesh::build(&input, &MeshOptions::default()).unwrap();

    assert_relative_eq!(total_area(&mesh), 96.0, epsilon = 1e-9);
    for t in mesh.triangles() {
        let (x, y) = centroid(&mesh, t.corners);
        assert!(!(x > 4.0 && x < 6.0 && y > 4.0 && y < 6.0));
    }
    assert_eq!(mesh.validate(), Ok(()));
    // the hole boundary stays a segment on exactly one side
    assert_eq!(
        mesh.edges().filter(|e| e.boundary && e.marker == 2).count(),
        4
    );
}

#[test]
fn test_hole_outside_domain_is_rejected() {
    let mut input = InputGeometry::from_points([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    input.add_polygon(&[0, 1, 2], 1);
    input.add_hole(5.0, 5.0);
    assert!(matches!(
        Mesh::build(&input, &MeshOptions::default()),
        Err(MeshError::InvalidInput { .. })
    ));
}

#[test]
fn test_hole_on_vertex_is_rejected() {
    let mut input = InputGeometry::from_points([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    input.add_polygon(&[0, 1, 2], 1);
    input.add_hole(1.0, 0.0);
    assert!(matches!(
        Mesh::build(&input, &MeshOptions::default()),
        Err(MeshError::InvalidInput { .. })
    ));
}

#[test]
fn test_regions_assign_attributes() {
    let mut input = InputGeometry::from_points([
        (0.0, 0.0),
        (2.0, 0.0),
        (2.0, 1.0),
        (0.0, 1.0),
        (1.0, 0.0),
        (1.0, 1.0),
    ]);
    input.add_polygon(&[0, 4, 1, 2, 5, 3], 1);
    input.add_segment(4, 5, 2);
    input.add_region(0.3, 0.6, 1.0, None);
    input.add_region(1.6, 0.3, 2.0, None);
    let mesh = Mesh::build(&input, &MeshOptions::default()).unwrap();
    assert_eq!(mesh.num_triangles(), 4);
    for t in mesh.triangles() {
        let (x, _) = centroid(&mesh, t.corners);
        let expected = if x < 1.0 { 1.0 } else { 2.0 };
        assert_eq!(t.attributes, &[expected]);
        assert_eq!(t.area_constraint, None);
    }
}

#[test]
fn test_region_area_constraint() {
    let mut input = InputGeometry::from_points([
        (0.0, 0.0),
        (2.0, 0.0),
        (2.0, 1.0),
        (0.0, 1.0),
        (1.0, 0.0),
        (1.0, 1.0),
    ]);
    input.add_polygon(&[0, 4, 1, 2, 5, 3], 1);
    input.add_segment(4, 5, 2);
    input.add_region(0.3, 0.6, 1.0, Some(0.05));
    input.add_region(1.6, 0.3, 2.0, None);
    let options = MeshOptions::new().with_variable_area(true);
    let mesh = Mesh::build(&input, &options).unwrap();

    let mut left = 0;
    for t in mesh.triangles() {
        let (x, _) = centroid(&mesh, t.corners);
        if x < 1.0 {
            left += 1;
            assert_eq!(t.attributes, &[1.0]);
            assert_eq!(t.area_constraint, Some(0.05));
            assert!(t.area <= 0.05 + 1e-12);
        } else {
            assert_eq!(t.attributes, &[2.0]);
        }
    }
    assert!(left >= 20);
    assert_eq!(mesh.validate(), Ok(()));
}

#[test]
fn test_concavities_are_carved_on_request() {
    let mut input = InputGeometry::from_points([
        (0.0, 0.0),
        (2.0, 0.0),
        (2.0, 1.0),
        (1.0, 1.0),
        (1.0, 2.0),
        (0.0, 2.0),
    ]);
    input.add_polygon(&[0, 1, 2, 3, 4, 5], 1);

    let kept = Mesh::build(&input, &MeshOptions::default()).unwrap();
    assert_relative_eq!(total_area(&kept), 3.5, epsilon = 1e-12);

    let carved = Mesh::build(&input, &MeshOptions::new().with_carve_concavities(true)).unwrap();
    assert_relative_eq!(total_area(&carved), 3.0, epsilon = 1e-12);
    assert_eq!(carved.validate(), Ok(()));
    assert!(carved.vertices().iter().all(|v| v.kind() == VertexKind::Input));
}

#[test]
fn test_segment_chain_runs_end_to_end() {
    let mut input = InputGeometry::from_points([
        (0.0, 0.0),
        (2.0, 0.0),
        (4.0, 0.0),
        (2.0, 2.0),
        (2.0, -2.0),
    ]);
    input.add_segment(0, 2, 5);
    let mesh = Mesh::build(&input, &MeshOptions::default()).unwrap();
    let piece = mesh.segments().find(|s| s.marker == 5).unwrap();
    let chain = mesh.segment_chain(piece.id).unwrap();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain[0].endpoints[1], 1);
    assert_eq!(chain[1].endpoints[0], 1);
    let mut ends = [chain[0].endpoints[0], chain[1].endpoints[1]];
    ends.sort();
    assert_eq!(ends, [0, 2]);
    assert!(mesh.segment_chain(usize::MAX).is_none());
}

#[test]
fn test_overlapping_segments_keep_separate_chains() {
    let mut input = InputGeometry::from_points([
        (0.0, 0.0),
        (2.0, 0.0),
        (4.0, 0.0),
        (6.0, 0.0),
        (3.0, 2.0),
        (3.0, -2.0),
    ]);
    input.add_segment(0, 2, 5).add_segment(1, 3, 6);
    let mesh = Mesh::build(&input, &MeshOptions::default()).unwrap();
    assert!(mesh.warnings().is_empty());
    assert_eq!(mesh.validate(), Ok(()));

    let first = mesh
        .segments()
        .find(|s| s.endpoints.contains(&0) && s.endpoints.contains(&1))
        .unwrap();
    let chain = mesh.segment_chain(first.id).unwrap();
    let mut ends = [chain[0].endpoints[0], chain[chain.len() - 1].endpoints[1]];
    ends.sort();
    assert_eq!(chain.len(), 2);
    assert_eq!(ends, [0, 2]);

    let tail = mesh
        .segments()
        .find(|s| s.endpoints.contains(&2) && s.endpoints.contains(&3))
        .unwrap();
    assert_eq!(mesh.segment_chain(tail.id).unwrap().len(), 1);
}

#[test]
fn test_split_boundary_segment_stays_chained() {
    let mut input = InputGeometry::from_points([(0.0, 0.0), (4.0, 0.0), (4.0, 1.0), (0.0, 1.0)]);
    input.add_polygon(&[0, 1, 2, 3], 1);
    let mesh = Mesh::build(&input, &MeshOptions::new().with_max_area(0.05)).unwrap();
    assert_eq!(mesh.validate(), Ok(()));

    let bottom = mesh
        .segments()
        .find(|s| s.endpoints.iter().all(|&v| mesh.vertices()[v].y() == 0.0))
        .unwrap();
    let chain = mesh.segment_chain(bottom.id).unwrap();
    assert!(chain.len() > 1);
    for pair in chain.windows(2) {
        assert_eq!(pair[0].endpoints[1], pair[1].endpoints[0]);
    }
    let mut ends = [chain[0].endpoints[0], chain[chain.len() - 1].endpoints[1]];
    ends.sort();
    assert_eq!(ends, [0, 1]);
    assert!(chain
        .iter()
        .all(|s| s.endpoints.iter().all(|&v| mesh.vertices()[v].y() == 0.0)));
}

#[test]
fn test_failed_segment_insertion_leaves_mesh_unchanged() {
    let input = InputGeometry::from_points([
        (0.0, 0.0),
        (4.0, 0.0),
        (4.0, 4.0),
        (0.0, 4.0),
        (2.5, 1.5),
        (1.5, 2.5),
    ]);
    let mut mesh = Mesh::build(&input, &MeshOptions::default()).unwrap();
    mesh.insert_segment(0, 2, 6).unwrap();

    let snapshot = |m: &Mesh| {
        let triangles: Vec<_> = m.triangles().map(|t| (t.id, t.corners, t.neighbors)).collect();
        let segments: Vec<_> = m.segments().collect();
        (triangles, segments, m.num_vertices())
    };
    let before = snapshot(&mesh);
    assert!(matches!(
        mesh.insert_segment(4, 5, 7),
        Err(MeshError::UnresolvableConstraint { from: 4, to: 5, .. })
    ));
    assert_eq!(snapshot(&mesh), before);
    assert!(mesh.warnings().is_empty());
    assert_eq!(mesh.validate(), Ok(()));
}

#[test]
fn test_insert_segment_after_build() {
    let input = InputGeometry::from_points([
        (0.0, 0.0),
        (4.0, 0.0),
        (4.0, 4.0),
        (0.0, 4.0),
        (2.5, 1.5),
        (1.5, 2.5),
    ]);
    let mut mesh = Mesh::build(&input, &MeshOptions::default()).unwrap();
    mesh.insert_segment(0, 2, 6).unwrap();
    assert!(has_edge(&mesh, 0, 2));
    assert_eq!(mesh.segments().filter(|s| s.marker == 6).count(), 1);
    assert_eq!(mesh.validate(), Ok(()));
    assert_eq!(mesh.delaunay_violations(), 0);

    assert!(matches!(
        mesh.insert_segment(0, 42, 1),
        Err(MeshError::InvalidInput { .. })
    ));
}
