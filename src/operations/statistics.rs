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

use crate::kernel::predicates::{angles_degrees, triangle_area};
use crate::mesh::Mesh;

/// Angle, area and edge length extremes over the live triangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshStatistics {
    /// Degrees.
    pub min_angle: f64,
    pub max_angle: f64,
    pub min_area: f64,
    pub max_area: f64,
    pub shortest_edge: f64,
    pub longest_edge: f64,
}

impl Mesh {
    /// `None` when the mesh has no triangles.
    pub fn statistics(&self) -> Option<MeshStatistics> {
        let mut stats = MeshStatistics {
            min_angle: f64::INFINITY,
            max_angle: 0.0,
            min_area: f64::INFINITY,
            max_area: 0.0,
            shortest_edge: f64::INFINITY,
            longest_edge: 0.0,
        };
        let mut any = false;
        for t in self.live_triangle_ids() {
            any = true;
            let [a, b, c] = self.corners(t);
            for angle in angles_degrees(&a, &b, &c) {
                stats.min_angle = stats.min_angle.min(angle);
                stats.max_angle = stats.max_angle.max(angle);
            }
            let area = triangle_area(&a, &b, &c);
            stats.min_area = stats.min_area.min(area);
            stats.max_area = stats.max_area.max(area);
            for (p, q) in [(a, b), (b, c), (c, a)] {
                let len = p.distance_to(&q);
                stats.shortest_edge = stats.shortest_edge.min(len);
                stats.longest_edge = stats.longest_edge.max(len);
            }
        }
        any.then_some(stats)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::{InputGeometry, Mesh, MeshOptions};

    #[test]
    fn unit_square_statistics() {
        let input = InputGeometry::from_points([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let mesh = Mesh::build(&input, &MeshOptions::default()).unwrap();
        let stats = mesh.statistics().unwrap();
        assert_relative_eq!(stats.min_angle, 45.0, epsilon = 1e-9);
        assert_relative_eq!(stats.max_angle, 90.0, epsilon = 1e-9);
        assert_relative_eq!(stats.min_area, 0.5);
        assert_relative_eq!(stats.max_area, 0.5);
        assert_relative_eq!(stats.shortest_edge, 1.0);
        assert_relative_eq!(stats.longest_edge, 2f64.sqrt());
    }
}
