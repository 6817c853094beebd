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

use ahash::AHashSet;

use crate::error::MeshError;
use crate::geometry::{Aabb, Point2};

#[derive(Debug, Clone, PartialEq)]
pub struct InputPoint {
    pub point: Point2,
    pub marker: i32,
    pub attributes: Vec<f64>,
}

/// A constraint edge between two input points, by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSegment {
    pub a: usize,
    pub b: usize,
    pub marker: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hole {
    pub point: Point2,
}

/// Seed point of a region. Triangles reachable from it without crossing a
/// segment receive `attribute` and, if set, the `max_area` constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub point: Point2,
    pub attribute: f64,
    pub max_area: Option<f64>,
}

/// Planar straight line graph handed to [`crate::Mesh::build`].
#[derive(Debug, Clone, Default)]
pub struct InputGeometry {
    points: Vec<InputPoint>,
    segments: Vec<InputSegment>,
    holes: Vec<Hole>,
    regions: Vec<Region>,
}

impl InputGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for a bare point set.
    pub fn from_points<I, P>(points: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Point2>,
    {
        let mut geometry = Self::new();
        for p in points {
            let p = p.into();
            geometry.add_point(p.x, p.y);
        }
        geometry
    }

    /// Adds a point and returns its index.
    pub fn add_point(&mut self, x: f64, y: f64) -> usize {
        self.add_point_with(x, y, 0, Vec::new())
    }

    pub fn add_point_with(&mut self, x: f64, y: f64, marker: i32, attributes: Vec<f64>) -> usize {
        self.points.push(InputPoint {
            point: Point2::new(x, y),
            marker,
            attributes,
        });
        self.points.len() - 1
    }

    pub fn add_segment(&mut self, a: usize, b: usize, marker: i32) -> &mut Self {
        self.segments.push(InputSegment { a, b, marker });
        self
    }

    /// Closes a polygon over the given point indices with segments.
    pub fn add_polygon(&mut self, indices: &[usize], marker: i32) -> &mut Self {
        for (i, &a) in indices.iter().enumerate() {
            let b = indices[(i + 1) % indices.len()];
            self.add_segment(a, b, marker);
        }
        self
    }

    pub fn add_hole(&mut self, x: f64, y: f64) -> &mut Self {
        self.holes.push(Hole {
            point: Point2::new(x, y),
        });
        self
    }

    pub fn add_region(&mut self, x: f64, y: f64, attribute: f64, max_area: Option<f64>) -> &mut Self {
        self.regions.push(Region {
            point: Point2::new(x, y),
            attribute,
            max_area,
        });
        self
    }

    pub fn points(&self) -> &[InputPoint] {
        &self.points
    }

    pub fn segments(&self) -> &[InputSegment] {
        &self.segments
    }

    pub fn holes(&self) -> &[Hole] {
        &self.holes
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Bounding box of the input points.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::enclosing(self.points.iter().map(|p| &p.point))
    }

    /// Number of per-vertex attributes (taken from the first point).
    pub fn num_attributes(&self) -> usize {
        self.points.first().map_or(0, |p| p.attributes.len())
    }

    /// Eager checks that do not need a triangulation.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.points.len() < 3 {
            return Err(MeshError::invalid(format!(
                "at least three points are required, got {}",
                self.points.len()
            )));
        }

        let n_attr = self.num_attributes();
        let mut seen: AHashSet<(u64, u64)> = AHashSet::with_capacity(self.points.len());
        for (i, p) in self.points.iter().enumerate() {
            if !p.point.is_finite() {
                return Err(MeshError::invalid(format!("point {i} has a non-finite coordinate")));
            }
            if p.attributes.len() != n_attr {
                return Err(MeshError::invalid(format!(
                    "point {i} has {} attributes, expected {n_attr}",
                    p.attributes.len()
                )));
            }
            // +0.0 and -0.0 are the same location
            let key = ((p.point.x + 0.0).to_bits(), (p.point.y + 0.0).to_bits());
            if !seen.insert(key) {
                return Err(MeshError::invalid(format!(
                    "point {i} duplicates an earlier point at ({}, {})",
                    p.point.x, p.point.y
                )));
            }
        }

        for (i, s) in self.segments.iter().enumerate() {
            if s.a >= self.points.len() || s.b >= self.points.len() {
                return Err(MeshError::invalid(format!(
                    "segment {i} references a missing point ({}, {})",
                    s.a, s.b
                )));
            }
            if s.a == s.b {
                return Err(MeshError::invalid(format!("segment {i} has zero length")));
            }
        }

        for (i, h) in self.holes.iter().enumerate() {
            if !h.point.is_finite() {
                return Err(MeshError::invalid(format!("hole {i} has a non-finite coordinate")));
            }
        }
        for (i, r) in self.regions.iter().enumerate() {
            if !r.point.is_finite() || !r.attribute.is_finite() {
                return Err(MeshError::invalid(format!("region {i} is not finite")));
            }
            if let Some(area) = r.max_area {
                if !(area > 0.0) {
                    return Err(MeshError::invalid(format!(
                        "region {i} has a non-positive area bound {area}"
                    )));
                }
            }
        }
        Ok(())
    }
}
