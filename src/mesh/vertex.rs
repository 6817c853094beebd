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

use crate::geometry::Point2;

pub type VertId = usize;

/// Placeholder for the corners of the sentinel triangle.
pub const NO_VERTEX: VertId = usize::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexKind {
    /// Loaded from the input geometry.
    Input,
    /// Inserted by refinement or by an explicit insertion.
    Steiner,
    /// No longer referenced by any triangle (e.g. eaten by a hole).
    Free,
}

#[derive(Debug, Clone)]
pub struct Vertex {
    pub(crate) id: usize,
    pub(crate) point: Point2,
    pub(crate) marker: i32,
    pub(crate) attributes: Vec<f64>,
    pub(crate) kind: VertexKind,
    /// Endpoints of the input segment this vertex was split onto.
    pub(crate) on_segment: Option<[VertId; 2]>,
    /// Some live triangle having this vertex as a corner.
    pub(crate) tri: usize,
}

impl Vertex {
    pub(crate) fn new(point: Point2, marker: i32, attributes: Vec<f64>, kind: VertexKind) -> Self {
        Vertex {
            id: 0,
            point,
            marker,
            attributes,
            kind,
            on_segment: None,
            tri: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn x(&self) -> f64 {
        self.point.x
    }

    pub fn y(&self) -> f64 {
        self.point.y
    }

    pub fn point(&self) -> Point2 {
        self.point
    }

    pub fn marker(&self) -> i32 {
        self.marker
    }

    pub fn attributes(&self) -> &[f64] {
        &self.attributes
    }

    pub fn kind(&self) -> VertexKind {
        self.kind
    }
}
