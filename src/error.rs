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

/// Errors surfaced by mesh construction and the incremental operations.
///
/// `UnresolvableConstraint` and `QualityBoundUnreachable` are also recorded
/// as warnings on a finished mesh, see [`crate::Mesh::warnings`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("segment {from}-{to} cannot be recovered: {reason}")]
    UnresolvableConstraint {
        from: usize,
        to: usize,
        reason: String,
    },

    #[error(
        "quality bound not met after {steiner_points} Steiner points ({remaining} items left)"
    )]
    QualityBoundUnreachable {
        steiner_points: usize,
        remaining: usize,
    },

    #[error("point ({x}, {y}) lies outside the triangulated domain")]
    PointOutsideDomain { x: f64, y: f64 },
}

impl MeshError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        MeshError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn unresolvable(from: usize, to: usize, reason: impl Into<String>) -> Self {
        MeshError::UnresolvableConstraint {
            from,
            to,
            reason: reason.into(),
        }
    }
}

/// A broken topological invariant found by [`crate::Mesh::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TopologyViolation {
    #[error("triangle {triangle} is not counter-clockwise")]
    NotCounterClockwise { triangle: usize },

    #[error("triangle {triangle} repeats a corner")]
    RepeatedCorner { triangle: usize },

    #[error("triangle {triangle} edge {edge} points at a dead triangle")]
    DeadNeighbor { triangle: usize, edge: usize },

    #[error("triangle {triangle} edge {edge} is not mirrored by its neighbor")]
    AsymmetricNeighbor { triangle: usize, edge: usize },

    #[error("triangle {triangle} edge {edge} disagrees with its segment")]
    SegmentMismatch { triangle: usize, edge: usize },

    #[error("segment {segment} is not linked back by its neighbor in the chain")]
    BrokenChain { segment: usize },

    #[error("triangle {triangle} still carries a flood-fill mark")]
    MarkNotCleared { triangle: usize },
}
