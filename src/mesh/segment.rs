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

use crate::mesh::triangle::{OUTER_HANDLE, Otri};
use crate::mesh::vertex::{NO_VERTEX, VertId};

/// Arena index of the shared "no constraint" subsegment.
pub const NO_SUBSEG: usize = 0;

/// Oriented subsegment. Orientation 0 runs `vertices[0] -> vertices[1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Osub {
    pub seg: usize,
    pub orient: usize,
}

pub(crate) const NO_SUBSEG_HANDLE: Osub = Osub {
    seg: NO_SUBSEG,
    orient: 0,
};

impl Osub {
    #[inline(always)]
    pub fn new(seg: usize, orient: usize) -> Self {
        Osub { seg, orient }
    }

    /// Same subsegment, opposite direction.
    #[inline(always)]
    pub fn ssym(self) -> Self {
        Osub {
            seg: self.seg,
            orient: 1 - self.orient,
        }
    }

    #[inline(always)]
    pub fn is_none(self) -> bool {
        self.seg == NO_SUBSEG
    }
}

/// A piece of an input (or hull) segment that currently coincides with one
/// triangle edge.
#[derive(Debug, Clone)]
pub struct Subseg {
    pub(crate) id: usize,
    pub(crate) vertices: [VertId; 2],
    /// Endpoints of the whole input segment this piece belongs to.
    pub(crate) seg_endpoints: [VertId; 2],
    /// Neighboring pieces of the same segment at `vertices[0]` and
    /// `vertices[1]`, `NO_SUBSEG` at the segment ends.
    pub(crate) adjoining: [usize; 2],
    /// Triangle to the left of each orientation, `OUTER` on the hull.
    pub(crate) triangles: [Otri; 2],
    pub(crate) marker: i32,
    pub(crate) alive: bool,
}

impl Subseg {
    pub(crate) fn sentinel() -> Self {
        Subseg {
            id: usize::MAX,
            vertices: [NO_VERTEX; 2],
            seg_endpoints: [NO_VERTEX; 2],
            adjoining: [NO_SUBSEG; 2],
            triangles: [OUTER_HANDLE; 2],
            marker: 0,
            alive: false,
        }
    }

    pub(crate) fn new(a: VertId, b: VertId, seg_endpoints: [VertId; 2], marker: i32) -> Self {
        Subseg {
            id: usize::MAX,
            vertices: [a, b],
            seg_endpoints,
            adjoining: [NO_SUBSEG; 2],
            triangles: [OUTER_HANDLE; 2],
            marker,
            alive: true,
        }
    }

    /// Orientation whose origin is `v`.
    #[inline]
    pub(crate) fn orient_from(&self, v: VertId) -> Option<usize> {
        if self.vertices[0] == v {
            Some(0)
        } else if self.vertices[1] == v {
            Some(1)
        } else {
            None
        }
    }

    /// Whether both pieces come from the same input segment.
    pub(crate) fn same_input_segment(&self, other: &Subseg) -> bool {
        let [a, b] = self.seg_endpoints;
        other.seg_endpoints == [a, b] || other.seg_endpoints == [b, a]
    }

    pub(crate) fn replace_adjoining(&mut self, old: usize, new: usize) {
        for a in self.adjoining.iter_mut() {
            if *a == old {
                *a = new;
            }
        }
    }
}
