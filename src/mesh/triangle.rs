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

use crate::mesh::segment::{NO_SUBSEG_HANDLE, Osub};
use crate::mesh::vertex::{NO_VERTEX, VertId};

/// Arena index of the shared "outer" triangle.
pub const OUTER: usize = 0;

pub(crate) const PLUS1: [usize; 3] = [1, 2, 0];
pub(crate) const MINUS1: [usize; 3] = [2, 0, 1];

/// Oriented triangle: a directed edge of `tri`.
///
/// For orientation `o`, the edge runs from corner `PLUS1[o]` to corner
/// `MINUS1[o]` and the apex is corner `o`, so edge `o` lies opposite corner
/// `o` and the triangle interior is on its left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Otri {
    pub tri: usize,
    pub orient: usize,
}

pub(crate) const OUTER_HANDLE: Otri = Otri {
    tri: OUTER,
    orient: 0,
};

impl Otri {
    #[inline(always)]
    pub fn new(tri: usize, orient: usize) -> Self {
        Otri { tri, orient }
    }

    /// Next edge counter-clockwise in the same triangle.
    #[inline(always)]
    pub fn lnext(self) -> Self {
        Otri {
            tri: self.tri,
            orient: PLUS1[self.orient],
        }
    }

    /// Previous edge in the same triangle.
    #[inline(always)]
    pub fn lprev(self) -> Self {
        Otri {
            tri: self.tri,
            orient: MINUS1[self.orient],
        }
    }

    #[inline(always)]
    pub fn is_outer(self) -> bool {
        self.tri == OUTER
    }
}

#[derive(Debug, Clone)]
pub struct Triangle {
    pub(crate) id: usize,
    /// Transient identity, refreshed whenever the record is rewritten.
    pub(crate) hash: usize,
    pub(crate) neighbors: [Otri; 3],
    pub(crate) vertices: [VertId; 3],
    pub(crate) subsegs: [Osub; 3],
    pub(crate) attributes: Vec<f64>,
    /// Area constraint, negative when unconstrained.
    pub(crate) area: f64,
    /// Flood-fill flag, only set while a `FloodMarks` guard is alive.
    pub(crate) mark: bool,
    pub(crate) alive: bool,
}

impl Triangle {
    pub(crate) fn sentinel() -> Self {
        Triangle {
            id: usize::MAX,
            hash: 0,
            neighbors: [OUTER_HANDLE; 3],
            vertices: [NO_VERTEX; 3],
            subsegs: [NO_SUBSEG_HANDLE; 3],
            attributes: Vec::new(),
            area: -1.0,
            mark: false,
            alive: false,
        }
    }

    pub(crate) fn reset(&mut self, hash: usize, n_attributes: usize) {
        self.id = usize::MAX;
        self.hash = hash;
        self.neighbors = [OUTER_HANDLE; 3];
        self.vertices = [NO_VERTEX; 3];
        self.subsegs = [NO_SUBSEG_HANDLE; 3];
        self.attributes.clear();
        self.attributes.resize(n_attributes, 0.0);
        self.area = -1.0;
        self.mark = false;
        self.alive = true;
    }

    /// Corner index of `v`, if it is a corner.
    #[inline]
    pub(crate) fn corner_of(&self, v: VertId) -> Option<usize> {
        self.vertices.iter().position(|&c| c == v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotations_cycle() {
        let o = Otri::new(5, 0);
        assert_eq!(o.lnext().lnext().lnext(), o);
        assert_eq!(o.lprev().lprev().lprev(), o);
        assert_eq!(o.lnext().lprev(), o);
        assert_eq!(o.lnext().orient, 1);
        assert_eq!(o.lprev().orient, 2);
    }
}
