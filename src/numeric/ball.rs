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

/// Midpoint-radius interval over `f64`.
///
/// Every operation tracks the rounding error of its result, so the true value
/// of the expression always lies in `[m - r, m + r]`. Predicates evaluate the
/// determinant with balls first and only fall back to adaptive exact
/// arithmetic when the sign is not certain.
#[derive(Copy, Clone, Debug)]
pub struct Ball {
    pub m: f64,
    pub r: f64,
} // value ∈ [m - r, m + r]

// slack for the rounding of the radius computation itself
const RADIUS_SLACK: f64 = 1.0 + 8.0 * f64::EPSILON;

#[inline]
fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    let err = (a - (s - bb)) + (b - bb);
    (s, err)
}
#[inline]
fn two_prod(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    let err = f64::mul_add(a, b, -p);
    (p, err)
}

impl Ball {
    #[inline]
    pub fn from_f64(x: f64) -> Self {
        Ball { m: x, r: 0.0 }
    }

    #[inline]
    pub fn add(self, o: Self) -> Self {
        let (s, e) = two_sum(self.m, o.m);
        Ball {
            m: s,
            r: (self.r + o.r + e.abs()) * RADIUS_SLACK,
        }
    }
    #[inline]
    pub fn sub(self, o: Self) -> Self {
        self.add(Ball { m: -o.m, r: o.r })
    }

    #[inline]
    pub fn mul(self, o: Self) -> Self {
        let (p, e) = two_prod(self.m, o.m);
        Ball {
            m: p,
            r: (self.m.abs() * o.r + o.m.abs() * self.r + self.r * o.r + e.abs()) * RADIUS_SLACK,
        }
    }

    #[inline]
    pub fn square(self) -> Self {
        self.mul(self)
    }

    /// `Some(1)`, `Some(-1)` or `Some(0)` when the sign is certain, `None` otherwise.
    #[inline]
    pub fn sign_if_certain(self) -> Option<i8> {
        if !self.r.is_finite() || !self.m.is_finite() {
            return None;
        }
        if self.m > self.r {
            Some(1)
        } else if self.m < -self.r {
            Some(-1)
        } else if self.m == 0.0 && self.r == 0.0 {
            Some(0)
        } else {
            None
        }
    }
}
