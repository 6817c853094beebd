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
use crate::numeric::ball::Ball;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
    Collinear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircleSide {
    Inside,
    Outside,
    OnCircle,
}

impl Orientation {
    fn from_sign(s: i8) -> Self {
        match s {
            1 => Orientation::CounterClockwise,
            -1 => Orientation::Clockwise,
            _ => Orientation::Collinear,
        }
    }
}

impl CircleSide {
    fn from_sign(s: i8) -> Self {
        match s {
            1 => CircleSide::Inside,
            -1 => CircleSide::Outside,
            _ => CircleSide::OnCircle,
        }
    }
}

#[inline]
fn sign_of(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

/// Sign of the signed area of `a, b, c`:
/// - `1` if counter-clockwise
/// - `-1` if clockwise
/// - `0` if collinear
///
/// A midpoint-radius evaluation settles the sign when it is certain; the
/// remaining cases go through adaptive exact arithmetic.
pub fn orient2d_sign(a: &Point2, b: &Point2, c: &Point2) -> i8 {
    let acx = Ball::from_f64(a.x).sub(Ball::from_f64(c.x));
    let bcx = Ball::from_f64(b.x).sub(Ball::from_f64(c.x));
    let acy = Ball::from_f64(a.y).sub(Ball::from_f64(c.y));
    let bcy = Ball::from_f64(b.y).sub(Ball::from_f64(c.y));
    let det = acx.mul(bcy).sub(acy.mul(bcx));
    if let Some(s) = det.sign_if_certain() {
        return s;
    }
    sign_of(robust::orient2d((*a).into(), (*b).into(), (*c).into()))
}

pub fn orient2d(a: &Point2, b: &Point2, c: &Point2) -> Orientation {
    Orientation::from_sign(orient2d_sign(a, b, c))
}

/// Sign of the in-circle determinant: positive when `d` lies strictly inside
/// the circle through the counter-clockwise triple `a, b, c`.
pub fn incircle_sign(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> i8 {
    let adx = Ball::from_f64(a.x).sub(Ball::from_f64(d.x));
    let ady = Ball::from_f64(a.y).sub(Ball::from_f64(d.y));
    let bdx = Ball::from_f64(b.x).sub(Ball::from_f64(d.x));
    let bdy = Ball::from_f64(b.y).sub(Ball::from_f64(d.y));
    let cdx = Ball::from_f64(c.x).sub(Ball::from_f64(d.x));
    let cdy = Ball::from_f64(c.y).sub(Ball::from_f64(d.y));

    let alift = adx.square().add(ady.square());
    let blift = bdx.square().add(bdy.square());
    let clift = cdx.square().add(cdy.square());

    let det = alift
        .mul(bdx.mul(cdy).sub(cdx.mul(bdy)))
        .add(blift.mul(cdx.mul(ady).sub(adx.mul(cdy))))
        .add(clift.mul(adx.mul(bdy).sub(bdx.mul(ady))));
    if let Some(s) = det.sign_if_certain() {
        return s;
    }
    sign_of(robust::incircle(
        (*a).into(),
        (*b).into(),
        (*c).into(),
        (*d).into(),
    ))
}

pub fn incircle(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> CircleSide {
    CircleSide::from_sign(incircle_sign(a, b, c, d))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ccw_test() {
        let a = Point2 { x: 0.0, y: 0.0 };
        let b = Point2 { x: 1.0, y: 0.0 };
        let c = Point2 { x: 0.0, y: 1.0 };

        assert_eq!(orient2d(&a, &b, &c), Orientation::CounterClockwise);
        assert_eq!(orient2d(&a, &c, &b), Orientation::Clockwise);
    }

    #[test]
    fn nearly_collinear_is_exact() {
        // c sits one ulp above the line through a and b
        let a = Point2::new(0.5, 0.5);
        let b = Point2::new(12.0, 12.0);
        let c = Point2::new(24.0, f64::from_bits(24.0f64.to_bits() + 1));
        assert_eq!(orient2d(&a, &b, &c), Orientation::CounterClockwise);

        let on = Point2::new(24.0, 24.0);
        assert_eq!(orient2d(&a, &b, &on), Orientation::Collinear);
    }

    #[test]
    fn cocircular_square() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(1.0, 1.0);
        let d = Point2::new(0.0, 1.0);
        assert_eq!(incircle(&a, &b, &c, &d), CircleSide::OnCircle);
        assert_eq!(
            incircle(&a, &b, &c, &Point2::new(0.5, 0.5)),
            CircleSide::Inside
        );
        assert_eq!(
            incircle(&a, &b, &c, &Point2::new(2.0, 2.0)),
            CircleSide::Outside
        );
    }
}
