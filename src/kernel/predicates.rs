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
use crate::kernel::orientation::{Orientation, orient2d};

/// Circumcenter of a non-degenerate triangle.
pub fn circumcenter(a: &Point2, b: &Point2, c: &Point2) -> Point2 {
    let xdo = b.x - a.x;
    let ydo = b.y - a.y;
    let xao = c.x - a.x;
    let yao = c.y - a.y;
    let dodist = xdo * xdo + ydo * ydo;
    let aodist = xao * xao + yao * yao;
    let denominator = 0.5 / (xdo * yao - xao * ydo);
    let dx = (yao * dodist - ydo * aodist) * denominator;
    let dy = (xdo * aodist - xao * dodist) * denominator;
    Point2::new(a.x + dx, a.y + dy)
}

/// Signed area, positive for counter-clockwise triangles.
pub fn signed_area(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    0.5 * ((b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x))
}

pub fn triangle_area(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    signed_area(a, b, c).abs()
}

/// Interior angles in degrees, at `a`, `b` and `c` respectively.
pub fn angles_degrees(a: &Point2, b: &Point2, c: &Point2) -> [f64; 3] {
    let angle_at = |p: &Point2, q: &Point2, r: &Point2| {
        let u = q - p;
        let v = r - p;
        let cross = u.x * v.y - u.y * v.x;
        cross.abs().atan2(u.dot(&v)).to_degrees()
    };
    [angle_at(a, b, c), angle_at(b, c, a), angle_at(c, a, b)]
}

/// Cosine of the smallest angle; the smallest angle faces the shortest edge.
pub fn min_angle_cosine(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    let ab = a.distance_squared_to(b);
    let bc = b.distance_squared_to(c);
    let ca = c.distance_squared_to(a);
    let (apex, p, q) = if ab <= bc && ab <= ca {
        (c, a, b)
    } else if bc <= ca {
        (a, b, c)
    } else {
        (b, c, a)
    };
    let u = p - apex;
    let v = q - apex;
    let len = (u.dot(&u) * v.dot(&v)).sqrt();
    if len == 0.0 {
        return 1.0;
    }
    u.dot(&v) / len
}

/// True when `p` lies strictly inside the diametral circle of `a`-`b`.
pub fn in_diametral_circle(a: &Point2, b: &Point2, p: &Point2) -> bool {
    (a - p).dot(&(b - p)) < 0.0
}

/// Exact test for `p` lying on the closed segment `a`-`b`.
pub fn is_point_on_segment(p: &Point2, a: &Point2, b: &Point2) -> bool {
    if orient2d(a, b, p) != Orientation::Collinear {
        return false;
    }
    let (lo_x, hi_x) = if a.x <= b.x { (a.x, b.x) } else { (b.x, a.x) };
    let (lo_y, hi_y) = if a.y <= b.y { (a.y, b.y) } else { (b.y, a.y) };
    p.x >= lo_x && p.x <= hi_x && p.y >= lo_y && p.y <= hi_y
}

/// Barycentric weights of `p` with respect to `a, b, c`.
pub fn barycentric(p: &Point2, a: &Point2, b: &Point2, c: &Point2) -> [f64; 3] {
    let total = signed_area(a, b, c);
    if total == 0.0 {
        return [1.0 / 3.0; 3];
    }
    [
        signed_area(p, b, c) / total,
        signed_area(a, p, c) / total,
        signed_area(a, b, p) / total,
    ]
}
