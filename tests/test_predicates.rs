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
use trimesh2d::Point2;
use trimesh2d::kernel::predicates::{
    angles_degrees, barycentric, circumcenter, in_diametral_circle, is_point_on_segment,
    min_angle_cosine, signed_area,
};

#[test]
fn test_point_on_segment() {
    let a = Point2::new(0.0, 0.0);
    let b = Point2::new(2.0, 2.0);
    assert!(is_point_on_segment(&Point2::new(1.0, 1.0), &a, &b));
    assert!(is_point_on_segment(&b, &a, &b));
    assert!(!is_point_on_segment(&Point2::new(3.0, 3.0), &a, &b));
    assert!(!is_point_on_segment(&Point2::new(1.0, 1.0 + 1e-15), &a, &b));
}

#[test]
fn test_circumcenter_is_equidistant() {
    let a = Point2::new(0.3, -1.2);
    let b = Point2::new(4.1, 0.7);
    let c = Point2::new(-0.9, 2.5);
    let o = circumcenter(&a, &b, &c);
    let r = o.distance_to(&a);
    assert_relative_eq!(o.distance_to(&b), r, epsilon = 1e-12);
    assert_relative_eq!(o.distance_to(&c), r, epsilon = 1e-12);
}

#[test]
fn test_signed_area_orientation() {
    let a = Point2::new(0.0, 0.0);
    let b = Point2::new(2.0, 0.0);
    let c = Point2::new(0.0, 2.0);
    assert_relative_eq!(signed_area(&a, &b, &c), 2.0);
    assert_relative_eq!(signed_area(&a, &c, &b), -2.0);
}

#[test]
fn test_angles_sum_to_180() {
    let a = Point2::new(0.0, 0.0);
    let b = Point2::new(5.0, 1.0);
    let c = Point2::new(1.0, 3.0);
    let sum: f64 = angles_degrees(&a, &b, &c).iter().sum();
    assert_relative_eq!(sum, 180.0, epsilon = 1e-9);
}

#[test]
fn test_min_angle_cosine_of_right_isosceles() {
    let a = Point2::new(0.0, 0.0);
    let b = Point2::new(1.0, 0.0);
    let c = Point2::new(0.0, 1.0);
    assert_relative_eq!(min_angle_cosine(&a, &b, &c), 45f64.to_radians().cos(), epsilon = 1e-12);
}

#[test]
fn test_diametral_circle_boundary_is_not_inside() {
    let a = Point2::new(-1.0, 0.0);
    let b = Point2::new(1.0, 0.0);
    assert!(in_diametral_circle(&a, &b, &Point2::new(0.0, 0.99)));
    assert!(!in_diametral_circle(&a, &b, &Point2::new(0.0, 1.0)));
    assert!(!in_diametral_circle(&a, &b, &Point2::new(2.0, 0.0)));
}

#[test]
fn test_barycentric_weights() {
    let a = Point2::new(0.0, 0.0);
    let b = Point2::new(1.0, 0.0);
    let c = Point2::new(0.0, 1.0);
    let w = barycentric(&Point2::new(0.25, 0.5), &a, &b, &c);
    assert_relative_eq!(w[0], 0.25);
    assert_relative_eq!(w[1], 0.25);
    assert_relative_eq!(w[2], 0.5);
}
