// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Angle and projection helpers.
//!
//! Angles are in degrees, counter-clockwise from +x with y pointing up.

use nalgebra::Point2;

/// Direction of the ray from `from` towards `to`, in (-180, 180]
#[inline]
pub fn angle_between(from: &Point2<f64>, to: &Point2<f64>) -> f64 {
    (to.y - from.y).atan2(to.x - from.x).to_degrees()
}

/// Signed difference `to - from`, normalised to (-180, 180]
pub fn angle_delta(from: f64, to: f64) -> f64 {
    let mut delta = (to - from) % 360.0;
    if delta <= -180.0 {
        delta += 360.0;
    } else if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// Point at `distance` from `origin` along the ray through `target`.
///
/// A target that coincides with the origin has no direction and is returned
/// unchanged.
pub fn project_point(origin: &Point2<f64>, target: &Point2<f64>, distance: f64) -> Point2<f64> {
    let dir = target - origin;
    let len = dir.norm();
    if len == 0.0 {
        return *target;
    }
    origin + dir * (distance / len)
}

#[inline]
pub fn distance(a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    nalgebra::distance(a, b)
}

/// Closest point to `p` on the segment `a`-`b`
pub fn closest_point_on_segment(
    p: &Point2<f64>,
    a: &Point2<f64>,
    b: &Point2<f64>,
) -> Point2<f64> {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return *a;
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_angle_between_quadrants() {
        let o = Point2::origin();
        assert_relative_eq!(angle_between(&o, &Point2::new(1.0, 0.0)), 0.0);
        assert_relative_eq!(angle_between(&o, &Point2::new(0.0, 1.0)), 90.0);
        assert_relative_eq!(angle_between(&o, &Point2::new(-1.0, 0.0)), 180.0);
        assert_relative_eq!(angle_between(&o, &Point2::new(0.0, -1.0)), -90.0);
    }

    #[test]
    fn test_angle_delta_wraps() {
        assert_relative_eq!(angle_delta(170.0, -170.0), 20.0);
        assert_relative_eq!(angle_delta(-170.0, 170.0), -20.0);
        assert_relative_eq!(angle_delta(0.0, 180.0), 180.0);
        assert_relative_eq!(angle_delta(0.0, -180.0), 180.0);
        assert_relative_eq!(angle_delta(10.0, 730.0), 0.0);
    }

    #[test]
    fn test_project_point() {
        let p = project_point(&Point2::new(1.0, 1.0), &Point2::new(4.0, 5.0), 10.0);
        assert_relative_eq!(p.x, 7.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 9.0, epsilon = 1e-12);

        let same = project_point(&Point2::origin(), &Point2::origin(), 10.0);
        assert_eq!(same, Point2::origin());
    }

    #[test]
    fn test_closest_point_on_segment_clamps() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        assert_eq!(closest_point_on_segment(&Point2::new(5.0, 3.0), &a, &b), Point2::new(5.0, 0.0));
        assert_eq!(closest_point_on_segment(&Point2::new(-4.0, 1.0), &a, &b), a);
        assert_relative_eq!(distance(&a, &Point2::new(3.0, 4.0)), 5.0);
    }
}
