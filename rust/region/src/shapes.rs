// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vision shape builders anchored at the origin.
//!
//! Angles are in degrees, counter-clockwise from the +x axis (y-up).

use nalgebra::Point2;

use crate::error::{RegionError, Result};
use crate::region::Region;

/// Minimum number of segments used to approximate a full circle
const MIN_CIRCLE_SEGMENTS: usize = 8;

/// Disk of `radius` approximated by a regular polygon with `segments` sides
pub fn circle(radius: f64, segments: usize) -> Result<Region> {
    check_radius(radius)?;

    let segments = segments.max(MIN_CIRCLE_SEGMENTS);
    let step = std::f64::consts::TAU / segments as f64;
    let points: Vec<Point2<f64>> = (0..segments)
        .map(|i| {
            let angle = i as f64 * step;
            Point2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect();

    Region::from_contour(&points)
}

/// Axis-aligned square extending `half_extent` from the origin on each side
pub fn square(half_extent: f64) -> Result<Region> {
    check_radius(half_extent)?;
    Ok(Region::rectangle(
        -half_extent,
        -half_extent,
        half_extent * 2.0,
        half_extent * 2.0,
    ))
}

/// Pie slice of `radius` spanning `arc` degrees, centred on `direction`.
///
/// An arc of 360 degrees or more yields the full circle.
pub fn cone(radius: f64, arc: f64, direction: f64, segments: usize) -> Result<Region> {
    check_radius(radius)?;
    if !(arc.is_finite() && arc > 0.0) || !direction.is_finite() {
        return Err(RegionError::InvalidShape(format!(
            "cone arc {} / direction {} must be finite and arc positive",
            arc, direction
        )));
    }
    if arc >= 360.0 {
        return circle(radius, segments);
    }

    let segments = segments.max(MIN_CIRCLE_SEGMENTS);
    let steps = ((segments as f64 * arc / 360.0).ceil() as usize).max(2);
    let start = (direction - arc / 2.0).to_radians();
    let step = arc.to_radians() / steps as f64;

    let mut points = Vec::with_capacity(steps + 2);
    points.push(Point2::origin());
    for i in 0..=steps {
        let angle = start + i as f64 * step;
        points.push(Point2::new(radius * angle.cos(), radius * angle.sin()));
    }

    Region::from_contour(&points)
}

fn check_radius(radius: f64) -> Result<()> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(RegionError::InvalidShape(format!(
            "radius must be finite and positive, got {}",
            radius
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_circle_area_converges() {
        let disk = circle(10.0, 256).unwrap();
        assert_relative_eq!(disk.area(), std::f64::consts::PI * 100.0, max_relative = 1e-3);

        let bounds = disk.bounds().unwrap();
        assert_relative_eq!(bounds.center().x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(bounds.center().y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_square() {
        let sq = square(5.0).unwrap();
        assert_relative_eq!(sq.area(), 100.0, epsilon = 1e-9);
        assert!(sq.contains_point(&Point2::new(4.9, -4.9)));
    }

    #[test]
    fn test_cone_points_in_direction() {
        let cone = cone(10.0, 90.0, 90.0, 64).unwrap();

        // Facing +y
        assert!(cone.contains_point(&Point2::new(0.0, 5.0)));
        assert!(!cone.contains_point(&Point2::new(0.0, -5.0)));
        assert!(!cone.contains_point(&Point2::new(5.0, 1.0)));
        assert_relative_eq!(
            cone.area(),
            std::f64::consts::PI * 100.0 / 4.0,
            max_relative = 1e-2
        );
    }

    #[test]
    fn test_full_cone_is_circle() {
        let full = cone(3.0, 360.0, 45.0, 32).unwrap();
        assert_eq!(full, circle(3.0, 32).unwrap());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(circle(0.0, 32).is_err());
        assert!(square(f64::INFINITY).is_err());
        assert!(cone(5.0, 0.0, 0.0, 32).is_err());
    }
}
