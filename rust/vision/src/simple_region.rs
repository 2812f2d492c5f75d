// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hole-free pieces produced by decomposition, and the runs of faces an
//! observer can see on them.

use nalgebra::Point2;
use vtt_fog_region::{Bounds, Region};

use crate::error::Result;
use crate::face::Face;
use crate::ring::PointRing;

/// One connected, hole-free, bounded-complexity piece of blocking topology.
///
/// Everything is computed once at construction; the value never changes.
#[derive(Debug, Clone)]
pub struct SimpleRegion {
    region: Region,
    is_hole: bool,
    bounds: Bounds,
    center: Point2<f64>,
    faces: Vec<Face>,
}

impl SimpleRegion {
    /// Finish a loop into a simple region.
    ///
    /// The ring's winding decides which way its faces point: solids are
    /// expected counter-clockwise and holes clockwise.
    pub fn from_ring(ring: &PointRing, is_hole: bool) -> Result<Self> {
        let region = ring.to_region()?;
        let bounds = ring.bounds();
        let faces = ring.edges().map(|(a, b)| Face::new(a, b)).collect();

        Ok(Self {
            region,
            is_hole,
            bounds,
            center: bounds.center(),
            faces,
        })
    }

    /// Area covered by this piece (for holes, the hole's interior)
    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn is_hole(&self) -> bool {
        self.is_hole
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Centre of the bounding box
    pub fn center(&self) -> Point2<f64> {
        self.center
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn point_count(&self) -> usize {
        self.faces.len()
    }

    /// Faces turned towards `origin`, in boundary order
    pub fn front_faces(&self, origin: &Point2<f64>) -> Vec<Face> {
        self.faces
            .iter()
            .filter(|f| f.is_front_facing(origin))
            .copied()
            .collect()
    }

    /// Contiguous runs of front faces, in boundary order.
    ///
    /// A run that wraps past the last face continues at the first one.
    pub fn visible_segments(&self, origin: &Point2<f64>) -> Vec<VisibleSegment> {
        let mut runs: Vec<Vec<Face>> = Vec::new();
        let mut current: Vec<Face> = Vec::new();

        for face in &self.faces {
            if face.is_front_facing(origin) {
                current.push(*face);
            } else if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
        }

        let wraps = !current.is_empty()
            && !runs.is_empty()
            && self.faces.first().is_some_and(|f| f.is_front_facing(origin));
        if wraps {
            current.append(&mut runs[0]);
            runs[0] = current;
        } else if !current.is_empty() {
            runs.push(current);
        }

        runs.into_iter().map(|faces| VisibleSegment { faces }).collect()
    }
}

/// Chain of adjacent faces that all face the same observer
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleSegment {
    faces: Vec<Face>,
}

impl VisibleSegment {
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Distance from `origin` to the nearest face of the chain
    pub fn distance_from(&self, origin: &Point2<f64>) -> f64 {
        self.faces
            .iter()
            .map(|f| f.distance_from(origin))
            .fold(f64::INFINITY, f64::min)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.faces.iter().flat_map(|f| [&f.a, &f.b]))
    }

    /// Region hidden behind the chain when seen from `origin`
    pub fn shadow(&self, origin: &Point2<f64>, reach: f64) -> Region {
        let quads: Vec<Vec<Point2<f64>>> =
            self.faces.iter().map(|f| f.shadow(origin, reach)).collect();
        Region::union_of_contours(&quads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_ring(x: f64, y: f64, size: f64) -> PointRing {
        PointRing::new([
            Point2::new(x, y),
            Point2::new(x + size, y),
            Point2::new(x + size, y + size),
            Point2::new(x, y + size),
        ])
        .unwrap()
    }

    #[test]
    fn test_eager_fields() {
        let piece = SimpleRegion::from_ring(&square_ring(0.0, 0.0, 4.0), false).unwrap();
        assert_eq!(piece.center(), Point2::new(2.0, 2.0));
        assert_eq!(piece.faces().len(), 4);
        assert_relative_eq!(piece.region().area(), 16.0, epsilon = 1e-9);
        assert!(!piece.is_hole());
    }

    #[test]
    fn test_front_faces_of_square() {
        let piece = SimpleRegion::from_ring(&square_ring(0.0, 0.0, 4.0), false).unwrap();

        // Straight below: only the bottom edge
        let below = piece.front_faces(&Point2::new(2.0, -10.0));
        assert_eq!(below.len(), 1);

        // Diagonal: two edges
        let corner = piece.front_faces(&Point2::new(-5.0, -5.0));
        assert_eq!(corner.len(), 2);
    }

    #[test]
    fn test_visible_segment_wraps_around() {
        // First face is the bottom edge, last face is the left edge
        let piece = SimpleRegion::from_ring(&square_ring(0.0, 0.0, 4.0), false).unwrap();
        let segments = piece.visible_segments(&Point2::new(-5.0, -5.0));

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].faces().len(), 2);
        assert_relative_eq!(
            segments[0].distance_from(&Point2::new(-5.0, -5.0)),
            50.0_f64.sqrt(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_segment_shadow_hides_far_side() {
        let piece = SimpleRegion::from_ring(&square_ring(10.0, -2.0, 4.0), false).unwrap();
        let origin = Point2::origin();
        let segments = piece.visible_segments(&origin);
        assert_eq!(segments.len(), 1);

        let shadow = segments[0].shadow(&origin, 100.0);
        assert!(shadow.contains_point(&Point2::new(50.0, 0.0)));
        assert!(!shadow.contains_point(&Point2::new(5.0, 0.0)));
        assert!(!shadow.contains_point(&Point2::new(50.0, 30.0)));
    }
}
