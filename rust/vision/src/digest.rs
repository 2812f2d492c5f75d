// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decomposed blocking topology ready for repeated visibility queries.

use nalgebra::Point2;
use vtt_fog_region::{Bounds, Region};

use crate::config::VisionConfig;
use crate::decompose::decompose;
use crate::error::Result;
use crate::face::Face;
use crate::geometry::distance;
use crate::simple_region::{SimpleRegion, VisibleSegment};

/// Blocking topology together with its simple regions.
///
/// Immutable once built; share it behind an `Arc` across threads.
#[derive(Debug, Clone)]
pub struct DigestedTopology {
    topology: Region,
    bounds: Option<Bounds>,
    regions: Vec<SimpleRegion>,
}

impl DigestedTopology {
    /// Decompose `topology` and keep both the input and the pieces
    pub fn digest(topology: &Region, config: &VisionConfig) -> Result<Self> {
        let regions = decompose(topology, config)?;
        Ok(Self {
            topology: topology.clone(),
            bounds: topology.bounds(),
            regions,
        })
    }

    /// The topology this digest was built from
    pub fn topology(&self) -> &Region {
        &self.topology
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn regions(&self) -> &[SimpleRegion] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Pieces ordered by the distance from `point` to their centre, nearest first
    pub fn regions_by_distance(&self, point: &Point2<f64>) -> Vec<&SimpleRegion> {
        let mut ordered: Vec<(f64, &SimpleRegion)> = self
            .regions
            .iter()
            .map(|r| (distance(point, &r.center()), r))
            .collect();
        ordered.sort_by(|a, b| a.0.total_cmp(&b.0));
        ordered.into_iter().map(|(_, r)| r).collect()
    }

    /// Check if `point` lies strictly inside the blocking topology
    pub fn contains(&self, point: &Point2<f64>) -> bool {
        match self.bounds {
            Some(bounds) if bounds.contains_point(point) => self.topology.contains_point(point),
            _ => false,
        }
    }

    /// Every face of every piece that turns towards `point`
    pub fn front_faces(&self, point: &Point2<f64>) -> Vec<Face> {
        self.regions
            .iter()
            .flat_map(|r| r.front_faces(point))
            .collect()
    }

    /// Visible face chains across all pieces, nearest first
    pub fn visible_segments(&self, point: &Point2<f64>) -> Vec<VisibleSegment> {
        let mut segments: Vec<(f64, VisibleSegment)> = self
            .regions
            .iter()
            .flat_map(|r| r.visible_segments(point))
            .map(|s| (s.distance_from(point), s))
            .collect();
        segments.sort_by(|a, b| a.0.total_cmp(&b.0));
        segments.into_iter().map(|(_, s)| s).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_walls() -> DigestedTopology {
        let topology = Region::rectangle(10.0, -5.0, 2.0, 10.0)
            .union(&Region::rectangle(40.0, -5.0, 2.0, 10.0));
        DigestedTopology::digest(&topology, &VisionConfig::default()).unwrap()
    }

    #[test]
    fn test_regions_by_distance() {
        let digest = two_walls();
        assert_eq!(digest.len(), 2);

        let near_left = digest.regions_by_distance(&Point2::new(0.0, 0.0));
        assert!(near_left[0].center().x < near_left[1].center().x);

        let near_right = digest.regions_by_distance(&Point2::new(60.0, 0.0));
        assert!(near_right[0].center().x > near_right[1].center().x);
    }

    #[test]
    fn test_contains() {
        let digest = two_walls();
        assert!(digest.contains(&Point2::new(11.0, 0.0)));
        assert!(!digest.contains(&Point2::new(20.0, 0.0)));
        assert!(!digest.contains(&Point2::new(500.0, 0.0)));
    }

    #[test]
    fn test_contains_excludes_holes() {
        let topology = Region::rectangle(0.0, 0.0, 10.0, 10.0)
            .subtract(&Region::rectangle(3.0, 3.0, 4.0, 4.0));
        let digest = DigestedTopology::digest(&topology, &VisionConfig::default()).unwrap();
        assert!(!digest.contains(&Point2::new(5.0, 5.0)));
        assert!(digest.contains(&Point2::new(1.0, 5.0)));
    }

    #[test]
    fn test_visible_segments_nearest_first() {
        let digest = two_walls();
        let origin = Point2::new(0.0, 0.0);

        let segments = digest.visible_segments(&origin);
        assert_eq!(segments.len(), 2);
        assert!(segments[0].distance_from(&origin) < segments[1].distance_from(&origin));
        assert_eq!(digest.front_faces(&origin).len(), 2);
    }
}
