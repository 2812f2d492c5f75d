// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Observers, their vision sources, and the reveal driver.

use nalgebra::Point2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use vtt_fog_region::{shapes, Bounds, Region};

use crate::caster::cast_visibility_digested;
use crate::config::VisionConfig;
use crate::digest::DigestedTopology;
use crate::error::{check_finite, Result};
use crate::exposure::{ExposureAccumulator, ObserverId};

/// Outline of a vision source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SightShape {
    Circle,
    Square,
    /// Pie slice of `arc` degrees, turned `offset` degrees from the facing
    Cone { arc: f64, offset: f64 },
}

/// One way an observer can see
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisionSource {
    pub shape: SightShape,
    pub range: f64,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl VisionSource {
    pub fn circle(range: f64) -> Self {
        Self {
            shape: SightShape::Circle,
            range,
            enabled: true,
        }
    }

    pub fn square(range: f64) -> Self {
        Self {
            shape: SightShape::Square,
            range,
            enabled: true,
        }
    }

    pub fn cone(range: f64, arc: f64, offset: f64) -> Self {
        Self {
            shape: SightShape::Cone { arc, offset },
            range,
            enabled: true,
        }
    }

    /// Vision shape anchored at the origin.
    ///
    /// Cones point along `facing` and also cover the observer's own
    /// footprint, so a token always sees the cell it stands on.
    pub fn vision_shape(
        &self,
        facing: f64,
        footprint: Option<&Bounds>,
        config: &VisionConfig,
    ) -> Result<Region> {
        let shape = match self.shape {
            SightShape::Circle => shapes::circle(self.range, config.circle_segments)?,
            SightShape::Square => shapes::square(self.range)?,
            SightShape::Cone { arc, offset } => {
                let pie = shapes::cone(self.range, arc, facing + offset, config.circle_segments)?;
                match footprint {
                    Some(fp) => pie.union(&Region::rectangle(
                        -fp.width() / 2.0,
                        -fp.height() / 2.0,
                        fp.width(),
                        fp.height(),
                    )),
                    None => pie,
                }
            }
        };
        Ok(shape)
    }
}

/// A sight-capable entity on the map
#[derive(Debug, Clone, PartialEq)]
pub struct Observer {
    pub id: ObserverId,
    pub position: Point2<f64>,
    /// Area the entity occupies; vision is cast from its centre when set
    pub footprint: Option<Bounds>,
    /// Direction the entity faces, in degrees
    pub facing: f64,
    pub sources: Vec<VisionSource>,
}

impl Observer {
    pub fn new(id: impl Into<ObserverId>, position: Point2<f64>) -> Self {
        Self {
            id: id.into(),
            position,
            footprint: None,
            facing: 0.0,
            sources: Vec::new(),
        }
    }

    pub fn with_footprint(mut self, footprint: Bounds) -> Self {
        self.footprint = Some(footprint);
        self
    }

    pub fn with_facing(mut self, facing: f64) -> Self {
        self.facing = facing;
        self
    }

    pub fn with_source(mut self, source: VisionSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Point vision is cast from
    pub fn vision_center(&self) -> Point2<f64> {
        self.footprint
            .map(|fp| fp.center())
            .unwrap_or(self.position)
    }

    /// Same observer standing somewhere else, footprint moved along
    pub fn moved_to(&self, position: Point2<f64>) -> Self {
        let delta = position - self.position;
        Self {
            position,
            footprint: self
                .footprint
                .map(|fp| Bounds::new(fp.min + delta, fp.max + delta)),
            ..self.clone()
        }
    }
}

/// Everything `observer` can see through all of its enabled sources.
///
/// `Ok(None)` when the observer stands inside blocking topology.
pub fn observer_visibility(
    observer: &Observer,
    topology: &DigestedTopology,
    config: &VisionConfig,
) -> Result<Option<Region>> {
    let center = observer.vision_center();
    check_finite(&center)?;

    let mut visible: Vec<Region> = Vec::new();
    for source in observer.sources.iter().filter(|s| s.enabled) {
        let shape = source.vision_shape(observer.facing, observer.footprint.as_ref(), config)?;
        match cast_visibility_digested(&center, &shape, topology, config)? {
            Some(area) => visible.push(area),
            None => return Ok(None),
        }
    }

    Ok(Some(Region::union_all(&visible)))
}

/// Cast every observer in parallel and reveal what each one sees.
///
/// Each observer's sources are unioned first, then revealed with a single
/// call. Nothing is revealed unless every observer casts successfully.
/// Returns the number of observers that revealed anything.
pub fn expose_observers(
    observers: &[Observer],
    topology: &DigestedTopology,
    exposure: &ExposureAccumulator,
    config: &VisionConfig,
) -> Result<usize> {
    let seen = observers
        .par_iter()
        .map(|observer| observer_visibility(observer, topology, config))
        .collect::<Result<Vec<Option<Region>>>>()?;

    let mut count = 0usize;
    for (observer, area) in observers.iter().zip(&seen) {
        if let Some(area) = area.as_ref().filter(|a| !a.is_empty()) {
            exposure.reveal_for(&observer.id, area);
            count += 1;
        }
    }
    tracing::debug!(observers = observers.len(), revealed = count, "Exposed observers");
    Ok(count)
}

/// Reveal everything `observer` saw while walking through `path`.
///
/// Path points where the observer would stand inside topology reveal
/// nothing. Returns the revealed area.
pub fn expose_path(
    observer: &Observer,
    path: &[Point2<f64>],
    topology: &DigestedTopology,
    exposure: &ExposureAccumulator,
    config: &VisionConfig,
) -> Result<Region> {
    let seen = path
        .par_iter()
        .map(|step| observer_visibility(&observer.moved_to(*step), topology, config))
        .collect::<Result<Vec<Option<Region>>>>()?;

    let area = Region::union_all(seen.iter().flatten());
    exposure.reveal_for(&observer.id, &area);
    Ok(area)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn no_walls() -> DigestedTopology {
        DigestedTopology::digest(&Region::empty(), &VisionConfig::default()).unwrap()
    }

    #[test]
    fn test_vision_center_uses_footprint() {
        let observer = Observer::new("t", Point2::new(0.0, 0.0))
            .with_footprint(Bounds::from_rect(0.0, 0.0, 50.0, 50.0));
        assert_eq!(observer.vision_center(), Point2::new(25.0, 25.0));

        let moved = observer.moved_to(Point2::new(100.0, 0.0));
        assert_eq!(moved.vision_center(), Point2::new(125.0, 25.0));
        assert_eq!(Observer::new("u", Point2::new(3.0, 4.0)).vision_center(), Point2::new(3.0, 4.0));
    }

    #[test]
    fn test_cone_includes_footprint() {
        let config = VisionConfig::default();
        let footprint = Bounds::from_rect(0.0, 0.0, 4.0, 4.0);
        let shape = VisionSource::cone(20.0, 90.0, 0.0)
            .vision_shape(90.0, Some(&footprint), &config)
            .unwrap();

        assert!(shape.contains_point(&Point2::new(0.0, 10.0)));
        assert!(!shape.contains_point(&Point2::new(0.0, -10.0)));
        // Behind the facing direction but inside the footprint
        assert!(shape.contains_point(&Point2::new(0.0, -1.5)));
    }

    #[test]
    fn test_disabled_sources_are_ignored() {
        let mut dark = VisionSource::circle(10.0);
        dark.enabled = false;
        let observer = Observer::new("t", Point2::origin()).with_source(dark);

        let seen = observer_visibility(&observer, &no_walls(), &VisionConfig::default())
            .unwrap()
            .unwrap();
        assert!(seen.is_empty());
    }

    #[test]
    fn test_sources_are_unioned() {
        let observer = Observer::new("t", Point2::origin())
            .with_source(VisionSource::circle(5.0))
            .with_source(VisionSource::square(3.0));

        let seen = observer_visibility(&observer, &no_walls(), &VisionConfig::default())
            .unwrap()
            .unwrap();
        assert!(seen.contains_point(&Point2::new(4.5, 0.0)));
        assert!(seen.contains_point(&Point2::new(2.9, 2.9)));
    }

    #[test]
    fn test_expose_observers_reveals_each() {
        let exposure = ExposureAccumulator::new();
        let observers = vec![
            Observer::new("a", Point2::new(0.0, 0.0)).with_source(VisionSource::square(1.0)),
            Observer::new("b", Point2::new(10.0, 0.0)).with_source(VisionSource::square(1.0)),
            Observer::new("c", Point2::new(20.0, 0.0)),
        ];

        let count =
            expose_observers(&observers, &no_walls(), &exposure, &VisionConfig::default()).unwrap();

        assert_eq!(count, 2);
        assert_relative_eq!(exposure.exposed().area(), 8.0, epsilon = 1e-6);
        assert_eq!(exposure.observer_count(), 2);
    }

    #[test]
    fn test_failed_observer_reveals_nothing() {
        let exposure = ExposureAccumulator::new();
        let observers: Vec<Observer> = (0..16)
            .map(|i| {
                Observer::new(format!("t{}", i), Point2::new(i as f64 * 10.0, 0.0))
                    .with_source(VisionSource::square(1.0))
            })
            .chain(std::iter::once(
                Observer::new("lost", Point2::new(f64::NAN, 0.0))
                    .with_source(VisionSource::square(1.0)),
            ))
            .collect();

        let result = expose_observers(&observers, &no_walls(), &exposure, &VisionConfig::default());

        assert!(matches!(result, Err(crate::error::Error::NonFiniteCoordinate { .. })));
        assert!(exposure.exposed().is_empty());
        assert_eq!(exposure.observer_count(), 0);
    }

    #[test]
    fn test_expose_path_sweeps_every_step() {
        let exposure = ExposureAccumulator::new();
        let observer = Observer::new("walker", Point2::origin()).with_source(VisionSource::square(1.0));
        let path = [Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), Point2::new(4.0, 0.0)];

        let area = expose_path(&observer, &path, &no_walls(), &exposure, &VisionConfig::default())
            .unwrap();

        assert_relative_eq!(area.area(), 12.0, epsilon = 1e-6);
        assert!(exposure.is_point_exposed(&Point2::new(4.5, 0.5)));
    }

    #[test]
    fn test_source_serde() {
        let json = r#"{ "shape": { "type": "cone", "arc": 60.0, "offset": 0.0 }, "range": 30.0 }"#;
        let source: VisionSource = serde_json::from_str(json).unwrap();
        assert_eq!(source, VisionSource::cone(30.0, 60.0, 0.0));
    }
}
