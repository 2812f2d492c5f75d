// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tuning knobs for decomposition and shadow casting.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Loops with more points than this are bisected during decomposition.
    pub point_count_threshold: usize,
    /// Minimum distance shadow quads are projected away from the observer.
    pub projection_distance: f64,
    /// Bisection depth after which a piece is accepted unresolved.
    pub max_split_depth: usize,
    /// Bisection halves with less area than this count as degenerate.
    pub min_area: f64,
    /// Polygon segments used for circular and conical vision shapes.
    pub circle_segments: usize,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            point_count_threshold: 100,
            projection_distance: 100_000.0,
            max_split_depth: 48,
            min_area: 1e-6,
            circle_segments: 64,
        }
    }
}

impl VisionConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if self.point_count_threshold < 3 {
            return Err(Error::Config(format!(
                "point_count_threshold must be at least 3, got {}",
                self.point_count_threshold
            )));
        }
        if !(self.projection_distance.is_finite() && self.projection_distance > 0.0) {
            return Err(Error::Config(format!(
                "projection_distance must be finite and positive, got {}",
                self.projection_distance
            )));
        }
        if !(self.min_area.is_finite() && self.min_area >= 0.0) {
            return Err(Error::Config(format!(
                "min_area must be finite and non-negative, got {}",
                self.min_area
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = VisionConfig::default();
        assert_eq!(config.point_count_threshold, 100);
        assert_eq!(config.projection_distance, 100_000.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let config = VisionConfig::from_json(r#"{ "point_count_threshold": 40 }"#).unwrap();
        assert_eq!(config.point_count_threshold, 40);
        assert_eq!(config.circle_segments, 64);
    }

    #[test]
    fn from_json_rejects_bad_values() {
        assert!(matches!(
            VisionConfig::from_json(r#"{ "projection_distance": -1.0 }"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            VisionConfig::from_json("not json"),
            Err(Error::Config(_))
        ));
    }
}
