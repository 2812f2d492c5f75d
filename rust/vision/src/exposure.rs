// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accumulated fog-of-war exposure for one map.
//!
//! Exposure grows through [`ExposureAccumulator::reveal`] and only shrinks
//! through the explicit [`hide`](ExposureAccumulator::hide),
//! [`set_exposed`](ExposureAccumulator::set_exposed) and
//! [`reset`](ExposureAccumulator::reset) calls. Writers are serialised by a
//! reader-writer lock, so concurrent reveals never lose an update and reads
//! always see a consistent value.

use std::fmt;

use nalgebra::Point2;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use vtt_fog_region::{Bounds, Region};

use crate::error::{Error, Result};

/// Identifier of a sight-capable entity (token)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObserverId(String);

impl ObserverId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObserverId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ObserverId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Default)]
struct ExposureState {
    exposed: Region,
    /// Per-observer history, for individual fog of war
    observers: FxHashMap<ObserverId, Region>,
}

/// Thread-safe exposed-area store
#[derive(Debug, Default)]
pub struct ExposureAccumulator {
    state: RwLock<ExposureState>,
}

impl ExposureAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already exposed area
    pub fn with_exposed(exposed: Region) -> Self {
        Self {
            state: RwLock::new(ExposureState {
                exposed,
                observers: FxHashMap::default(),
            }),
        }
    }

    /// Add `area` to the exposed region; revealing the same area twice has
    /// no further effect
    pub fn reveal(&self, area: &Region) {
        if area.is_empty() {
            return;
        }
        let mut state = self.state.write();
        state.exposed = state.exposed.union(area);
    }

    /// Reveal `area` and also record it in `observer`'s own history
    pub fn reveal_for(&self, observer: &ObserverId, area: &Region) {
        if area.is_empty() {
            return;
        }
        let mut state = self.state.write();
        state.exposed = state.exposed.union(area);

        let history = state.observers.entry(observer.clone()).or_default();
        *history = history.union(area);
    }

    /// Copy of the current exposed region
    pub fn exposed(&self) -> Region {
        self.state.read().exposed.clone()
    }

    /// Exposed region plus the personal history of each listed observer
    pub fn exposed_for(&self, observers: &[ObserverId]) -> Region {
        let state = self.state.read();
        let histories = observers.iter().filter_map(|id| state.observers.get(id));
        Region::union_all(std::iter::once(&state.exposed).chain(histories))
    }

    /// Personal history of one observer, empty if it never revealed anything
    pub fn observer_exposed(&self, observer: &ObserverId) -> Region {
        self.state
            .read()
            .observers
            .get(observer)
            .cloned()
            .unwrap_or_default()
    }

    pub fn observer_count(&self) -> usize {
        self.state.read().observers.len()
    }

    /// Cover `area` with fog again, everywhere it was exposed
    pub fn hide(&self, area: &Region) {
        if area.is_empty() {
            return;
        }
        let mut state = self.state.write();
        state.exposed = state.exposed.subtract(area);
        for history in state.observers.values_mut() {
            *history = history.subtract(area);
        }
        state.observers.retain(|_, history| !history.is_empty());
    }

    /// Replace the exposed region wholesale; observer histories are kept
    pub fn set_exposed(&self, exposed: Region) {
        self.state.write().exposed = exposed;
    }

    /// Forget everything revealed so far
    pub fn reset(&self) {
        let mut state = self.state.write();
        state.exposed = Region::empty();
        state.observers.clear();
    }

    pub fn is_point_exposed(&self, point: &Point2<f64>) -> bool {
        self.state.read().exposed.contains_point(point)
    }

    /// Check if any part of `bounds` is exposed
    pub fn is_bounds_exposed(&self, bounds: &Bounds) -> bool {
        self.state
            .read()
            .exposed
            .intersects(&Region::from_bounds(bounds))
    }

    /// Serializable copy of the whole state
    pub fn snapshot(&self) -> ExposureSnapshot {
        let state = self.state.read();
        let mut observers: Vec<(ObserverId, Region)> = state
            .observers
            .iter()
            .map(|(id, region)| (id.clone(), region.clone()))
            .collect();
        observers.sort_by(|a, b| a.0.cmp(&b.0));

        ExposureSnapshot {
            exposed: state.exposed.clone(),
            observers,
        }
    }

    /// Replace the whole state with a snapshot
    pub fn restore(&self, snapshot: ExposureSnapshot) {
        let mut state = self.state.write();
        state.exposed = snapshot.exposed;
        state.observers = snapshot.observers.into_iter().collect();
    }
}

/// Persistable exposure state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExposureSnapshot {
    pub exposed: Region,
    /// Observer histories, sorted by id
    pub observers: Vec<(ObserverId, Region)>,
}

impl ExposureSnapshot {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reveal_for_tracks_observer() {
        let fog = ExposureAccumulator::new();
        let alice = ObserverId::from("alice");
        let bob = ObserverId::from("bob");

        fog.reveal_for(&alice, &Region::rectangle(0.0, 0.0, 2.0, 2.0));
        fog.reveal(&Region::rectangle(10.0, 10.0, 1.0, 1.0));

        assert_relative_eq!(fog.exposed().area(), 5.0, epsilon = 1e-6);
        assert_relative_eq!(fog.observer_exposed(&alice).area(), 4.0, epsilon = 1e-6);
        assert!(fog.observer_exposed(&bob).is_empty());
        assert_relative_eq!(fog.exposed_for(&[alice, bob]).area(), 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_hide_and_reset() {
        let fog = ExposureAccumulator::new();
        let id = ObserverId::new("token-1");
        fog.reveal_for(&id, &Region::rectangle(0.0, 0.0, 4.0, 4.0));

        fog.hide(&Region::rectangle(0.0, 0.0, 2.0, 4.0));
        assert_relative_eq!(fog.exposed().area(), 8.0, epsilon = 1e-6);
        assert_relative_eq!(fog.observer_exposed(&id).area(), 8.0, epsilon = 1e-6);
        assert!(!fog.is_point_exposed(&Point2::new(1.0, 1.0)));
        assert!(fog.is_point_exposed(&Point2::new(3.0, 1.0)));

        fog.reset();
        assert!(fog.exposed().is_empty());
        assert_eq!(fog.observer_count(), 0);
    }

    #[test]
    fn test_bounds_exposed_on_partial_overlap() {
        let fog = ExposureAccumulator::with_exposed(Region::rectangle(0.0, 0.0, 5.0, 5.0));
        assert!(fog.is_bounds_exposed(&Bounds::from_rect(4.0, 4.0, 3.0, 3.0)));
        assert!(!fog.is_bounds_exposed(&Bounds::from_rect(6.0, 6.0, 1.0, 1.0)));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let fog = ExposureAccumulator::new();
        fog.reveal_for(&"b".into(), &Region::rectangle(0.0, 0.0, 1.0, 1.0));
        fog.reveal_for(&"a".into(), &Region::rectangle(3.0, 0.0, 1.0, 1.0));

        let snapshot = fog.snapshot();
        assert_eq!(snapshot.observers[0].0.as_str(), "a");

        let json = snapshot.to_json().unwrap();
        let restored = ExposureAccumulator::new();
        restored.restore(ExposureSnapshot::from_json(&json).unwrap());

        assert_eq!(restored.snapshot(), snapshot);
        assert!(matches!(
            ExposureSnapshot::from_json("{"),
            Err(Error::Serialization(_))
        ));
    }
}
