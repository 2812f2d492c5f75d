// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # VTT-Fog Vision
//!
//! Line-of-sight and fog-of-war for virtual tabletop maps.
//!
//! - [`decompose`] breaks blocking topology into hole-free pieces of bounded
//!   complexity ([`SimpleRegion`]), each with its boundary [`Face`]s.
//! - [`cast_visibility`] subtracts the shadow of every wall edge from an
//!   observer's vision shape; [`cast_visibility_digested`] does the same
//!   from a [`DigestedTopology`], casting only front faces nearest first.
//! - [`ExposureAccumulator`] keeps the monotonically growing exposed area.
//!
//! ## Example
//!
//! ```rust
//! use vtt_fog_region::{shapes, Point2, Region};
//! use vtt_fog_vision::{cast_visibility, ExposureAccumulator, VisionConfig};
//!
//! let config = VisionConfig::default();
//! let wall = Region::rectangle(45.0, -5.0, 10.0, 10.0);
//! let vision = shapes::circle(100.0, config.circle_segments).unwrap();
//!
//! let seen = cast_visibility(&Point2::origin(), &vision, &wall, &config)
//!     .unwrap()
//!     .expect("observer is not inside the wall");
//! assert!(!seen.contains_point(&Point2::new(70.0, 0.0)));
//!
//! let fog = ExposureAccumulator::new();
//! fog.reveal(&seen);
//! assert!(fog.is_point_exposed(&Point2::new(-50.0, 0.0)));
//! ```

pub mod cache;
pub mod caster;
pub mod config;
pub mod decompose;
pub mod digest;
pub mod error;
pub mod exposure;
pub mod face;
pub mod geometry;
pub mod ring;
pub mod sight;
pub mod simple_region;

pub use cache::TopologyCache;
pub use caster::{cast_visibility, cast_visibility_digested};
pub use config::VisionConfig;
pub use decompose::decompose;
pub use digest::DigestedTopology;
pub use error::{Error, Result};
pub use exposure::{ExposureAccumulator, ExposureSnapshot, ObserverId};
pub use face::Face;
pub use ring::PointRing;
pub use sight::{expose_observers, expose_path, observer_visibility, Observer, SightShape, VisionSource};
pub use simple_region::{SimpleRegion, VisibleSegment};
