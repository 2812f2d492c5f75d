// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for region operations
pub type Result<T> = std::result::Result<T, RegionError>;

/// Errors raised while building regions from raw coordinates
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegionError {
    #[error("Non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate { x: f64, y: f64 },

    #[error("Contour has {0} distinct points, at least 3 are required")]
    DegenerateContour(usize),

    #[error("Invalid shape parameter: {0}")]
    InvalidShape(String),
}
