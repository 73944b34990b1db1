//! Outline post-effect parameters.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound of the outline threshold exposed by editor controls.
pub const MAX_OUTLINE_THRESHOLD: f64 = 0.05;

/// Parameters of the silhouette/outline post-process.
///
/// Pixels sitting on the near side of a depth discontinuity larger than
/// `depth_threshold` are recolored with `color`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct OutlineParams {
    /// Outline color [R, G, B, A] in 0.0-1.0 range.
    pub color: [f64; 4],

    /// Depth difference (normalized depth units) that counts as an edge.
    pub depth_threshold: f64,
}

impl Default for OutlineParams {
    fn default() -> Self {
        Self {
            color: [0.0, 0.0, 0.0, 1.0],
            depth_threshold: 0.0001,
        }
    }
}

impl OutlineParams {
    /// Creates outline parameters, validating both fields.
    pub fn new(color: [f64; 4], depth_threshold: f64) -> Result<Self, ConfigError> {
        let params = Self {
            color,
            depth_threshold,
        };
        params.validate()?;
        Ok(params)
    }

    /// Checks the color components and threshold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_outline_color(self.color)?;
        check_outline_threshold(self.depth_threshold)
    }
}

/// Validates an outline color.
pub fn check_outline_color(color: [f64; 4]) -> Result<(), ConfigError> {
    if color.iter().all(|c| (0.0..=1.0).contains(c)) {
        Ok(())
    } else {
        Err(ConfigError::OutlineColor(color))
    }
}

/// Validates an outline depth threshold.
pub fn check_outline_threshold(threshold: f64) -> Result<(), ConfigError> {
    if threshold.is_finite() && threshold >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutlineThreshold(threshold))
    }
}
