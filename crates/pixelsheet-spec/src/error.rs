//! Error types for sheet configuration and the shared error-code trait.

use thiserror::Error;

use crate::config::{
    MAX_FRAME_COUNT, MAX_FRAME_SIZE, MAX_LOOP_COUNT, MAX_SCALE_OFFSET, MIN_FRAME_COUNT,
    MIN_FRAME_SIZE, MIN_LOOP_COUNT, MIN_SCALE_OFFSET,
};

/// Trait for errors that carry a stable, machine-readable code.
///
/// Every error type in the pixelsheet crates implements this so that a host
/// UI can group and report failures without matching on variants.
///
/// # Example
///
/// ```
/// use pixelsheet_spec::{CodedError, ConfigError};
///
/// let err = ConfigError::FrameCount(0);
/// assert_eq!(err.code(), "CONFIG_001");
/// assert_eq!(err.category(), "config");
/// ```
pub trait CodedError: std::error::Error {
    /// Stable code such as "CONFIG_001" or "RENDER_002".
    fn code(&self) -> &'static str;

    /// Human-readable message describing the error.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Category used for grouping related errors.
    fn category(&self) -> &'static str;
}

/// Configuration values outside their valid ranges.
///
/// These are raised at the boundary closest to user input and never
/// clamped silently mid-render.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Frame count outside `1..=64`.
    #[error("frame count {0} is out of range ({MIN_FRAME_COUNT}..={MAX_FRAME_COUNT})")]
    FrameCount(u32),

    /// Frame width outside `32..=512`.
    #[error("frame width {0} is out of range ({MIN_FRAME_SIZE}..={MAX_FRAME_SIZE})")]
    FrameWidth(u32),

    /// Frame height outside `32..=512`.
    #[error("frame height {0} is out of range ({MIN_FRAME_SIZE}..={MAX_FRAME_SIZE})")]
    FrameHeight(u32),

    /// Loop count outside `1..=10`.
    #[error("loop count {0} is out of range ({MIN_LOOP_COUNT}..={MAX_LOOP_COUNT})")]
    LoopCount(u32),

    /// Scale offset outside `-10..=10` or not finite.
    #[error("scale offset {0} is out of range ({MIN_SCALE_OFFSET}..={MAX_SCALE_OFFSET})")]
    ScaleOffset(f32),

    /// A vector field contains NaN or infinity.
    #[error("field '{field}' must contain only finite values")]
    NonFiniteVector { field: &'static str },

    /// Outline depth threshold negative or not finite.
    #[error("outline depth threshold {0} must be finite and non-negative")]
    OutlineThreshold(f64),

    /// Outline color component outside `0..=1`.
    #[error("outline color components must be in 0..=1, got {0:?}")]
    OutlineColor([f64; 4]),

    /// Selected animation clip does not exist on the bound model.
    #[error("animation clip index {index} is out of range (model has {available} clip(s))")]
    ClipIndex { index: usize, available: usize },

    /// Preview frame index beyond the configured frame count.
    #[error("frame index {index} is out of range (frame count is {frame_count})")]
    FrameIndex { index: u32, frame_count: u32 },

    /// Configuration JSON could not be parsed.
    #[error("invalid configuration JSON: {0}")]
    Json(String),
}

impl ConfigError {
    /// Creates a non-finite vector error for the named field.
    pub fn non_finite(field: &'static str) -> Self {
        Self::NonFiniteVector { field }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl CodedError for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            ConfigError::FrameCount(_) => "CONFIG_001",
            ConfigError::FrameWidth(_) => "CONFIG_002",
            ConfigError::FrameHeight(_) => "CONFIG_003",
            ConfigError::LoopCount(_) => "CONFIG_004",
            ConfigError::ScaleOffset(_) => "CONFIG_005",
            ConfigError::NonFiniteVector { .. } => "CONFIG_006",
            ConfigError::OutlineThreshold(_) => "CONFIG_007",
            ConfigError::OutlineColor(_) => "CONFIG_008",
            ConfigError::ClipIndex { .. } => "CONFIG_009",
            ConfigError::FrameIndex { .. } => "CONFIG_010",
            ConfigError::Json(_) => "CONFIG_011",
        }
    }

    fn category(&self) -> &'static str {
        "config"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::FrameCount(65);
        assert!(err.to_string().contains("65"));
        assert!(err.to_string().contains("1..=64"));

        let err = ConfigError::FrameWidth(16);
        assert!(err.to_string().contains("32..=512"));

        let err = ConfigError::ClipIndex {
            index: 3,
            available: 2,
        };
        assert!(err.to_string().contains("2 clip(s)"));
    }

    #[test]
    fn test_codes_are_unique() {
        let errors = [
            ConfigError::FrameCount(0),
            ConfigError::FrameWidth(0),
            ConfigError::FrameHeight(0),
            ConfigError::LoopCount(0),
            ConfigError::ScaleOffset(f32::NAN),
            ConfigError::non_finite("start_rotation"),
            ConfigError::OutlineThreshold(-1.0),
            ConfigError::OutlineColor([2.0, 0.0, 0.0, 1.0]),
            ConfigError::ClipIndex {
                index: 0,
                available: 0,
            },
            ConfigError::FrameIndex {
                index: 0,
                frame_count: 0,
            },
            ConfigError::Json(String::new()),
        ];

        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
