//! Sheet configuration.
//!
//! A [`SheetConfig`] describes how many frames to render, how big each frame
//! is, and how the model pose moves across the sequence. It is created with
//! defaults at session start, mutated by user edits, and validated before
//! anything is rendered.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Minimum number of frames in a sheet.
pub const MIN_FRAME_COUNT: u32 = 1;
/// Maximum number of frames in a sheet.
pub const MAX_FRAME_COUNT: u32 = 64;
/// Minimum frame width/height in pixels.
pub const MIN_FRAME_SIZE: u32 = 32;
/// Maximum frame width/height in pixels.
pub const MAX_FRAME_SIZE: u32 = 512;
/// Minimum loop count.
pub const MIN_LOOP_COUNT: u32 = 1;
/// Maximum loop count.
pub const MAX_LOOP_COUNT: u32 = 10;
/// Lower bound of the scale bias.
pub const MIN_SCALE_OFFSET: f32 = -10.0;
/// Upper bound of the scale bias.
pub const MAX_SCALE_OFFSET: f32 = 10.0;

/// Configuration for one sprite-sheet render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SheetConfig {
    /// Number of frames in the sheet (1..=64).
    pub frame_count: u32,

    /// Width of each frame in pixels (32..=512).
    pub frame_width: u32,

    /// Height of each frame in pixels (32..=512).
    pub frame_height: u32,

    /// How many times the motion repeats across the sequence (1..=10).
    pub loop_count: u32,

    /// Reverse direction on every odd loop instead of restarting.
    pub ping_pong: bool,

    /// Offset added to the model's bounds center before auto-framing.
    pub position_offset: [f32; 3],

    /// Bias added to the auto-framed scale (may be negative).
    pub scale_offset: f32,

    /// Euler angles in degrees at the start of the motion.
    pub start_rotation: [f32; 3],

    /// Euler angles in degrees at the end of the motion.
    pub end_rotation: [f32; 3],

    /// Index of the animation clip to sample, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_clip: Option<usize>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            frame_count: 12,
            frame_width: 100,
            frame_height: 100,
            loop_count: 1,
            ping_pong: false,
            position_offset: [0.0; 3],
            scale_offset: 0.0,
            start_rotation: [0.0; 3],
            end_rotation: [0.0, 180.0, 0.0],
            animation_clip: None,
        }
    }
}

impl SheetConfig {
    /// Creates a configuration with the given frame count and frame size,
    /// leaving everything else at its default.
    pub fn new(frame_count: u32, frame_width: u32, frame_height: u32) -> Self {
        Self {
            frame_count,
            frame_width,
            frame_height,
            ..Self::default()
        }
    }

    /// Sets the loop count.
    pub fn with_loop_count(mut self, loop_count: u32) -> Self {
        self.loop_count = loop_count;
        self
    }

    /// Enables or disables ping-pong looping.
    pub fn with_ping_pong(mut self, ping_pong: bool) -> Self {
        self.ping_pong = ping_pong;
        self
    }

    /// Sets the start and end rotations (Euler degrees).
    pub fn with_rotation(mut self, start: [f32; 3], end: [f32; 3]) -> Self {
        self.start_rotation = start;
        self.end_rotation = end;
        self
    }

    /// Sets the position offset and scale bias used by auto-framing.
    pub fn with_offsets(mut self, position: [f32; 3], scale: f32) -> Self {
        self.position_offset = position;
        self.scale_offset = scale;
        self
    }

    /// Selects an animation clip by index.
    pub fn with_clip(mut self, clip: Option<usize>) -> Self {
        self.animation_clip = clip;
        self
    }

    /// Checks every field against its valid range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.validation_errors().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Returns every range violation, in field order.
    pub fn validation_errors(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Err(e) = check_frame_count(self.frame_count) {
            errors.push(e);
        }
        if !frame_size_in_range(self.frame_width) {
            errors.push(ConfigError::FrameWidth(self.frame_width));
        }
        if !frame_size_in_range(self.frame_height) {
            errors.push(ConfigError::FrameHeight(self.frame_height));
        }
        if let Err(e) = check_loop_count(self.loop_count) {
            errors.push(e);
        }
        if let Err(e) = check_scale_offset(self.scale_offset) {
            errors.push(e);
        }

        let vectors = [
            ("position_offset", self.position_offset),
            ("start_rotation", self.start_rotation),
            ("end_rotation", self.end_rotation),
        ];
        for (field, v) in vectors {
            if let Err(e) = check_finite(field, v) {
                errors.push(e);
            }
        }

        errors
    }

    /// Parses a configuration from JSON and validates it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SheetConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Highest valid frame index.
    pub fn last_frame(&self) -> u32 {
        self.frame_count.saturating_sub(1)
    }
}

/// Validates a frame count.
pub fn check_frame_count(frame_count: u32) -> Result<(), ConfigError> {
    if (MIN_FRAME_COUNT..=MAX_FRAME_COUNT).contains(&frame_count) {
        Ok(())
    } else {
        Err(ConfigError::FrameCount(frame_count))
    }
}

/// Validates a frame width and height.
pub fn check_frame_size(width: u32, height: u32) -> Result<(), ConfigError> {
    if !frame_size_in_range(width) {
        return Err(ConfigError::FrameWidth(width));
    }
    if !frame_size_in_range(height) {
        return Err(ConfigError::FrameHeight(height));
    }
    Ok(())
}

/// Validates a loop count.
pub fn check_loop_count(loop_count: u32) -> Result<(), ConfigError> {
    if (MIN_LOOP_COUNT..=MAX_LOOP_COUNT).contains(&loop_count) {
        Ok(())
    } else {
        Err(ConfigError::LoopCount(loop_count))
    }
}

/// Validates a scale bias.
pub fn check_scale_offset(scale: f32) -> Result<(), ConfigError> {
    if scale.is_finite() && (MIN_SCALE_OFFSET..=MAX_SCALE_OFFSET).contains(&scale) {
        Ok(())
    } else {
        Err(ConfigError::ScaleOffset(scale))
    }
}

/// Validates that a vector field contains only finite values.
pub fn check_finite(field: &'static str, v: [f32; 3]) -> Result<(), ConfigError> {
    if v.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(ConfigError::non_finite(field))
    }
}

fn frame_size_in_range(size: u32) -> bool {
    (MIN_FRAME_SIZE..=MAX_FRAME_SIZE).contains(&size)
}
