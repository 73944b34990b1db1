//! pixelsheet Spec Library
//!
//! Data types shared by the pixelsheet renderer and the tools around it:
//! the sheet configuration a user edits, the outline post-effect
//! parameters, frame rectangles, and the metadata written next to an
//! exported sprite sheet.
//!
//! # Example
//!
//! ```
//! use pixelsheet_spec::{SheetConfig, ConfigError};
//!
//! let config = SheetConfig::new(4, 64, 64).with_ping_pong(true);
//! assert!(config.validate().is_ok());
//!
//! let bad = SheetConfig::new(0, 64, 64);
//! assert_eq!(bad.validate(), Err(ConfigError::FrameCount(0)));
//! ```
//!
//! # Modules
//!
//! - [`config`]: Sheet configuration, ranges, and validation
//! - [`outline`]: Outline post-effect parameters
//! - [`rect`]: Frame rectangles and origin conventions
//! - [`metadata`]: Exported sheet metadata
//! - [`error`]: Configuration errors and the [`CodedError`] trait

pub mod config;
pub mod error;
pub mod metadata;
pub mod outline;
pub mod rect;

pub use config::{
    check_finite, check_frame_count, check_frame_size, check_loop_count, check_scale_offset,
    SheetConfig, MAX_FRAME_COUNT, MAX_FRAME_SIZE, MAX_LOOP_COUNT, MAX_SCALE_OFFSET,
    MIN_FRAME_COUNT, MIN_FRAME_SIZE, MIN_LOOP_COUNT, MIN_SCALE_OFFSET,
};
pub use error::{CodedError, ConfigError};
pub use metadata::{
    frame_name, FilterMode, ImportHints, NamedFrameRect, SheetMetadata, SpriteMode,
    FRAME_NAME_PREFIX,
};
pub use outline::{
    check_outline_color, check_outline_threshold, OutlineParams, MAX_OUTLINE_THRESHOLD,
};
pub use rect::{FrameRect, Origin};
