//! Error types for rendering, exporting, and whole-sheet operations.

use std::path::PathBuf;

use pixelsheet_spec::{CodedError, ConfigError};
use thiserror::Error;

use crate::png::PngError;

/// Result type for single-frame rendering.
pub type RenderResult<T> = Result<T, RenderError>;

/// Result type for sheet operations.
pub type SheetResult<T> = Result<T, SheetError>;

/// Failures while producing a single frame.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No model is bound to the render context.
    #[error("no model is bound to the render context")]
    MissingModel,

    /// The render target could not be allocated.
    #[error("cannot allocate a {width}x{height} render target")]
    Allocation { width: u32, height: u32 },

    /// The camera failed to draw.
    #[error("draw call failed: {message}")]
    Draw { message: String },

    /// The model rejected an animation sample.
    #[error("failed to sample clip {clip} at {time}s: {message}")]
    ClipSampling {
        clip: usize,
        time: f32,
        message: String,
    },
}

impl RenderError {
    /// Creates a draw failure.
    pub fn draw(message: impl Into<String>) -> Self {
        Self::Draw {
            message: message.into(),
        }
    }

    /// Creates a clip sampling failure.
    pub fn clip_sampling(clip: usize, time: f32, message: impl Into<String>) -> Self {
        Self::ClipSampling {
            clip,
            time,
            message: message.into(),
        }
    }
}

impl CodedError for RenderError {
    fn code(&self) -> &'static str {
        match self {
            RenderError::MissingModel => "RENDER_001",
            RenderError::Allocation { .. } => "RENDER_002",
            RenderError::Draw { .. } => "RENDER_003",
            RenderError::ClipSampling { .. } => "RENDER_004",
        }
    }

    fn category(&self) -> &'static str {
        "render"
    }
}

/// Failures while encoding or persisting a sheet.
#[derive(Debug, Error)]
pub enum ExportError {
    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Png(#[from] PngError),

    /// Metadata could not be serialized.
    #[error("failed to serialize sheet metadata: {0}")]
    Metadata(#[source] serde_json::Error),

    /// Writing a file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Destination path has no parent directory or file name.
    #[error("invalid destination path: {path}")]
    InvalidPath { path: PathBuf },

    /// Downstream sprite import failed.
    #[error("sprite import failed: {message}")]
    Import { message: String },
}

impl ExportError {
    /// Creates a write failure for a path.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

impl CodedError for ExportError {
    fn code(&self) -> &'static str {
        match self {
            ExportError::Png(_) => "EXPORT_001",
            ExportError::Metadata(_) => "EXPORT_002",
            ExportError::Write { .. } => "EXPORT_003",
            ExportError::InvalidPath { .. } => "EXPORT_004",
            ExportError::Import { .. } => "EXPORT_005",
        }
    }

    fn category(&self) -> &'static str {
        "export"
    }
}

/// Terminal failure of a sheet operation.
#[derive(Debug, Error)]
pub enum SheetError {
    /// Configuration out of range.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Render-all requested with no model bound.
    #[error("cannot render sheet: no model is bound")]
    MissingModel,

    /// A frame failed to render; the sheet was discarded.
    #[error("frame {frame} failed to render: {source}")]
    Render {
        frame: u32,
        #[source]
        source: RenderError,
    },

    /// A frame did not match the sheet layout.
    #[error("frame {frame} is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    FrameSize {
        frame: u32,
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// The wrong number of frames was supplied to the packer.
    #[error("expected {expected} frame(s), got {actual}")]
    FrameCount { expected: u32, actual: u32 },

    /// Encoding or writing failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// The sheet buffer could not be allocated.
    #[error("cannot allocate a {width}x{height} sheet")]
    Allocation { width: u32, height: u32 },

    /// A frame rectangle fell outside the sheet.
    #[error("frame {frame} at ({x}, {y}) does not fit in the {sheet_width}x{sheet_height} sheet")]
    Placement {
        frame: u32,
        x: u32,
        y: u32,
        sheet_width: u32,
        sheet_height: u32,
    },

    /// The progress sink asked to stop.
    #[error("sheet render cancelled after {completed} of {total} frame(s)")]
    Cancelled { completed: u32, total: u32 },
}

impl SheetError {
    /// Wraps a render failure for the given frame, mapping a missing model to
    /// the sheet-level variant.
    pub fn render(frame: u32, source: RenderError) -> Self {
        match source {
            RenderError::MissingModel => Self::MissingModel,
            source => Self::Render { frame, source },
        }
    }
}

impl CodedError for SheetError {
    fn code(&self) -> &'static str {
        match self {
            SheetError::Config(e) => e.code(),
            SheetError::MissingModel => "SHEET_001",
            SheetError::Render { .. } => "SHEET_002",
            SheetError::FrameSize { .. } => "SHEET_003",
            SheetError::FrameCount { .. } => "SHEET_004",
            SheetError::Export(e) => e.code(),
            SheetError::Cancelled { .. } => "SHEET_005",
            SheetError::Allocation { .. } => "SHEET_006",
            SheetError::Placement { .. } => "SHEET_007",
        }
    }

    fn category(&self) -> &'static str {
        match self {
            SheetError::Config(_) => "config",
            SheetError::Export(_) => "export",
            _ => "sheet",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RenderError::Allocation {
            width: 100000,
            height: 100000,
        };
        assert!(err.to_string().contains("100000x100000"));

        let err = SheetError::Cancelled {
            completed: 3,
            total: 12,
        };
        assert!(err.to_string().contains("3 of 12"));
    }

    #[test]
    fn test_missing_model_maps_to_sheet_variant() {
        let err = SheetError::render(4, RenderError::MissingModel);
        assert!(matches!(err, SheetError::MissingModel));
        assert_eq!(err.code(), "SHEET_001");

        let err = SheetError::render(4, RenderError::draw("lost device"));
        assert!(matches!(err, SheetError::Render { frame: 4, .. }));
        assert!(err.to_string().contains("lost device"));
    }

    #[test]
    fn test_nested_codes() {
        let err = SheetError::from(ConfigError::FrameCount(0));
        assert_eq!(err.code(), "CONFIG_001");
        assert_eq!(err.category(), "config");

        let err = SheetError::from(ExportError::InvalidPath {
            path: PathBuf::from("/"),
        });
        assert_eq!(err.code(), "EXPORT_004");
        assert_eq!(err.category(), "export");
    }
}
