//! pixelsheet Render Library
//!
//! Renders a posable 3D model across a sequence of interpolated poses and
//! composites the frames into a single sprite sheet with per-frame
//! rectangle metadata.
//!
//! # Pipeline
//!
//! - **Pose**: frame index to rotation and clip time, with looping and
//!   ping-pong
//! - **Framing**: fits the model's bounds inside the camera view
//! - **Renderer**: one offscreen frame per pose, with an outline pass
//! - **Packer**: near-square grid of frames on a transparent sheet
//! - **Exporter**: deterministic PNG plus `Sprite_<i>` rectangles
//! - **Session**: UI-free editor core tying it all together
//!
//! # Example
//!
//! ```
//! use pixelsheet_render::soft::{MeshModel, SoftCamera};
//! use pixelsheet_render::{Color, IgnoreProgress, SheetSession};
//! use pixelsheet_spec::SheetConfig;
//!
//! let config = SheetConfig::new(4, 64, 64);
//! let mut session = SheetSession::with_config(SoftCamera::default(), config).unwrap();
//! session.bind_model(MeshModel::uv_sphere(0.5, 16, 8, Color::gray(0.8)));
//!
//! let sheet = session.render_sheet(&mut IgnoreProgress).unwrap();
//! assert_eq!((sheet.pixels.width, sheet.pixels.height), (128, 128));
//! ```
//!
//! # Determinism
//!
//! Rendering has no hidden state: the same model, configuration and frame
//! index always produce the same pixels, and PNG encoding uses fixed
//! settings, so exported sheets hash identically across runs.

pub mod buffer;
pub mod color;
pub mod error;
pub mod exporter;
pub mod framing;
pub mod packer;
pub mod persist;
pub mod png;
pub mod pose;
pub mod preview;
pub mod renderer;
pub mod scene;
pub mod session;
pub mod soft;

// Re-export main types for convenience
pub use buffer::{PixelBuffer, MAX_BUFFER_PIXELS};
pub use color::Color;
pub use error::{ExportError, RenderError, RenderResult, SheetError, SheetResult};
pub use exporter::{export, export_sheet_buffer, named_frames, sheet_metadata, ExportedSheet};
pub use framing::{compute_transform, fit_model, measure_natural_bounds, FramingTransform};
pub use packer::{pack_sheet, SheetBuffer, SheetCompositor, SheetLayout};
pub use persist::{
    metadata_path_for, write_sheet, FsSheetSink, MemorySheetSink, SheetSink, SpriteImporter,
    WrittenSheet,
};
pub use crate::png::{PngConfig, PngError};
pub use pose::{pose_for_frame, Pose};
pub use preview::{fit_preview, DisplayRect, PreviewPlacement};
pub use renderer::RenderContext;
pub use scene::{Aabb, ClearMode, ClipInfo, PosableModel, RenderCamera, SamplingSession, Viewport};
pub use session::{IgnoreProgress, Invalidation, Progress, ProgressSink, SheetSession};
