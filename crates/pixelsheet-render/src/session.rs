//! The editor core: configuration, preview and render-all, with no UI.
//!
//! A host binds a model, edits settings through the `set_*` mutators (each
//! returns what it invalidated), calls [`SheetSession::apply`] to refresh
//! the preview, and finally renders or exports the whole sheet.

use std::ops::ControlFlow;
use std::path::Path;

use glam::Vec3;
use log::{debug, info, warn};
use pixelsheet_spec::{
    check_finite, check_frame_count, check_frame_size, check_loop_count, check_scale_offset,
    ConfigError, OutlineParams, SheetConfig,
};

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::error::{RenderError, RenderResult, SheetError, SheetResult};
use crate::exporter::export_sheet_buffer;
use crate::framing::FramingTransform;
use crate::packer::{SheetBuffer, SheetCompositor, SheetLayout};
use crate::persist::{metadata_path_for, write_sheet, SheetSink, WrittenSheet};
use crate::renderer::RenderContext;
use crate::scene::{ClearMode, ClipInfo, PosableModel, RenderCamera};

/// What a settings change requires before the preview is current again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Invalidation {
    /// Nothing changed.
    #[default]
    None,
    /// Re-render the preview.
    Redraw,
    /// Re-run auto-framing, then re-render.
    Reframe,
}

impl Invalidation {
    /// The stronger of two invalidations.
    pub fn merge(self, other: Invalidation) -> Invalidation {
        self.max(other)
    }
}

/// Render-all progress, reported after each completed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: u32,
    pub total: u32,
}

impl Progress {
    /// Completed share in [0, 1].
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        self.completed as f32 / self.total as f32
    }
}

/// Receives progress between frames and may stop the render.
pub trait ProgressSink {
    fn frame_done(&mut self, progress: Progress) -> ControlFlow<()>;
}

impl<F> ProgressSink for F
where
    F: FnMut(Progress) -> ControlFlow<()>,
{
    fn frame_done(&mut self, progress: Progress) -> ControlFlow<()> {
        self(progress)
    }
}

/// A progress sink that never cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreProgress;

impl ProgressSink for IgnoreProgress {
    fn frame_done(&mut self, _: Progress) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Default opaque preview background.
pub const DEFAULT_PREVIEW_BACKGROUND: Color = Color::gray(0.5);

/// Owns the render context and everything a sprite-sheet editor edits.
#[derive(Debug)]
pub struct SheetSession<M, C> {
    config: SheetConfig,
    context: RenderContext<M, C>,
    current_frame: u32,
    preview: Option<PixelBuffer>,
    background: Color,
}

impl<M, C> SheetSession<M, C>
where
    M: PosableModel,
    C: RenderCamera<M>,
{
    /// Starts a session with the default configuration.
    pub fn new(camera: C) -> Self {
        Self {
            config: SheetConfig::default(),
            context: RenderContext::new(camera),
            current_frame: 0,
            preview: None,
            background: DEFAULT_PREVIEW_BACKGROUND,
        }
    }

    /// Starts a session from a stored configuration, validating it first.
    pub fn with_config(camera: C, config: SheetConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut session = Self::new(camera);
        session.config = config;
        Ok(session)
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    pub fn outline(&self) -> &OutlineParams {
        self.context.outline()
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// The last rendered preview frame, if still current.
    pub fn preview(&self) -> Option<&PixelBuffer> {
        self.preview.as_ref()
    }

    pub fn context(&self) -> &RenderContext<M, C> {
        &self.context
    }

    pub fn model(&self) -> Option<&M> {
        self.context.model()
    }

    /// Clips the bound model offers. Empty with no model bound.
    pub fn available_clips(&self) -> &[ClipInfo] {
        self.context.model().map(|m| m.clips()).unwrap_or(&[])
    }

    /// Binds a model, auto-frames it, and returns the previous one.
    ///
    /// A selected clip the new model does not have is cleared. The preview
    /// is stale until the next [`render_preview`](Self::render_preview).
    pub fn bind_model(&mut self, model: M) -> Option<M> {
        let previous = self.context.bind_model(model);
        if let Some(clip) = self.config.animation_clip {
            if clip >= self.available_clips().len() {
                warn!("bound model has no clip {}, clearing clip selection", clip);
                self.config.animation_clip = None;
            }
        }
        self.reframe();
        self.preview = None;
        previous
    }

    /// Unbinds and returns the model.
    pub fn unbind_model(&mut self) -> Option<M> {
        self.preview = None;
        self.context.unbind_model()
    }

    /// Re-runs auto-framing on the bound model.
    pub fn reframe(&mut self) -> Option<FramingTransform> {
        self.context.reframe(&self.config)
    }

    /// Renders the current frame against the preview background.
    pub fn render_preview(&mut self) -> RenderResult<&PixelBuffer> {
        self.context
            .camera_mut()
            .set_clear_mode(ClearMode::Solid(self.background));
        let frame = self.context.render_frame(&self.config, self.current_frame)?;
        Ok(&*self.preview.insert(frame))
    }

    /// Brings the preview up to date after the given invalidation. With no
    /// model bound, the preview is simply cleared.
    pub fn apply(&mut self, invalidation: Invalidation) -> RenderResult<()> {
        match invalidation {
            Invalidation::None => return Ok(()),
            Invalidation::Reframe => {
                self.reframe();
            }
            Invalidation::Redraw => {}
        }

        if !self.context.has_model() {
            self.preview = None;
            return Ok(());
        }
        self.render_preview().map(|_| ())
    }

    /// Replaces the whole configuration.
    pub fn set_config(&mut self, config: SheetConfig) -> Result<Invalidation, ConfigError> {
        config.validate()?;
        if let Some(clip) = config.animation_clip {
            self.check_clip(clip)?;
        }
        if config == self.config {
            return Ok(Invalidation::None);
        }
        self.config = config;
        self.current_frame = self.current_frame.min(self.config.last_frame());
        Ok(Invalidation::Reframe)
    }

    /// Changes the frame count, clamping the current frame into range.
    pub fn set_frame_count(&mut self, frame_count: u32) -> Result<Invalidation, ConfigError> {
        check_frame_count(frame_count)?;
        if frame_count == self.config.frame_count {
            return Ok(Invalidation::None);
        }
        self.config.frame_count = frame_count;
        self.current_frame = self.current_frame.min(self.config.last_frame());
        Ok(Invalidation::Redraw)
    }

    /// Changes the frame size. The aspect ratio affects framing.
    pub fn set_frame_size(&mut self, width: u32, height: u32) -> Result<Invalidation, ConfigError> {
        check_frame_size(width, height)?;
        if (width, height) == (self.config.frame_width, self.config.frame_height) {
            return Ok(Invalidation::None);
        }
        self.config.frame_width = width;
        self.config.frame_height = height;
        Ok(Invalidation::Reframe)
    }

    pub fn set_loop_count(&mut self, loop_count: u32) -> Result<Invalidation, ConfigError> {
        check_loop_count(loop_count)?;
        if loop_count == self.config.loop_count {
            return Ok(Invalidation::None);
        }
        self.config.loop_count = loop_count;
        Ok(Invalidation::Redraw)
    }

    pub fn set_ping_pong(&mut self, ping_pong: bool) -> Invalidation {
        if ping_pong == self.config.ping_pong {
            return Invalidation::None;
        }
        self.config.ping_pong = ping_pong;
        Invalidation::Redraw
    }

    pub fn set_position_offset(&mut self, offset: Vec3) -> Result<Invalidation, ConfigError> {
        let offset = offset.to_array();
        check_finite("position_offset", offset)?;
        if offset == self.config.position_offset {
            return Ok(Invalidation::None);
        }
        self.config.position_offset = offset;
        Ok(Invalidation::Reframe)
    }

    pub fn set_scale_offset(&mut self, scale: f32) -> Result<Invalidation, ConfigError> {
        check_scale_offset(scale)?;
        if scale == self.config.scale_offset {
            return Ok(Invalidation::None);
        }
        self.config.scale_offset = scale;
        Ok(Invalidation::Reframe)
    }

    pub fn set_start_rotation(&mut self, euler_degrees: Vec3) -> Result<Invalidation, ConfigError> {
        let rotation = euler_degrees.to_array();
        check_finite("start_rotation", rotation)?;
        if rotation == self.config.start_rotation {
            return Ok(Invalidation::None);
        }
        self.config.start_rotation = rotation;
        Ok(Invalidation::Redraw)
    }

    pub fn set_end_rotation(&mut self, euler_degrees: Vec3) -> Result<Invalidation, ConfigError> {
        let rotation = euler_degrees.to_array();
        check_finite("end_rotation", rotation)?;
        if rotation == self.config.end_rotation {
            return Ok(Invalidation::None);
        }
        self.config.end_rotation = rotation;
        Ok(Invalidation::Redraw)
    }

    /// Selects a clip of the bound model, or none.
    pub fn set_animation_clip(&mut self, clip: Option<usize>) -> Result<Invalidation, ConfigError> {
        if let Some(index) = clip {
            self.check_clip(index)?;
        }
        if clip == self.config.animation_clip {
            return Ok(Invalidation::None);
        }
        self.config.animation_clip = clip;
        Ok(Invalidation::Redraw)
    }

    /// Selects the frame shown in the preview.
    pub fn set_current_frame(&mut self, index: u32) -> Result<Invalidation, ConfigError> {
        if index >= self.config.frame_count {
            return Err(ConfigError::FrameIndex {
                index,
                frame_count: self.config.frame_count,
            });
        }
        if index == self.current_frame {
            return Ok(Invalidation::None);
        }
        self.current_frame = index;
        Ok(Invalidation::Redraw)
    }

    pub fn set_outline(&mut self, outline: OutlineParams) -> Result<Invalidation, ConfigError> {
        outline.validate()?;
        if outline == *self.context.outline() {
            return Ok(Invalidation::None);
        }
        self.context.set_outline(outline);
        Ok(Invalidation::Redraw)
    }

    /// Changes the preview background. Sheets are always transparent.
    pub fn set_background(&mut self, color: Color) -> Invalidation {
        if color == self.background {
            return Invalidation::None;
        }
        self.background = color;
        Invalidation::Redraw
    }

    fn check_clip(&self, index: usize) -> Result<(), ConfigError> {
        let available = self.available_clips().len();
        if index >= available {
            return Err(ConfigError::ClipIndex { index, available });
        }
        Ok(())
    }

    /// Renders every frame in order onto a transparent sheet.
    ///
    /// The configuration is snapshotted when the render starts. `progress`
    /// hears about each finished frame and may cancel between frames. The
    /// preview background and frame are restored whether or not the render
    /// succeeds.
    pub fn render_sheet<P: ProgressSink + ?Sized>(&mut self, progress: &mut P) -> SheetResult<SheetBuffer> {
        if !self.context.has_model() {
            warn!("cannot render sheet: no model is bound");
            return Err(SheetError::MissingModel);
        }

        let config = self.config.clone();
        config.validate()?;
        let layout = SheetLayout::from_config(&config);
        info!(
            "rendering {} frame(s) of {}x{} into a {}x{} sheet",
            config.frame_count,
            config.frame_width,
            config.frame_height,
            layout.sheet_width(),
            layout.sheet_height()
        );

        self.context.reframe(&config);
        let saved = self.context.camera().clear_mode();
        self.context.camera_mut().set_clear_mode(ClearMode::Transparent);
        let result = self.render_frames(&config, layout, progress);
        self.context.camera_mut().set_clear_mode(saved);

        if let Err(err) = self.render_preview() {
            warn!("failed to refresh preview after sheet render: {}", err);
            self.preview = None;
        }

        match &result {
            Ok(_) => info!("sheet complete"),
            Err(err) => warn!("sheet render failed: {}", err),
        }
        result
    }

    fn render_frames<P: ProgressSink + ?Sized>(
        &mut self,
        config: &SheetConfig,
        layout: SheetLayout,
        progress: &mut P,
    ) -> SheetResult<SheetBuffer> {
        let total = config.frame_count;
        let mut compositor = SheetCompositor::new(layout)?;

        for index in 0..total {
            let frame = self
                .context
                .render_frame(config, index)
                .map_err(|err| SheetError::render(index, err))?;
            compositor.push(&frame)?;

            let completed = index + 1;
            debug!("composited frame {}/{}", completed, total);
            if progress.frame_done(Progress { completed, total }).is_break() && completed < total {
                return Err(SheetError::Cancelled { completed, total });
            }
        }

        compositor.finish()
    }

    /// Renders, encodes and writes the sheet and its metadata sidecar.
    ///
    /// Any failure is terminal and leaves no files behind.
    pub fn export_sheet<S, P>(
        &mut self,
        sink: &mut S,
        image_path: &Path,
        progress: &mut P,
    ) -> SheetResult<WrittenSheet>
    where
        S: SheetSink + ?Sized,
        P: ProgressSink + ?Sized,
    {
        metadata_path_for(image_path)?;
        let sheet = self.render_sheet(progress)?;
        let exported = export_sheet_buffer(&sheet)?;
        Ok(write_sheet(sink, image_path, &exported)?)
    }

    /// Direct access to the bound model. Changing its geometry requires a
    /// [`reframe`](Self::reframe).
    pub fn model_mut(&mut self) -> Option<&mut M> {
        self.context.model_mut()
    }

    /// Renders one frame with a transparent clear, as it would appear in
    /// the sheet.
    pub fn render_sheet_frame(&mut self, index: u32) -> RenderResult<PixelBuffer> {
        if index >= self.config.frame_count {
            return Err(RenderError::draw(format!(
                "frame {} is past the last frame {}",
                index,
                self.config.last_frame()
            )));
        }
        let saved = self.context.camera().clear_mode();
        self.context.camera_mut().set_clear_mode(ClearMode::Transparent);
        let result = self.context.render_frame(&self.config, index);
        self.context.camera_mut().set_clear_mode(saved);
        result
    }
}
