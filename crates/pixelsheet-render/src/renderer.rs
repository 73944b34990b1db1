//! Single-frame rendering against an exclusively owned render context.

use log::{debug, warn};
use pixelsheet_spec::{OutlineParams, SheetConfig};

use crate::buffer::PixelBuffer;
use crate::error::{RenderError, RenderResult};
use crate::framing::{fit_model, FramingTransform};
use crate::pose::{pose_for_frame, Pose};
use crate::scene::{PosableModel, RenderCamera, SamplingSession};

/// The mutable state every render touches: the bound model, the camera and
/// the outline parameters.
///
/// Rendering needs `&mut self`, so preview and sheet renders can never
/// interleave.
#[derive(Debug)]
pub struct RenderContext<M, C> {
    model: Option<M>,
    camera: C,
    outline: OutlineParams,
}

impl<M, C> RenderContext<M, C>
where
    M: PosableModel,
    C: RenderCamera<M>,
{
    /// Creates a context with no model bound.
    pub fn new(camera: C) -> Self {
        Self {
            model: None,
            camera,
            outline: OutlineParams::default(),
        }
    }

    /// Binds a model, returning the previously bound one. The model starts
    /// hidden and is only shown while a frame renders.
    pub fn bind_model(&mut self, mut model: M) -> Option<M> {
        model.set_active(false);
        self.model.replace(model)
    }

    /// Removes and returns the bound model.
    pub fn unbind_model(&mut self) -> Option<M> {
        self.model.take()
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Option<&M> {
        self.model.as_ref()
    }

    pub fn model_mut(&mut self) -> Option<&mut M> {
        self.model.as_mut()
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    pub fn outline(&self) -> &OutlineParams {
        &self.outline
    }

    pub fn set_outline(&mut self, outline: OutlineParams) {
        self.outline = outline;
    }

    /// Re-runs auto-framing on the bound model. Returns `None` when no model
    /// is bound.
    pub fn reframe(&mut self, config: &SheetConfig) -> Option<FramingTransform> {
        let model = self.model.as_mut()?;
        Some(fit_model(model, &self.camera, config))
    }

    /// Renders one frame of the sequence described by `config`.
    ///
    /// The model is shown for the duration of the draw and hidden again
    /// afterwards, whether or not the draw succeeded. Nothing is cached.
    pub fn render_frame(&mut self, config: &SheetConfig, frame_index: u32) -> RenderResult<PixelBuffer> {
        let model = self.model.as_mut().ok_or(RenderError::MissingModel)?;
        let pose = pose_for_frame(frame_index, config);
        debug!(
            "rendering frame {}/{} at rotation {:?}",
            frame_index + 1,
            config.frame_count,
            pose.rotation
        );

        model.set_root_rotation(pose.rotation);
        model.set_active(true);
        let result = draw_posed(model, &mut self.camera, &self.outline, config, &pose);
        model.set_active(false);
        result
    }
}

/// Resolves the clip index and time in seconds to sample, if any.
fn clip_sample<M: PosableModel + ?Sized>(model: &M, config: &SheetConfig, pose: &Pose) -> Option<(usize, f32)> {
    let clip = config.animation_clip?;
    let t = pose.normalized_time?;
    match model.clips().get(clip) {
        Some(info) => Some((clip, t * info.duration)),
        None => {
            warn!(
                "animation clip {} not available ({} clip(s)), rendering rest pose",
                clip,
                model.clips().len()
            );
            None
        }
    }
}

fn draw_posed<M, C>(
    model: &mut M,
    camera: &mut C,
    outline: &OutlineParams,
    config: &SheetConfig,
    pose: &Pose,
) -> RenderResult<PixelBuffer>
where
    M: PosableModel,
    C: RenderCamera<M>,
{
    let mut target = PixelBuffer::try_transparent(config.frame_width, config.frame_height)?;

    match clip_sample(model, config, pose) {
        Some((clip, time)) => {
            let mut session = SamplingSession::begin(model);
            session.sample(clip, time)?;
            camera.render(session.model(), &mut target, outline)?;
        }
        None => camera.render(model, &mut target, outline)?,
    }

    Ok(target)
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::color::Color;
    use crate::scene::ClearMode;
    use crate::soft::{Keyframe, MeshClip, MeshModel, SoftCamera};

    fn context() -> RenderContext<MeshModel, SoftCamera> {
        let mut camera = SoftCamera::default();
        camera.set_clear_mode(ClearMode::Transparent);
        let mut context = RenderContext::new(camera);
        context.bind_model(MeshModel::cube(Vec3::ONE, Color::gray(0.8)));
        context
    }

    fn rise_clip() -> MeshClip {
        MeshClip::new(
            "rise",
            2.0,
            vec![
                Keyframe::new(0.0, Vec3::ZERO, Vec3::ZERO),
                Keyframe::new(2.0, Vec3::new(0.0, 1.5, 0.0), Vec3::ZERO),
            ],
        )
    }

    #[test]
    fn test_missing_model() {
        let mut context: RenderContext<MeshModel, SoftCamera> = RenderContext::new(SoftCamera::default());
        let err = context.render_frame(&SheetConfig::default(), 0).unwrap_err();
        assert!(matches!(err, RenderError::MissingModel));
        assert!(context.reframe(&SheetConfig::default()).is_none());
    }

    #[test]
    fn test_frame_has_configured_size() {
        let mut context = context();
        let config = SheetConfig::new(4, 64, 48);
        context.reframe(&config);

        let frame = context.render_frame(&config, 0).unwrap();
        assert_eq!((frame.width, frame.height), (64, 48));
        assert!(!frame.is_fully_transparent());
        assert!(!context.model().unwrap().is_active());
    }

    #[test]
    fn test_model_hidden_after_failure() {
        let mut context = context();
        let config = SheetConfig {
            frame_width: 0,
            ..SheetConfig::default()
        };
        let err = context.render_frame(&config, 0).unwrap_err();
        assert!(matches!(err, RenderError::Allocation { .. }));
        assert!(!context.model().unwrap().is_active());
    }

    #[test]
    fn test_rendering_is_repeatable() {
        let mut context = context();
        let config = SheetConfig::new(8, 64, 64);
        context.reframe(&config);

        let a = context.render_frame(&config, 3).unwrap();
        let _ = context.render_frame(&config, 5).unwrap();
        let b = context.render_frame(&config, 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_clip_sampling_moves_model() {
        let config = SheetConfig::new(2, 64, 64);
        let mut still = context();
        still.reframe(&config);
        let rest = still.render_frame(&config, 1).unwrap();

        let mut animated = context();
        animated.bind_model(MeshModel::cube(Vec3::ONE, Color::gray(0.8)).with_clip(rise_clip()));
        let config = config.with_clip(Some(0));
        animated.reframe(&config);
        let risen = animated.render_frame(&config, 1).unwrap();

        assert_ne!(rest, risen);
        let model = animated.model().unwrap();
        assert!(!model.is_sampling());
        assert!(model.world_bounds().unwrap().center().y.abs() < 1e-4);
    }

    #[test]
    fn test_unknown_clip_renders_rest_pose() {
        let config = SheetConfig::new(2, 64, 64);
        let mut context = context();
        context.reframe(&config);
        let rest = context.render_frame(&config, 1).unwrap();

        let config = config.with_clip(Some(3));
        let fallback = context.render_frame(&config, 1).unwrap();
        assert_eq!(rest, fallback);
    }

    #[test]
    fn test_bind_replaces_and_hides() {
        let mut context = context();
        let mut next = MeshModel::uv_sphere(1.0, 12, 6, Color::gray(0.3));
        next.set_active(true);

        let previous = context.bind_model(next);
        assert!(previous.is_some());
        assert!(!context.model().unwrap().is_active());
        assert!(context.unbind_model().is_some());
        assert!(!context.has_model());
    }
}
