//! Interfaces to the model and camera that the pipeline drives.
//!
//! The pipeline never owns a scene graph. It talks to a [`PosableModel`]
//! (bounds, transform, visibility, animation clips) and a [`RenderCamera`]
//! (clear mode, synchronous render into a buffer) whose [`Viewport`] side
//! unprojects viewport points for auto-framing.
//! The [`soft`](crate::soft) module provides a CPU implementation of both.

use glam::Vec3;
use pixelsheet_spec::OutlineParams;

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::error::RenderResult;

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Creates a box from its corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Creates a box from a center and half-size.
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Smallest box containing every point, or `None` for no points.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    /// Center point.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half-size along each axis.
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// An animation clip exposed by a model.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipInfo {
    /// Display name.
    pub name: String,
    /// Length in seconds.
    pub duration: f32,
}

/// What the camera clears the target to before drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClearMode {
    /// Fully transparent, used for sheet frames.
    Transparent,
    /// Solid color, used for the interactive preview.
    Solid(Color),
}

impl ClearMode {
    /// The color the target is cleared to.
    pub fn color(&self) -> Color {
        match self {
            ClearMode::Transparent => Color::transparent(),
            ClearMode::Solid(c) => *c,
        }
    }
}

impl Default for ClearMode {
    fn default() -> Self {
        ClearMode::Solid(Color::gray(0.5))
    }
}

/// A 3D model the pipeline can pose, frame, and show or hide.
///
/// The model has two transform levels: a root rotation (the pose) applied
/// around the world origin, and a model scale/position (the framing) applied
/// inside it.
pub trait PosableModel {
    /// Current world-space bounds, or `None` if the model has no geometry.
    fn world_bounds(&self) -> Option<Aabb>;

    /// Sets the uniform model scale.
    fn set_scale(&mut self, scale: f32);

    /// Sets the model position inside the root.
    fn set_position(&mut self, position: Vec3);

    /// Sets the root rotation as Euler angles in degrees.
    fn set_root_rotation(&mut self, euler_degrees: Vec3);

    /// Shows or hides the model. Hidden models are not drawn.
    fn set_active(&mut self, active: bool);

    /// Returns true if the model is currently shown.
    fn is_active(&self) -> bool;

    /// Animation clips the model can sample. Empty if none.
    fn clips(&self) -> &[ClipInfo] {
        &[]
    }

    /// Enters animation sampling mode.
    fn begin_sampling(&mut self) {}

    /// Applies `clip` at `time` seconds to the live model state.
    ///
    /// Only valid between [`begin_sampling`](Self::begin_sampling) and
    /// [`end_sampling`](Self::end_sampling).
    fn sample_clip(&mut self, clip: usize, time: f32) -> RenderResult<()> {
        let _ = (clip, time);
        Ok(())
    }

    /// Leaves animation sampling mode and restores the rest pose.
    fn end_sampling(&mut self) {}
}

/// The projection side of a camera: where it sits and what it sees.
pub trait Viewport {
    /// Camera position in world space.
    fn position(&self) -> Vec3;

    /// Converts a viewport point (x, y in 0..1, z = distance from the
    /// camera) to world space, for a target of the given aspect ratio.
    fn viewport_to_world(&self, viewport: Vec3, aspect: f32) -> Vec3;
}

/// A camera that renders a model into a pixel buffer.
pub trait RenderCamera<M: PosableModel + ?Sized>: Viewport {
    /// Current clear mode.
    fn clear_mode(&self) -> ClearMode;

    /// Changes the clear mode.
    fn set_clear_mode(&mut self, mode: ClearMode);

    /// Clears `target` and draws `model` into it if active, then applies the
    /// outline post-effect.
    fn render(
        &mut self,
        model: &M,
        target: &mut PixelBuffer,
        outline: &OutlineParams,
    ) -> RenderResult<()>;
}

/// Scoped animation sampling.
///
/// Calls `begin_sampling` on creation and `end_sampling` on drop, so
/// sampling mode is always left even when sampling fails.
pub struct SamplingSession<'a, M: PosableModel + ?Sized> {
    model: &'a mut M,
}

impl<'a, M: PosableModel + ?Sized> SamplingSession<'a, M> {
    /// Enters sampling mode on `model`.
    pub fn begin(model: &'a mut M) -> Self {
        model.begin_sampling();
        Self { model }
    }

    /// Samples a clip at the given time in seconds.
    pub fn sample(&mut self, clip: usize, time: f32) -> RenderResult<()> {
        self.model.sample_clip(clip, time)
    }

    /// The model in its sampled state.
    pub fn model(&self) -> &M {
        self.model
    }
}

impl<M: PosableModel + ?Sized> Drop for SamplingSession<'_, M> {
    fn drop(&mut self) {
        self.model.end_sampling();
    }
}
