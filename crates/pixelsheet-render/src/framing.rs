//! Auto-framing: fit a model's bounds inside the camera's visible area.
//!
//! The longest bounds dimension (plus a 50% margin) is mapped onto the
//! shorter side of the visible area at the camera-to-origin distance. A
//! user scale bias and position offset are then applied on top.

use glam::Vec3;
use log::debug;
use pixelsheet_spec::SheetConfig;

use crate::scene::{Aabb, PosableModel, Viewport};

/// Extra room around the model, as a fraction of its largest dimension.
pub const FRAMING_MARGIN: f32 = 0.5;

/// Uniform scale and translation that frame a model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramingTransform {
    /// Uniform model scale.
    pub scale: f32,
    /// Model position inside the root.
    pub translation: Vec3,
}

impl FramingTransform {
    /// The transform that leaves a model untouched.
    pub const IDENTITY: FramingTransform = FramingTransform {
        scale: 1.0,
        translation: Vec3::ZERO,
    };

    /// Applies this transform to a model.
    pub fn apply<M: PosableModel + ?Sized>(&self, model: &mut M) {
        model.set_scale(self.scale);
        model.set_position(self.translation);
    }
}

/// Visible world-space width and height at the given depth in front of the
/// camera, measured by unprojecting viewport corners (0,0) and (1,1).
pub fn visible_extent<C: Viewport + ?Sized>(camera: &C, depth: f32, aspect: f32) -> (f32, f32) {
    let bottom_left = camera.viewport_to_world(Vec3::new(0.0, 0.0, depth), aspect);
    let top_right = camera.viewport_to_world(Vec3::new(1.0, 1.0, depth), aspect);
    let delta = top_right - bottom_left;
    (delta.x.abs(), delta.y.abs())
}

/// Computes the framing transform for a model with the given natural bounds.
///
/// Pure: identical inputs always produce identical output.
pub fn compute_transform<C: Viewport + ?Sized>(
    bounds: &Aabb,
    camera: &C,
    aspect: f32,
    offset: Vec3,
    scale_bias: f32,
) -> FramingTransform {
    let extents = bounds.extents();
    let mut max_dimension = extents.max_element() * 2.0;
    max_dimension += max_dimension * FRAMING_MARGIN;

    let distance = camera.position().z.abs();
    let (visible_width, visible_height) = visible_extent(camera, distance, aspect);
    let min_view_dimension = visible_width.min(visible_height);

    let fit = if max_dimension > 0.0 {
        min_view_dimension / max_dimension
    } else {
        0.0
    };
    let scale = fit + scale_bias;

    FramingTransform {
        scale,
        translation: (bounds.center() + offset) * -scale,
    }
}

/// Measures the model's bounds in its natural pose: identity scale, zero
/// position, zero root rotation. Returns `None` for a model with no geometry.
pub fn measure_natural_bounds<M: PosableModel + ?Sized>(model: &mut M) -> Option<Aabb> {
    model.set_scale(1.0);
    model.set_position(Vec3::ZERO);
    model.set_root_rotation(Vec3::ZERO);
    model.world_bounds()
}

/// Measures, computes, and applies the framing transform for a model.
pub fn fit_model<M, C>(model: &mut M, camera: &C, config: &SheetConfig) -> FramingTransform
where
    M: PosableModel + ?Sized,
    C: Viewport + ?Sized,
{
    let transform = match measure_natural_bounds(model) {
        Some(bounds) => {
            let aspect = config.frame_width as f32 / config.frame_height as f32;
            compute_transform(
                &bounds,
                camera,
                aspect,
                Vec3::from_array(config.position_offset),
                config.scale_offset,
            )
        }
        None => FramingTransform::IDENTITY,
    };

    debug!(
        "framed model: scale {:.4}, translation {:?}",
        transform.scale, transform.translation
    );
    transform.apply(model);
    transform
}
