//! Perspective software camera.

use glam::Vec3;
use log::trace;
use pixelsheet_spec::OutlineParams;

use super::mesh::{MeshModel, Triangle};
use super::outline::{apply_outline, DepthBuffer};
use crate::buffer::PixelBuffer;
use crate::error::RenderResult;
use crate::scene::{ClearMode, PosableModel, RenderCamera, Viewport};

/// A fixed-orientation perspective camera looking down +Z with +Y up.
///
/// Triangles are flat shaded with a single directional light and
/// depth-tested against a linear depth buffer, which also feeds the outline
/// pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftCamera {
    /// World-space position.
    pub position: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
    /// Unit vector pointing towards the light.
    pub light_direction: Vec3,
    /// Light level of faces turned away from the light.
    pub ambient: f64,
    clear: ClearMode,
}

impl Default for SoftCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, -6.0),
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 100.0,
            light_direction: Vec3::new(-0.4, 0.6, -0.7).normalize(),
            ambient: 0.35,
            clear: ClearMode::default(),
        }
    }
}

fn edge(a: Vec3, b: Vec3, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

impl SoftCamera {
    /// Camera at the given position with the default lens.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    fn tan_half_fov(&self) -> f32 {
        (self.fov_y_degrees.to_radians() * 0.5).tan()
    }

    /// Projects a world point onto a `width` x `height` target as pixel x,
    /// pixel y and normalized depth. Returns `None` for points outside the
    /// near/far range.
    pub fn project(&self, point: Vec3, width: u32, height: u32) -> Option<Vec3> {
        let view = point - self.position;
        if view.z <= self.near || view.z >= self.far {
            return None;
        }

        let (w, h) = (width as f32, height as f32);
        let tan = self.tan_half_fov();
        let ndc_x = view.x / (view.z * tan * (w / h));
        let ndc_y = view.y / (view.z * tan);

        Some(Vec3::new(
            (ndc_x * 0.5 + 0.5) * w,
            (0.5 - ndc_y * 0.5) * h,
            (view.z - self.near) / (self.far - self.near),
        ))
    }

    fn shade(&self, triangle: &Triangle) -> crate::color::Color {
        let [a, b, c] = triangle.vertices;
        let normal = (b - a).cross(c - a).normalize_or_zero();
        let lambert = f64::from(normal.dot(self.light_direction).abs());
        let light = self.ambient + (1.0 - self.ambient) * lambert;
        triangle.color.scale(light).clamp()
    }

    fn rasterize(&self, triangle: &Triangle, target: &mut PixelBuffer, depth: &mut DepthBuffer) {
        let (width, height) = (target.width, target.height);
        let project = |v: Vec3| self.project(v, width, height);
        let (Some(a), Some(b), Some(c)) = (
            project(triangle.vertices[0]),
            project(triangle.vertices[1]),
            project(triangle.vertices[2]),
        ) else {
            return;
        };

        let area = edge(a, b, c.x, c.y);
        if area.abs() < 1e-8 {
            return;
        }

        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as u32;
        let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as u32;
        let max_x = a.x.max(b.x).max(c.x).ceil().min(width as f32) as u32;
        let max_y = a.y.max(b.y).max(c.y).ceil().min(height as f32) as u32;

        let color = self.shade(triangle);
        for y in min_y..max_y {
            for x in min_x..max_x {
                let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
                let w0 = edge(b, c, px, py) / area;
                let w1 = edge(c, a, px, py) / area;
                let w2 = edge(a, b, px, py) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let z = w0 * a.z + w1 * b.z + w2 * c.z;
                if z < depth.get(x, y) {
                    depth.set(x, y, z);
                    target.set(x, y, color);
                }
            }
        }
    }
}

impl Viewport for SoftCamera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn viewport_to_world(&self, viewport: Vec3, aspect: f32) -> Vec3 {
        let half_height = viewport.z * self.tan_half_fov();
        let half_width = half_height * aspect;
        self.position
            + Vec3::new(
                (viewport.x * 2.0 - 1.0) * half_width,
                (viewport.y * 2.0 - 1.0) * half_height,
                viewport.z,
            )
    }
}

impl RenderCamera<MeshModel> for SoftCamera {
    fn clear_mode(&self) -> ClearMode {
        self.clear
    }

    fn set_clear_mode(&mut self, mode: ClearMode) {
        self.clear = mode;
    }

    fn render(
        &mut self,
        model: &MeshModel,
        target: &mut PixelBuffer,
        outline: &OutlineParams,
    ) -> RenderResult<()> {
        target.fill(self.clear.color());
        if !model.is_active() {
            return Ok(());
        }

        let mut depth = DepthBuffer::try_new(target.width, target.height)?;
        for triangle in model.world_triangles() {
            self.rasterize(&triangle, target, &mut depth);
        }
        apply_outline(target, &depth, outline);

        trace!(
            "rendered {} triangles into {}x{}",
            model.triangle_count(),
            target.width,
            target.height
        );
        Ok(())
    }
}
