//! Depth-based outline post-effect.

use pixelsheet_spec::OutlineParams;

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::error::{RenderError, RenderResult};

/// Depth of pixels nothing was drawn to.
pub const BACKGROUND_DEPTH: f32 = 1.0;

/// Normalized linear depth per pixel, 0 at the near plane and 1 at the far
/// plane.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f32>,
}

impl DepthBuffer {
    /// Creates a buffer cleared to [`BACKGROUND_DEPTH`].
    pub fn try_new(width: u32, height: u32) -> RenderResult<Self> {
        let size = width as usize * height as usize;
        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| RenderError::Allocation { width, height })?;
        data.resize(size, BACKGROUND_DEPTH);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[(y * self.width + x) as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, depth: f32) {
        self.data[(y * self.width + x) as usize] = depth;
    }

    /// Depth at a signed coordinate, or `None` outside the buffer.
    fn sample(&self, x: i64, y: i64) -> Option<f32> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some(self.get(x as u32, y as u32))
    }

    /// Returns true if anything was drawn at this pixel.
    pub fn is_covered(&self, x: u32, y: u32) -> bool {
        self.get(x, y) < BACKGROUND_DEPTH
    }
}

const NEIGHBOURS: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Recolors covered pixels that sit on the near side of a depth
/// discontinuity.
///
/// A neighbour counts as a discontinuity when it is farther than the depth
/// extrapolated from the opposite neighbour by more than the threshold. The
/// second difference of a plane is zero, so flat and sloped faces never
/// outline themselves.
pub fn apply_outline(target: &mut PixelBuffer, depth: &DepthBuffer, params: &OutlineParams) {
    let outline = Color::from_array(params.color);
    let threshold = params.depth_threshold as f32;

    for y in 0..depth.height {
        for x in 0..depth.width {
            if !depth.is_covered(x, y) {
                continue;
            }
            let here = depth.get(x, y);
            let (xi, yi) = (i64::from(x), i64::from(y));

            let on_edge = NEIGHBOURS.iter().any(|&(dx, dy)| {
                let Some(next) = depth.sample(xi + dx, yi + dy) else {
                    return false;
                };
                match depth.sample(xi - dx, yi - dy) {
                    Some(opposite) => next - (2.0 * here - opposite) > threshold,
                    // No slope to extrapolate at the buffer border.
                    None => next >= BACKGROUND_DEPTH,
                }
            });

            if on_edge {
                let pixel = target.get(x, y);
                let tint = Color { a: pixel.a, ..outline };
                target.set(x, y, pixel.lerp(&tint, outline.a));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [f64; 4] = [1.0, 0.0, 0.0, 1.0];

    fn square_scene() -> (PixelBuffer, DepthBuffer) {
        let mut target = PixelBuffer::try_transparent(5, 5).unwrap();
        let mut depth = DepthBuffer::try_new(5, 5).unwrap();
        for y in 1..4 {
            for x in 1..4 {
                target.set(x, y, Color::gray(0.5));
                depth.set(x, y, 0.5);
            }
        }
        (target, depth)
    }

    #[test]
    fn test_silhouette_ring_is_outlined() {
        let (mut target, depth) = square_scene();
        let params = OutlineParams::new(RED, 0.0001).unwrap();
        apply_outline(&mut target, &depth, &params);

        let red = Color::rgba(1.0, 0.0, 0.0, 1.0);
        for y in 1..4 {
            for x in 1..4 {
                if (x, y) == (2, 2) {
                    assert_eq!(target.get(x, y), Color::gray(0.5));
                } else {
                    assert_eq!(target.get(x, y), red, "pixel ({}, {})", x, y);
                }
            }
        }
        // Background stays untouched.
        assert_eq!(target.get(0, 0), Color::transparent());
    }

    #[test]
    fn test_slope_is_not_outlined() {
        let mut target = PixelBuffer::try_new(6, 1, Color::gray(0.5)).unwrap();
        let mut depth = DepthBuffer::try_new(6, 1).unwrap();
        for x in 0..6 {
            depth.set(x, 0, 0.1 + 0.05 * x as f32);
        }
        apply_outline(&mut target, &depth, &OutlineParams::default());
        assert!(target.data.iter().all(|c| *c == Color::gray(0.5)));
    }

    #[test]
    fn test_translucent_outline_blends() {
        let (mut target, depth) = square_scene();
        let params = OutlineParams::new([1.0, 1.0, 1.0, 0.5], 0.0001).unwrap();
        apply_outline(&mut target, &depth, &params);

        let edge = target.get(1, 2);
        assert!((edge.r - 0.75).abs() < 1e-9);
        assert_eq!(edge.a, 1.0);
    }

    #[test]
    fn test_large_threshold_disables_outline() {
        let (mut target, depth) = square_scene();
        let before = target.clone();
        let params = OutlineParams::new(RED, 0.05).unwrap();
        let mut shallow = depth.clone();
        for v in shallow.data.iter_mut().filter(|v| **v < BACKGROUND_DEPTH) {
            *v = 0.99;
        }
        apply_outline(&mut target, &shallow, &params);
        assert_eq!(target, before);
    }
}
