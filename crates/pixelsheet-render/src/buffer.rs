//! CPU-side pixel buffers for rendered frames and composited sheets.

use crate::color::Color;
use crate::error::{RenderError, RenderResult};

/// Largest pixel count a single buffer may hold (16384 x 16384).
pub const MAX_BUFFER_PIXELS: u64 = 16384 * 16384;

/// A 2D RGBA pixel buffer, row-major with row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel data (RGBA, row-major).
    pub data: Vec<Color>,
}

impl PixelBuffer {
    /// Create a new buffer filled with a color.
    ///
    /// Fails with [`RenderError::Allocation`] when the size is zero, larger
    /// than [`MAX_BUFFER_PIXELS`], or the allocation itself fails.
    pub fn try_new(width: u32, height: u32, fill: Color) -> RenderResult<Self> {
        let pixels = u64::from(width) * u64::from(height);
        if pixels == 0 || pixels > MAX_BUFFER_PIXELS {
            return Err(RenderError::Allocation { width, height });
        }

        let size = pixels as usize;
        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| RenderError::Allocation { width, height })?;
        data.resize(size, fill);

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a new fully transparent buffer.
    pub fn try_transparent(width: u32, height: u32) -> RenderResult<Self> {
        Self::try_new(width, height, Color::transparent())
    }

    /// Get a pixel at the given coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Color {
        let idx = (y * self.width + x) as usize;
        self.data[idx]
    }

    /// Set a pixel at the given coordinates.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let idx = (y * self.width + x) as usize;
        self.data[idx] = color;
    }

    /// Overwrite every pixel with a color.
    pub fn fill(&mut self, color: Color) {
        self.data.fill(color);
    }

    /// Returns one row of pixels.
    pub fn row(&self, y: u32) -> &[Color] {
        let start = (y * self.width) as usize;
        &self.data[start..start + self.width as usize]
    }

    /// Copy `src` into this buffer with its top-left corner at `(x, y)`.
    ///
    /// Pixels are replaced, not blended. Returns false (and copies nothing)
    /// if `src` does not fit entirely.
    pub fn blit(&mut self, src: &PixelBuffer, x: u32, y: u32) -> bool {
        let fits_x = x.checked_add(src.width).is_some_and(|r| r <= self.width);
        let fits_y = y.checked_add(src.height).is_some_and(|b| b <= self.height);
        if !fits_x || !fits_y {
            return false;
        }

        for row in 0..src.height {
            let dst_start = ((y + row) * self.width + x) as usize;
            let dst = &mut self.data[dst_start..dst_start + src.width as usize];
            dst.copy_from_slice(src.row(row));
        }
        true
    }

    /// Convert to 8-bit RGBA bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() * 4);
        for color in &self.data {
            bytes.extend_from_slice(&color.to_rgba8());
        }
        bytes
    }

    /// Returns true if every pixel has zero alpha.
    pub fn is_fully_transparent(&self) -> bool {
        self.data.iter().all(|c| c.a == 0.0)
    }
}
