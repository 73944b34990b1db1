//! Grid packing of equally sized frames into one sheet.
//!
//! Frames are laid out row-major on a near-square grid:
//! `columns = ceil(sqrt(n))`, `rows = ceil(n / columns)`. Frame `i` lands in
//! column `i % columns`, row `i / columns`, counted from the top-left.

use pixelsheet_spec::{FrameRect, Origin, SheetConfig};

use crate::buffer::PixelBuffer;
use crate::error::{SheetError, SheetResult};

/// Smallest `c` with `c * c >= n`.
fn ceil_sqrt(n: u32) -> u32 {
    let mut c = f64::from(n).sqrt() as u32;
    while c.saturating_mul(c) < n {
        c += 1;
    }
    while c > 0 && (c - 1) * (c - 1) >= n {
        c -= 1;
    }
    c
}

/// Grid geometry for a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub frame_count: u32,
    pub frame_width: u32,
    pub frame_height: u32,
    pub columns: u32,
    pub rows: u32,
}

impl SheetLayout {
    /// Computes the grid for `frame_count` frames of the given size.
    ///
    /// A zero frame count is treated as one frame.
    pub fn new(frame_count: u32, frame_width: u32, frame_height: u32) -> Self {
        let frame_count = frame_count.max(1);
        let columns = ceil_sqrt(frame_count);
        let rows = frame_count.div_ceil(columns);
        Self {
            frame_count,
            frame_width,
            frame_height,
            columns,
            rows,
        }
    }

    /// Grid for a sheet configuration.
    pub fn from_config(config: &SheetConfig) -> Self {
        Self::new(config.frame_count, config.frame_width, config.frame_height)
    }

    /// Sheet width in pixels.
    pub fn sheet_width(&self) -> u32 {
        self.columns * self.frame_width
    }

    /// Sheet height in pixels.
    pub fn sheet_height(&self) -> u32 {
        self.rows * self.frame_height
    }

    /// Rectangle of frame `index`, or `None` past the last frame.
    pub fn frame_rect(&self, index: u32, origin: Origin) -> Option<FrameRect> {
        if index >= self.frame_count {
            return None;
        }
        let top_left = FrameRect::new(
            (index % self.columns) * self.frame_width,
            (index / self.columns) * self.frame_height,
            self.frame_width,
            self.frame_height,
        );
        Some(match origin {
            Origin::TopLeft => top_left,
            Origin::BottomLeft => top_left.flip_vertical(self.sheet_height()),
        })
    }

    /// Rectangles of every frame in index order.
    pub fn frame_rects(&self, origin: Origin) -> Vec<FrameRect> {
        (0..self.frame_count)
            .filter_map(|i| self.frame_rect(i, origin))
            .collect()
    }
}

/// A finished sheet: pixels plus the layout that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetBuffer {
    pub layout: SheetLayout,
    pub pixels: PixelBuffer,
}

/// Incrementally blits frames into a sheet, strictly in index order.
#[derive(Debug)]
pub struct SheetCompositor {
    layout: SheetLayout,
    sheet: PixelBuffer,
    placed: u32,
}

impl SheetCompositor {
    /// Allocates a fully transparent sheet for the layout.
    pub fn new(layout: SheetLayout) -> SheetResult<Self> {
        let (width, height) = (layout.sheet_width(), layout.sheet_height());
        let sheet = PixelBuffer::try_transparent(width, height)
            .map_err(|_| SheetError::Allocation { width, height })?;
        Ok(Self {
            layout,
            sheet,
            placed: 0,
        })
    }

    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    /// Number of frames placed so far.
    pub fn placed(&self) -> u32 {
        self.placed
    }

    pub fn is_complete(&self) -> bool {
        self.placed == self.layout.frame_count
    }

    /// Places the next frame and returns its top-left-origin rectangle.
    pub fn push(&mut self, frame: &PixelBuffer) -> SheetResult<FrameRect> {
        let index = self.placed;
        let Some(rect) = self.layout.frame_rect(index, Origin::TopLeft) else {
            return Err(SheetError::FrameCount {
                expected: self.layout.frame_count,
                actual: index + 1,
            });
        };

        if frame.width != rect.width || frame.height != rect.height {
            return Err(SheetError::FrameSize {
                frame: index,
                expected_width: rect.width,
                expected_height: rect.height,
                actual_width: frame.width,
                actual_height: frame.height,
            });
        }

        if !self.sheet.blit(frame, rect.x, rect.y) {
            return Err(SheetError::Placement {
                frame: index,
                x: rect.x,
                y: rect.y,
                sheet_width: self.sheet.width,
                sheet_height: self.sheet.height,
            });
        }
        self.placed += 1;
        Ok(rect)
    }

    /// Returns the sheet once every frame has been placed.
    pub fn finish(self) -> SheetResult<SheetBuffer> {
        if !self.is_complete() {
            return Err(SheetError::FrameCount {
                expected: self.layout.frame_count,
                actual: self.placed,
            });
        }
        Ok(SheetBuffer {
            layout: self.layout,
            pixels: self.sheet,
        })
    }
}

/// Packs a complete, ordered frame list into a sheet.
pub fn pack_sheet(frames: &[PixelBuffer], layout: SheetLayout) -> SheetResult<SheetBuffer> {
    if frames.len() != layout.frame_count as usize {
        return Err(SheetError::FrameCount {
            expected: layout.frame_count,
            actual: u32::try_from(frames.len()).unwrap_or(u32::MAX),
        });
    }

    let mut compositor = SheetCompositor::new(layout)?;
    for frame in frames {
        compositor.push(frame)?;
    }
    compositor.finish()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::color::Color;

    fn solid(width: u32, height: u32, value: f64) -> PixelBuffer {
        PixelBuffer::try_new(width, height, Color::gray(value)).unwrap()
    }

    #[test]
    fn test_frame_outside_sheet_is_rejected() {
        let mut compositor = SheetCompositor {
            layout: SheetLayout::new(4, 32, 32),
            sheet: PixelBuffer::try_transparent(32, 32).unwrap(),
            placed: 1,
        };

        let err = compositor.push(&solid(32, 32, 1.0)).unwrap_err();
        assert!(matches!(err, SheetError::Placement { frame: 1, x: 32, y: 0, .. }));
        assert_eq!(compositor.placed(), 1);
        assert!(compositor.sheet.is_fully_transparent());
    }

    #[test]
    fn test_ceil_sqrt() {
        let expected = [(1, 1), (2, 2), (4, 2), (5, 3), (9, 3), (10, 4), (12, 4), (16, 4), (17, 5), (64, 8)];
        for (n, c) in expected {
            assert_eq!(ceil_sqrt(n), c, "ceil_sqrt({})", n);
        }
    }

    #[test]
    fn test_twelve_frames_is_four_by_three() {
        let layout = SheetLayout::new(12, 100, 100);
        assert_eq!((layout.columns, layout.rows), (4, 3));
        assert_eq!((layout.sheet_width(), layout.sheet_height()), (400, 300));
    }

    #[test]
    fn test_grid_dimensions() {
        for (n, columns, rows) in [(1, 1, 1), (2, 2, 1), (3, 2, 2), (5, 3, 2), (7, 3, 3), (10, 4, 3), (64, 8, 8)] {
            let layout = SheetLayout::new(n, 32, 32);
            assert_eq!((layout.columns, layout.rows), (columns, rows), "n = {}", n);
        }
    }

    #[test]
    fn test_rects_in_bounds_and_disjoint() {
        for n in 1..=64 {
            let layout = SheetLayout::new(n, 48, 32);
            for origin in [Origin::TopLeft, Origin::BottomLeft] {
                let rects = layout.frame_rects(origin);
                assert_eq!(rects.len(), n as usize);
                for (i, a) in rects.iter().enumerate() {
                    assert!(a.fits_within(layout.sheet_width(), layout.sheet_height()));
                    for b in &rects[i + 1..] {
                        assert!(!a.overlaps(b), "n = {}: {:?} overlaps {:?}", n, a, b);
                    }
                }
            }
        }
    }

    #[test]
    fn test_origin_round_trip() {
        for n in 1..=64 {
            let layout = SheetLayout::new(n, 40, 56);
            for i in 0..n {
                let top = layout.frame_rect(i, Origin::TopLeft).unwrap();
                let bottom = layout.frame_rect(i, Origin::BottomLeft).unwrap();
                assert_eq!(bottom.flip_vertical(layout.sheet_height()), top);
                assert_eq!(bottom.y, layout.sheet_height() - top.y - top.height);
            }
        }
    }

    #[test]
    fn test_first_frame_is_top_left() {
        let layout = SheetLayout::new(4, 64, 64);
        assert_eq!(layout.frame_rect(0, Origin::TopLeft), Some(FrameRect::new(0, 0, 64, 64)));
        assert_eq!(layout.frame_rect(0, Origin::BottomLeft), Some(FrameRect::new(0, 64, 64, 64)));
        assert_eq!(layout.frame_rect(3, Origin::BottomLeft), Some(FrameRect::new(64, 0, 64, 64)));
        assert_eq!(layout.frame_rect(4, Origin::TopLeft), None);
    }

    #[test]
    fn test_pack_places_frames() {
        let layout = SheetLayout::new(3, 32, 32);
        let frames = [solid(32, 32, 0.1), solid(32, 32, 0.5), solid(32, 32, 0.9)];
        let sheet = pack_sheet(&frames, layout).unwrap();

        assert_eq!((sheet.pixels.width, sheet.pixels.height), (64, 64));
        assert_eq!(sheet.pixels.get(0, 0), Color::gray(0.1));
        assert_eq!(sheet.pixels.get(40, 10), Color::gray(0.5));
        assert_eq!(sheet.pixels.get(10, 40), Color::gray(0.9));
        // The unused cell stays transparent.
        assert_eq!(sheet.pixels.get(40, 40), Color::transparent());
    }

    #[test]
    fn test_wrong_frame_size_is_rejected() {
        let mut compositor = SheetCompositor::new(SheetLayout::new(2, 32, 32)).unwrap();
        compositor.push(&solid(32, 32, 0.5)).unwrap();
        let err = compositor.push(&solid(32, 40, 0.5)).unwrap_err();
        assert!(matches!(
            err,
            SheetError::FrameSize {
                frame: 1,
                actual_height: 40,
                ..
            }
        ));
        assert_eq!(compositor.placed(), 1);
    }

    #[test]
    fn test_frame_count_is_enforced() {
        let layout = SheetLayout::new(2, 32, 32);
        let err = pack_sheet(&[solid(32, 32, 0.5)], layout).unwrap_err();
        assert!(matches!(err, SheetError::FrameCount { expected: 2, actual: 1 }));

        let mut compositor = SheetCompositor::new(layout).unwrap();
        compositor.push(&solid(32, 32, 0.5)).unwrap();
        assert!(!compositor.is_complete());
        compositor.push(&solid(32, 32, 0.5)).unwrap();
        assert!(compositor.push(&solid(32, 32, 0.5)).is_err());
        assert!(compositor.finish().is_ok());
    }

    #[test]
    fn test_unfinished_sheet_is_rejected() {
        let mut compositor = SheetCompositor::new(SheetLayout::new(4, 32, 32)).unwrap();
        compositor.push(&solid(32, 32, 0.5)).unwrap();
        let err = compositor.finish().unwrap_err();
        assert!(matches!(err, SheetError::FrameCount { expected: 4, actual: 1 }));
    }
}
