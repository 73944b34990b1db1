//! Integer pixel rectangles locating frames within a sheet.

use serde::{Deserialize, Serialize};

/// Which corner of the sheet a rectangle's `y` is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Row 0 is the top of the sheet (compositing convention).
    #[default]
    TopLeft,
    /// Row 0 is the bottom of the sheet (sprite-importer convention).
    BottomLeft,
}

impl Origin {
    /// Returns the origin as a string identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::TopLeft => "top_left",
            Origin::BottomLeft => "bottom_left",
        }
    }
}

/// A frame's pixel rectangle within a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRect {
    /// Left edge in pixels.
    pub x: u32,
    /// Edge nearest the origin row, in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameRect {
    /// Creates a rectangle.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Converts between top-left and bottom-left origin for a sheet of the
    /// given height. Applying it twice yields the original rectangle.
    pub fn flip_vertical(&self, sheet_height: u32) -> Self {
        Self {
            y: sheet_height - self.y - self.height,
            ..*self
        }
    }

    /// One past the right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// One past the far edge from the origin row.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Returns true if the rectangle lies within a `width` x `height` area.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }

    /// Returns true if the two rectangles share any pixel.
    pub fn overlaps(&self, other: &FrameRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}
