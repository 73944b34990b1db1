//! Placement of the preview frame inside a host's drawing area.

/// A rectangle in host display units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl DisplayRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Where to draw the preview and at what integer magnification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewPlacement {
    pub rect: DisplayRect,
    pub scale: u32,
}

/// Letterboxes a `frame_width` x `frame_height` preview inside `container`.
///
/// The frame is magnified by the largest whole factor that fits (never less
/// than 1, so pixels stay square and crisp), centred, and clipped to the
/// container when even 1x overflows.
pub fn fit_preview(frame_width: u32, frame_height: u32, container: DisplayRect) -> PreviewPlacement {
    let (w, h) = (frame_width.max(1) as f32, frame_height.max(1) as f32);
    let fit = (container.width / w).min(container.height / h).floor();
    let scale = if fit.is_finite() && fit >= 1.0 { fit as u32 } else { 1 };

    let width = w * scale as f32;
    let height = h * scale as f32;
    let x = container.x + (container.width - width) * 0.5;
    let y = container.y + (container.height - height) * 0.5;

    let left = x.max(container.x);
    let top = y.max(container.y);
    let right = (x + width).min(container.right());
    let bottom = (y + height).min(container.bottom());

    PreviewPlacement {
        rect: DisplayRect::new(left, top, (right - left).max(0.0), (bottom - top).max(0.0)),
        scale,
    }
}
