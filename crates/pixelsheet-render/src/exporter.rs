//! Encodes a finished sheet to PNG and builds its frame metadata.

use log::debug;
use pixelsheet_spec::{frame_name, ImportHints, NamedFrameRect, Origin, SheetMetadata};

use crate::buffer::PixelBuffer;
use crate::error::ExportError;
use crate::packer::{SheetBuffer, SheetLayout};
use crate::png::{write_rgba_to_vec_with_hash, PngConfig, PngError};

/// An encoded sheet ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedSheet {
    /// Lossless RGBA8 PNG bytes.
    pub png: Vec<u8>,
    /// BLAKE3 hash of `png`, hex encoded.
    pub hash: String,
    /// Frame rectangles (bottom-left origin) and import hints.
    pub metadata: SheetMetadata,
}

impl ExportedSheet {
    /// Named frame rectangles in frame order.
    pub fn frames(&self) -> &[NamedFrameRect] {
        &self.metadata.frames
    }
}

/// `Sprite_<i>` rectangles for every frame, bottom-left origin.
pub fn named_frames(layout: &SheetLayout) -> Vec<NamedFrameRect> {
    layout
        .frame_rects(Origin::BottomLeft)
        .into_iter()
        .zip(0u32..)
        .map(|(rect, i)| NamedFrameRect {
            name: frame_name(i),
            rect,
        })
        .collect()
}

/// Sidecar metadata for a sheet with the given layout.
pub fn sheet_metadata(layout: &SheetLayout) -> SheetMetadata {
    SheetMetadata {
        sheet_width: layout.sheet_width(),
        sheet_height: layout.sheet_height(),
        frame_width: layout.frame_width,
        frame_height: layout.frame_height,
        frame_count: layout.frame_count,
        columns: layout.columns,
        rows: layout.rows,
        origin: Origin::BottomLeft,
        import: ImportHints::default(),
        frames: named_frames(layout),
    }
}

/// Encodes sheet pixels laid out by `layout`.
pub fn export(pixels: &PixelBuffer, layout: &SheetLayout) -> Result<ExportedSheet, ExportError> {
    export_with_config(pixels, layout, &PngConfig::default())
}

/// Encodes a composited sheet.
pub fn export_sheet_buffer(sheet: &SheetBuffer) -> Result<ExportedSheet, ExportError> {
    export(&sheet.pixels, &sheet.layout)
}

/// Like [`export`] with explicit PNG settings.
pub fn export_with_config(
    pixels: &PixelBuffer,
    layout: &SheetLayout,
    config: &PngConfig,
) -> Result<ExportedSheet, ExportError> {
    if (pixels.width, pixels.height) != (layout.sheet_width(), layout.sheet_height()) {
        return Err(PngError::InvalidDimensions(format!(
            "sheet is {}x{}, layout expects {}x{}",
            pixels.width,
            pixels.height,
            layout.sheet_width(),
            layout.sheet_height()
        ))
        .into());
    }

    let (png, hash) = write_rgba_to_vec_with_hash(pixels, config)?;
    debug!("encoded {}x{} sheet: {} bytes, hash {}", pixels.width, pixels.height, png.len(), hash);

    Ok(ExportedSheet {
        png,
        hash,
        metadata: sheet_metadata(layout),
    })
}
