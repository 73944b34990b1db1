//! Sidecar metadata describing where each frame lives in an exported sheet.

use serde::{Deserialize, Serialize};

use crate::rect::{FrameRect, Origin};

/// Prefix used for exported frame names.
pub const FRAME_NAME_PREFIX: &str = "Sprite_";

/// Returns the exported name of a frame (`Sprite_<index>`, zero based).
pub fn frame_name(index: u32) -> String {
    format!("{FRAME_NAME_PREFIX}{index}")
}

/// A named frame rectangle, as handed to a sprite importer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedFrameRect {
    /// Frame name, e.g. "Sprite_0".
    pub name: String,
    /// Rectangle in pixels, bottom-left origin.
    #[serde(flatten)]
    pub rect: FrameRect,
}

/// Texture filtering the importer should use for the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Nearest-neighbour sampling; keeps pixel edges crisp.
    #[default]
    Point,
    /// Bilinear sampling.
    Bilinear,
}

/// How the importer should slice the texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpriteMode {
    /// One sprite per frame rectangle.
    #[default]
    Multiple,
    /// The whole texture is one sprite.
    Single,
}

/// Import settings that accompany the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportHints {
    /// Sampling filter.
    pub filter: FilterMode,
    /// Slicing mode.
    pub sprite_mode: SpriteMode,
    /// Keep full 32-bit color (no lossy texture compression).
    pub truecolor: bool,
}

impl Default for ImportHints {
    fn default() -> Self {
        Self {
            filter: FilterMode::Point,
            sprite_mode: SpriteMode::Multiple,
            truecolor: true,
        }
    }
}

/// Metadata written next to an exported sheet image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetMetadata {
    /// Sheet width in pixels.
    pub sheet_width: u32,
    /// Sheet height in pixels.
    pub sheet_height: u32,
    /// Width of every frame in pixels.
    pub frame_width: u32,
    /// Height of every frame in pixels.
    pub frame_height: u32,
    /// Number of frames.
    pub frame_count: u32,
    /// Frames per row.
    pub columns: u32,
    /// Frames per column.
    pub rows: u32,
    /// Origin convention of the frame rectangles.
    pub origin: Origin,
    /// Importer settings.
    pub import: ImportHints,
    /// Frame rectangles, in frame order.
    pub frames: Vec<NamedFrameRect>,
}

impl SheetMetadata {
    /// Parses metadata from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes metadata to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Looks up a frame by name.
    pub fn frame(&self, name: &str) -> Option<&NamedFrameRect> {
        self.frames.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_metadata() -> SheetMetadata {
        SheetMetadata {
            sheet_width: 128,
            sheet_height: 64,
            frame_width: 64,
            frame_height: 64,
            frame_count: 2,
            columns: 2,
            rows: 1,
            origin: Origin::BottomLeft,
            import: ImportHints::default(),
            frames: vec![
                NamedFrameRect {
                    name: frame_name(0),
                    rect: FrameRect::new(0, 0, 64, 64),
                },
                NamedFrameRect {
                    name: frame_name(1),
                    rect: FrameRect::new(64, 0, 64, 64),
                },
            ],
        }
    }

    #[test]
    fn test_frame_name() {
        assert_eq!(frame_name(0), "Sprite_0");
        assert_eq!(frame_name(63), "Sprite_63");
    }

    #[test]
    fn test_named_rect_is_flat_in_json() {
        let frame = NamedFrameRect {
            name: "Sprite_3".to_string(),
            rect: FrameRect::new(1, 2, 3, 4),
        };
        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"name": "Sprite_3", "x": 1, "y": 2, "width": 3, "height": 4})
        );
    }

    #[test]
    fn test_metadata_json() {
        let metadata = sample_metadata();
        let json = metadata.to_json_pretty().unwrap();
        assert!(json.contains("\"origin\": \"bottom_left\""));
        assert!(json.contains("\"filter\": \"point\""));

        let parsed = SheetMetadata::from_json(&json).unwrap();
        assert_eq!(parsed, metadata);
    }

    #[test]
    fn test_frame_lookup() {
        let metadata = sample_metadata();
        assert_eq!(metadata.frame("Sprite_1").map(|f| f.rect.x), Some(64));
        assert!(metadata.frame("Sprite_2").is_none());
    }
}
