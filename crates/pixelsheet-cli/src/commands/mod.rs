//! Command implementations.

pub mod init;
pub mod layout;
pub mod render;
pub mod validate;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pixelsheet_spec::SheetConfig;

/// Loads and validates a configuration file, or returns the defaults when
/// no path is given.
pub fn load_config(path: Option<&str>) -> Result<SheetConfig> {
    let Some(path) = path else {
        return Ok(SheetConfig::default());
    };
    let json = fs::read_to_string(Path::new(path))
        .with_context(|| format!("Failed to read config file: {}", path))?;
    SheetConfig::from_json(&json).with_context(|| format!("Invalid config file: {}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_config() {
        assert_eq!(load_config(None).unwrap(), SheetConfig::default());
    }

    #[test]
    fn test_load_config_rejects_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{ "frame_count": 100 }"#).unwrap();

        let err = load_config(path.to_str()).unwrap_err();
        assert!(format!("{:#}", err).contains("frame count"));
    }
}
