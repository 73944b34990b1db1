//! Init command implementation
//!
//! Writes a configuration file holding the default settings.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use pixelsheet_spec::SheetConfig;

/// Run the init command
pub fn run(out: &str, force: bool) -> Result<ExitCode> {
    let path = Path::new(out);
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", out);
    }

    let json = SheetConfig::default().to_json_pretty()?;
    fs::write(path, json + "\n").with_context(|| format!("Failed to write config file: {}", out))?;

    println!("{} {}", "Created:".green().bold(), out);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.json");
        let out = path.to_str().unwrap();

        run(out, false).unwrap();
        let config = SheetConfig::from_json(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(config, SheetConfig::default());

        assert!(run(out, false).is_err());
        assert!(run(out, true).is_ok());
    }
}
