//! Validate command implementation
//!
//! Checks a configuration file and reports every out-of-range field.

use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use pixelsheet_spec::{CodedError, ConfigError, SheetConfig};

/// Parses a configuration and collects every validation error.
pub fn check(json: &str) -> Result<Vec<ConfigError>, ConfigError> {
    let config: SheetConfig = serde_json::from_str(json)?;
    Ok(config.validation_errors())
}

/// Run the validate command
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid
pub fn run(config_path: &str, json_output: bool) -> Result<ExitCode> {
    let json = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path))?;

    let errors = match check(&json) {
        Ok(errors) => errors,
        Err(parse) => vec![parse],
    };

    if json_output {
        let report = serde_json::json!({
            "valid": errors.is_empty(),
            "errors": errors
                .iter()
                .map(|e| serde_json::json!({ "code": e.code(), "message": e.message() }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if errors.is_empty() {
        println!("{} {}", "Valid:".green().bold(), config_path);
    } else {
        println!("{} {}", "Invalid:".red().bold(), config_path);
        for err in &errors {
            println!("  {} {}", err.code().yellow(), err);
        }
    }

    Ok(if errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_check_collects_all_errors() {
        let errors = check(r#"{ "frame_count": 0, "loop_count": 20, "frame_width": 1000 }"#).unwrap();
        assert_eq!(
            errors,
            vec![
                ConfigError::FrameCount(0),
                ConfigError::FrameWidth(1000),
                ConfigError::LoopCount(20),
            ]
        );
    }

    #[test]
    fn test_check_rejects_unknown_fields() {
        assert!(check(r#"{ "frame_cuont": 4 }"#).is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        let json = SheetConfig::default().to_json_pretty().unwrap();
        assert!(check(&json).unwrap().is_empty());
    }
}
