//! pixelsheet CLI - Render posed 3D models into sprite sheets
//!
//! This binary renders a model across interpolated poses, packs the frames
//! into a sheet, and writes the image together with its frame metadata.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pixelsheet_cli::commands;
use pixelsheet_cli::commands::render::ModelKind;

/// pixelsheet - Pixel-art sprite sheets from 3D models
#[derive(Parser)]
#[command(name = "pixelsheet")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a built-in model to a sprite sheet and metadata sidecar
    Render {
        /// Sheet configuration JSON (default settings if omitted)
        #[arg(short, long)]
        config: Option<String>,

        /// Built-in model to render
        #[arg(short, long, value_enum, default_value = "cube")]
        model: ModelKind,

        /// Model base color as r,g,b[,a]
        #[arg(long)]
        model_color: Option<String>,

        /// Output PNG path; metadata is written next to it as <stem>.json
        #[arg(short, long)]
        out: String,

        /// Outline color as r,g,b[,a]
        #[arg(long)]
        outline_color: Option<String>,

        /// Outline depth threshold (0 to 0.05)
        #[arg(long)]
        threshold: Option<f64>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print the grid and frame rectangles for a sheet
    Layout {
        /// Number of frames
        #[arg(short, long, default_value_t = 12)]
        frames: u32,

        /// Frame width in pixels
        #[arg(long, default_value_t = 100)]
        width: u32,

        /// Frame height in pixels
        #[arg(long, default_value_t = 100)]
        height: u32,

        /// Print the metadata JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write a configuration file with default settings
    Init {
        /// Output path
        #[arg(short, long, default_value = "pixelsheet.json")]
        out: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Check a configuration file and report every invalid field
    Validate {
        /// Configuration JSON to check
        #[arg(short, long)]
        config: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            config,
            model,
            model_color,
            out,
            outline_color,
            threshold,
            json,
        } => commands::render::run(
            config.as_deref(),
            model,
            model_color.as_deref(),
            &out,
            outline_color.as_deref(),
            threshold,
            json,
        ),
        Commands::Layout {
            frames,
            width,
            height,
            json,
        } => commands::layout::run(frames, width, height, json),
        Commands::Init { out, force } => commands::init::run(&out, force),
        Commands::Validate { config, json } => commands::validate::run(&config, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_render() {
        let cli = Cli::try_parse_from([
            "pixelsheet",
            "render",
            "--model",
            "sphere",
            "--out",
            "walk.png",
            "--threshold",
            "0.01",
        ])
        .unwrap();
        match cli.command {
            Commands::Render {
                model,
                out,
                threshold,
                config,
                json,
                ..
            } => {
                assert_eq!(model, ModelKind::Sphere);
                assert_eq!(out, "walk.png");
                assert_eq!(threshold, Some(0.01));
                assert!(config.is_none());
                assert!(!json);
            }
            _ => panic!("expected render command"),
        }
    }

    #[test]
    fn test_cli_layout_defaults() {
        let cli = Cli::try_parse_from(["pixelsheet", "layout"]).unwrap();
        match cli.command {
            Commands::Layout {
                frames,
                width,
                height,
                json,
            } => {
                assert_eq!((frames, width, height), (12, 100, 100));
                assert!(!json);
            }
            _ => panic!("expected layout command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_model() {
        assert!(Cli::try_parse_from(["pixelsheet", "render", "--model", "teapot", "--out", "x.png"]).is_err());
    }
}
