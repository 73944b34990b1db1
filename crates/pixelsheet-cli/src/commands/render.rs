//! Render command implementation
//!
//! Renders a built-in model across the configured poses and writes the
//! sheet image plus its metadata sidecar.

use std::io::Write;
use std::ops::ControlFlow;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use glam::Vec3;
use log::{debug, info};
use pixelsheet_render::soft::{Keyframe, MeshClip, MeshModel, SoftCamera};
use pixelsheet_render::{Color, FsSheetSink, Progress, SheetSession};
use pixelsheet_spec::{CodedError, OutlineParams};

use super::load_config;

/// Built-in models the CLI can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelKind {
    Cube,
    Sphere,
}

/// Builds a built-in model. Every model carries one clip, "bob", which lifts
/// it and lets it fall back over one second.
pub fn build_model(kind: ModelKind, color: Color) -> MeshModel {
    let model = match kind {
        ModelKind::Cube => MeshModel::cube(Vec3::ONE, color),
        ModelKind::Sphere => MeshModel::uv_sphere(0.5, 24, 12, color),
    };
    model.with_clip(MeshClip::new(
        "bob",
        1.0,
        vec![
            Keyframe::new(0.0, Vec3::ZERO, Vec3::ZERO),
            Keyframe::new(0.5, Vec3::new(0.0, 0.25, 0.0), Vec3::ZERO),
            Keyframe::new(1.0, Vec3::ZERO, Vec3::ZERO),
        ],
    ))
}

/// Parses `r,g,b` or `r,g,b,a` with components in [0, 1].
pub fn parse_color(s: &str) -> Result<[f64; 4]> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("invalid color: {}", s))?;

    match parts.as_slice() {
        [r, g, b] => Ok([*r, *g, *b, 1.0]),
        [r, g, b, a] => Ok([*r, *g, *b, *a]),
        _ => bail!("color must have 3 or 4 components, got {}: {}", parts.len(), s),
    }
}

/// Run the render command
///
/// # Arguments
/// * `config_path` - Optional sheet configuration JSON
/// * `model` - Built-in model to render
/// * `model_color` - Optional base color of the model
/// * `out` - Destination PNG path; metadata goes next to it
/// * `outline_color` - Optional outline color
/// * `threshold` - Optional outline depth threshold
/// * `json_output` - Print a machine-readable summary
pub fn run(
    config_path: Option<&str>,
    model: ModelKind,
    model_color: Option<&str>,
    out: &str,
    outline_color: Option<&str>,
    threshold: Option<f64>,
    json_output: bool,
) -> Result<ExitCode> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let mut outline = OutlineParams::default();
    if let Some(color) = outline_color {
        outline.color = parse_color(color)?;
    }
    if let Some(threshold) = threshold {
        outline.depth_threshold = threshold;
    }
    let base = match model_color {
        Some(c) => Color::from_array(parse_color(c)?),
        None => Color::gray(0.8),
    };

    debug!("render config: {:?}", config);
    let mut session = SheetSession::with_config(SoftCamera::default(), config)?;
    session.set_outline(outline)?;
    session.bind_model(build_model(model, base));

    if !json_output {
        println!("{} {:?} -> {}", "Rendering:".cyan().bold(), model, out);
    }

    let mut progress = |p: Progress| {
        if !json_output {
            eprint!("\r  frame {}/{}", p.completed, p.total);
            let _ = std::io::stderr().flush();
        }
        ControlFlow::Continue(())
    };
    let result = session.export_sheet(&mut FsSheetSink::new(), Path::new(out), &mut progress);
    if !json_output {
        eprintln!();
    }

    let written = match result {
        Ok(written) => written,
        Err(err) => {
            if json_output {
                let report = serde_json::json!({
                    "success": false,
                    "code": err.code(),
                    "message": err.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{} [{}] {}", "FAILED".red().bold(), err.code(), err);
            }
            return Ok(ExitCode::from(1));
        }
    };

    let elapsed = start.elapsed();
    info!("wrote {} ({}) in {:?}", written.image_path.display(), written.hash, elapsed);
    if json_output {
        let report = serde_json::json!({
            "success": true,
            "image": written.image_path,
            "metadata": written.metadata_path,
            "hash": written.hash,
            "frames": written.metadata.frame_count,
            "sheet": [written.metadata.sheet_width, written.metadata.sheet_height],
            "duration_ms": elapsed.as_millis() as u64,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} {} frames, {}x{} sheet ({}x{} grid)",
            "Wrote:".green().bold(),
            written.metadata.frame_count,
            written.metadata.sheet_width,
            written.metadata.sheet_height,
            written.metadata.columns,
            written.metadata.rows
        );
        println!("  {} {}", "image:".dimmed(), written.image_path.display());
        println!("  {} {}", "metadata:".dimmed(), written.metadata_path.display());
        println!("  {} {}", "hash:".dimmed(), written.hash);
        println!("  {} {:?}", "time:".dimmed(), elapsed);
    }

    Ok(ExitCode::SUCCESS)
}
