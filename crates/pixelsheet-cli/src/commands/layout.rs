//! Layout command implementation
//!
//! Prints the grid and frame rectangles a sheet would use, without
//! rendering anything.

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use pixelsheet_render::{sheet_metadata, SheetLayout};
use pixelsheet_spec::{check_frame_count, check_frame_size};

/// Run the layout command
pub fn run(frames: u32, width: u32, height: u32, json_output: bool) -> Result<ExitCode> {
    check_frame_count(frames)?;
    check_frame_size(width, height)?;

    let metadata = sheet_metadata(&SheetLayout::new(frames, width, height));
    if json_output {
        println!("{}", metadata.to_json_pretty()?);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} {}x{} grid, {}x{} sheet",
        "Layout:".cyan().bold(),
        metadata.columns,
        metadata.rows,
        metadata.sheet_width,
        metadata.sheet_height
    );
    println!("  {}", format!("origin: {}", metadata.origin.as_str()).dimmed());
    for frame in &metadata.frames {
        println!(
            "  {:<10} x={:<5} y={:<5} {}x{}",
            frame.name, frame.rect.x, frame.rect.y, frame.rect.width, frame.rect.height
        );
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_rejects_bad_sizes() {
        assert!(run(0, 64, 64, true).is_err());
        assert!(run(4, 16, 64, true).is_err());
        assert!(run(4, 64, 64, true).is_ok());
    }
}
