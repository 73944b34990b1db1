//! pixelsheet CLI library.
//!
//! Command implementations behind the `pixelsheet` binary: rendering a
//! built-in model to a sprite sheet, inspecting sheet layouts, and creating
//! or checking configuration files.

pub mod commands;
