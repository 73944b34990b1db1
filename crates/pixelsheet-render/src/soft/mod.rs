//! CPU reference backend.
//!
//! [`MeshModel`] and [`SoftCamera`] implement the scene traits without any
//! GPU, which makes the whole pipeline usable headless and testable.

mod camera;
mod mesh;
mod outline;

pub use camera::SoftCamera;
pub use mesh::{euler_degrees_to_quat, Keyframe, MeshClip, MeshModel, Triangle};
pub use outline::{apply_outline, DepthBuffer, BACKGROUND_DEPTH};
