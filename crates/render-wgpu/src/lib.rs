//! wgpu render backend for the grid viewer.
//!
//! Draws the ground grid from the current `GridConfig` and one unlit cube
//! instance per visible scene node.
//!
//! # Invariants
//! - Renderer never mutates the scene or the grid settings.
//! - Grid geometry is rebuilt only when the settings revision changes.

mod error;
mod gpu;
mod mesh;
mod shaders;

pub use error::{RenderError, acquire_frame};
pub use gpu::WgpuRenderer;
