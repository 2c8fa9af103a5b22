//! Rendering adapter: camera, grid helper and a renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers never mutate the scene.
//! - Grid edits arrive as `GridCommand`s and take effect when the frame
//!   applies them, never mid-draw.

mod camera;
mod grid;
mod renderer;

pub use camera::ViewCamera;
pub use grid::{GridCommand, GridConfig, GridError, GridLine, GridLines, GridSettings, GridTier};
pub use renderer::{DebugTextRenderer, Renderer};
