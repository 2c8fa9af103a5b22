//! Developer tooling: frame statistics and a read-only scene inspector.
//!
//! # Invariants
//! - Tools only read scene and interaction state.

mod inspector;
mod stats;

pub use inspector::{InteractableInfo, SceneInspector, SceneSummary};
pub use stats::{FrameStats, FrameTimer, MemorySampler, ProcessMemory, StatsPanel};
