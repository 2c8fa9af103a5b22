//! Shared types used across the viewer crates.

mod geometry;
mod types;

pub use geometry::{Aabb, Ray, lerp};
pub use types::{EntityId, Transform};
