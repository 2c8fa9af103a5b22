//! Scene container: the set of renderable nodes the viewer draws and picks.
//!
//! # Invariants
//! - Nodes are keyed by `EntityId` and iterate in id order.
//! - The scene carries no interaction state; side tables key off node ids.

pub mod scene;

pub use scene::{Node, Scene, Shape};
