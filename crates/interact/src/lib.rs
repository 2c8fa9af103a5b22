//! Interaction layer: which nodes the pointer is over, and how they react.
//!
//! # Invariants
//! - Interaction state lives in a side table keyed by node id; scene nodes
//!   carry no hover fields.
//! - A pick updates the hover flag of every registered object, not just
//!   the ones that were hovered before.
//! - `current_offset` only moves by interpolation toward its target.

mod interactable;
mod picker;

pub use interactable::{HoverMotion, Interactables, Interaction};
pub use picker::{PickHit, PointerPicker};
