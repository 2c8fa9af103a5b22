//! Desktop input mapped to viewer actions.
//!
//! # Invariants
//! - Applications consume `Action`s, never raw window events.
//! - Orbit is only produced while the orbit button is held.

pub mod action;
pub mod mapper;

pub use action::Action;
pub use mapper::{Button, InputMapper, Key};
