//! Animation driver: runs one update + render step per display frame until stopped.
//!
//! # Invariants
//! - Each step requests the next frame before doing any work.
//! - `delta` handed to targets is never negative; the first frame's is zero.
//! - After `stop()` or a render failure, no further frames are requested.
//! - Observers see `frame_begin` and `frame_end` exactly once per render, in order.

mod clock;
mod driver;
mod scheduler;

pub use clock::{FrameClock, ManualClock, SystemClock};
pub use driver::{
    AnimationDriver, DriverConfig, DriverError, FrameObserver, FrameOutcome, FrameTarget,
};
pub use scheduler::{FrameScheduler, ManualScheduler};
