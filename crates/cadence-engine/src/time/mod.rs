//! Time subsystem.
//!
//! Millisecond time sources consumed by the frame loop.
//! - `MonotonicClock` for real hosts
//! - `ManualClock` for deterministic stepping in tests and offline tools

mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};
