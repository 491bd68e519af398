//! Cadence engine crate.
//!
//! A single-threaded frame loop that calls registered callbacks in three
//! ordered phases per tick, paced either by a fixed-interval timer or by a
//! display refresh signal throttled to a target rate.

pub mod core;
pub mod driver;
pub mod logging;
pub mod schedule;
pub mod time;
pub mod window;

pub use crate::core::{
    shared, CallbackFailure, FrameLoop, LoopConfig, LoopError, LoopMode, Phase, Registrant,
    SharedRegistrant, TickCtx,
};
pub use crate::schedule::{
    RefreshPacer, Scheduler, SleepHost, SleepHostConfig, TimerHandle, TimerQueue,
};
pub use crate::time::{Clock, ManualClock, MonotonicClock};
