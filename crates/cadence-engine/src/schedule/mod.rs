//! Scheduling primitives and headless hosting.
//!
//! A `Scheduler` arms two kinds of signals:
//! - recurring fixed-delay intervals, due by clock time
//! - one-shot refresh requests, released by a host-driven refresh pulse
//!
//! `RefreshPacer` gives hosts a display cadence for refresh pulses.
//!
//! Signals are never delivered by the scheduler itself. A host polls due
//! signals (usually through `FrameLoop::pump`) and hands them to the loop.

mod pacer;
mod queue;
mod sleep;

pub use pacer::{RefreshPacer, DEFAULT_REFRESH_RATE};
pub use queue::{Scheduler, TimerHandle, TimerQueue};
pub use sleep::{SleepHost, SleepHostConfig};
