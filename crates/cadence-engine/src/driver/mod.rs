//! Timing drivers.
//!
//! A driver turns primitive signals into ticks. Drivers never run callbacks
//! themselves: `on_signal` answers with a `Tick` and the controller runs the
//! shared dispatch routine. This keeps both strategies testable with nothing
//! but a `TimerQueue`.

mod fixed;
mod refresh;

pub use fixed::FixedIntervalDriver;
pub use refresh::RefreshSyncDriver;

use crate::core::{LoopError, LoopMode};
use crate::schedule::{Scheduler, TimerHandle};

/// A tick requested by a driver.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tick {
    /// Timestamp passed to the dispatch engine.
    pub now_ms: f64,
    /// Two or more nominal intervals elapsed since the previous tick.
    pub dropped_frame: bool,
}

/// Borrowed loop state a driver may touch.
pub struct DriverCx<'a> {
    pub scheduler: &'a mut dyn Scheduler,
    /// The loop's frame counter; `-1` before the first tick.
    pub frame: &'a mut i64,
}

/// Tick-producing strategy.
pub trait TimingDriver {
    /// Arms the underlying primitive.
    ///
    /// Returns a tick that must be dispatched right away, before any signal.
    fn start(&mut self, cx: DriverCx<'_>, now_ms: f64) -> Option<Tick>;

    /// Called once after the start tick (if any) has been dispatched.
    fn anchor(&mut self, now_ms: f64) {
        let _ = now_ms;
    }

    /// Handles one primitive signal. Signals with a handle this driver does
    /// not own (for example ones queued before `stop`) are ignored.
    fn on_signal(&mut self, handle: TimerHandle, cx: DriverCx<'_>, now_ms: f64) -> Option<Tick>;

    /// Disarms the primitive. After this returns no signal produces a tick.
    fn stop(&mut self, scheduler: &mut dyn Scheduler);
}

/// Instantiates the driver for `mode`.
pub fn for_mode(
    mode: LoopMode,
    tick_interval: Option<f64>,
) -> Result<Box<dyn TimingDriver>, LoopError> {
    match mode {
        LoopMode::FixedInterval => {
            let interval = tick_interval.ok_or(LoopError::UncappedFixedInterval)?;
            Ok(Box::new(FixedIntervalDriver::new(interval)))
        }
        LoopMode::RefreshSync => Ok(Box::new(RefreshSyncDriver::new(tick_interval))),
    }
}
