//! Dispatch engine: tick statistics and the three-phase callback walk.

use anyhow::anyhow;

use crate::driver::Tick;

use super::ctx::{Command, TickCtx};
use super::error::CallbackFailure;
use super::registrant::{invoke, Phase};
use super::registry::Registry;

/// Loop statistics, owned by `FrameLoop`.
#[derive(Debug, Clone)]
pub(crate) struct LoopState {
    pub active: bool,
    /// `-1` when stopped or freshly started.
    pub current_frame: i64,
    pub last_tick_ms: f64,
    pub jitter: f64,
    pub total_jitter: f64,
    pub dropped_frame: bool,
    pub dropped_frames: u64,
}

impl LoopState {
    pub fn stopped() -> Self {
        Self {
            active: false,
            current_frame: -1,
            last_tick_ms: 0.0,
            jitter: 0.0,
            total_jitter: 0.0,
            dropped_frame: false,
            dropped_frames: 0,
        }
    }

    /// Clears per-run statistics and sets the delta baseline to `now_ms`.
    pub fn reset(&mut self, now_ms: f64) {
        self.current_frame = -1;
        self.last_tick_ms = now_ms;
        self.jitter = 0.0;
        self.total_jitter = 0.0;
        self.dropped_frame = false;
        self.dropped_frames = 0;
    }

    /// `None` until the first tick. Frame 0 reports its single sample.
    pub fn average_jitter(&self) -> Option<f64> {
        match self.current_frame {
            f if f < 0 => None,
            0 => Some(self.total_jitter),
            f => Some(self.total_jitter / f as f64),
        }
    }
}

/// What a tick left behind for the controller.
pub(crate) struct TickOutcome {
    pub commands: Vec<Command>,
    pub failures: Vec<CallbackFailure>,
}

/// Runs one tick at `tick.now_ms` over a snapshot of `registry`.
///
/// Phases never interleave: every registrant sees `EarlyUpdate` before any
/// registrant sees `Update`. A failing callback ends its own phase only.
///
/// Precondition: not re-entered while a previous tick is still running.
pub(crate) fn dispatch(
    state: &mut LoopState,
    tick: Tick,
    tick_interval: Option<f64>,
    registry: &Registry,
) -> TickOutcome {
    let delta = tick.now_ms - state.last_tick_ms;
    state.last_tick_ms = tick.now_ms;

    // Uncapped loops have no nominal interval to measure against.
    state.jitter = tick_interval.map_or(0.0, |interval| (delta - interval).abs());
    state.total_jitter += state.jitter;

    state.dropped_frame = tick.dropped_frame;
    if tick.dropped_frame {
        state.dropped_frames += 1;
        log::debug!("frame {} dropped ({} total)", state.current_frame, state.dropped_frames);
    }

    let mut ctx = TickCtx::new(state.current_frame, delta, state.jitter, tick.dropped_frame);
    let snapshot = registry.snapshot();
    let mut failures = Vec::new();

    for phase in Phase::ALL {
        for registrant in &snapshot {
            let result = match registrant.try_borrow_mut() {
                Ok(mut r) => invoke(&mut *r, phase, delta, &mut ctx),
                Err(_) => Err(anyhow!("registrant is already borrowed")),
            };

            if let Err(error) = result {
                log::error!(
                    "frame {}: {phase} callback failed: {error:#}",
                    state.current_frame
                );
                failures.push(CallbackFailure { phase, error });
                break;
            }
        }
    }

    TickOutcome {
        commands: ctx.into_commands(),
        failures,
    }
}
