use crate::schedule::{Scheduler, TimerHandle};

use super::{DriverCx, Tick, TimingDriver};

/// Ticks on display refresh signals, throttled to the target rate.
///
/// With a tick interval, the frame number is derived from time since the
/// loop was anchored: `floor((now - anchor) / interval)`. A signal only ticks
/// when that number has moved past the current frame, so a 60 Hz refresh
/// drives a 30 Hz loop on roughly every other signal. Without an interval
/// (uncapped) every signal ticks.
#[derive(Debug)]
pub struct RefreshSyncDriver {
    interval_ms: Option<f64>,
    anchor_ms: f64,
    pending: Option<TimerHandle>,
}

impl RefreshSyncDriver {
    pub fn new(interval_ms: Option<f64>) -> Self {
        Self {
            interval_ms,
            anchor_ms: 0.0,
            pending: None,
        }
    }
}

impl TimingDriver for RefreshSyncDriver {
    fn start(&mut self, cx: DriverCx<'_>, now_ms: f64) -> Option<Tick> {
        self.pending = Some(cx.scheduler.request_refresh());
        self.anchor_ms = now_ms;

        // Frame 0 ticks immediately; it does not wait for a refresh.
        *cx.frame = 0;
        Some(Tick {
            now_ms,
            dropped_frame: false,
        })
    }

    fn anchor(&mut self, now_ms: f64) {
        self.anchor_ms = now_ms;
    }

    fn on_signal(&mut self, handle: TimerHandle, cx: DriverCx<'_>, now_ms: f64) -> Option<Tick> {
        if self.pending != Some(handle) {
            return None;
        }

        // Re-arm before deciding, so a failing tick never ends the subscription.
        self.pending = Some(cx.scheduler.request_refresh());

        let Some(interval) = self.interval_ms else {
            *cx.frame += 1;
            return Some(Tick {
                now_ms,
                dropped_frame: false,
            });
        };

        let elapsed = ((now_ms - self.anchor_ms) / interval).floor() as i64;
        if elapsed <= *cx.frame {
            return None;
        }

        let dropped_frame = elapsed - *cx.frame >= 2;
        *cx.frame = elapsed;
        Some(Tick {
            now_ms,
            dropped_frame,
        })
    }

    fn stop(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(pending) = self.pending.take() {
            scheduler.cancel(pending);
        }
    }
}
