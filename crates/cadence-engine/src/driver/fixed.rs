use crate::schedule::{Scheduler, TimerHandle};

use super::{DriverCx, Tick, TimingDriver};

/// Ticks on a recurring fixed-delay interval.
///
/// Each signal advances the frame by exactly one. Drift is not corrected; it
/// surfaces as jitter.
#[derive(Debug)]
pub struct FixedIntervalDriver {
    interval_ms: f64,
    timer: Option<TimerHandle>,
}

impl FixedIntervalDriver {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            timer: None,
        }
    }
}

impl TimingDriver for FixedIntervalDriver {
    fn start(&mut self, cx: DriverCx<'_>, now_ms: f64) -> Option<Tick> {
        self.timer = Some(cx.scheduler.set_interval(self.interval_ms, now_ms));
        None
    }

    fn on_signal(&mut self, handle: TimerHandle, cx: DriverCx<'_>, now_ms: f64) -> Option<Tick> {
        if self.timer != Some(handle) {
            return None;
        }

        *cx.frame += 1;
        Some(Tick {
            now_ms,
            dropped_frame: false,
        })
    }

    fn stop(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(timer) = self.timer.take() {
            scheduler.cancel(timer);
        }
    }
}
