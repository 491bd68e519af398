use std::thread;
use std::time::Duration;

use crate::core::{FrameLoop, LoopError};
use crate::time::Clock;

use super::pacer::{RefreshPacer, DEFAULT_REFRESH_RATE};
use super::queue::Scheduler;

/// Headless host configuration.
#[derive(Debug, Clone)]
pub struct SleepHostConfig {
    /// Simulated display refresh rate, in Hz, used to pulse refresh requests.
    pub refresh_rate: f64,
}

impl Default for SleepHostConfig {
    fn default() -> Self {
        Self {
            refresh_rate: DEFAULT_REFRESH_RATE,
        }
    }
}

/// Blocking host that drives a `FrameLoop` on the current thread.
///
/// Sleeps until the next interval deadline or simulated refresh, whichever
/// comes first. Callback failures are logged and the loop keeps running.
#[derive(Debug)]
pub struct SleepHost {
    pacer: RefreshPacer,
}

impl SleepHost {
    pub fn new(config: SleepHostConfig) -> Self {
        Self {
            pacer: RefreshPacer::new(config.refresh_rate),
        }
    }

    /// Runs until the loop stops, nothing is armed, or `keep_running`
    /// returns `false`. Only configuration errors end the run with `Err`.
    pub fn run<C, S, F>(
        &mut self,
        frame_loop: &mut FrameLoop<C, S>,
        mut keep_running: F,
    ) -> Result<(), LoopError>
    where
        C: Clock,
        S: Scheduler,
        F: FnMut(&FrameLoop<C, S>) -> bool,
    {
        log::info!("sleep host running (refresh every {:.2} ms)", self.pacer.period_ms());

        while frame_loop.is_active() && keep_running(&*frame_loop) {
            if self.pacer.due(frame_loop.now_ms()) {
                frame_loop.scheduler_mut().pulse_refresh();
            }

            match frame_loop.pump() {
                Ok(_) => {}
                Err(LoopError::Callbacks { frame, failures }) => {
                    for failure in &failures {
                        log::error!("frame {frame}: {failure}");
                    }
                }
                Err(e) => return Err(e),
            }

            let scheduler = frame_loop.scheduler();
            let Some(wake) = self
                .pacer
                .wake_at(scheduler.next_deadline(), scheduler.wants_refresh())
            else {
                log::info!("sleep host idle: nothing armed");
                break;
            };

            let wait = wake - frame_loop.now_ms();
            if wait > 0.0 {
                thread::sleep(Duration::from_secs_f64(wait / 1000.0));
            }
        }

        log::info!("sleep host finished");
        Ok(())
    }
}

impl Default for SleepHost {
    fn default() -> Self {
        Self::new(SleepHostConfig::default())
    }
}
