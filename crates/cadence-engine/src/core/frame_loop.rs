use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::driver::{self, DriverCx, Tick, TimingDriver};
use crate::schedule::{Scheduler, TimerHandle, TimerQueue};
use crate::time::{Clock, MonotonicClock};

use super::config::LoopConfig;
use super::ctx::Command;
use super::dispatch::{dispatch, LoopState};
use super::error::LoopError;
use super::mode::LoopMode;
use super::registrant::SharedRegistrant;
use super::registry::Registry;

/// Frame loop controller.
///
/// Owns the time source, the scheduling primitive, the active timing driver
/// and the registered set. The loop starts as soon as it is constructed.
///
/// Signals reach the loop through a host: either call `pump()` whenever time
/// may have advanced, or route individual handles through `on_signal()`.
///
/// ```rust,ignore
/// let mut frame_loop = FrameLoop::new(Some(60.0), LoopMode::FixedInterval)?;
/// frame_loop.register(shared(|dt: f64| log::trace!("dt = {dt}")));
/// SleepHost::default().run(&mut frame_loop, |_| true)?;
/// ```
pub struct FrameLoop<C: Clock = MonotonicClock, S: Scheduler = TimerQueue> {
    clock: C,
    scheduler: S,
    config: LoopConfig,
    tick_interval: Option<f64>,
    driver: Option<Box<dyn TimingDriver>>,
    state: LoopState,
    registry: Registry,
}

impl FrameLoop {
    /// Creates and starts a loop on the wall clock with a `TimerQueue`.
    pub fn new(target_rate: Option<f64>, mode: LoopMode) -> Result<Self, LoopError> {
        Self::from_config(LoopConfig { target_rate, mode })
    }

    /// Like `new`, with the mode given as its numeric value (`0` or `1`).
    pub fn from_raw(target_rate: Option<f64>, mode: u8) -> Result<Self, LoopError> {
        Self::new(target_rate, LoopMode::try_from(mode)?)
    }

    pub fn from_config(config: LoopConfig) -> Result<Self, LoopError> {
        Self::with_parts(config, MonotonicClock::new(), TimerQueue::new())
    }
}

impl<C: Clock, S: Scheduler> FrameLoop<C, S> {
    /// Creates and starts a loop on injected primitives.
    pub fn with_parts(config: LoopConfig, clock: C, scheduler: S) -> Result<Self, LoopError> {
        let tick_interval = config.tick_interval()?;

        let mut frame_loop = Self {
            clock,
            scheduler,
            config,
            tick_interval,
            driver: None,
            state: LoopState::stopped(),
            registry: Registry::new(),
        };
        frame_loop.start()?;
        Ok(frame_loop)
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Starts the driver for the configured mode. No-op while running.
    ///
    /// In refresh-sync mode frame 0 is dispatched before this returns; its
    /// callback failures are reported here while the loop stays active.
    pub fn start(&mut self) -> Result<(), LoopError> {
        if self.driver.is_some() {
            return Ok(());
        }

        let mut driver = driver::for_mode(self.config.mode, self.tick_interval)?;

        let now = self.clock.now_ms();
        self.state.reset(now);
        self.state.active = true;

        log::debug!(
            "frame loop started: mode={:?} rate={:?} interval={:?}",
            self.config.mode,
            self.config.target_rate,
            self.tick_interval
        );

        let cx = DriverCx {
            scheduler: &mut self.scheduler,
            frame: &mut self.state.current_frame,
        };
        let first = driver.start(cx, now);
        self.driver = Some(driver);

        let Some(tick) = first else {
            return Ok(());
        };

        let result = self.run_tick(tick);
        let now = self.clock.now_ms();
        if let Some(driver) = self.driver.as_mut() {
            driver.anchor(now);
        }
        result
    }

    /// Stops the driver. No tick is dispatched after this returns, even for
    /// signals that were already due. No-op while stopped.
    pub fn stop(&mut self) {
        let Some(mut driver) = self.driver.take() else {
            return;
        };

        driver.stop(&mut self.scheduler);
        self.state.active = false;
        self.state.current_frame = -1;

        log::debug!("frame loop stopped");
    }

    /// Changes the mode used by the next `start()`.
    pub fn set_mode(&mut self, mode: LoopMode) -> Result<(), LoopError> {
        self.reconfigure(LoopConfig { mode, ..self.config })
    }

    /// Changes the target rate used by the next `start()`.
    pub fn set_target_rate(&mut self, target_rate: Option<f64>) -> Result<(), LoopError> {
        self.reconfigure(LoopConfig { target_rate, ..self.config })
    }

    fn reconfigure(&mut self, config: LoopConfig) -> Result<(), LoopError> {
        self.tick_interval = config.tick_interval()?;
        self.config = config;
        Ok(())
    }

    // ── registration ──────────────────────────────────────────────────────

    /// Appends `registrant` unless the same handle is registered already.
    pub fn register(&mut self, registrant: SharedRegistrant) -> bool {
        self.registry.insert(registrant)
    }

    /// Removes `registrant` by identity. Absent handles are ignored.
    pub fn unregister<R: ?Sized>(&mut self, registrant: &Rc<RefCell<R>>) -> bool {
        self.registry.remove(registrant)
    }

    pub fn is_registered<R: ?Sized>(&self, registrant: &Rc<RefCell<R>>) -> bool {
        self.registry.contains(registrant)
    }

    pub fn registered(&self) -> usize {
        self.registry.len()
    }

    // ── signal delivery ───────────────────────────────────────────────────

    /// Delivers every signal that is due now. Returns the number of ticks.
    ///
    /// Stops at the first tick with callback failures; signals still due
    /// are delivered by the next call.
    pub fn pump(&mut self) -> Result<usize, LoopError> {
        let mut ticks = 0;
        while let Some(handle) = self.scheduler.poll_due(self.clock.now_ms()) {
            if self.on_signal(handle)? {
                ticks += 1;
            }
        }
        Ok(ticks)
    }

    /// Delivers one primitive signal. Returns `true` when it produced a tick.
    pub fn on_signal(&mut self, handle: TimerHandle) -> Result<bool, LoopError> {
        let Some(driver) = self.driver.as_mut() else {
            return Ok(false);
        };

        let now = self.clock.now_ms();
        let cx = DriverCx {
            scheduler: &mut self.scheduler,
            frame: &mut self.state.current_frame,
        };

        match driver.on_signal(handle, cx, now) {
            Some(tick) => self.run_tick(tick).map(|()| true),
            None => Ok(false),
        }
    }

    fn run_tick(&mut self, tick: Tick) -> Result<(), LoopError> {
        let frame = self.state.current_frame;
        let outcome = dispatch(&mut self.state, tick, self.tick_interval, &self.registry);

        for command in outcome.commands {
            match command {
                Command::Register(registrant) => {
                    self.registry.insert(registrant);
                }
                Command::Unregister(registrant) => {
                    self.registry.remove(&registrant);
                }
                Command::Stop => self.stop(),
            }
        }

        if outcome.failures.is_empty() {
            Ok(())
        } else {
            Err(LoopError::Callbacks {
                frame,
                failures: outcome.failures,
            })
        }
    }

    // ── statistics ────────────────────────────────────────────────────────

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Current frame number; `-1` when stopped or before the first tick.
    pub fn frame(&self) -> i64 {
        self.state.current_frame
    }

    /// Jitter of the most recent tick, in milliseconds.
    pub fn jitter(&self) -> f64 {
        self.state.jitter
    }

    /// Total jitter divided by the frame number.
    ///
    /// `None` before the first tick; at frame 0 this is that tick's jitter.
    pub fn average_jitter(&self) -> Option<f64> {
        self.state.average_jitter()
    }

    /// Whether the most recent tick skipped one or more nominal frames.
    pub fn dropped_frame(&self) -> bool {
        self.state.dropped_frame
    }

    /// Dropped-frame ticks since the last `start()`.
    pub fn dropped_frames(&self) -> u64 {
        self.state.dropped_frames
    }

    // ── configuration & primitives ────────────────────────────────────────

    pub fn mode(&self) -> LoopMode {
        self.config.mode
    }

    pub fn target_rate(&self) -> Option<f64> {
        self.config.target_rate
    }

    /// Nominal tick spacing in whole milliseconds; `None` when uncapped.
    pub fn tick_interval(&self) -> Option<f64> {
        self.tick_interval
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Earliest armed interval deadline, for hosts that sleep between signals.
    pub fn next_deadline(&self) -> Option<f64> {
        self.scheduler.next_deadline()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Hosts use this to pulse refresh signals.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

impl<C: Clock, S: Scheduler> fmt::Debug for FrameLoop<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameLoop")
            .field("config", &self.config)
            .field("tick_interval", &self.tick_interval)
            .field("state", &self.state)
            .field("registry", &self.registry)
            .finish()
    }
}
