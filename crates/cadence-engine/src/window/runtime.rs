use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{FrameLoop, LoopError};
use crate::schedule::{RefreshPacer, Scheduler};
use crate::time::Clock;

/// Window configuration for the windowed host.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "cadence".to_string(),
            initial_size: LogicalSize::new(640.0, 360.0),
        }
    }
}

/// Entry point for the windowed host.
pub struct Runtime;

impl Runtime {
    /// Opens one window and drives `frame_loop` until the window is closed
    /// or the loop stops.
    ///
    /// Redraws are requested at the monitor's refresh rate, and only while
    /// the loop waits on a refresh signal, so a fixed-interval loop sleeps
    /// between deadlines.
    pub fn run<C, S>(config: RuntimeConfig, frame_loop: &mut FrameLoop<C, S>) -> Result<()>
    where
        C: Clock,
        S: Scheduler,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut host = Host {
            config,
            frame_loop,
            window: None,
            pacer: RefreshPacer::default(),
            redraw_pending: false,
        };

        event_loop
            .run_app(&mut host)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

struct Host<'a, C: Clock, S: Scheduler> {
    config: RuntimeConfig,
    frame_loop: &'a mut FrameLoop<C, S>,
    window: Option<Window>,
    pacer: RefreshPacer,
    /// Set when we asked for a redraw; other redraws are not refresh pulses.
    redraw_pending: bool,
}

impl<C: Clock, S: Scheduler> Host<'_, C, S> {
    fn deliver(&mut self) {
        match self.frame_loop.pump() {
            Ok(_) => {}
            Err(LoopError::Callbacks { frame, failures }) => {
                for failure in &failures {
                    log::error!("frame {frame}: {failure}");
                }
            }
            Err(e) => log::error!("frame loop error: {e}"),
        }
    }

    fn schedule_wake(&mut self, event_loop: &ActiveEventLoop) {
        let now = self.frame_loop.now_ms();
        let scheduler = self.frame_loop.scheduler();
        let wants_refresh = scheduler.wants_refresh();
        let deadline = scheduler.next_deadline();

        if wants_refresh && !self.redraw_pending && self.pacer.due(now) {
            if let Some(window) = &self.window {
                window.request_redraw();
                self.redraw_pending = true;
            }
        }

        let flow = match self.pacer.wake_at(deadline, wants_refresh) {
            Some(wake) => {
                let wait_ms = (wake - now).max(0.0);
                ControlFlow::WaitUntil(Instant::now() + Duration::from_secs_f64(wait_ms / 1000.0))
            }
            None => ControlFlow::Wait,
        };
        event_loop.set_control_flow(flow);
    }
}

impl<C: Clock, S: Scheduler> ApplicationHandler for Host<'_, C, S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let millihertz = window.current_monitor().and_then(|m| m.refresh_rate_millihertz());
                self.pacer = RefreshPacer::from_millihertz(millihertz);
                log::info!("window host started (refresh every {:.2} ms)", self.pacer.period_ms());
                self.window = Some(window);
            }
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.frame_loop.stop();
                event_loop.exit();
            }
            WindowEvent::RedrawRequested if self.redraw_pending => {
                self.redraw_pending = false;
                self.frame_loop.scheduler_mut().pulse_refresh();
                self.deliver();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.deliver();

        if !self.frame_loop.is_active() {
            log::info!("frame loop stopped; closing window host");
            event_loop.exit();
            return;
        }

        self.schedule_wake(event_loop);
    }
}
