use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use cadence_engine::logging::{init_logging, LoggingConfig};
use cadence_engine::window::{Runtime, RuntimeConfig};
use cadence_engine::{shared, FrameLoop, LoopConfig, Registrant, SleepHost, TickCtx};

/// Bouncing point integrated in `update`, clamped in `late_update`.
struct Bouncer {
    pos: f64,
    vel: f64,
    bounces: u32,
}

impl Registrant for Bouncer {
    fn update(&mut self, dt: f64, _ctx: &mut TickCtx) -> Result<()> {
        self.pos += self.vel * dt / 1000.0;
        Ok(())
    }

    fn late_update(&mut self, _dt: f64, _ctx: &mut TickCtx) -> Result<()> {
        if !(0.0..=1.0).contains(&self.pos) {
            self.pos = self.pos.clamp(0.0, 1.0);
            self.vel = -self.vel;
            self.bounces += 1;
        }
        Ok(())
    }
}

/// Once per second, reports tick rate and jitter.
struct Stats {
    elapsed: f64,
    ticks: u32,
    bouncer: Rc<RefCell<Bouncer>>,
}

impl Registrant for Stats {
    fn early_update(&mut self, _dt: f64, ctx: &mut TickCtx) -> Result<()> {
        if ctx.dropped_frame() {
            log::warn!("frame {} arrived late ({:.1} ms)", ctx.frame(), ctx.delta());
        }
        Ok(())
    }

    fn late_update(&mut self, dt: f64, ctx: &mut TickCtx) -> Result<()> {
        self.ticks += 1;
        self.elapsed += dt;

        if self.elapsed >= 1000.0 {
            let bouncer = self.bouncer.borrow();
            log::info!(
                "frame {:>5}  {:>3} ticks/s  jitter {:>5.2} ms  pos {:.2}  bounces {}",
                ctx.frame(),
                self.ticks,
                ctx.jitter(),
                bouncer.pos,
                bouncer.bounces,
            );
            self.ticks = 0;
            self.elapsed = 0.0;
        }
        Ok(())
    }
}

#[derive(Parser, Debug)]
#[command(name = "cadence-studio")]
#[command(about = "Drive a demo frame loop headless or from a window's redraws")]
struct Args {
    /// Drive the loop from a winit window instead of sleeping
    #[arg(long)]
    window: bool,

    /// Headless run length in seconds
    #[arg(long, default_value_t = 3.0)]
    seconds: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(LoggingConfig::default());

    let config = LoopConfig::from_env().context("invalid loop configuration")?;
    let mut frame_loop = FrameLoop::from_config(config)?;
    log::info!(
        "cadence studio: mode={:?} rate={:?}",
        frame_loop.mode(),
        frame_loop.target_rate()
    );

    let bouncer = shared(Bouncer { pos: 0.0, vel: 0.8, bounces: 0 });
    frame_loop.register(bouncer.clone());
    frame_loop.register(shared(Stats {
        elapsed: 0.0,
        ticks: 0,
        bouncer: bouncer.clone(),
    }));

    if args.window {
        Runtime::run(RuntimeConfig::default(), &mut frame_loop)?;
        log::info!("done: {} bounces", bouncer.borrow().bounces);
        return Ok(());
    }

    let started = Instant::now();
    SleepHost::default().run(&mut frame_loop, |_| started.elapsed().as_secs_f64() < args.seconds)?;

    // Read before stopping; stop() resets the frame counter.
    let avg = frame_loop
        .average_jitter()
        .map_or_else(|| "n/a".to_string(), |j| format!("{j:.2} ms"));
    frame_loop.stop();

    log::info!(
        "done: {} bounces, {} dropped frames, average jitter {avg}",
        bouncer.borrow().bounces,
        frame_loop.dropped_frames()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_to_three_headless_seconds() {
        let args = Args::try_parse_from(["cadence-studio"]).unwrap();
        assert!(!args.window);
        assert_eq!(args.seconds, 3.0);
    }

    #[test]
    fn parses_window_and_seconds() {
        let args = Args::try_parse_from(["cadence-studio", "--window", "--seconds", "0.5"]).unwrap();
        assert!(args.window);
        assert_eq!(args.seconds, 0.5);
    }

    #[test]
    fn seconds_without_value_is_rejected() {
        assert!(Args::try_parse_from(["cadence-studio", "--seconds"]).is_err());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Args::try_parse_from(["cadence-studio", "--secnds", "0.2"]).is_err());
    }

    #[test]
    fn non_numeric_seconds_is_rejected() {
        assert!(Args::try_parse_from(["cadence-studio", "--seconds", "soon"]).is_err());
    }
}
