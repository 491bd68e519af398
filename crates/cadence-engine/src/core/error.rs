use thiserror::Error;

use super::registrant::Phase;

/// Errors produced by the frame loop.
#[derive(Debug, Error)]
pub enum LoopError {
    #[error("invalid loop mode {0}: expected 0 (fixed interval) or 1 (refresh sync)")]
    InvalidMode(u8),

    #[error("invalid target rate {0}: expected a finite rate in (0, 1000] ticks per second")]
    InvalidRate(f64),

    #[error("fixed-interval mode requires a target rate")]
    UncappedFixedInterval,

    #[error("invalid value {value:?} for {key}")]
    Config { key: &'static str, value: String },

    /// One or more phases were cut short on `frame`. The loop keeps running.
    #[error("{} callback failure(s) on frame {frame}", .failures.len())]
    Callbacks {
        frame: i64,
        failures: Vec<CallbackFailure>,
    },
}

/// A registrant callback that returned an error, aborting the rest of its phase.
#[derive(Debug, Error)]
#[error("{phase} callback failed: {error:#}")]
pub struct CallbackFailure {
    pub phase: Phase,
    pub error: anyhow::Error,
}
