//! Core loop contracts.
//!
//! `FrameLoop` is the controller: it owns lifecycle, the registered set and the
//! tick statistics. Registrants receive per-tick callbacks through the
//! `Registrant` trait and talk back to the loop through `TickCtx`.

mod config;
mod ctx;
mod dispatch;
mod error;
mod frame_loop;
mod mode;
mod registrant;
mod registry;

pub use config::{LoopConfig, DEFAULT_TARGET_RATE};
pub use ctx::TickCtx;
pub use error::{CallbackFailure, LoopError};
pub use frame_loop::FrameLoop;
pub use mode::LoopMode;
pub use registrant::{shared, Phase, Registrant, SharedRegistrant};
pub use registry::Registry;
