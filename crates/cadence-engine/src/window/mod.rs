//! Windowed host.
//!
//! Drives a `FrameLoop` from a `winit` event loop: every
//! `WindowEvent::RedrawRequested` is a refresh pulse, and interval deadlines
//! wake the event loop through `ControlFlow::WaitUntil`.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
