//! Engine-facing contracts.
//!
//! The runtime drives an [`App`] once per redraw and hands it a [`FrameCtx`];
//! runtime internals do not leak into host code.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
