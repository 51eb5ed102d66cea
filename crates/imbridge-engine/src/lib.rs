//! imbridge engine crate.
//!
//! Platform + GPU runtime for the draw bridge: window loop, wgpu device and
//! surface, and the wgpu [`imbridge_core::Backend`] implementation that the
//! translator drives.

pub mod core;
pub mod device;
pub mod logging;
pub mod render;
pub mod window;

pub use imbridge_core as bridge;
