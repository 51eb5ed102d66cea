//! Demo host: drives the draw bridge every frame with a fixed scene.
//!
//! `RUST_LOG=imbridge_core=trace` shows every batch as it is translated.
//! Escape quits.

mod demo;
mod geometry;

use anyhow::Result;
use imbridge_core::TranslatorConfig;
use imbridge_engine::device::GpuInit;
use imbridge_engine::logging::{LoggingConfig, init_logging};
use imbridge_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "imbridge studio".to_string(),
        initial_size: LogicalSize::new(800.0, 560.0),
    };

    Runtime::run(config, GpuInit::default(), demo::Demo::new(TranslatorConfig::default()))
}
