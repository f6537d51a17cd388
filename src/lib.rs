//! # GCodeTexture
//!
//! Streaming G-code rewriter that adds a surface texture to vase-mode
//! prints: a radial Z ripple that grows with height and height-periodic
//! flow bands, with extrusion recomputed so each move keeps a consistent
//! amount of material.
//!
//! ## Architecture
//!
//! GCodeTexture is organized into 4 crates:
//!
//! 1. **gcodetexture-core** - Positions, move targets, number formatting, errors
//! 2. **gcodetexture-gcode** - Line tokenizer and modal machine model
//! 3. **gcodetexture-processing** - Modifiers, pipeline, rewrite engine, streaming
//! 4. **gcodetexture-settings** - Configuration files
//!
//! The `gcodetexture` binary wires them together behind a small CLI.

pub mod cli;

pub use gcodetexture_core::{Error, GcodeError, MoveTarget, Position, Result, TextureError};

pub use gcodetexture_gcode::{GcodeLine, LineParser, MachineModel};

pub use gcodetexture_processing::{
    process_file, InvalidStatePolicy, LineOutput, Modifier, ModifierKind, ModifierPipeline,
    OutputFilter, ProcessingSettings, StreamStats, TextureEngine, TextureStream,
};

pub use gcodetexture_settings::{Config, ModifierConfig, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr, so G-code can be written to stdout
/// - RUST_LOG environment variable support
/// - A default level picked by `verbosity` (0: info, 1: debug, 2+: trace)
pub fn init_logging(verbosity: u8) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let level = match verbosity {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity > 1)
        .with_level(true)
        .with_line_number(verbosity > 1);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
