//! GCodeTexture Settings Crate
//!
//! Handles texture configuration files: loading and saving TOML or JSON,
//! validation, and building the modifier pipeline and engine from them.

pub mod config;
pub mod error;

pub use config::{Config, ModifierConfig};
pub use error::{ConfigError, SettingsError, SettingsResult};
pub use gcodetexture_processing::{InvalidStatePolicy, OutputFilter, ProcessingSettings};
