//! # GCodeTexture Core
//!
//! Core types shared by the GCodeTexture crates.
//! Provides machine positions and per-line move targets, the fixed-precision
//! number formatting used when rewriting G-code words, and the error
//! hierarchy every layer reports through.

pub mod data;
pub mod error;
pub mod units;

pub use data::{MoveTarget, Position, Units};

pub use error::{Error, GcodeError, Result, TextureError};

pub use units::{
    format_extrusion, format_fixed, format_position, same_at_precision, EXTRUSION_DECIMALS,
    POSITION_DECIMALS,
};
