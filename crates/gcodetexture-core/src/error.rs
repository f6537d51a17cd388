//! Error handling for GCodeTexture
//!
//! Provides the error types for every layer of the rewriter:
//! - G-Code errors (tokenizing lines, machine-state transitions)
//! - Texture errors (modifier construction and parameter validation)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// G-Code error type
///
/// Represents errors raised while reading the instruction stream. Every
/// variant names the 1-based input line that triggered it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GcodeError {
    /// The line could not be tokenized into words and comments
    #[error("Malformed G-code at line {line_number}: {reason}")]
    ParseMalformed {
        /// The line number where tokenizing failed.
        line_number: u32,
        /// What the tokenizer could not make sense of.
        reason: String,
    },

    /// The machine model cannot interpret the block as a state transition
    #[error("Invalid machine state at line {line_number}: {reason}")]
    InvalidState {
        /// The line number of the rejected block.
        line_number: u32,
        /// Why the block was rejected.
        reason: String,
    },
}

impl GcodeError {
    /// Line number that triggered this error
    pub fn line_number(&self) -> u32 {
        match self {
            Self::ParseMalformed { line_number, .. } | Self::InvalidState { line_number, .. } => {
                *line_number
            }
        }
    }

    /// Check if this error came from the machine model rather than the tokenizer
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }
}

/// Texture error type
///
/// Represents errors in building the modifier pipeline. These are raised
/// before any line is processed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TextureError {
    /// Configuration names a transform kind the pipeline does not know
    #[error("Unknown modifier type: {kind}")]
    UnknownModifierType {
        /// The unrecognized type tag.
        kind: String,
    },

    /// A required modifier parameter is missing
    #[error("Missing parameter '{param}' for modifier '{modifier}'")]
    MissingParameter {
        /// Label of the modifier being built.
        modifier: String,
        /// The missing parameter name.
        param: String,
    },

    /// A modifier parameter has an unusable value
    #[error("Invalid parameter '{param}' for modifier '{modifier}': {reason}")]
    InvalidParameter {
        /// Label of the modifier being built.
        modifier: String,
        /// The offending parameter name.
        param: String,
        /// The reason the value is unusable.
        reason: String,
    },
}

/// Main error type for GCodeTexture
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// G-Code error
    #[error(transparent)]
    Gcode(#[from] GcodeError),

    /// Texture error
    #[error(transparent)]
    Texture(#[from] TextureError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Input line number that triggered this error, if the error is tied to one
    pub fn line_number(&self) -> Option<u32> {
        match self {
            Error::Gcode(err) => Some(err.line_number()),
            _ => None,
        }
    }

    /// Check if this is a G-Code error
    pub fn is_gcode_error(&self) -> bool {
        matches!(self, Error::Gcode(_))
    }

    /// Check if this is a texture error
    pub fn is_texture_error(&self) -> bool {
        matches!(self, Error::Texture(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
