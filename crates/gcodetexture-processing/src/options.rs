//! Engine behaviour switches

use serde::{Deserialize, Serialize};
use std::fmt;

/// What to do with a line the machine model rejects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidStatePolicy {
    /// Write the original text, skip rewriting and the state commit
    #[default]
    EmitUnmodified,
    /// Leave the line out of the output, skip the state commit
    Drop,
    /// Stop processing with an error naming the line
    Abort,
}

impl fmt::Display for InvalidStatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmitUnmodified => write!(f, "emit_unmodified"),
            Self::Drop => write!(f, "drop"),
            Self::Abort => write!(f, "abort"),
        }
    }
}

/// Which lines reach the output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFilter {
    /// Every line is written (1:1 with the input)
    #[default]
    All,
    /// Once any Z has been rewritten, drop XY moves whose output has no Z word
    RequireZAfterTexture,
}

impl fmt::Display for OutputFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::RequireZAfterTexture => write!(f, "require_z_after_texture"),
        }
    }
}

/// Processing behaviour of a [`TextureEngine`](crate::TextureEngine)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingSettings {
    /// Handling of lines the machine model rejects
    pub invalid_state_policy: InvalidStatePolicy,
    /// Output completeness policy
    pub output_filter: OutputFilter,
    /// Append an `old -> new` note to lines whose Z was rewritten
    pub annotate_z_changes: bool,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            invalid_state_policy: InvalidStatePolicy::default(),
            output_filter: OutputFilter::default(),
            annotate_z_changes: true,
        }
    }
}
