//! # GCodeTexture G-Code
//!
//! G-code reading for GCodeTexture.
//!
//! This crate provides:
//! - Line tokenizing into words, comments and opaque text, with byte spans
//!   so callers can rewrite single words in place
//! - A fixed per-line record of the fields the rewriter consumes
//! - A modal machine model that tracks the nominal tool position

pub mod line;
pub mod machine;
pub mod parser;

pub use line::{CodeNumber, Comment, CommentStyle, GcodeLine, MotionFields, Word};
pub use machine::{
    BlockKind, DistanceMode, ExtrusionMode, MachineModel, MotionMode, Plane, Transition,
};
pub use parser::LineParser;
