//! # GCodeTexture Processing
//!
//! Texture rewriting for G-code streams.
//!
//! This crate provides:
//! - Pure geometry and flow math
//! - Radial ripple and flow wave modifiers, applied as an ordered pipeline
//! - A machine state tracker that follows the unmodified stream
//! - The line rewrite engine and a streaming driver over `BufRead`/`Write`

pub mod engine;
pub mod math;
pub mod modifier;
pub mod options;
pub mod pipeline;
pub mod rewrite;
pub mod stream;
pub mod tracker;

pub use engine::{LineOutput, TextureEngine};
pub use modifier::{Modifier, ModifierKind, TransformContext};
pub use options::{InvalidStatePolicy, OutputFilter, ProcessingSettings};
pub use pipeline::{clamp_extrusion, ModifierPipeline, PipelineOutput};
pub use rewrite::LineRewriter;
pub use stream::{process_file, StreamStats, TextureStream};
pub use tracker::MachineStateTracker;
