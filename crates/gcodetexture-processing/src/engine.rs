//! Line rewrite engine
//!
//! Owns the per-stream state and turns each input line into its output
//! form. Lines are handled strictly in order and never revisited.

use gcodetexture_core::{
    format_extrusion, format_position, same_at_precision, GcodeError, MoveTarget, Position, Result,
    EXTRUSION_DECIMALS, POSITION_DECIMALS,
};
use gcodetexture_gcode::{
    BlockKind, DistanceMode, ExtrusionMode, GcodeLine, LineParser, MotionMode, Transition,
};

use crate::modifier::TransformContext;
use crate::options::{InvalidStatePolicy, OutputFilter, ProcessingSettings};
use crate::pipeline::{clamp_extrusion, ModifierPipeline};
use crate::rewrite::LineRewriter;
use crate::tracker::MachineStateTracker;

/// What the engine did with one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutput {
    /// Write the input line as it was read
    Unchanged,
    /// Write this text instead (without a line terminator)
    Rewritten(String),
    /// Write nothing
    Dropped,
}

impl LineOutput {
    /// Output text for an input line, or `None` when dropped
    pub fn text<'a>(&'a self, original: &'a str) -> Option<&'a str> {
        match self {
            Self::Unchanged => Some(original),
            Self::Rewritten(text) => Some(text),
            Self::Dropped => None,
        }
    }
}

/// Result of rewriting a qualifying move
struct RewriteOutcome {
    output: LineOutput,
    emitted_e: Option<f64>,
    emitted: Position,
    output_has_z: bool,
    z_changed: bool,
}

/// Applies a modifier pipeline to a G-code stream, one line at a time
#[derive(Debug, Clone)]
pub struct TextureEngine {
    parser: LineParser,
    pipeline: ModifierPipeline,
    settings: ProcessingSettings,
    tracker: MachineStateTracker,
    last_seen_z: f64,
    last_emitted: Position,
    texture_started: bool,
    invalid_state_lines: u64,
    z_changes: u64,
}

impl TextureEngine {
    /// Create an engine with default processing settings
    pub fn new(pipeline: ModifierPipeline) -> Self {
        Self::with_settings(pipeline, ProcessingSettings::default())
    }

    /// Create an engine with explicit processing settings
    pub fn with_settings(pipeline: ModifierPipeline, settings: ProcessingSettings) -> Self {
        Self {
            parser: LineParser::new(),
            pipeline,
            settings,
            tracker: MachineStateTracker::new(),
            last_seen_z: 0.0,
            last_emitted: Position::origin(),
            texture_started: false,
            invalid_state_lines: 0,
            z_changes: 0,
        }
    }

    /// The modifier pipeline
    pub fn pipeline(&self) -> &ModifierPipeline {
        &self.pipeline
    }

    /// The processing settings
    pub fn settings(&self) -> &ProcessingSettings {
        &self.settings
    }

    /// Machine state of the unmodified stream
    pub fn tracker(&self) -> &MachineStateTracker {
        &self.tracker
    }

    /// Z used for lines that omit it
    pub fn last_seen_z(&self) -> f64 {
        self.last_seen_z
    }

    /// Position last written to the output
    pub fn last_emitted(&self) -> Position {
        self.last_emitted
    }

    /// Lines the machine model rejected so far
    pub fn invalid_state_lines(&self) -> u64 {
        self.invalid_state_lines
    }

    /// Lines whose Z was rewritten or appended so far
    pub fn z_changes(&self) -> u64 {
        self.z_changes
    }

    /// Process one line (without its terminator)
    ///
    /// # Errors
    /// Returns [`GcodeError::ParseMalformed`] when the line cannot be
    /// tokenized, and [`GcodeError::InvalidState`] when the machine model
    /// rejects it under [`InvalidStatePolicy::Abort`].
    pub fn process_line(&mut self, line_number: u32, text: &str) -> Result<LineOutput> {
        let line = self.parser.parse(line_number, text)?;

        let transition = match self.tracker.plan(&line) {
            Ok(transition) => transition,
            Err(err) => return self.reject(err),
        };

        if !self.qualifies(&line, &transition) {
            return Ok(self.pass_through(&line, transition));
        }

        let outcome = self.rewrite(&line, &transition);
        self.tracker.commit(transition, outcome.emitted_e);
        self.last_seen_z = self.tracker.current_position().z;
        self.last_emitted = outcome.emitted;

        if outcome.z_changed {
            self.z_changes += 1;
            self.texture_started = true;
        }
        if !outcome.output_has_z && self.filters_line() {
            tracing::debug!("line {}: dropped, XY move without Z", line_number);
            return Ok(LineOutput::Dropped);
        }
        Ok(outcome.output)
    }

    fn reject(&mut self, err: GcodeError) -> Result<LineOutput> {
        self.invalid_state_lines += 1;
        match self.settings.invalid_state_policy {
            InvalidStatePolicy::EmitUnmodified => {
                tracing::warn!("{}; writing the line unchanged", err);
                Ok(LineOutput::Unchanged)
            }
            InvalidStatePolicy::Drop => {
                tracing::warn!("{}; dropping the line", err);
                Ok(LineOutput::Dropped)
            }
            InvalidStatePolicy::Abort => Err(err.into()),
        }
    }

    /// Linear move in absolute positioning with explicit X and Y
    fn qualifies(&self, line: &GcodeLine, transition: &Transition) -> bool {
        transition.kind == BlockKind::Motion(MotionMode::Linear)
            && transition.next.distance_mode() == DistanceMode::Absolute
            && line.fields().has_xy()
    }

    fn pass_through(&mut self, line: &GcodeLine, transition: Transition) -> LineOutput {
        let fields = line.fields();
        let is_motion = matches!(transition.kind, BlockKind::Motion(_));
        let before = self.tracker.current_position();
        self.tracker.commit(transition, fields.e);
        let after = self.tracker.current_position();
        self.last_seen_z = after.z;

        let z = if (is_motion && fields.z.is_some()) || after.z != before.z {
            after.z
        } else {
            self.last_emitted.z
        };
        self.last_emitted = Position::new(after.x, after.y, z);

        let moves_xy = is_motion && (fields.x.is_some() || fields.y.is_some());
        if moves_xy && fields.z.is_none() && self.filters_line() {
            tracing::debug!("line {}: dropped, XY move without Z", line.line_number);
            return LineOutput::Dropped;
        }
        LineOutput::Unchanged
    }

    fn filters_line(&self) -> bool {
        self.settings.output_filter == OutputFilter::RequireZAfterTexture && self.texture_started
    }

    fn rewrite(&self, line: &GcodeLine, transition: &Transition) -> RewriteOutcome {
        let fields = line.fields();
        let relative_extrusion = transition.next.extrusion_mode() == ExtrusionMode::Relative;
        let reference = if relative_extrusion {
            0.0
        } else {
            self.tracker.extrusion_reference()
        };

        let x = fields.x.unwrap_or(self.last_emitted.x);
        let y = fields.y.unwrap_or(self.last_emitted.y);
        let z = fields.z.unwrap_or(self.last_seen_z);
        let e = fields.e.unwrap_or(reference);
        let has_e = fields.e.is_some();
        let original = MoveTarget::new(x, y, z, e);

        let ctx = TransformContext {
            position: self.tracker.current_position(),
            extrusion_reference: reference,
        };
        let applied = self.pipeline.apply(&ctx, original, has_e);
        let mut target = applied.target;

        if has_e && applied.applied > 0 {
            target.e = if relative_extrusion && e < 0.0 {
                e
            } else {
                clamp_extrusion(target.e, e, reference)
            };
        }

        let mut rw = LineRewriter::new(line);
        if !same_at_precision(target.x, x, POSITION_DECIMALS) {
            rw.replace_value('X', format_position(target.x));
        }
        if !same_at_precision(target.y, y, POSITION_DECIMALS) {
            rw.replace_value('Y', format_position(target.y));
        }

        let (emitted_z, z_changed) = match fields.z {
            Some(_) if !same_at_precision(target.z, z, POSITION_DECIMALS) => {
                rw.replace_value('Z', format_position(target.z));
                (target.z, true)
            }
            Some(_) => (z, false),
            None if !same_at_precision(target.z, self.last_emitted.z, POSITION_DECIMALS) => {
                rw.insert_after(&['X', 'Y'], 'Z', format_position(target.z));
                (target.z, true)
            }
            None => (self.last_emitted.z, false),
        };

        let emitted_e = if has_e && !same_at_precision(target.e, e, EXTRUSION_DECIMALS) {
            rw.replace_value('E', format_extrusion(target.e));
            Some(target.e)
        } else {
            fields.e
        };

        // A restored nominal Z after a textured line is written without a note
        let z_moved = !same_at_precision(emitted_z, z, POSITION_DECIMALS);
        if z_changed && z_moved && self.settings.annotate_z_changes {
            rw.annotate(format!(
                "Z {} -> {}",
                format_position(z),
                format_position(emitted_z)
            ));
        }

        let output = if rw.is_modified() {
            let text = rw.finish();
            tracing::debug!("line {}: {} -> {}", line.line_number, line.raw(), text);
            LineOutput::Rewritten(text)
        } else {
            LineOutput::Unchanged
        };

        RewriteOutcome {
            output,
            emitted_e,
            emitted: Position::new(target.x, target.y, emitted_z),
            output_has_z: fields.z.is_some() || z_changed,
            z_changed,
        }
    }
}
