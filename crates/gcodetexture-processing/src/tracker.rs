//! Machine state tracker
//!
//! Follows the nominal position of the unmodified stream and the
//! extrusion reference the rewriter measures new E values against.

use gcodetexture_core::{GcodeError, Position};
use gcodetexture_gcode::{
    BlockKind, DistanceMode, ExtrusionMode, GcodeLine, MachineModel, Transition,
};

/// Position and extrusion bookkeeping across a stream
#[derive(Debug, Clone, Default)]
pub struct MachineStateTracker {
    machine: MachineModel,
    extrusion_reference: f64,
}

impl MachineStateTracker {
    /// Create a tracker at the machine's power-on state
    pub fn new() -> Self {
        Self::default()
    }

    /// Position after the last committed line
    pub fn current_position(&self) -> Position {
        self.machine.position()
    }

    /// Last committed absolute extrusion value, never negative
    pub fn extrusion_reference(&self) -> f64 {
        self.extrusion_reference
    }

    /// Modal machine state
    pub fn machine(&self) -> &MachineModel {
        &self.machine
    }

    /// Whether the stream is in absolute (G90) positioning
    pub fn is_absolute(&self) -> bool {
        self.machine.distance_mode() == DistanceMode::Absolute
    }

    /// Whether E words are per-move deltas (M83)
    pub fn is_relative_extrusion(&self) -> bool {
        self.machine.extrusion_mode() == ExtrusionMode::Relative
    }

    /// Interpret a line without committing it
    ///
    /// # Errors
    /// Returns [`GcodeError::InvalidState`] when the machine model rejects the block.
    pub fn plan(&self, line: &GcodeLine) -> Result<Transition, GcodeError> {
        self.machine.transition(line)
    }

    /// Commit a planned line
    ///
    /// The position always follows the original line. `emitted_e` is the E
    /// value written to the output, when the line carried one; in absolute
    /// extrusion mode it becomes the new extrusion reference.
    pub fn commit(&mut self, transition: Transition, emitted_e: Option<f64>) {
        let absolute_extrusion = self.machine.extrusion_mode() == ExtrusionMode::Absolute;
        self.machine = transition.next;

        match transition.kind {
            BlockKind::SetPosition => self.note_reset(),
            BlockKind::Motion(_) if absolute_extrusion => {
                if let Some(e) = emitted_e {
                    self.extrusion_reference = e.max(0.0);
                }
            }
            _ => {}
        }
    }

    /// Apply a coordinate reset (G92): the extrusion reference restarts at 0
    pub fn note_reset(&mut self) {
        tracing::debug!("extrusion reference reset from {:.4}", self.extrusion_reference);
        self.extrusion_reference = 0.0;
    }
}
