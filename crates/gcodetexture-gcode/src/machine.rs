//! Modal machine model
//!
//! Tracks the modal groups needed to follow the nominal tool position
//! through a G-code stream:
//! - Motion group (G0, G1, G2, G3, G80)
//! - Plane selection group (G17, G18, G19)
//! - Distance mode group (G90, G91)
//! - Units group (G20, G21)
//! - Extrusion mode (M82, M83)
//!
//! and the non-modal position commands G28 (home) and G92 (set position).
//! Extrusion values are not interpreted here; the rewriter keeps its own
//! extrusion reference.

use serde::{Deserialize, Serialize};

use gcodetexture_core::{GcodeError, Position, Units};

use super::line::{GcodeLine, MotionFields};

/// Active motion mode (modal group 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionMode {
    /// G0 rapid positioning
    Rapid,
    /// G1 linear interpolation
    Linear,
    /// G2 clockwise arc
    ArcClockwise,
    /// G3 counter-clockwise arc
    ArcCounterClockwise,
    /// G80 motion cancelled
    Cancelled,
}

impl MotionMode {
    fn is_arc(self) -> bool {
        matches!(self, Self::ArcClockwise | Self::ArcCounterClockwise)
    }
}

/// Plane selection (modal group 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Plane {
    /// G17
    XY,
    /// G18
    XZ,
    /// G19
    YZ,
}

/// Distance mode (modal group 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMode {
    /// G90 absolute positioning
    Absolute,
    /// G91 incremental positioning
    Incremental,
}

/// Extrusion distance mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtrusionMode {
    /// M82 cumulative extrusion values
    Absolute,
    /// M83 per-move extrusion deltas
    Relative,
}

/// What a block did to the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    /// The block moved (or would move) the tool using the given motion mode
    Motion(MotionMode),
    /// G92 redefined the current position
    SetPosition,
    /// G28 homed one or more axes
    Home,
    /// Anything else: modal changes, dwell, M codes, comments, blank lines
    Other,
}

/// Result of interpreting one block against the current machine state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Machine state after the block
    pub next: MachineModel,
    /// What kind of block it was
    pub kind: BlockKind,
}

/// Modal machine state and nominal tool position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachineModel {
    motion_mode: MotionMode,
    plane: Plane,
    distance_mode: DistanceMode,
    units: Units,
    extrusion_mode: ExtrusionMode,
    position: Position,
}

impl Default for MachineModel {
    fn default() -> Self {
        Self {
            motion_mode: MotionMode::Rapid,
            plane: Plane::XY,
            distance_mode: DistanceMode::Absolute,
            units: Units::MM,
            extrusion_mode: ExtrusionMode::Absolute,
            position: Position::origin(),
        }
    }
}

/// Non-modal commands that consume axis words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisCommand {
    Home,
    SetPosition,
    Offsets,
}

/// Record a modal code, rejecting a second code from the same group
fn assign<T: Copy>(
    slot: &mut Option<T>,
    value: T,
    group: &str,
    line_number: u32,
) -> Result<(), GcodeError> {
    if slot.is_some() {
        return Err(GcodeError::InvalidState {
            line_number,
            reason: format!("multiple {} codes in one block", group),
        });
    }
    *slot = Some(value);
    Ok(())
}

impl MachineModel {
    /// Create a machine in its power-on state (G0 G17 G90 G21 M82 at the origin)
    pub fn new() -> Self {
        Self::default()
    }

    /// Nominal tool position
    pub fn position(&self) -> Position {
        self.position
    }

    /// Active motion mode
    pub fn motion_mode(&self) -> MotionMode {
        self.motion_mode
    }

    /// Active plane
    pub fn plane(&self) -> Plane {
        self.plane
    }

    /// Active distance mode
    pub fn distance_mode(&self) -> DistanceMode {
        self.distance_mode
    }

    /// Active extrusion mode
    pub fn extrusion_mode(&self) -> ExtrusionMode {
        self.extrusion_mode
    }

    /// Interpret a block without changing this state
    ///
    /// # Errors
    /// Returns [`GcodeError::InvalidState`] when the block is not a coherent
    /// transition: two codes from one modal group, a repeated axis word,
    /// axis words while motion is cancelled (G80), or an arc without
    /// centre or radius words.
    pub fn transition(&self, line: &GcodeLine) -> Result<Transition, GcodeError> {
        let fields = line.fields();
        let line_number = line.line_number;
        let invalid = |reason: &str| GcodeError::InvalidState {
            line_number,
            reason: reason.to_string(),
        };

        if let Some(axis) = fields.repeated_axis {
            return Err(invalid(&format!("axis word {} repeated", axis)));
        }

        let mut motion = None;
        let mut plane = None;
        let mut distance = None;
        let mut units = None;
        let mut extrusion = None;
        let mut axis_command = None;

        for code in &fields.g_codes {
            if code.subcode.is_some() {
                tracing::trace!("line {}: ignoring G{}", line_number, code);
                continue;
            }
            match code.number {
                0 => assign(&mut motion, MotionMode::Rapid, "motion", line_number)?,
                1 => assign(&mut motion, MotionMode::Linear, "motion", line_number)?,
                2 => assign(&mut motion, MotionMode::ArcClockwise, "motion", line_number)?,
                3 => assign(&mut motion, MotionMode::ArcCounterClockwise, "motion", line_number)?,
                80 => assign(&mut motion, MotionMode::Cancelled, "motion", line_number)?,
                17 => assign(&mut plane, Plane::XY, "plane", line_number)?,
                18 => assign(&mut plane, Plane::XZ, "plane", line_number)?,
                19 => assign(&mut plane, Plane::YZ, "plane", line_number)?,
                20 => assign(&mut units, Units::INCH, "units", line_number)?,
                21 => assign(&mut units, Units::MM, "units", line_number)?,
                90 => assign(&mut distance, DistanceMode::Absolute, "distance", line_number)?,
                91 => assign(&mut distance, DistanceMode::Incremental, "distance", line_number)?,
                10 => assign(&mut axis_command, AxisCommand::Offsets, "non-modal", line_number)?,
                28 => assign(&mut axis_command, AxisCommand::Home, "non-modal", line_number)?,
                92 => assign(&mut axis_command, AxisCommand::SetPosition, "non-modal", line_number)?,
                other => tracing::trace!("line {}: G{} does not affect position", line_number, other),
            }
        }

        for code in &fields.m_codes {
            if code.is(82) {
                assign(&mut extrusion, ExtrusionMode::Absolute, "extrusion", line_number)?;
            } else if code.is(83) {
                assign(&mut extrusion, ExtrusionMode::Relative, "extrusion", line_number)?;
            }
        }

        let mut next = *self;
        next.motion_mode = motion.unwrap_or(self.motion_mode);
        next.plane = plane.unwrap_or(self.plane);
        next.distance_mode = distance.unwrap_or(self.distance_mode);
        next.units = units.unwrap_or(self.units);
        next.extrusion_mode = extrusion.unwrap_or(self.extrusion_mode);

        let kind = match axis_command {
            Some(AxisCommand::SetPosition) => {
                next.position = Self::set_axes(next.position, fields);
                BlockKind::SetPosition
            }
            Some(AxisCommand::Home) => {
                next.position = Self::home_axes(next.position, fields);
                BlockKind::Home
            }
            Some(AxisCommand::Offsets) => BlockKind::Other,
            // M-code parameters such as `M205 X10 Y10` are not axis targets
            None if motion.is_none() && !fields.m_codes.is_empty() => BlockKind::Other,
            None if fields.has_axis_words() => {
                if next.motion_mode == MotionMode::Cancelled {
                    return Err(invalid("axis words with motion cancelled (G80)"));
                }
                if next.motion_mode.is_arc() && !fields.has_arc_parameters {
                    return Err(invalid("arc move without I/J/K or R words"));
                }
                next.position = self.resolve_target(next.distance_mode, fields);
                BlockKind::Motion(next.motion_mode)
            }
            None if motion.is_some() || fields.e.is_some() => BlockKind::Motion(next.motion_mode),
            None => BlockKind::Other,
        };

        Ok(Transition { next, kind })
    }

    /// Interpret a block and advance this state
    ///
    /// # Errors
    /// See [`MachineModel::transition`]; on error the state is unchanged.
    pub fn advance(&mut self, line: &GcodeLine) -> Result<BlockKind, GcodeError> {
        let transition = self.transition(line)?;
        *self = transition.next;
        Ok(transition.kind)
    }

    fn resolve_target(&self, distance_mode: DistanceMode, fields: &MotionFields) -> Position {
        let current = self.position;
        match distance_mode {
            DistanceMode::Absolute => Position {
                x: fields.x.unwrap_or(current.x),
                y: fields.y.unwrap_or(current.y),
                z: fields.z.unwrap_or(current.z),
            },
            DistanceMode::Incremental => Position {
                x: current.x + fields.x.unwrap_or(0.0),
                y: current.y + fields.y.unwrap_or(0.0),
                z: current.z + fields.z.unwrap_or(0.0),
            },
        }
    }

    fn set_axes(current: Position, fields: &MotionFields) -> Position {
        Position {
            x: fields.x.unwrap_or(current.x),
            y: fields.y.unwrap_or(current.y),
            z: fields.z.unwrap_or(current.z),
        }
    }

    fn home_axes(current: Position, fields: &MotionFields) -> Position {
        if !fields.has_axis_words() {
            return Position::origin();
        }
        Position {
            x: if fields.x.is_some() { 0.0 } else { current.x },
            y: if fields.y.is_some() { 0.0 } else { current.y },
            z: if fields.z.is_some() { 0.0 } else { current.z },
        }
    }
}
