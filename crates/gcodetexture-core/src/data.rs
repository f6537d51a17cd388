//! Data models for machine positions and per-line move targets
//!
//! This module provides:
//! - Machine-absolute XYZ positions in the working coordinate frame
//! - Mutable per-line move targets carrying cumulative extrusion
//! - Unit tracking (MM, INCH)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine coordinate units (millimeters or inches)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Units {
    /// Millimeters (metric)
    #[default]
    MM,
    /// Inches (imperial)
    INCH,
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::MM => write!(f, "mm"),
            Units::INCH => write!(f, "in"),
        }
    }
}

/// Machine-absolute position (X, Y, Z) in the working coordinate frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// X-axis position
    pub x: f64,
    /// Y-axis position
    pub y: f64,
    /// Z-axis position
    pub z: f64,
}

impl Position {
    /// Create a new position with X, Y, Z coordinates
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        debug_assert!(
            x.is_finite() && y.is_finite() && z.is_finite(),
            "Position axes must be finite: x={x}, y={y}, z={z}"
        );
        Self { x, y, z }
    }

    /// The coordinate origin
    pub fn origin() -> Self {
        Self::default()
    }

    /// Copy of this position with a different Z
    pub fn with_z(self, z: f64) -> Self {
        Self { z, ..self }
    }

    /// Euclidean distance to another position
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X:{:.3} Y:{:.3} Z:{:.3}", self.x, self.y, self.z)
    }
}

/// Working values of a single motion line
///
/// Created fresh for every qualifying line from its parsed (or implicit)
/// fields and threaded through the modifier pipeline. `e` is the
/// cumulative extrusion value in absolute extrusion mode and the per-move
/// delta in relative mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveTarget {
    /// Target X
    pub x: f64,
    /// Target Y
    pub y: f64,
    /// Target Z
    pub z: f64,
    /// Target extrusion
    pub e: f64,
}

impl MoveTarget {
    /// Create a new move target
    pub fn new(x: f64, y: f64, z: f64, e: f64) -> Self {
        Self { x, y, z, e }
    }

    /// The XYZ part of this target
    pub fn position(&self) -> Position {
        Position {
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }
}

impl fmt::Display for MoveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "X:{:.3} Y:{:.3} Z:{:.3} E:{:.4}",
            self.x, self.y, self.z, self.e
        )
    }
}
