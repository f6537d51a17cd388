//! Texture modifiers
//!
//! A [`Modifier`] pairs one transform kind with the predicate that decides
//! whether it applies to a move. Modifiers are immutable once built.

use serde::{Deserialize, Serialize};
use std::fmt;

use gcodetexture_core::{MoveTarget, Position, TextureError};

use crate::math;

/// State a transform may read but not change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformContext {
    /// Position before the move, from the unmodified stream
    pub position: Position,
    /// Extrusion value the move starts from
    pub extrusion_reference: f64,
}

/// The closed set of transform kinds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModifierKind {
    /// Z ripple that follows the angle around the part centre and grows with height
    RadialRipple {
        /// Ripple amplitude gained per unit of height above the start
        increase_per_unit_height: f64,
        /// Number of ripple periods per revolution
        cycles_per_revolution: f64,
    },
    /// Height-periodic over/under-extrusion bands
    FlowWave {
        /// Flow periods per unit of height
        frequency_per_unit_height: f64,
        /// Peak flow change as a fraction of the nominal extrusion
        amplitude_fraction: f64,
    },
}

impl ModifierKind {
    /// Configuration tag of this kind
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::RadialRipple { .. } => "radial_ripple",
            Self::FlowWave { .. } => "flow_wave",
        }
    }

    /// Parameter names accepted by a type tag, or `None` for an unknown tag
    pub fn parameter_names(type_tag: &str) -> Option<&'static [&'static str]> {
        match type_tag {
            "radial_ripple" => Some(&["increase_per_unit_height", "cycles_per_revolution"]),
            "flow_wave" => Some(&["frequency_per_unit_height", "amplitude_fraction"]),
            _ => None,
        }
    }

    fn parameters(&self) -> [(&'static str, f64); 2] {
        match *self {
            Self::RadialRipple {
                increase_per_unit_height,
                cycles_per_revolution,
            } => [
                ("increase_per_unit_height", increase_per_unit_height),
                ("cycles_per_revolution", cycles_per_revolution),
            ],
            Self::FlowWave {
                frequency_per_unit_height,
                amplitude_fraction,
            } => [
                ("frequency_per_unit_height", frequency_per_unit_height),
                ("amplitude_fraction", amplitude_fraction),
            ],
        }
    }
}

/// A transform with its applicability rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    /// Transform kind and parameters
    pub kind: ModifierKind,
    /// Moves below this Z are left alone; also the height the effect starts from
    pub min_height: f64,
    /// Only apply to moves that carry an explicit E word
    pub extrusion_only: bool,
    /// Name used in logs and lookups
    pub label: String,
}

impl Modifier {
    /// Create a modifier, validating its parameters
    ///
    /// # Errors
    /// Returns [`TextureError::InvalidParameter`] for non-finite values or
    /// a flow amplitude outside `(-1, 1)`.
    pub fn new(
        kind: ModifierKind,
        min_height: f64,
        extrusion_only: bool,
        label: impl Into<String>,
    ) -> Result<Self, TextureError> {
        let modifier = Self {
            kind,
            min_height,
            extrusion_only,
            label: label.into(),
        };
        modifier.validate()?;
        Ok(modifier)
    }

    /// Radial ripple with the given start height
    pub fn radial_ripple(
        min_height: f64,
        increase_per_unit_height: f64,
        cycles_per_revolution: f64,
    ) -> Result<Self, TextureError> {
        Self::new(
            ModifierKind::RadialRipple {
                increase_per_unit_height,
                cycles_per_revolution,
            },
            min_height,
            true,
            "radial_ripple",
        )
    }

    /// Flow wave with the given start height
    pub fn flow_wave(
        min_height: f64,
        frequency_per_unit_height: f64,
        amplitude_fraction: f64,
    ) -> Result<Self, TextureError> {
        Self::new(
            ModifierKind::FlowWave {
                frequency_per_unit_height,
                amplitude_fraction,
            },
            min_height,
            true,
            "flow_wave",
        )
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the extrusion-only flag
    pub fn with_extrusion_only(mut self, extrusion_only: bool) -> Self {
        self.extrusion_only = extrusion_only;
        self
    }

    /// Configuration tag of this modifier's kind
    pub fn type_tag(&self) -> &'static str {
        self.kind.type_tag()
    }

    /// Check parameter values
    pub fn validate(&self) -> Result<(), TextureError> {
        let invalid = |param: &str, reason: &str| TextureError::InvalidParameter {
            modifier: self.label.clone(),
            param: param.to_string(),
            reason: reason.to_string(),
        };

        if !self.min_height.is_finite() {
            return Err(invalid("min_height", "must be a finite number"));
        }
        for (name, value) in self.kind.parameters() {
            if !value.is_finite() {
                return Err(invalid(name, "must be a finite number"));
            }
        }
        if let ModifierKind::FlowWave {
            amplitude_fraction, ..
        } = self.kind
        {
            if amplitude_fraction <= -1.0 || amplitude_fraction >= 1.0 {
                return Err(invalid(
                    "amplitude_fraction",
                    "must be strictly between -1 and 1",
                ));
            }
        }
        Ok(())
    }

    /// Whether the modifier applies to a move at height `z`
    pub fn applies_to(&self, z: f64, has_extrusion: bool) -> bool {
        z >= self.min_height && (has_extrusion || !self.extrusion_only)
    }

    /// Transform a move target
    ///
    /// The caller is responsible for checking [`Modifier::applies_to`].
    pub fn transform(&self, ctx: &TransformContext, target: &MoveTarget) -> MoveTarget {
        match self.kind {
            ModifierKind::RadialRipple {
                increase_per_unit_height,
                cycles_per_revolution,
            } => {
                let angle = math::angular_position(target.x, target.y);
                let strength = math::height_modulation_strength(
                    target.z,
                    self.min_height,
                    increase_per_unit_height,
                );
                let new_z =
                    target.z + math::radial_z_displacement(strength, angle, cycles_per_revolution);
                let new_e = math::volume_consistent_extrusion(
                    &ctx.position,
                    ctx.extrusion_reference,
                    target,
                    new_z,
                );
                MoveTarget {
                    z: new_z,
                    e: new_e,
                    ..*target
                }
            }
            ModifierKind::FlowWave {
                frequency_per_unit_height,
                amplitude_fraction,
            } => MoveTarget {
                e: math::periodic_flow_modulation(
                    ctx.extrusion_reference,
                    target.e,
                    target.z,
                    self.min_height,
                    frequency_per_unit_height,
                    amplitude_fraction,
                ),
                ..*target
            },
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, from Z{}",
            self.label,
            self.type_tag(),
            self.min_height
        )?;
        if self.extrusion_only {
            write!(f, ", extrusion only")?;
        }
        write!(f, ")")
    }
}
