//! Geometry and flow math
//!
//! Pure functions used by the texture modifiers. Angles are in radians and
//! the part centre is assumed to sit at the XY origin.

use std::f64::consts::TAU;

use gcodetexture_core::{MoveTarget, Position};

/// Azimuth of an XY point around the origin, in `(-π, π]`
pub fn angular_position(x: f64, y: f64) -> f64 {
    y.atan2(x)
}

/// Modulation strength at height `z`
///
/// Zero at `min_height` and negative below it; callers gate on height.
pub fn height_modulation_strength(z: f64, min_height: f64, rate_per_unit_height: f64) -> f64 {
    (z - min_height) * rate_per_unit_height
}

/// Z offset of a radial ripple with `cycles` periods per revolution
pub fn radial_z_displacement(strength: f64, angle: f64, cycles: f64) -> f64 {
    strength * (angle * cycles).sin()
}

/// Ratio of the modified move length to the original move length
///
/// A zero-length original move has ratio 1.
pub fn move_distance_ratio(from: &Position, original: &Position, modified: &Position) -> f64 {
    let original_length = from.distance_to(original);
    if original_length == 0.0 {
        tracing::trace!("degenerate move at {}, keeping extrusion", from);
        return 1.0;
    }
    from.distance_to(modified) / original_length
}

/// Extrusion for a move whose Z changed, keeping material per unit length
///
/// Returns `original.e` unchanged when `new_z` equals the original Z.
pub fn volume_consistent_extrusion(
    current: &Position,
    current_e: f64,
    original: &MoveTarget,
    new_z: f64,
) -> f64 {
    if new_z == original.z {
        return original.e;
    }
    let target = original.position();
    let ratio = move_distance_ratio(current, &target, &target.with_z(new_z));
    current_e + (original.e - current_e) * ratio
}

/// Extrusion scaled by a height-periodic factor `1 + amplitude × sin(phase)`
pub fn periodic_flow_modulation(
    current_e: f64,
    original_e: f64,
    z: f64,
    start_z: f64,
    frequency_per_unit_height: f64,
    amplitude_fraction: f64,
) -> f64 {
    let phase = TAU * frequency_per_unit_height * (z - start_z);
    current_e + (1.0 + amplitude_fraction * phase.sin()) * (original_e - current_e)
}
