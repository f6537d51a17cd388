//! Fixed-precision number formatting
//!
//! Rewritten G-code words use a fixed number of decimals: positions are
//! written with 3 decimal places and extrusion with 4. Change detection is
//! done at the same precision so that a value is only rewritten when the
//! difference would be visible in the output.

/// Decimal places used for X, Y and Z words
pub const POSITION_DECIMALS: usize = 3;

/// Decimal places used for E words
pub const EXTRUSION_DECIMALS: usize = 4;

/// Format a value with a fixed number of decimal places
///
/// Negative zero (including values that round to zero from below) is
/// written without a sign.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);
    match formatted.strip_prefix('-') {
        Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_string(),
        _ => formatted,
    }
}

/// Format an axis value (3 decimal places)
pub fn format_position(value: f64) -> String {
    format_fixed(value, POSITION_DECIMALS)
}

/// Format an extrusion value (4 decimal places)
pub fn format_extrusion(value: f64) -> String {
    format_fixed(value, EXTRUSION_DECIMALS)
}

/// Check whether two values print identically at the given precision
pub fn same_at_precision(a: f64, b: f64, decimals: usize) -> bool {
    format_fixed(a, decimals) == format_fixed(b, decimals)
}
