//! Numeric helpers shared by the shaper, noise generator and continuity buffer.

pub mod curve;
pub mod ramp;

/// Largest positive 16-bit sample value, as a float.
pub const FULL_SCALE: f64 = i16::MAX as f64;

/// Round to the nearest integer and clamp to the signed 16-bit range.
/// Out-of-range values saturate, they never wrap.
#[inline]
pub fn saturate_i16(value: f64) -> i16 {
    value.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
}
