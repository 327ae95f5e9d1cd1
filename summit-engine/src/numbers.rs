//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Clamp a value into the unit interval, returning 0.0 for NaN.
#[must_use]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Truncate a f64 toward zero and clamp it to the u32 range, returning 0 for non-finite values.
#[must_use]
pub fn trunc_f64_to_u32(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(0.0, max).trunc();
    cast::<f64, u32>(clamped).unwrap_or(0)
}

/// Convert u32 to f64 in a single location.
#[must_use]
pub fn u32_to_f64(value: u32) -> f64 {
    f64::from(value)
}
