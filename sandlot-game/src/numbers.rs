//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 and clamp it to the u32 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_u32(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(0.0, max).round();
    cast::<f64, u32>(clamped).unwrap_or(0)
}

/// Floor a unit-interval sample scaled by `bound`, yielding an integer in `[0, bound)`.
///
/// Samples are expected in `[0, 1)`; anything outside is clamped so the
/// result never reaches `bound`.
#[must_use]
pub fn scale_unit_to_u32(sample: f64, bound: u32) -> u32 {
    if bound == 0 || !sample.is_finite() {
        return 0;
    }
    let scaled = (sample.clamp(0.0, 1.0) * f64::from(bound)).floor();
    cast::<f64, u32>(scaled).unwrap_or(0).min(bound - 1)
}

/// Convert a u64 draw into a f64 in `[0, 1)` using its top 53 bits.
#[must_use]
pub fn u64_to_unit_f64(bits: u64) -> f64 {
    let mantissa = cast::<u64, f64>(bits >> 11).unwrap_or(0.0);
    mantissa * (1.0 / 9_007_199_254_740_992.0)
}
