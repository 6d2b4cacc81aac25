//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 to the nearest whole number and convert it to u64.
///
/// Returns `None` for non-finite or negative values; values above the u64
/// range saturate.
#[must_use]
pub fn round_f64_to_u64(value: f64) -> Option<u64> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let max = cast::<u64, f64>(u64::MAX).unwrap_or(f64::MAX);
    let clamped = value.min(max).round();
    Some(cast::<f64, u64>(clamped).unwrap_or(u64::MAX))
}

/// Convert u64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(0.0)
}

/// Share of `part` in `whole` as a percentage clamped to 0..=100.
#[must_use]
pub fn percent_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (u64_to_f64(part) / u64_to_f64(whole) * 100.0).clamp(0.0, 100.0)
}

/// Convert a millisecond timestamp to u64, mapping pre-epoch values to zero.
#[must_use]
pub fn millis_to_u64(millis: i64) -> u64 {
    u64::try_from(millis).unwrap_or(0)
}
