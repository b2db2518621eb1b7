//! Conversions from [`time::Duration`] to the std types the runtime uses.
//!
//! Public APIs take `time::Duration`, which may be negative. These helpers
//! clamp instead of failing:
//!
//! - Zero or negative durations become zero
//! - Durations exceeding `std::time::Duration::MAX` become `MAX`

use std::time::Instant;

/// Converts a signed duration to a std duration, clamping at both ends.
pub(crate) fn to_std(duration: time::Duration) -> std::time::Duration {
    if !duration.is_positive() {
        return std::time::Duration::ZERO;
    }

    duration.try_into().unwrap_or(std::time::Duration::MAX)
}

/// Returns the instant `duration` from now.
///
/// Returns `None` when the instant is not representable, which callers treat as
/// "no deadline".
pub(crate) fn deadline_after(duration: time::Duration) -> Option<Instant> {
    Instant::now().checked_add(to_std(duration))
}
