//! Duration presentation helpers.
//!
//! Duration arithmetic inside the engine stays in [`TimeDelta`]; these
//! helpers exist for the reporting boundary (HH:MM labels, decimal hours)
//! and for serializing durations as whole seconds.

use chrono::TimeDelta;
use rust_decimal::Decimal;

/// Formats a duration as `HH:MM`, minutes truncated.
///
/// Negative durations are prefixed with `-`.
///
/// # Example
///
/// ```
/// use attendance_engine::models::format_hhmm;
/// use chrono::TimeDelta;
///
/// assert_eq!(format_hhmm(TimeDelta::minutes(510)), "08:30");
/// assert_eq!(format_hhmm(TimeDelta::minutes(-90)), "-01:30");
/// ```
pub fn format_hhmm(duration: TimeDelta) -> String {
    let total_seconds = duration.num_seconds();
    let sign = if total_seconds < 0 { "-" } else { "" };
    let total_seconds = total_seconds.abs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    format!("{}{:02}:{:02}", sign, hours, minutes)
}

/// Converts a duration to decimal hours with minute precision.
///
/// # Example
///
/// ```
/// use attendance_engine::models::decimal_hours;
/// use chrono::TimeDelta;
/// use rust_decimal::Decimal;
///
/// assert_eq!(decimal_hours(TimeDelta::minutes(450)), Decimal::new(75, 1)); // 7.5
/// ```
pub fn decimal_hours(duration: TimeDelta) -> Decimal {
    Decimal::new(duration.num_minutes(), 0) / Decimal::new(60, 0)
}

/// Serde adapter serializing a [`TimeDelta`] as whole seconds.
pub mod duration_seconds {
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes the duration as its whole-second count.
    pub fn serialize<S: Serializer>(value: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.num_seconds())
    }

    /// Deserializes a whole-second count back into a duration.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        let seconds = i64::deserialize(deserializer)?;
        Ok(TimeDelta::seconds(seconds))
    }
}
