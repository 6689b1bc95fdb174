//! Error types for the attendance engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Note that punch *rejections* are not errors: a rejected punch is a normal
//! outcome of validation and is returned as a
//! [`PunchDecision`](crate::calculation::PunchDecision). The variants here
//! cover configuration and input faults that prevent the engine from
//! computing at all.

use thiserror::Error;

/// The main error type for the attendance engine.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/attendance.yaml".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Configuration file not found: /missing/attendance.yaml"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A coordinate was outside the valid latitude/longitude ranges.
    #[error("Invalid coordinate ({latitude}, {longitude}): {message}")]
    InvalidCoordinate {
        /// The offending latitude.
        latitude: f64,
        /// The offending longitude.
        longitude: f64,
        /// A description of what made the coordinate invalid.
        message: String,
    },

    /// A configured location used the reserved "Flexible" name.
    ///
    /// The Flexible location is a per-user exemption handled by the
    /// engine itself and cannot be defined as a geofenced zone.
    #[error("Location name '{name}' is reserved and cannot be configured")]
    ReservedLocationName {
        /// The reserved name that was used.
        name: String,
    },

    /// A schedule definition was internally inconsistent.
    #[error("Invalid schedule '{name}': {message}")]
    InvalidSchedule {
        /// The name of the invalid schedule.
        name: String,
        /// A description of what made the schedule invalid.
        message: String,
    },

    /// A named schedule was not found in the configuration.
    #[error("Schedule not found: {name}")]
    ScheduleNotFound {
        /// The schedule name that was not found.
        name: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/attendance.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/attendance.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_coordinate_displays_values() {
        let error = EngineError::InvalidCoordinate {
            latitude: 95.0,
            longitude: 2.0,
            message: "latitude out of range".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid coordinate (95, 2): latitude out of range"
        );
    }

    #[test]
    fn test_reserved_location_name_displays_name() {
        let error = EngineError::ReservedLocationName {
            name: "Flexible".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Location name 'Flexible' is reserved and cannot be configured"
        );
    }

    #[test]
    fn test_invalid_schedule_displays_name_and_message() {
        let error = EngineError::InvalidSchedule {
            name: "night_shift".to_string(),
            message: "per-weekday schedule has no days".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid schedule 'night_shift': per-weekday schedule has no days"
        );
    }

    #[test]
    fn test_schedule_not_found_displays_name() {
        let error = EngineError::ScheduleNotFound {
            name: "standard".to_string(),
        };
        assert_eq!(error.to_string(), "Schedule not found: standard");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> EngineResult<()> {
            Err(EngineError::ScheduleNotFound {
                name: "missing".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
