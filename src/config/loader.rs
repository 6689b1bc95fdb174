//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading attendance
//! configurations from YAML files.

use chrono::FixedOffset;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::{BreakSpec, GeoPoint, Location, Schedule, ScheduleSettings, TimeWindow};

use super::types::{EngineSettings, LocationsConfig, NamedSchedule};

/// Loads and provides access to attendance configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and provides methods to query engine settings, locations and
/// schedules.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/attendance/
/// ├── attendance.yaml      # Engine-wide settings
/// ├── locations.yaml       # Geofence zones
/// └── schedules/
///     ├── standard.yaml    # One schedule per file
///     └── rotating.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/attendance").unwrap();
/// let standard = loader.get_schedule("standard").unwrap();
/// println!("Loaded schedule: {}", standard.name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    engine: EngineSettings,
    locations: Vec<Location>,
    schedules: HashMap<String, NamedSchedule>,
    utc_offset: FixedOffset,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if any
    /// required file is missing, contains invalid YAML, or fails
    /// validation (out-of-range coordinates, a reserved location name,
    /// or a malformed schedule).
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let engine_path = path.join("attendance.yaml");
        let engine = Self::load_yaml::<EngineSettings>(&engine_path)?;
        let utc_offset = FixedOffset::east_opt(engine.timezone_offset_minutes * 60).ok_or_else(
            || EngineError::ConfigParseError {
                path: engine_path.display().to_string(),
                message: format!(
                    "timezone_offset_minutes {} is out of range",
                    engine.timezone_offset_minutes
                ),
            },
        )?;
        if !engine.geofence_margin_meters.is_finite() || engine.geofence_margin_meters < 0.0 {
            return Err(EngineError::ConfigParseError {
                path: engine_path.display().to_string(),
                message: "geofence_margin_meters must be a non-negative number".to_string(),
            });
        }

        let locations_path = path.join("locations.yaml");
        let locations_config = Self::load_yaml::<LocationsConfig>(&locations_path)?;
        Self::validate_locations(&locations_path, &locations_config.locations)?;

        let schedules = Self::load_schedules(&path.join("schedules"))?;

        Ok(Self {
            engine,
            locations: locations_config.locations,
            schedules,
            utc_offset,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate_locations(path: &Path, locations: &[Location]) -> EngineResult<()> {
        for location in locations {
            if location.is_flexible() {
                return Err(EngineError::ReservedLocationName {
                    name: location.name.clone(),
                });
            }
            GeoPoint::new(location.latitude, location.longitude)?;
            if !location.radius_meters.is_finite() || location.radius_meters <= 0.0 {
                return Err(EngineError::ConfigParseError {
                    path: path.display().to_string(),
                    message: format!(
                        "location '{}' must have a positive radius",
                        location.name
                    ),
                });
            }
        }
        Ok(())
    }

    /// Loads all schedule files from the schedules directory.
    fn load_schedules(dir: &Path) -> EngineResult<HashMap<String, NamedSchedule>> {
        let dir_str = dir.display().to_string();

        if !dir.exists() {
            return Err(EngineError::ConfigNotFound { path: dir_str });
        }

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut schedules = HashMap::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let named = Self::load_yaml::<NamedSchedule>(&path)?;
                Self::validate_schedule(&named)?;
                if schedules.insert(named.name.clone(), named.clone()).is_some() {
                    return Err(EngineError::InvalidSchedule {
                        name: named.name,
                        message: "duplicate schedule name".to_string(),
                    });
                }
            }
        }

        Ok(schedules)
    }

    fn validate_schedule(named: &NamedSchedule) -> EngineResult<()> {
        let fail = |message: &str| {
            Err(EngineError::InvalidSchedule {
                name: named.name.clone(),
                message: message.to_string(),
            })
        };

        if named.name.trim().is_empty() {
            return fail("schedule name must not be empty");
        }

        let templates: Vec<_> = match &named.schedule {
            Schedule::Uniform { template } => vec![template],
            Schedule::PerWeekday { days } => {
                if days.is_empty() {
                    return fail("per-weekday schedule has no days");
                }
                let mut seen = [false; 7];
                for day in days {
                    let Some(slot) = seen.get_mut(usize::from(day.day_of_week)) else {
                        return fail("day_of_week must be 0 (Monday) through 6 (Sunday)");
                    };
                    if *slot {
                        return fail("duplicate day_of_week");
                    }
                    *slot = true;
                }
                days.iter().map(|d| &d.template).collect()
            }
        };

        for template in templates {
            for window in &template.work_windows {
                Self::validate_window(named, window)?;
            }
            for spec in &template.breaks {
                match spec {
                    BreakSpec::Fixed { window, .. } => Self::validate_window(named, window)?,
                    BreakSpec::Flexible { minutes, .. } => {
                        if *minutes == 0 {
                            return fail("flexible break must be longer than zero minutes");
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn validate_window(named: &NamedSchedule, window: &TimeWindow) -> EngineResult<()> {
        if window.start == window.end {
            return Err(EngineError::InvalidSchedule {
                name: named.name.clone(),
                message: "window start and end must differ".to_string(),
            });
        }
        Ok(())
    }

    /// Engine-wide settings.
    pub fn engine(&self) -> &EngineSettings {
        &self.engine
    }

    /// Configured geofence zones, in resolution priority order.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// The presentation timezone as a fixed offset.
    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    /// Gets a schedule by name.
    pub fn get_schedule(&self, name: &str) -> EngineResult<&NamedSchedule> {
        self.schedules
            .get(name)
            .ok_or_else(|| EngineError::ScheduleNotFound {
                name: name.to_string(),
            })
    }

    /// Enforcement settings for a schedule: its own, or the defaults.
    pub fn settings_for(&self, named: &NamedSchedule) -> ScheduleSettings {
        named.settings.unwrap_or(self.engine.defaults)
    }

    /// Names of all loaded schedules, sorted.
    pub fn schedule_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schedules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_load_sample_configuration() {
        let loader = ConfigLoader::load("./config/attendance").unwrap();

        assert_eq!(loader.engine().timezone_offset_minutes, 120);
        assert_eq!(loader.utc_offset(), FixedOffset::east_opt(2 * 3600).unwrap());
        assert_eq!(loader.engine().geofence_margin_meters, 10.0);
        assert_eq!(loader.locations().len(), 2);
        assert_eq!(loader.schedule_names(), vec!["rotating", "standard"]);
    }

    #[test]
    fn test_standard_schedule_contents() {
        let loader = ConfigLoader::load("./config/attendance").unwrap();
        let standard = loader.get_schedule("standard").unwrap();

        let Schedule::Uniform { template } = &standard.schedule else {
            panic!("expected a uniform schedule");
        };
        assert_eq!(template.work_windows.len(), 1);
        assert_eq!(
            template.work_windows[0].start,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
        assert_eq!(template.breaks.len(), 1);

        let settings = loader.settings_for(standard);
        assert!(settings.enforce_schedule);
        assert_eq!(settings.margin_minutes, 10);
    }

    #[test]
    fn test_rotating_schedule_is_per_weekday() {
        let loader = ConfigLoader::load("./config/attendance").unwrap();
        let rotating = loader.get_schedule("rotating").unwrap();

        let Schedule::PerWeekday { days } = &rotating.schedule else {
            panic!("expected a per-weekday schedule");
        };
        assert!(!days.is_empty());
        // Unconfigured days default to rest days
        assert!(days.len() < 7);

        // No per-schedule settings: the engine defaults apply
        let settings = loader.settings_for(rotating);
        assert!(!settings.enforce_schedule);
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let result = ConfigLoader::load("./config/does-not-exist");
        assert!(matches!(result, Err(EngineError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_unknown_schedule_name() {
        let loader = ConfigLoader::load("./config/attendance").unwrap();
        let result = loader.get_schedule("night-shift");
        assert!(matches!(
            result,
            Err(EngineError::ScheduleNotFound { name }) if name == "night-shift"
        ));
    }

    #[test]
    fn test_reserved_location_name_is_rejected() {
        let flexible = Location {
            name: "flexible".to_string(),
            latitude: 40.0,
            longitude: -3.0,
            radius_meters: 50.0,
        };
        let result =
            ConfigLoader::validate_locations(Path::new("locations.yaml"), &[flexible]);
        assert!(matches!(
            result,
            Err(EngineError::ReservedLocationName { name }) if name == "flexible"
        ));
    }

    #[test]
    fn test_out_of_range_coordinate_is_rejected() {
        let broken = Location {
            name: "Broken".to_string(),
            latitude: 91.0,
            longitude: 0.0,
            radius_meters: 50.0,
        };
        let result = ConfigLoader::validate_locations(Path::new("locations.yaml"), &[broken]);
        assert!(matches!(result, Err(EngineError::InvalidCoordinate { .. })));
    }

    #[test]
    fn test_duplicate_weekday_is_rejected() {
        let yaml = r#"
name: broken
schedule:
  mode: per_weekday
  days:
    - day_of_week: 0
      template:
        work_windows:
          - start: "09:00:00"
            end: "17:00:00"
    - day_of_week: 0
      template:
        work_windows:
          - start: "10:00:00"
            end: "18:00:00"
"#;
        let named: NamedSchedule = serde_yaml::from_str(yaml).unwrap();
        let result = ConfigLoader::validate_schedule(&named);
        assert!(matches!(
            result,
            Err(EngineError::InvalidSchedule { message, .. }) if message == "duplicate day_of_week"
        ));
    }

    #[test]
    fn test_out_of_range_weekday_is_rejected() {
        let yaml = r#"
name: broken
schedule:
  mode: per_weekday
  days:
    - day_of_week: 7
      template:
        work_windows:
          - start: "09:00:00"
            end: "17:00:00"
"#;
        let named: NamedSchedule = serde_yaml::from_str(yaml).unwrap();
        assert!(ConfigLoader::validate_schedule(&named).is_err());
    }

    #[test]
    fn test_zero_length_window_is_rejected() {
        let yaml = r#"
name: broken
schedule:
  mode: uniform
  template:
    work_windows:
      - start: "09:00:00"
        end: "09:00:00"
"#;
        let named: NamedSchedule = serde_yaml::from_str(yaml).unwrap();
        assert!(ConfigLoader::validate_schedule(&named).is_err());
    }
}
