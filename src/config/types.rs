//! Configuration types for the attendance engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use serde::Deserialize;

use crate::models::{Location, Schedule, ScheduleSettings};

fn default_geofence_margin() -> f64 {
    10.0
}

/// Engine-wide settings from `attendance.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// Presentation timezone as minutes east of UTC (e.g. 120 for UTC+2).
    pub timezone_offset_minutes: i32,
    /// Extra slack added to zone radii when resolving a coordinate to a
    /// location, compensating device accuracy. Punch containment checks
    /// stay strict; this only widens resolution.
    #[serde(default = "default_geofence_margin")]
    pub geofence_margin_meters: f64,
    /// Enforcement defaults applied to users without per-user settings.
    #[serde(default)]
    pub defaults: ScheduleSettings,
}

/// Locations configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationsConfig {
    /// Configured geofence zones, in resolution priority order.
    pub locations: Vec<Location>,
}

/// One schedule file under `schedules/`.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedSchedule {
    /// Unique name the schedule is assigned by.
    pub name: String,
    /// The schedule definition.
    pub schedule: Schedule,
    /// Per-schedule enforcement settings, overriding the defaults.
    #[serde(default)]
    pub settings: Option<ScheduleSettings>,
}
