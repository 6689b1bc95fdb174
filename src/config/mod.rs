//! Configuration loading and management for the attendance engine.
//!
//! This module provides functionality to load attendance configurations
//! from YAML files: engine-wide settings, geofence zones and named
//! schedules.
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/attendance").unwrap();
//! println!("Loaded {} locations", config.locations().len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EngineSettings, LocationsConfig, NamedSchedule};
