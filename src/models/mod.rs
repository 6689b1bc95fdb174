//! Core data models for the attendance engine.
//!
//! This module contains all the domain models used throughout the engine.

mod duration;
mod interval;
mod location;
mod punch;
mod schedule;

pub use duration::{decimal_hours, duration_seconds, format_hhmm};
pub use interval::{BreakSegment, IntervalAnomaly, WorkInterval};
pub use location::{FLEXIBLE_LOCATION_NAME, Location};
pub use punch::{GeoPoint, Justification, PunchAction, PunchEdit, PunchRecord};
pub use schedule::{BreakSpec, DayTemplate, Schedule, ScheduleSettings, TimeWindow, WeekdaySchedule};
