//! Calculation logic for the attendance engine.
//!
//! This module contains the computation core: geofence containment and
//! location resolution, theoretical schedule evaluation for a calendar
//! date, punch sequence validation, interval reconstruction from raw
//! punches, break and overtime annotation, and period aggregation.

mod aggregate;
mod geofence;
mod intervals;
mod overtime;
mod schedule;
mod validator;

pub use aggregate::{Granularity, PeriodKey, PeriodSummary, PeriodTotals, summarize, to_local, totals};
pub use geofence::{EARTH_RADIUS_M, haversine_distance_m, resolve_location, within_radius};
pub use intervals::build_intervals;
pub use overtime::{IntervalAnnotation, annotate};
pub use schedule::{TheoreticalBreak, TheoreticalDay, theoretical_day};
pub use validator::{
    PunchDecision, PunchProposal, PunchState, RejectReason, ValidationContext, derive_state,
    validate_punch,
};
