//! Punch records and related types.
//!
//! A punch is a single timestamped attendance event. Punches are immutable
//! once created: a correction produces a new record plus an append-only
//! [`PunchEdit`] audit row, never a silent overwrite.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// The kind of attendance event a punch records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchAction {
    /// Start of a work interval.
    Entrance,
    /// End of a work interval.
    Exit,
    /// Start of a break within an open interval.
    BreakStart,
    /// End of a break within an open interval.
    BreakEnd,
}

impl PunchAction {
    /// Returns `true` for the two break-boundary actions.
    pub fn is_break(self) -> bool {
        matches!(self, PunchAction::BreakStart | PunchAction::BreakEnd)
    }
}

impl std::fmt::Display for PunchAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PunchAction::Entrance => write!(f, "entrance"),
            PunchAction::Exit => write!(f, "exit"),
            PunchAction::BreakStart => write!(f, "break_start"),
            PunchAction::BreakEnd => write!(f, "break_end"),
        }
    }
}

/// A WGS84 coordinate pair in decimal degrees.
///
/// # Example
///
/// ```
/// use attendance_engine::models::GeoPoint;
///
/// let point = GeoPoint::new(40.4168, -3.7038).unwrap();
/// assert!(GeoPoint::new(95.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees, within [-90, 90].
    pub latitude: f64,
    /// Longitude in decimal degrees, within [-180, 180].
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a coordinate pair, validating both components.
    pub fn new(latitude: f64, longitude: f64) -> EngineResult<Self> {
        let point = GeoPoint {
            latitude,
            longitude,
        };
        point.validate()?;
        Ok(point)
    }

    /// Checks that both components are finite and within range.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(EngineError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
                message: "latitude out of range".to_string(),
            });
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(EngineError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
                message: "longitude out of range".to_string(),
            });
        }
        Ok(())
    }
}

/// A single timestamped attendance event for a user.
///
/// Timestamps are UTC instants stored without an offset. Local-time
/// conversion is a presentation concern and never affects duration
/// arithmetic. Records with equal timestamps keep their insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PunchRecord {
    /// Unique identifier for this punch.
    pub id: Uuid,
    /// The user who punched.
    pub user_id: Uuid,
    /// The recorded action.
    pub action: PunchAction,
    /// UTC instant of the event.
    pub timestamp: NaiveDateTime,
    /// Device coordinates at punch time, when available.
    pub coordinates: Option<GeoPoint>,
}

impl PunchRecord {
    /// Creates a new punch record with a fresh identifier.
    pub fn new(
        user_id: Uuid,
        action: PunchAction,
        timestamp: NaiveDateTime,
        coordinates: Option<GeoPoint>,
    ) -> Self {
        PunchRecord {
            id: Uuid::new_v4(),
            user_id,
            action,
            timestamp,
            coordinates,
        }
    }

    /// Applies an audited correction to this punch.
    ///
    /// Returns the corrected record (same id) together with the audit row
    /// holding the pre-edit values. The original record is not mutated;
    /// the storage collaborator replaces it and appends the edit row.
    pub fn apply_edit(
        &self,
        action: PunchAction,
        timestamp: NaiveDateTime,
        coordinates: Option<GeoPoint>,
        editor_id: Uuid,
        edited_at: NaiveDateTime,
    ) -> (PunchRecord, PunchEdit) {
        let edit = PunchEdit {
            id: Uuid::new_v4(),
            punch_id: self.id,
            editor_id,
            edited_at,
            previous_action: self.action,
            previous_timestamp: self.timestamp,
            previous_coordinates: self.coordinates,
        };
        let corrected = PunchRecord {
            id: self.id,
            user_id: self.user_id,
            action,
            timestamp,
            coordinates,
        };
        (corrected, edit)
    }
}

/// Append-only audit row recording the pre-edit state of a punch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PunchEdit {
    /// Unique identifier for the edit row.
    pub id: Uuid,
    /// The punch that was corrected.
    pub punch_id: Uuid,
    /// The user who performed the correction.
    pub editor_id: Uuid,
    /// UTC instant of the correction.
    pub edited_at: NaiveDateTime,
    /// Action before the edit.
    pub previous_action: PunchAction,
    /// Timestamp before the edit.
    pub previous_timestamp: NaiveDateTime,
    /// Coordinates before the edit.
    pub previous_coordinates: Option<GeoPoint>,
}

/// Reason attached to an exit punch that produces unjustified overtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Justification {
    /// Short reason code or label (e.g. "workload peak").
    pub reason: String,
    /// Optional free-form detail.
    #[serde(default)]
    pub detail: Option<String>,
}
