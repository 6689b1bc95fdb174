//! Geofenced locations.

use serde::{Deserialize, Serialize};

use super::punch::GeoPoint;

/// Reserved name of the location that matches any coordinate.
///
/// A user assigned a location with this name (case-insensitive) bypasses
/// geofence validation entirely. It cannot be created, edited or deleted
/// through normal configuration.
pub const FLEXIBLE_LOCATION_NAME: &str = "Flexible";

/// A named circular geofence zone.
///
/// # Example
///
/// ```
/// use attendance_engine::models::Location;
///
/// let office = Location {
///     name: "Headquarters".to_string(),
///     latitude: 40.4168,
///     longitude: -3.7038,
///     radius_meters: 100.0,
/// };
/// assert!(!office.is_flexible());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Display name of the zone.
    pub name: String,
    /// Latitude of the zone center in decimal degrees.
    pub latitude: f64,
    /// Longitude of the zone center in decimal degrees.
    pub longitude: f64,
    /// Radius of the zone in meters.
    pub radius_meters: f64,
}

impl Location {
    /// The reserved any-coordinate location.
    pub fn flexible() -> Self {
        Location {
            name: FLEXIBLE_LOCATION_NAME.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            radius_meters: 0.0,
        }
    }

    /// Returns `true` if this is the reserved any-coordinate location.
    pub fn is_flexible(&self) -> bool {
        self.name.eq_ignore_ascii_case(FLEXIBLE_LOCATION_NAME)
    }

    /// The center of the zone as a coordinate pair.
    pub fn center(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}
