//! Geofence containment and location resolution.
//!
//! Containment uses great-circle (haversine) distance between the punch
//! coordinate and the zone center. Malformed coordinates are rejected
//! upstream by [`GeoPoint::validate`](crate::models::GeoPoint::validate);
//! these functions assume valid input and have no error conditions.

use crate::models::{GeoPoint, Location};

/// Mean Earth radius in meters, as used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two coordinates.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::haversine_distance_m;
/// use attendance_engine::models::GeoPoint;
///
/// let madrid = GeoPoint::new(40.4168, -3.7038).unwrap();
/// let barcelona = GeoPoint::new(41.3874, 2.1686).unwrap();
/// let km = haversine_distance_m(madrid, barcelona) / 1000.0;
/// assert!((km - 505.0).abs() < 5.0);
/// ```
pub fn haversine_distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let rlat1 = a.latitude.to_radians();
    let rlat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + rlat1.cos() * rlat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Whether a coordinate lies inside a zone, strictly by its radius.
pub fn within_radius(point: GeoPoint, location: &Location) -> bool {
    haversine_distance_m(point, location.center()) <= location.radius_meters
}

/// Resolves the zone containing a coordinate, in caller priority order.
///
/// Returns the first candidate whose radius (plus `margin_meters` of
/// slack) contains the point. The reserved Flexible zone never matches by
/// coordinate and is skipped, as are zones with a non-positive effective
/// radius.
pub fn resolve_location<'a>(
    point: GeoPoint,
    candidates: &'a [Location],
    margin_meters: f64,
) -> Option<&'a Location> {
    candidates.iter().find(|loc| {
        if loc.is_flexible() {
            return false;
        }
        let effective_radius = loc.radius_meters + margin_meters;
        if effective_radius <= 0.0 {
            return false;
        }
        haversine_distance_m(point, loc.center()) <= effective_radius
    })
}
