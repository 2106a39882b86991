//! Great-circle distance.

use crate::types::coordinates::Coordinates;

const EARTH_RADIUS_KM: f64 = 6371.0;
const MILES_PER_KM: f64 = 0.621371;

/// Calculate distance between two coordinates in kilometers
///
/// Uses Haversine formula for accuracy on Earth's surface. Inputs are
/// expected within the WGS84 range; out-of-range values are not rejected.
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push near-antipodal points just past 1.0
    let h = h.min(1.0);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Calculate distance between two coordinates in miles
pub fn distance_miles(a: Coordinates, b: Coordinates) -> f64 {
    distance_km(a, b) * MILES_PER_KM
}
