//! Geographic coordinates.

use serde::{Deserialize, Serialize};

use crate::error::{LocationError, LocationResult};

/// A WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Create coordinates without range checks.
    ///
    /// Callers are expected to pass `-90..=90` latitude and `-180..=180`
    /// longitude; use [`Coordinates::try_new`] for untrusted input.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Create coordinates, rejecting values outside the WGS84 range.
    pub fn try_new(lat: f64, lon: f64) -> LocationResult<Self> {
        let coords = Self { lat, lon };
        if coords.is_valid() {
            Ok(coords)
        } else {
            Err(LocationError::InvalidCoordinates { lat, lon })
        }
    }

    /// Whether both components are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}
