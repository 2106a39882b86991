//! Typed errors for the discovery pipeline.
//!
//! Location errors never escape the resolver: every one of them has a
//! fallback step. Content errors surface only as a user notice. The
//! top-level [`DiscoveryError`] covers the few things a caller can get wrong.

use thiserror::Error;

/// Failures of the device and persistence collaborators used during
/// location resolution.
#[derive(Debug, Clone, Error)]
pub enum LocationError {
    /// The user declined foreground location access
    #[error("location permission denied")]
    PermissionDenied,

    /// GPS fix could not be obtained
    #[error("position unavailable: {0}")]
    PositionUnavailable(String),

    /// Reverse geocoding failed or produced no usable name
    #[error("reverse geocode failed: {0}")]
    GeocodeFailure(String),

    /// Saved location could not be read
    #[error("failed to read saved location: {0}")]
    PersistenceReadFailure(String),

    /// Saved location could not be written
    #[error("failed to save location: {0}")]
    PersistenceWriteFailure(String),

    /// Latitude/longitude outside the WGS84 range
    #[error("invalid coordinates: lat={lat}, lon={lon}")]
    InvalidCoordinates { lat: f64, lon: f64 },
}

/// Failures of the content document store.
#[derive(Debug, Clone, Error)]
pub enum ContentError {
    /// The store query failed
    #[error("content fetch failed: {0}")]
    FetchFailure(String),
}

impl From<std::io::Error> for ContentError {
    fn from(err: std::io::Error) -> Self {
        ContentError::FetchFailure(err.to_string())
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(err: serde_json::Error) -> Self {
        ContentError::FetchFailure(format!("malformed content document: {}", err))
    }
}

/// Errors returned to callers of the controller.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Radius must be a positive, finite number of miles
    #[error("invalid radius: {0} miles")]
    InvalidRadius(f64),

    /// A manually entered location had no name
    #[error("location name is empty")]
    EmptyLocationName,

    /// Operation was cancelled before completing
    #[error("operation cancelled")]
    Cancelled,

    /// A location value was rejected
    #[error("location error: {0}")]
    Location(#[from] LocationError),
}

/// Result type alias for location collaborators.
pub type LocationResult<T> = std::result::Result<T, LocationError>;

/// Result type alias for content collaborators.
pub type ContentResult<T> = std::result::Result<T, ContentError>;

/// Result type alias for controller operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
