//! Device and persistence collaborators used during location resolution.
//!
//! Every call here is independently fallible. The resolver treats any
//! error as "this step produced nothing" and moves on to the next step.

use async_trait::async_trait;

use crate::error::LocationResult;
use crate::types::{
    coordinates::Coordinates,
    location::{PersistedLocation, PlaceName},
};

/// Outcome of a foreground location permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Grants or refuses access to the device location.
#[async_trait]
pub trait PermissionGateway: Send + Sync {
    /// Ask for foreground location access, prompting the user if needed.
    async fn request_foreground_permission(&self) -> LocationResult<PermissionStatus>;
}

/// Reads the device position.
#[async_trait]
pub trait GpsProvider: Send + Sync {
    /// Current position fix.
    async fn current_position(&self) -> LocationResult<Coordinates>;
}

/// Converts coordinates into a place name.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse_geocode(&self, coordinates: Coordinates) -> LocationResult<PlaceName>;
}

/// Key-value persistence for the user's saved location.
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Overwrite the saved location.
    async fn save(&self, location: &PersistedLocation) -> LocationResult<()>;

    /// Saved location, or `None` if nothing was ever saved.
    async fn load(&self) -> LocationResult<Option<PersistedLocation>>;
}
