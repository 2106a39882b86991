//! Fixed-position device for hosts without location hardware.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{LocationError, LocationResult};
use crate::resolver::LocationServices;
use crate::traits::location::{
    GpsProvider, LocationStore, PermissionGateway, PermissionStatus, ReverseGeocoder,
};
use crate::types::{coordinates::Coordinates, location::PlaceName};

/// Reports a configured position and place name.
///
/// Permission is granted only when a position is configured, so an
/// unconfigured device behaves like a user who declined location access.
#[derive(Debug, Clone, Default)]
pub struct StaticDevice {
    position: Option<Coordinates>,
    place: PlaceName,
}

impl StaticDevice {
    /// A device with no position.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn at(position: Coordinates, place: PlaceName) -> Self {
        Self {
            position: Some(position),
            place,
        }
    }

    /// Wire this device and `store` into the standard resolution chain.
    pub fn services(self, store: Arc<dyn LocationStore>) -> LocationServices {
        let device = Arc::new(self);
        LocationServices {
            permissions: device.clone(),
            gps: device.clone(),
            geocoder: device,
            store,
        }
    }
}

#[async_trait]
impl PermissionGateway for StaticDevice {
    async fn request_foreground_permission(&self) -> LocationResult<PermissionStatus> {
        Ok(if self.position.is_some() {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        })
    }
}

#[async_trait]
impl GpsProvider for StaticDevice {
    async fn current_position(&self) -> LocationResult<Coordinates> {
        self.position
            .ok_or_else(|| LocationError::PositionUnavailable("no position configured".into()))
    }
}

#[async_trait]
impl ReverseGeocoder for StaticDevice {
    async fn reverse_geocode(&self, _coordinates: Coordinates) -> LocationResult<PlaceName> {
        if self.place.display_name().is_some() {
            Ok(self.place.clone())
        } else {
            Err(LocationError::GeocodeFailure("no place configured".into()))
        }
    }
}
