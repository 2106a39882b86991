//! Resolution strategies and the first-success combinator.
//!
//! Each strategy either produces a selection or yields to the next one.
//! Strategies swallow their own errors; they never abort the chain.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::LocationError;
use crate::traits::location::{
    GpsProvider, LocationStore, PermissionGateway, PermissionStatus, ReverseGeocoder,
};
use crate::types::{
    coordinates::Coordinates,
    location::{LocationSelection, PersistedLocation},
};

/// One step of the location fallback chain.
#[async_trait]
pub trait ResolutionStrategy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Try to produce a selection. `None` hands over to the next strategy.
    async fn attempt(&self) -> Option<LocationSelection>;
}

/// Run strategies in order; the first `Some` wins.
///
/// Falls back to [`LocationSelection::Global`] when every strategy yields.
pub async fn first_success(strategies: &[Box<dyn ResolutionStrategy>]) -> LocationSelection {
    for strategy in strategies {
        if let Some(selection) = strategy.attempt().await {
            info!(
                strategy = strategy.name(),
                selection = selection.kind(),
                display_name = selection.display_name().unwrap_or_default(),
                "Resolved active location"
            );
            return selection;
        }
        debug!(strategy = strategy.name(), "Strategy yielded, trying next");
    }

    info!("No location available, using global feed");
    LocationSelection::Global
}

/// Live GPS fix with a reverse-geocoded name.
///
/// On success the location is also persisted so that later sessions can
/// fall back to it when GPS is unavailable.
pub struct DeviceLocationStrategy {
    permissions: Arc<dyn PermissionGateway>,
    gps: Arc<dyn GpsProvider>,
    geocoder: Arc<dyn ReverseGeocoder>,
    store: Arc<dyn LocationStore>,
}

impl DeviceLocationStrategy {
    pub fn new(
        permissions: Arc<dyn PermissionGateway>,
        gps: Arc<dyn GpsProvider>,
        geocoder: Arc<dyn ReverseGeocoder>,
        store: Arc<dyn LocationStore>,
    ) -> Self {
        Self {
            permissions,
            gps,
            geocoder,
            store,
        }
    }

    async fn read_position(&self) -> Result<Coordinates, LocationError> {
        let coordinates = self.gps.current_position().await?;
        if !coordinates.is_valid() {
            return Err(LocationError::PositionUnavailable(format!(
                "fix out of range: ({}, {})",
                coordinates.lat, coordinates.lon
            )));
        }
        Ok(coordinates)
    }
}

#[async_trait]
impl ResolutionStrategy for DeviceLocationStrategy {
    fn name(&self) -> &'static str {
        "device"
    }

    async fn attempt(&self) -> Option<LocationSelection> {
        match self.permissions.request_foreground_permission().await {
            Ok(PermissionStatus::Granted) => {}
            Ok(PermissionStatus::Denied) => {
                debug!("Location permission denied");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Location permission request failed");
                return None;
            }
        }

        let coordinates = match self.read_position().await {
            Ok(coordinates) => coordinates,
            Err(e) => {
                warn!(error = %e, "Could not read current position");
                return None;
            }
        };

        let place = match self.geocoder.reverse_geocode(coordinates).await {
            Ok(place) => place,
            Err(e) => {
                warn!(error = %e, "Reverse geocoding failed");
                return None;
            }
        };

        let Some(display_name) = place.display_name() else {
            let e = LocationError::GeocodeFailure("no place name for position".into());
            warn!(error = %e, lat = coordinates.lat, lon = coordinates.lon, "Reverse geocoding failed");
            return None;
        };

        let saved = PersistedLocation::new(display_name.clone(), Some(coordinates))
            .with_place(place.clone());
        if let Err(e) = self.store.save(&saved).await {
            warn!(error = %e, "Failed to persist current location");
        }

        Some(LocationSelection::Current {
            coordinates,
            display_name,
            place,
        })
    }
}

/// The location saved by an earlier session or by manual entry.
pub struct SavedLocationStrategy {
    store: Arc<dyn LocationStore>,
}

impl SavedLocationStrategy {
    pub fn new(store: Arc<dyn LocationStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ResolutionStrategy for SavedLocationStrategy {
    fn name(&self) -> &'static str {
        "saved"
    }

    async fn attempt(&self) -> Option<LocationSelection> {
        match self.store.load().await {
            Ok(Some(mut saved)) => {
                if saved.coordinates.is_some_and(|c| !c.is_valid()) {
                    warn!(
                        display_name = %saved.display_name,
                        "Discarding out-of-range saved coordinates"
                    );
                    saved.coordinates = None;
                }
                Some(saved.into())
            }
            Ok(None) => {
                debug!("No saved location");
                None
            }
            Err(e) => {
                warn!(error = %e, "Could not read saved location");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<LocationSelection>);

    #[async_trait]
    impl ResolutionStrategy for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn attempt(&self) -> Option<LocationSelection> {
            self.0.clone()
        }
    }

    fn selected(name: &str) -> LocationSelection {
        PersistedLocation::new(name, None).into()
    }

    #[tokio::test]
    async fn test_first_success_takes_first_some() {
        let strategies: Vec<Box<dyn ResolutionStrategy>> = vec![
            Box::new(Fixed(None)),
            Box::new(Fixed(Some(selected("Austin, TX")))),
            Box::new(Fixed(Some(selected("Boise, ID")))),
        ];

        let selection = first_success(&strategies).await;
        assert_eq!(selection.display_name(), Some("Austin, TX"));
    }

    #[tokio::test]
    async fn test_first_success_falls_back_to_global() {
        let strategies: Vec<Box<dyn ResolutionStrategy>> =
            vec![Box::new(Fixed(None)), Box::new(Fixed(None))];
        assert_eq!(first_success(&strategies).await, LocationSelection::Global);

        assert_eq!(first_success(&[]).await, LocationSelection::Global);
    }
}
