//! Testing utilities including mock implementations.
//!
//! These are useful for testing hosts of the discovery pipeline without a
//! real device, location database or document store. Every mock is cheap
//! to clone; clones share state so a test can keep a handle for assertions
//! after handing one to the code under test.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::error::{ContentError, ContentResult, LocationError, LocationResult};
use crate::resolver::LocationServices;
use crate::traits::{
    content::{ContentStore, Notice, Notifier},
    location::{GpsProvider, LocationStore, PermissionGateway, PermissionStatus, ReverseGeocoder},
};
use crate::types::{
    content::ContentItem,
    coordinates::Coordinates,
    location::{PersistedLocation, PlaceName},
};

/// Record of a call made to the mock device.
#[derive(Debug, Clone, PartialEq)]
pub enum MockDeviceCall {
    RequestPermission,
    CurrentPosition,
    ReverseGeocode { coordinates: Coordinates },
}

#[derive(Debug, Clone)]
struct DeviceScript {
    permission: Result<PermissionStatus, LocationError>,
    position: Result<Coordinates, LocationError>,
    place: Result<PlaceName, LocationError>,
}

/// A scriptable device: permission gateway, GPS and geocoder in one.
///
/// Each call yields to the executor once before answering, like real
/// platform I/O, so overlapping calls can be observed.
#[derive(Clone)]
pub struct MockDevice {
    script: Arc<RwLock<DeviceScript>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockDeviceCall>>>,
}

impl MockDevice {
    /// Permission granted, fix at `position`, geocoding to `place`.
    pub fn granted_at(position: Coordinates, place: PlaceName) -> Self {
        Self::from_script(DeviceScript {
            permission: Ok(PermissionStatus::Granted),
            position: Ok(position),
            place: Ok(place),
        })
    }

    /// Permission denied. GPS and geocoder would fail if called.
    pub fn denied() -> Self {
        Self::from_script(DeviceScript {
            permission: Ok(PermissionStatus::Denied),
            position: Err(LocationError::PermissionDenied),
            place: Err(LocationError::PermissionDenied),
        })
    }

    fn from_script(script: DeviceScript) -> Self {
        Self {
            script: Arc::new(RwLock::new(script)),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Make the permission request itself fail.
    pub fn with_permission_error(self, error: LocationError) -> Self {
        self.script.write().unwrap().permission = Err(error);
        self
    }

    /// Make GPS reads fail.
    pub fn with_gps_error(self, error: LocationError) -> Self {
        self.script.write().unwrap().position = Err(error);
        self
    }

    /// Make reverse geocoding fail.
    pub fn with_geocode_error(self, error: LocationError) -> Self {
        self.script.write().unwrap().place = Err(error);
        self
    }

    /// Wire this device and `store` into the standard resolution chain.
    pub fn services(&self, store: Arc<dyn LocationStore>) -> LocationServices {
        let device = Arc::new(self.clone());
        LocationServices {
            permissions: device.clone(),
            gps: device.clone(),
            geocoder: device,
            store,
        }
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockDeviceCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn permission_call_count(&self) -> usize {
        self.count(|c| matches!(c, MockDeviceCall::RequestPermission))
    }

    pub fn gps_call_count(&self) -> usize {
        self.count(|c| matches!(c, MockDeviceCall::CurrentPosition))
    }

    pub fn geocode_call_count(&self) -> usize {
        self.count(|c| matches!(c, MockDeviceCall::ReverseGeocode { .. }))
    }

    fn count(&self, pred: impl Fn(&MockDeviceCall) -> bool) -> usize {
        self.calls.read().unwrap().iter().filter(|&c| pred(c)).count()
    }

    fn record(&self, call: MockDeviceCall) {
        self.calls.write().unwrap().push(call);
    }
}

#[async_trait]
impl PermissionGateway for MockDevice {
    async fn request_foreground_permission(&self) -> LocationResult<PermissionStatus> {
        self.record(MockDeviceCall::RequestPermission);
        tokio::task::yield_now().await;
        self.script.read().unwrap().permission.clone()
    }
}

#[async_trait]
impl GpsProvider for MockDevice {
    async fn current_position(&self) -> LocationResult<Coordinates> {
        self.record(MockDeviceCall::CurrentPosition);
        tokio::task::yield_now().await;
        self.script.read().unwrap().position.clone()
    }
}

#[async_trait]
impl ReverseGeocoder for MockDevice {
    async fn reverse_geocode(&self, coordinates: Coordinates) -> LocationResult<PlaceName> {
        self.record(MockDeviceCall::ReverseGeocode { coordinates });
        tokio::task::yield_now().await;
        self.script.read().unwrap().place.clone()
    }
}

/// A location store whose reads and writes can be made to fail.
#[derive(Clone, Default)]
pub struct MockLocationStore {
    location: Arc<RwLock<Option<PersistedLocation>>>,
    fail_reads: bool,
    fail_writes: bool,
    saves: Arc<RwLock<Vec<PersistedLocation>>>,
}

impl MockLocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(location: PersistedLocation) -> Self {
        Self {
            location: Arc::new(RwLock::new(Some(location))),
            ..Self::default()
        }
    }

    /// Every `load` fails with a read error.
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Every `save` fails with a write error.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Currently saved location.
    pub fn saved(&self) -> Option<PersistedLocation> {
        self.location.read().unwrap().clone()
    }

    /// Every location passed to `save`, including failed attempts.
    pub fn saves(&self) -> Vec<PersistedLocation> {
        self.saves.read().unwrap().clone()
    }
}

#[async_trait]
impl LocationStore for MockLocationStore {
    async fn save(&self, location: &PersistedLocation) -> LocationResult<()> {
        self.saves.write().unwrap().push(location.clone());
        if self.fail_writes {
            return Err(LocationError::PersistenceWriteFailure("mock write failure".into()));
        }
        *self.location.write().unwrap() = Some(location.clone());
        Ok(())
    }

    async fn load(&self) -> LocationResult<Option<PersistedLocation>> {
        if self.fail_reads {
            return Err(LocationError::PersistenceReadFailure("mock read failure".into()));
        }
        Ok(self.saved())
    }
}

/// A content store with swappable contents and failure injection.
#[derive(Clone, Default)]
pub struct MockContentStore {
    items: Arc<RwLock<Vec<ContentItem>>>,
    failure: Arc<RwLock<Option<String>>>,
    fetches: Arc<RwLock<usize>>,
}

impl MockContentStore {
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
            ..Self::default()
        }
    }

    /// A store whose fetches fail with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        let store = Self::default();
        store.set_failure(Some(message.into()));
        store
    }

    /// Replace the contents.
    pub fn set_items(&self, items: Vec<ContentItem>) {
        *self.items.write().unwrap() = items;
    }

    /// Make fetches fail (`Some`) or succeed (`None`).
    pub fn set_failure(&self, message: Option<String>) {
        *self.failure.write().unwrap() = message;
    }

    /// Number of `fetch_all` calls so far.
    pub fn fetch_count(&self) -> usize {
        *self.fetches.read().unwrap()
    }
}

#[async_trait]
impl ContentStore for MockContentStore {
    async fn fetch_all(&self) -> ContentResult<Vec<ContentItem>> {
        *self.fetches.write().unwrap() += 1;
        tokio::task::yield_now().await;

        if let Some(message) = self.failure.read().unwrap().clone() {
            return Err(ContentError::FetchFailure(message));
        }
        Ok(self.items.read().unwrap().clone())
    }
}

/// Collects notices for assertions.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<RwLock<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.read().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.notices.read().unwrap().len()
    }

    /// Number of "no results within radius" notices.
    pub fn no_results_count(&self) -> usize {
        self.notices
            .read()
            .unwrap()
            .iter()
            .filter(|n| matches!(n, Notice::NoResultsWithinRadius { .. }))
            .count()
    }

    pub fn clear(&self) {
        self.notices.write().unwrap().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.write().unwrap().push(notice.clone());
    }
}
