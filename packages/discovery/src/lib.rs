//! Location resolution and proximity filtering for the Discover feed.
//!
//! Decides which location the feed is filtered by (current GPS fix, then
//! the previously saved location, then no restriction at all) and which
//! content items are near it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use discovery::{DiscoveryConfig, DiscoveryFilterController, StaticDevice, TracingNotifier};
//! use discovery::stores::{MemoryContentStore, MemoryLocationStore};
//!
//! let device = StaticDevice::at(Coordinates::new(30.27, -97.74), PlaceName::parse("Austin, TX"));
//! let mut controller = DiscoveryFilterController::new(
//!     device.services(Arc::new(MemoryLocationStore::new())),
//!     Arc::new(MemoryContentStore::new(items)),
//!     Arc::new(TracingNotifier),
//!     DiscoveryConfig::default(),
//! )?;
//!
//! let view = controller.load().await;
//!
//! // Radius changes are applied explicitly
//! controller.set_radius(10.0)?;
//! let view = controller.refilter();
//! ```
//!
//! # Modules
//!
//! - [`geo`] - Haversine distance
//! - [`resolver`] - Location fallback chain with an idempotency guard
//! - [`matcher`] - Radius and location-label filtering
//! - [`controller`] - Feed orchestration, empty-result fallback, notices
//! - [`traits`] - Device, persistence, content and notifier interfaces
//! - [`stores`] - In-memory and JSON file stores
//! - [`testing`] - Mock implementations for testing

pub mod controller;
pub mod device;
pub mod error;
pub mod geo;
pub mod matcher;
pub mod notify;
pub mod resolver;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use controller::{DiscoveryFilterController, DiscoveryView};
pub use device::StaticDevice;
pub use error::{ContentError, DiscoveryError, LocationError};
pub use geo::{distance_km, distance_miles};
pub use matcher::{filter_content, normalize_location, FilterOutcome, LabelQuery, MatchMode};
pub use notify::TracingNotifier;
pub use resolver::{
    LocationResolver, LocationServices, ResolutionState, ResolutionStrategy, ResolveOutcome,
};
pub use traits::{
    content::{ContentStore, Notice, Notifier},
    location::{GpsProvider, LocationStore, PermissionGateway, PermissionStatus, ReverseGeocoder},
};
pub use types::{
    config::{DiscoveryConfig, FilterState, DEFAULT_RADIUS_MILES, RADIUS_OPTIONS_MILES},
    content::{ContentItem, Locatable, MatchedItem},
    coordinates::Coordinates,
    location::{LocationSelection, PersistedLocation, PlaceName},
};
