//! Location resolution.
//!
//! Decides which location the Discover feed filters by. The default chain
//! is:
//!
//! 1. [`DeviceLocationStrategy`] - permission, GPS fix, reverse geocode
//! 2. [`SavedLocationStrategy`] - the location saved earlier
//! 3. [`LocationSelection::Global`] - nothing to filter by
//!
//! Resolution runs once per resolver. Later calls are no-ops that report
//! either the cached result or that a resolution is still in flight.

pub mod strategy;

use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, instrument};

use crate::traits::location::{GpsProvider, LocationStore, PermissionGateway, ReverseGeocoder};
use crate::types::location::LocationSelection;

pub use strategy::{
    first_success, DeviceLocationStrategy, ResolutionStrategy, SavedLocationStrategy,
};

/// The collaborators the standard resolution chain needs.
#[derive(Clone)]
pub struct LocationServices {
    pub permissions: Arc<dyn PermissionGateway>,
    pub gps: Arc<dyn GpsProvider>,
    pub geocoder: Arc<dyn ReverseGeocoder>,
    pub store: Arc<dyn LocationStore>,
}

/// Idempotency guard for resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionState {
    NotStarted,
    InProgress,
    Done(LocationSelection),
}

/// Result of a call to [`LocationResolver::resolve_active_location`].
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveOutcome {
    /// This call ran the chain
    Resolved(LocationSelection),

    /// An earlier call already ran the chain; no I/O was performed
    AlreadyResolved(LocationSelection),

    /// Another call is running the chain; this one did nothing
    InProgress,
}

impl ResolveOutcome {
    pub fn selection(&self) -> Option<&LocationSelection> {
        match self {
            Self::Resolved(selection) | Self::AlreadyResolved(selection) => Some(selection),
            Self::InProgress => None,
        }
    }

    pub fn into_selection(self) -> Option<LocationSelection> {
        match self {
            Self::Resolved(selection) | Self::AlreadyResolved(selection) => Some(selection),
            Self::InProgress => None,
        }
    }
}

/// Runs the location fallback chain at most once.
pub struct LocationResolver {
    strategies: Vec<Box<dyn ResolutionStrategy>>,
    state: Mutex<ResolutionState>,
}

impl LocationResolver {
    /// Create a resolver over an explicit, ordered list of strategies.
    pub fn new(strategies: Vec<Box<dyn ResolutionStrategy>>) -> Self {
        Self {
            strategies,
            state: Mutex::new(ResolutionState::NotStarted),
        }
    }

    /// Device location first, then the saved location.
    pub fn standard(services: LocationServices) -> Self {
        let strategies: Vec<Box<dyn ResolutionStrategy>> = vec![
            Box::new(DeviceLocationStrategy::new(
                services.permissions,
                services.gps,
                services.geocoder,
                services.store.clone(),
            )),
            Box::new(SavedLocationStrategy::new(services.store)),
        ];
        Self::new(strategies)
    }

    /// Current guard state.
    pub fn state(&self) -> ResolutionState {
        self.lock_state().clone()
    }

    /// Forget any previous result so the next call resolves again.
    pub fn reset(&self) {
        *self.lock_state() = ResolutionState::NotStarted;
    }

    /// Record `selection` as the result without running the chain.
    ///
    /// Used when the user picks a location by hand; later calls report it
    /// as already resolved.
    pub fn complete_with(&self, selection: LocationSelection) {
        *self.lock_state() = ResolutionState::Done(selection);
    }

    /// Produce the active location selection.
    ///
    /// Never fails: the worst case is [`LocationSelection::Global`].
    #[instrument(skip(self))]
    pub async fn resolve_active_location(&self) -> ResolveOutcome {
        {
            let mut state = self.lock_state();
            match &*state {
                ResolutionState::InProgress => {
                    debug!("Resolution already in progress, ignoring");
                    return ResolveOutcome::InProgress;
                }
                ResolutionState::Done(selection) => {
                    return ResolveOutcome::AlreadyResolved(selection.clone());
                }
                ResolutionState::NotStarted => *state = ResolutionState::InProgress,
            }
        }

        let in_flight = InFlight {
            resolver: self,
            finished: false,
        };
        let selection = first_success(&self.strategies).await;
        in_flight.finish(selection.clone());

        ResolveOutcome::Resolved(selection)
    }

    fn lock_state(&self) -> MutexGuard<'_, ResolutionState> {
        // The guard holds plain data; a panic elsewhere cannot leave it torn.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Returns the guard to `NotStarted` if a resolution future is dropped
/// before it completes.
struct InFlight<'a> {
    resolver: &'a LocationResolver,
    finished: bool,
}

impl InFlight<'_> {
    fn finish(mut self, selection: LocationSelection) {
        *self.resolver.lock_state() = ResolutionState::Done(selection);
        self.finished = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            debug!("Resolution abandoned before completing");
            *self.resolver.lock_state() = ResolutionState::NotStarted;
        }
    }
}
