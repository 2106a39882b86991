//! The Discover feed controller.
//!
//! Owns the filter state, the active selection and the last fetched
//! content, and drives resolution, fetching and filtering.
//!
//! Setters (`set_radius`, `toggle_radius_filter`, `select_location`,
//! `use_global`) only change state. Callers re-run the feed explicitly
//! with [`DiscoveryFilterController::refresh`] (fetch again) or
//! [`DiscoveryFilterController::refilter`] (reuse the cached content).

use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::error::{DiscoveryError, Result};
use crate::geo::distance_miles;
use crate::matcher::{filter_content, MatchMode};
use crate::resolver::{LocationResolver, LocationServices, ResolveOutcome};
use crate::traits::{
    content::{ContentStore, Notice, Notifier},
    location::LocationStore,
};
use crate::types::{
    config::{validate_radius, DiscoveryConfig, FilterState},
    content::{ContentItem, MatchedItem},
    coordinates::Coordinates,
    location::{LocationSelection, PersistedLocation},
};

/// What the feed should display after a load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveryView {
    pub selection: LocationSelection,
    pub items: Vec<MatchedItem<ContentItem>>,
    pub mode: MatchMode,

    /// Nothing was within the radius, so `items` is the full collection
    pub showing_all_fallback: bool,

    /// The content store could not be read; `items` is empty
    pub fetch_failed: bool,
}

pub struct DiscoveryFilterController {
    resolver: LocationResolver,
    location_store: Arc<dyn LocationStore>,
    content: Arc<dyn ContentStore>,
    notifier: Arc<dyn Notifier>,
    filter: FilterState,
    selection: LocationSelection,
    cached: Vec<ContentItem>,
}

impl DiscoveryFilterController {
    /// Controller using the standard resolution chain.
    pub fn new(
        services: LocationServices,
        content: Arc<dyn ContentStore>,
        notifier: Arc<dyn Notifier>,
        config: DiscoveryConfig,
    ) -> Result<Self> {
        let location_store = services.store.clone();
        Self::with_resolver(
            LocationResolver::standard(services),
            location_store,
            content,
            notifier,
            config,
        )
    }

    /// Controller with a custom resolver.
    ///
    /// `location_store` receives manually entered locations.
    pub fn with_resolver(
        resolver: LocationResolver,
        location_store: Arc<dyn LocationStore>,
        content: Arc<dyn ContentStore>,
        notifier: Arc<dyn Notifier>,
        config: DiscoveryConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            resolver,
            location_store,
            content,
            notifier,
            filter: FilterState::from_config(&config),
            selection: LocationSelection::Global,
            cached: Vec::new(),
        })
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    /// Active selection. `Global` until the first load resolves.
    pub fn selection(&self) -> &LocationSelection {
        &self.selection
    }

    /// Content from the last successful fetch.
    pub fn cached_items(&self) -> &[ContentItem] {
        &self.cached
    }

    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    /// Resolve the location (first load only), fetch and filter.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> DiscoveryView {
        match self.resolver.resolve_active_location().await {
            ResolveOutcome::Resolved(selection) => {
                info!(selection = selection.kind(), "Active location resolved");
                self.selection = selection;
            }
            // Keep the current selection: it may have been changed by hand
            // since resolution ran.
            ResolveOutcome::AlreadyResolved(_) | ResolveOutcome::InProgress => {
                debug!("Location already resolved, skipping resolution");
            }
        }

        self.refresh().await
    }

    /// [`load`](Self::load), abandoned if `cancel` fires first.
    pub async fn load_with_cancel(&mut self, cancel: CancellationToken) -> Result<DiscoveryView> {
        tokio::select! {
            view = self.load() => Ok(view),
            _ = cancel.cancelled() => {
                debug!("Discovery load cancelled");
                Err(DiscoveryError::Cancelled)
            }
        }
    }

    /// Fetch content again and filter it against the current selection.
    ///
    /// A failed fetch clears the cached content and raises one
    /// [`Notice::ContentFetchFailed`]. There is no automatic retry.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> DiscoveryView {
        match self.content.fetch_all().await {
            Ok(items) => {
                debug!(count = items.len(), "Fetched content");
                self.cached = items;
                self.refilter()
            }
            Err(e) => {
                warn!(error = %e, "Content fetch failed");
                self.cached.clear();
                self.notifier.notify(&Notice::ContentFetchFailed {
                    message: e.to_string(),
                });

                DiscoveryView {
                    selection: self.selection.clone(),
                    items: Vec::new(),
                    mode: MatchMode::Unfiltered,
                    showing_all_fallback: false,
                    fetch_failed: true,
                }
            }
        }
    }

    /// Filter the cached content against the current selection and state.
    ///
    /// When the radius keeps nothing, every cached item is shown instead.
    /// The "no results" notice fires once and stays quiet until a radius
    /// search finds something again.
    pub fn refilter(&mut self) -> DiscoveryView {
        let outcome = filter_content(&self.selection, &self.cached, &self.filter);

        if outcome.empty_after_radius_filter && !self.cached.is_empty() {
            if self.filter.no_results_alert_shown {
                debug!("No results within radius, notice already shown");
            } else {
                self.notifier.notify(&Notice::NoResultsWithinRadius {
                    radius_miles: self.filter.radius_miles,
                });
                self.filter.no_results_alert_shown = true;
            }

            return DiscoveryView {
                selection: self.selection.clone(),
                items: self.all_with_distances(),
                mode: outcome.mode,
                showing_all_fallback: true,
                fetch_failed: false,
            };
        }

        if outcome.mode != MatchMode::Unfiltered && !outcome.items.is_empty() {
            self.filter.no_results_alert_shown = false;
        }

        DiscoveryView {
            selection: self.selection.clone(),
            items: outcome.items,
            mode: outcome.mode,
            showing_all_fallback: false,
            fetch_failed: false,
        }
    }

    /// Change the radius. Does not re-filter.
    pub fn set_radius(&mut self, miles: f64) -> Result<()> {
        validate_radius(miles)?;
        debug!(radius_miles = miles, "Radius changed");
        self.filter.radius_miles = miles;
        Ok(())
    }

    /// Flip the radius filter and return the new value. Does not re-filter.
    pub fn toggle_radius_filter(&mut self) -> bool {
        self.filter.radius_filter_enabled = !self.filter.radius_filter_enabled;
        debug!(
            enabled = self.filter.radius_filter_enabled,
            "Radius filter toggled"
        );
        self.filter.radius_filter_enabled
    }

    /// Switch to a manually entered location and save it.
    ///
    /// A failed save is logged; the selection still changes. Does not
    /// re-filter, and a later [`load`](Self::load) keeps this selection.
    #[instrument(skip(self))]
    pub async fn select_location(
        &mut self,
        display_name: &str,
        coordinates: Option<Coordinates>,
    ) -> Result<&LocationSelection> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(DiscoveryError::EmptyLocationName);
        }
        let coordinates = coordinates
            .map(|c| Coordinates::try_new(c.lat, c.lon))
            .transpose()?;

        let saved = PersistedLocation::new(display_name, coordinates);
        if let Err(e) = self.location_store.save(&saved).await {
            warn!(error = %e, "Failed to save selected location");
        }

        self.replace_selection(saved.into());
        Ok(&self.selection)
    }

    /// Stop filtering by location. Does not re-filter.
    pub fn use_global(&mut self) {
        self.replace_selection(LocationSelection::Global);
    }

    fn replace_selection(&mut self, selection: LocationSelection) {
        info!(
            selection = selection.kind(),
            display_name = selection.display_name().unwrap_or_default(),
            "Location changed"
        );
        self.resolver.complete_with(selection.clone());
        self.selection = selection;
    }

    fn all_with_distances(&self) -> Vec<MatchedItem<ContentItem>> {
        let origin = self.selection.origin();
        self.cached
            .iter()
            .map(|item| MatchedItem {
                distance_miles: origin
                    .zip(item.coordinates)
                    .map(|(from, to)| distance_miles(from, to)),
                item: item.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResolutionState;
    use crate::testing::{MockContentStore, MockDevice, MockLocationStore, RecordingNotifier};
    use crate::types::location::PlaceName;

    fn austin() -> Coordinates {
        Coordinates::new(30.2672, -97.7431)
    }

    fn round_rock() -> Coordinates {
        Coordinates::new(30.5083, -97.6789)
    }

    fn dallas() -> Coordinates {
        Coordinates::new(32.7767, -96.7970)
    }

    struct Harness {
        device: MockDevice,
        store: MockLocationStore,
        content: MockContentStore,
        notifier: RecordingNotifier,
    }

    impl Harness {
        fn new(device: MockDevice, items: Vec<ContentItem>) -> Self {
            Self {
                device,
                store: MockLocationStore::new(),
                content: MockContentStore::new(items),
                notifier: RecordingNotifier::new(),
            }
        }

        fn controller(&self) -> DiscoveryFilterController {
            self.controller_with(DiscoveryConfig::default())
        }

        fn controller_with(&self, config: DiscoveryConfig) -> DiscoveryFilterController {
            DiscoveryFilterController::new(
                self.device.services(Arc::new(self.store.clone())),
                Arc::new(self.content.clone()),
                Arc::new(self.notifier.clone()),
                config,
            )
            .unwrap()
        }
    }

    fn in_austin() -> MockDevice {
        MockDevice::granted_at(austin(), PlaceName::new().with_city("Austin").with_region("TX"))
    }

    fn ids(view: &DiscoveryView) -> Vec<&str> {
        view.items.iter().map(|m| m.item.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_load_filters_by_radius() {
        let harness = Harness::new(
            in_austin(),
            vec![
                ContentItem::new("dallas").with_coordinates(dallas()),
                ContentItem::new("round-rock").with_coordinates(round_rock()),
                ContentItem::new("downtown").with_coordinates(austin()),
            ],
        );
        let mut controller = harness.controller();

        let view = controller.load().await;

        assert_eq!(view.mode, MatchMode::Radius);
        assert_eq!(ids(&view), vec!["downtown", "round-rock"]);
        assert!(!view.showing_all_fallback);
        assert_eq!(harness.notifier.count(), 0);
        assert_eq!(controller.selection().kind(), "current");
    }

    #[tokio::test]
    async fn test_empty_radius_shows_all_and_alerts_once() {
        let harness = Harness::new(
            in_austin(),
            vec![
                ContentItem::new("dallas").with_coordinates(dallas()),
                ContentItem::new("unplaced"),
            ],
        );
        let mut controller = harness.controller_with(DiscoveryConfig::new().with_radius(10.0));

        let first = controller.load().await;
        assert!(first.showing_all_fallback);
        assert_eq!(ids(&first), vec!["dallas", "unplaced"]);
        assert!(first.items[0].distance_miles.is_some());
        assert!(first.items[1].distance_miles.is_none());
        assert_eq!(harness.notifier.no_results_count(), 1);
        assert!(controller.filter_state().no_results_alert_shown);

        let second = controller.refresh().await;
        assert!(second.showing_all_fallback);
        assert_eq!(second.items.len(), 2);
        assert_eq!(harness.notifier.no_results_count(), 1);
    }

    #[tokio::test]
    async fn test_latch_resets_after_non_empty_result() {
        let harness = Harness::new(
            in_austin(),
            vec![ContentItem::new("dallas").with_coordinates(dallas())],
        );
        let mut controller = harness.controller_with(DiscoveryConfig::new().with_radius(10.0));

        controller.load().await;
        assert_eq!(harness.notifier.no_results_count(), 1);

        controller.set_radius(500.0).unwrap();
        let view = controller.refilter();
        assert!(!view.showing_all_fallback);
        assert!(!controller.filter_state().no_results_alert_shown);

        controller.set_radius(10.0).unwrap();
        let view = controller.refilter();
        assert!(view.showing_all_fallback);
        assert_eq!(harness.notifier.no_results_count(), 2);
    }

    #[tokio::test]
    async fn test_latch_resets_after_non_empty_label_result() {
        let harness = Harness::new(
            in_austin(),
            vec![
                ContentItem::new("dallas").with_coordinates(dallas()),
                ContentItem::new("south-congress").with_location_label("Austin, TX"),
            ],
        );
        let mut controller = harness.controller_with(DiscoveryConfig::new().with_radius(10.0));

        let view = controller.load().await;
        assert!(view.showing_all_fallback);
        assert_eq!(harness.notifier.no_results_count(), 1);
        assert!(controller.filter_state().no_results_alert_shown);

        assert!(!controller.toggle_radius_filter());
        let view = controller.refilter();
        assert_eq!(view.mode, MatchMode::Label);
        assert_eq!(ids(&view), vec!["south-congress"]);
        assert!(!controller.filter_state().no_results_alert_shown);

        harness.notifier.clear();
        assert!(controller.toggle_radius_filter());
        let view = controller.refilter();
        assert!(view.showing_all_fallback);
        assert_eq!(harness.notifier.no_results_count(), 1);
        assert!(controller.filter_state().no_results_alert_shown);

        // Unfiltered results leave the latch alone
        controller.use_global();
        let view = controller.refilter();
        assert_eq!(view.mode, MatchMode::Unfiltered);
        assert_eq!(view.items.len(), 2);
        assert!(controller.filter_state().no_results_alert_shown);
    }

    #[tokio::test]
    async fn test_fetch_failure_gives_empty_list_and_one_notice() {
        let mut harness = Harness::new(in_austin(), vec![]);
        harness.content = MockContentStore::failing("backend offline");
        let mut controller = harness.controller();

        let view = controller.load().await;

        assert!(view.fetch_failed);
        assert!(view.items.is_empty());
        assert_eq!(
            harness.notifier.notices(),
            vec![Notice::ContentFetchFailed {
                message: "content fetch failed: backend offline".into()
            }]
        );
        assert_eq!(harness.content.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_clears_cached_content() {
        let harness = Harness::new(
            in_austin(),
            vec![ContentItem::new("downtown").with_coordinates(austin())],
        );
        let mut controller = harness.controller();

        controller.load().await;
        assert_eq!(controller.cached_items().len(), 1);

        harness.content.set_failure(Some("timeout".into()));
        let view = controller.refresh().await;
        assert!(view.fetch_failed);
        assert!(controller.cached_items().is_empty());

        harness.content.set_failure(None);
        harness.content.set_items(vec![
            ContentItem::new("downtown").with_coordinates(austin()),
            ContentItem::new("round-rock").with_coordinates(round_rock()),
        ]);
        let view = controller.refresh().await;
        assert!(!view.fetch_failed);
        assert_eq!(ids(&view), vec!["downtown", "round-rock"]);
    }

    #[tokio::test]
    async fn test_setters_do_not_fetch() {
        let harness = Harness::new(in_austin(), vec![]);
        let mut controller = harness.controller();
        controller.load().await;
        assert_eq!(harness.content.fetch_count(), 1);

        controller.set_radius(5.0).unwrap();
        assert!(!controller.toggle_radius_filter());
        assert!(controller.toggle_radius_filter());
        controller.select_location("Boise, ID", None).await.unwrap();
        controller.use_global();

        assert_eq!(harness.content.fetch_count(), 1);
        assert_eq!(controller.filter_state().radius_miles, 5.0);
    }

    #[tokio::test]
    async fn test_set_radius_rejects_invalid() {
        let harness = Harness::new(in_austin(), vec![]);
        let mut controller = harness.controller();

        assert!(matches!(
            controller.set_radius(0.0),
            Err(DiscoveryError::InvalidRadius(_))
        ));
        assert!(controller.set_radius(f64::NAN).is_err());
        assert_eq!(controller.filter_state().radius_miles, 50.0);
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let harness = Harness::new(in_austin(), vec![]);
        let result = DiscoveryFilterController::new(
            harness.device.services(Arc::new(harness.store.clone())),
            Arc::new(harness.content.clone()),
            Arc::new(harness.notifier.clone()),
            DiscoveryConfig::new().with_radius(-1.0),
        );
        assert!(matches!(result, Err(DiscoveryError::InvalidRadius(_))));
    }

    #[tokio::test]
    async fn test_resolution_runs_once_across_loads() {
        let harness = Harness::new(in_austin(), vec![]);
        let mut controller = harness.controller();

        controller.load().await;
        controller.load().await;
        controller.load().await;

        assert_eq!(harness.device.permission_call_count(), 1);
        assert_eq!(harness.content.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_manual_selection_survives_reload_and_is_saved() {
        let harness = Harness::new(
            in_austin(),
            vec![
                ContentItem::new("boise").with_location_label("Boise, ID"),
                ContentItem::new("austin").with_location_label("Austin, TX"),
            ],
        );
        let mut controller = harness.controller();
        controller.load().await;

        let selection = controller
            .select_location("Boise, ID", None)
            .await
            .unwrap()
            .clone();
        assert_eq!(selection.kind(), "selected");
        assert_eq!(harness.store.saved().unwrap().display_name, "Boise, ID");

        let view = controller.load().await;
        assert_eq!(view.mode, MatchMode::Label);
        assert_eq!(ids(&view), vec!["boise"]);
        assert_eq!(harness.device.permission_call_count(), 1);
    }

    #[tokio::test]
    async fn test_manual_selection_before_first_load_skips_gps() {
        let harness = Harness::new(in_austin(), vec![]);
        let mut controller = harness.controller();

        controller
            .select_location("Reno, NV", Some(Coordinates::new(39.53, -119.81)))
            .await
            .unwrap();
        let view = controller.load().await;

        assert_eq!(view.selection.display_name(), Some("Reno, NV"));
        assert_eq!(harness.device.permission_call_count(), 0);
        assert_eq!(
            controller.resolver().state(),
            ResolutionState::Done(view.selection.clone())
        );
    }

    #[tokio::test]
    async fn test_select_location_validates_input() {
        let harness = Harness::new(in_austin(), vec![]);
        let mut controller = harness.controller();

        assert!(matches!(
            controller.select_location("   ", None).await,
            Err(DiscoveryError::EmptyLocationName)
        ));
        assert!(matches!(
            controller
                .select_location("Atlantis", Some(Coordinates::new(200.0, 0.0)))
                .await,
            Err(DiscoveryError::Location(_))
        ));
        assert!(harness.store.saves().is_empty());
    }

    #[tokio::test]
    async fn test_radius_disabled_falls_back_to_labels() {
        let harness = Harness::new(
            in_austin(),
            vec![
                ContentItem::new("labelled").with_location_label("austin, texas"),
                ContentItem::new("coords-only").with_coordinates(austin()),
            ],
        );
        let mut controller =
            harness.controller_with(DiscoveryConfig::new().with_radius_filter(false));

        let view = controller.load().await;
        assert_eq!(view.mode, MatchMode::Label);
        assert_eq!(ids(&view), vec!["labelled"]);
    }

    #[tokio::test]
    async fn test_global_shows_everything() {
        let harness = Harness::new(
            MockDevice::denied(),
            vec![
                ContentItem::new("a").with_coordinates(dallas()),
                ContentItem::new("b"),
            ],
        );
        let mut controller = harness.controller();

        let view = controller.load().await;
        assert_eq!(view.selection, LocationSelection::Global);
        assert_eq!(view.mode, MatchMode::Unfiltered);
        assert_eq!(ids(&view), vec!["a", "b"]);
        assert_eq!(harness.notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_load_with_cancel() {
        let harness = Harness::new(in_austin(), vec![]);
        let mut controller = harness.controller();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = controller.load_with_cancel(cancel).await;
        assert!(matches!(result, Err(DiscoveryError::Cancelled)));

        // The abandoned resolution can run again
        let view = controller
            .load_with_cancel(CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(view.selection.kind(), "current");
    }
}
