//! Content location matching.
//!
//! Decides which content items are "near" the active selection:
//!
//! - `Global` selections keep everything.
//! - With an origin and the radius filter on, items are kept by haversine
//!   distance and sorted nearest first.
//! - Otherwise items are matched by their free-text location label. This
//!   path favours recall: manually entered locations are noisy.

use serde::Serialize;
use tracing::debug;

use crate::geo::distance_miles;
use crate::types::{
    config::FilterState,
    content::{Locatable, MatchedItem},
    coordinates::Coordinates,
    location::LocationSelection,
};

/// How a result set was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Nothing to filter by; input returned as-is
    Unfiltered,
    /// Kept by distance from the selection's coordinates
    Radius,
    /// Kept by location label text
    Label,
}

/// Output of [`filter_content`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome<T> {
    pub items: Vec<MatchedItem<T>>,

    /// Radius filtering ran and kept nothing. The caller decides whether to
    /// widen to the unfiltered set.
    pub empty_after_radius_filter: bool,

    pub mode: MatchMode,
}

impl<T> FilterOutcome<T> {
    fn unfiltered(items: Vec<MatchedItem<T>>) -> Self {
        Self {
            items,
            empty_after_radius_filter: false,
            mode: MatchMode::Unfiltered,
        }
    }
}

/// Filter `items` against the active selection.
pub fn filter_content<T: Locatable + Clone>(
    selection: &LocationSelection,
    items: &[T],
    state: &FilterState,
) -> FilterOutcome<T> {
    if selection.is_global() {
        return FilterOutcome::unfiltered(all_items(items));
    }

    if let Some(origin) = selection.origin().filter(|_| state.radius_filter_enabled) {
        return filter_by_radius(origin, items, state.radius_miles);
    }

    match LabelQuery::from_selection(selection) {
        Some(query) => {
            let matched: Vec<MatchedItem<T>> = items
                .iter()
                .filter(|item| item.location_label().is_some_and(|label| query.matches(label)))
                .cloned()
                .map(MatchedItem::unmeasured)
                .collect();

            debug!(
                total = items.len(),
                matched = matched.len(),
                "Filtered content by location label"
            );

            FilterOutcome {
                items: matched,
                empty_after_radius_filter: false,
                mode: MatchMode::Label,
            }
        }
        None => {
            debug!("Selection has no usable name, returning all content");
            FilterOutcome::unfiltered(all_items(items))
        }
    }
}

fn all_items<T: Clone>(items: &[T]) -> Vec<MatchedItem<T>> {
    items.iter().cloned().map(MatchedItem::unmeasured).collect()
}

fn filter_by_radius<T: Locatable + Clone>(
    origin: Coordinates,
    items: &[T],
    radius_miles: f64,
) -> FilterOutcome<T> {
    // Items without coordinates cannot be shown to be in range
    let mut kept: Vec<MatchedItem<T>> = items
        .iter()
        .filter_map(|item| {
            let distance = distance_miles(origin, item.coordinates()?);
            (distance <= radius_miles).then(|| MatchedItem {
                item: item.clone(),
                distance_miles: Some(distance),
            })
        })
        .collect();

    kept.sort_by(|a, b| {
        let a = a.distance_miles.unwrap_or(f64::INFINITY);
        let b = b.distance_miles.unwrap_or(f64::INFINITY);
        a.total_cmp(&b)
    });

    debug!(
        total = items.len(),
        kept = kept.len(),
        radius_miles,
        "Filtered content by radius"
    );

    FilterOutcome {
        empty_after_radius_filter: kept.is_empty(),
        items: kept,
        mode: MatchMode::Radius,
    }
}

/// Lowercase, trim each comma segment, drop empty segments and rejoin
/// with `", "`.
///
/// `" Austin ,TX,, "` becomes `"austin, tx"`.
pub fn normalize_location(text: &str) -> String {
    text.split(',')
        .map(|part| part.trim().to_lowercase())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Label search terms derived from a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelQuery {
    candidates: Vec<String>,
}

impl LabelQuery {
    /// Build from the selection's display name and place.
    ///
    /// Terms are the first segment of the display name plus the place's
    /// city and region. Returns `None` when no term is non-empty.
    pub fn from_selection(selection: &LocationSelection) -> Option<Self> {
        let display_name = normalize_location(selection.display_name()?);
        let place = selection.place()?;

        let mut candidates = Vec::with_capacity(3);
        if let Some(city_token) = display_name.split(", ").next() {
            candidates.push(city_token.to_string());
        }
        candidates.extend(place.city.as_deref().map(normalize_location));
        candidates.extend(place.region.as_deref().map(normalize_location));

        candidates.retain(|c| !c.is_empty());
        candidates.dedup();

        if candidates.is_empty() {
            None
        } else {
            Some(Self { candidates })
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Whether the label's city segment, region segment or full text
    /// contains any of the terms.
    pub fn matches(&self, label: &str) -> bool {
        let label = normalize_location(label);
        if label.is_empty() {
            return false;
        }

        let mut segments = label.split(", ");
        let city = segments.next().unwrap_or_default();
        let region = segments.next().unwrap_or_default();
        let haystacks = [city, region, label.as_str()];

        self.candidates.iter().any(|candidate| {
            haystacks
                .iter()
                .any(|haystack| haystack.contains(candidate.as_str()))
        })
    }
}
