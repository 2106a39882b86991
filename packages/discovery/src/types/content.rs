//! Content items and match results.

use serde::{Deserialize, Serialize};

use super::coordinates::Coordinates;

/// Anything the matcher can place on a map or match by name.
pub trait Locatable {
    /// Point the item is located at, if known.
    fn coordinates(&self) -> Option<Coordinates>;

    /// Free-text location such as `"Austin, TX"`, if known.
    fn location_label(&self) -> Option<&str>;
}

/// A content record (review, place, post) from the document store.
///
/// Fields other than the location are opaque to this crate and carried
/// through untouched in `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub coordinates: Option<Coordinates>,

    #[serde(default)]
    pub location_label: Option<String>,

    #[serde(flatten)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl ContentItem {
    /// Create an item with no location.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            coordinates: None,
            location_label: None,
            data: serde_json::Map::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    pub fn with_location_label(mut self, label: impl Into<String>) -> Self {
        self.location_label = Some(label.into());
        self
    }
}

impl Locatable for ContentItem {
    fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    fn location_label(&self) -> Option<&str> {
        self.location_label.as_deref()
    }
}

/// An item that passed the filter, with its distance when it was measured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedItem<T> {
    pub item: T,
    pub distance_miles: Option<f64>,
}

impl<T> MatchedItem<T> {
    pub fn unmeasured(item: T) -> Self {
        Self {
            item,
            distance_miles: None,
        }
    }
}
