//! Location selection types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::coordinates::Coordinates;

/// Structured place name, as returned by reverse geocoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceName {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl PlaceName {
    /// Create an empty place name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the city.
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Set the region (state, province).
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the country.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Derive a place name from free text such as `"Austin, TX"`.
    ///
    /// The first comma segment is the city, the second the region.
    pub fn parse(text: &str) -> Self {
        let mut parts = text
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty());

        Self {
            city: parts.next().map(str::to_string),
            region: parts.next().map(str::to_string),
            country: parts.next().map(str::to_string),
        }
    }

    /// Human-readable name, e.g. `"Austin, TX"`.
    ///
    /// Falls back to the country when neither city nor region is known.
    /// Returns `None` when nothing usable is present.
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.city.as_deref(), self.region.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();

        if !parts.is_empty() {
            return Some(parts.join(", "));
        }

        self.country
            .as_deref()
            .map(str::trim)
            .filter(|country| !country.is_empty())
            .map(str::to_string)
    }
}

/// The single active location used to filter content.
///
/// Replaced wholesale when the location changes; never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LocationSelection {
    /// Live device fix with a reverse-geocoded name
    Current {
        coordinates: Coordinates,
        display_name: String,
        place: PlaceName,
    },

    /// A previously saved, user-chosen location
    Selected {
        coordinates: Option<Coordinates>,
        display_name: String,
        place: PlaceName,
    },

    /// No geographic restriction
    Global,
}

impl LocationSelection {
    /// Coordinates to measure distance from, if any.
    pub fn origin(&self) -> Option<Coordinates> {
        match self {
            Self::Current { coordinates, .. } => Some(*coordinates),
            Self::Selected { coordinates, .. } => *coordinates,
            Self::Global => None,
        }
    }

    /// Display name, or `None` for [`LocationSelection::Global`].
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::Current { display_name, .. } | Self::Selected { display_name, .. } => {
                Some(display_name)
            }
            Self::Global => None,
        }
    }

    /// Structured place name, or `None` for [`LocationSelection::Global`].
    pub fn place(&self) -> Option<&PlaceName> {
        match self {
            Self::Current { place, .. } | Self::Selected { place, .. } => Some(place),
            Self::Global => None,
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }

    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Current { .. } => "current",
            Self::Selected { .. } => "selected",
            Self::Global => "global",
        }
    }
}

/// A location as written to and read from the [`LocationStore`].
///
/// [`LocationStore`]: crate::traits::location::LocationStore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedLocation {
    pub display_name: String,

    #[serde(default)]
    pub coordinates: Option<Coordinates>,

    #[serde(default)]
    pub place: PlaceName,

    pub saved_at: DateTime<Utc>,
}

impl PersistedLocation {
    /// Create a persisted location stamped with the current time.
    pub fn new(display_name: impl Into<String>, coordinates: Option<Coordinates>) -> Self {
        let display_name = display_name.into();
        Self {
            place: PlaceName::parse(&display_name),
            display_name,
            coordinates,
            saved_at: Utc::now(),
        }
    }

    /// Replace the structured place name.
    pub fn with_place(mut self, place: PlaceName) -> Self {
        self.place = place;
        self
    }
}

impl From<PersistedLocation> for LocationSelection {
    fn from(saved: PersistedLocation) -> Self {
        LocationSelection::Selected {
            coordinates: saved.coordinates,
            display_name: saved.display_name,
            place: saved.place,
        }
    }
}
