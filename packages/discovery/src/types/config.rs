//! Configuration and filter state.

use serde::{Deserialize, Serialize};

use crate::error::{DiscoveryError, Result};

/// Default search radius.
pub const DEFAULT_RADIUS_MILES: f64 = 50.0;

/// Radius presets offered by the radius picker.
pub const RADIUS_OPTIONS_MILES: [f64; 5] = [5.0, 10.0, 25.0, 50.0, 100.0];

/// Configuration for a discovery controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Radius used until the user picks another one.
    ///
    /// Default: 50 miles.
    pub default_radius_miles: f64,

    /// Whether proximity filtering starts enabled.
    ///
    /// Default: true.
    pub radius_filter_enabled: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            default_radius_miles: DEFAULT_RADIUS_MILES,
            radius_filter_enabled: true,
        }
    }
}

impl DiscoveryConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial radius.
    pub fn with_radius(mut self, miles: f64) -> Self {
        self.default_radius_miles = miles;
        self
    }

    /// Set whether the radius filter starts enabled.
    pub fn with_radius_filter(mut self, enabled: bool) -> Self {
        self.radius_filter_enabled = enabled;
        self
    }

    /// Reject a non-positive or non-finite radius.
    pub fn validate(&self) -> Result<()> {
        validate_radius(self.default_radius_miles)
    }
}

pub(crate) fn validate_radius(miles: f64) -> Result<()> {
    if miles.is_finite() && miles > 0.0 {
        Ok(())
    } else {
        Err(DiscoveryError::InvalidRadius(miles))
    }
}

/// Mutable filter settings owned by the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub radius_miles: f64,
    pub radius_filter_enabled: bool,

    /// One-shot latch: set when the "no results" notice fires, cleared when
    /// a radius-filtered result is non-empty again.
    pub no_results_alert_shown: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::from_config(&DiscoveryConfig::default())
    }
}

impl FilterState {
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        Self {
            radius_miles: config.default_radius_miles,
            radius_filter_enabled: config.radius_filter_enabled,
            no_results_alert_shown: false,
        }
    }

    /// Filter state with the given radius and the filter enabled.
    pub fn with_radius(miles: f64) -> Self {
        Self {
            radius_miles: miles,
            ..Self::default()
        }
    }
}
