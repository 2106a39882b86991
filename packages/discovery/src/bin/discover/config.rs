use anyhow::{bail, Context, Result};
use discovery::{Coordinates, DiscoveryConfig, PlaceName};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

/// `discover` configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub content_path: PathBuf,
    pub location_path: PathBuf,
    pub discovery: DiscoveryConfig,
    pub position: Option<Coordinates>,
    pub place: PlaceName,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = DiscoveryConfig::default();

        let radius: f64 = match env::var("DISCOVERY_RADIUS_MILES") {
            Ok(value) => value
                .parse()
                .context("DISCOVERY_RADIUS_MILES must be a number")?,
            Err(_) => defaults.default_radius_miles,
        };

        let radius_filter: bool = match env::var("DISCOVERY_RADIUS_FILTER") {
            Ok(value) => value
                .parse()
                .context("DISCOVERY_RADIUS_FILTER must be true or false")?,
            Err(_) => defaults.radius_filter_enabled,
        };

        let position = match (env::var("DISCOVERY_LAT"), env::var("DISCOVERY_LON")) {
            (Ok(lat), Ok(lon)) => {
                let lat: f64 = lat.parse().context("DISCOVERY_LAT must be a number")?;
                let lon: f64 = lon.parse().context("DISCOVERY_LON must be a number")?;
                Some(Coordinates::try_new(lat, lon).context("Device position out of range")?)
            }
            (Err(_), Err(_)) => None,
            _ => bail!("DISCOVERY_LAT and DISCOVERY_LON must be set together"),
        };

        Ok(Self {
            content_path: env::var("DISCOVERY_CONTENT_PATH")
                .context("DISCOVERY_CONTENT_PATH must be set")?
                .into(),
            location_path: env::var("DISCOVERY_LOCATION_PATH")
                .unwrap_or_else(|_| ".discovery/location.json".to_string())
                .into(),
            discovery: DiscoveryConfig::new()
                .with_radius(radius)
                .with_radius_filter(radius_filter),
            position,
            place: env::var("DISCOVERY_PLACE")
                .map(|place| PlaceName::parse(&place))
                .unwrap_or_default(),
        })
    }
}
