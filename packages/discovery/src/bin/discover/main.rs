// Runs one Discover feed load against JSON files and prints the result

mod config;

use anyhow::{Context, Result};
use config::Config;
use discovery::stores::{JsonContentFile, JsonLocationFile};
use discovery::{DiscoveryFilterController, StaticDevice, TracingNotifier};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (stdout is reserved for the result)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,discovery=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        content = %config.content_path.display(),
        radius_miles = config.discovery.default_radius_miles,
        "Configuration loaded"
    );

    let device = match config.position {
        Some(position) => StaticDevice::at(position, config.place.clone()),
        None => StaticDevice::unavailable(),
    };

    let mut controller = DiscoveryFilterController::new(
        device.services(Arc::new(JsonLocationFile::new(&config.location_path))),
        Arc::new(JsonContentFile::new(&config.content_path)),
        Arc::new(TracingNotifier),
        config.discovery.clone(),
    )
    .context("Invalid discovery configuration")?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let view = controller
        .load_with_cancel(cancel)
        .await
        .context("Discovery load interrupted")?;

    tracing::info!(
        selection = view.selection.kind(),
        items = view.items.len(),
        showing_all = view.showing_all_fallback,
        "Discovery loaded"
    );

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
