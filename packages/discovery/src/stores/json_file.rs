//! JSON file backed stores.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ContentResult, LocationError, LocationResult};
use crate::traits::{content::ContentStore, location::LocationStore};
use crate::types::{content::ContentItem, location::PersistedLocation};

/// Saved location in a single JSON document.
///
/// A missing file means nothing has been saved yet.
pub struct JsonLocationFile {
    path: PathBuf,
}

impl JsonLocationFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LocationStore for JsonLocationFile {
    async fn save(&self, location: &PersistedLocation) -> LocationResult<()> {
        let json = serde_json::to_vec_pretty(location)
            .map_err(|e| LocationError::PersistenceWriteFailure(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LocationError::PersistenceWriteFailure(e.to_string()))?;
        }

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| LocationError::PersistenceWriteFailure(e.to_string()))?;

        debug!(path = %self.path.display(), "Saved location");
        Ok(())
    }

    async fn load(&self) -> LocationResult<Option<PersistedLocation>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LocationError::PersistenceReadFailure(e.to_string())),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| LocationError::PersistenceReadFailure(e.to_string()))
    }
}

/// Content collection stored as a JSON array of items.
pub struct JsonContentFile {
    path: PathBuf,
}

impl JsonContentFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ContentStore for JsonContentFile {
    async fn fetch_all(&self) -> ContentResult<Vec<ContentItem>> {
        let bytes = tokio::fs::read(&self.path).await?;
        let items: Vec<ContentItem> = serde_json::from_slice(&bytes)?;
        debug!(path = %self.path.display(), count = items.len(), "Loaded content");
        Ok(items)
    }
}
