//! In-memory stores for development and embedding in tests.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::error::{ContentResult, LocationResult};
use crate::traits::{content::ContentStore, location::LocationStore};
use crate::types::{content::ContentItem, location::PersistedLocation};

/// Saved location held in memory.
///
/// Data is lost on restart.
#[derive(Default)]
pub struct MemoryLocationStore {
    location: RwLock<Option<PersistedLocation>>,
}

impl MemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(location: PersistedLocation) -> Self {
        Self {
            location: RwLock::new(Some(location)),
        }
    }

    /// Currently saved location.
    pub fn saved(&self) -> Option<PersistedLocation> {
        self.location
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn clear(&self) {
        *self.location.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

#[async_trait]
impl LocationStore for MemoryLocationStore {
    async fn save(&self, location: &PersistedLocation) -> LocationResult<()> {
        *self.location.write().unwrap_or_else(|e| e.into_inner()) = Some(location.clone());
        Ok(())
    }

    async fn load(&self) -> LocationResult<Option<PersistedLocation>> {
        Ok(self.saved())
    }
}

/// Content collection held in memory.
#[derive(Default)]
pub struct MemoryContentStore {
    items: RwLock<Vec<ContentItem>>,
}

impl MemoryContentStore {
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    /// Append an item.
    pub fn insert(&self, item: ContentItem) {
        self.items
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(item);
    }

    pub fn len(&self) -> usize {
        self.items.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn fetch_all(&self) -> ContentResult<Vec<ContentItem>> {
        Ok(self
            .items
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_location_store_round_trip() {
        let store = MemoryLocationStore::new();
        assert!(store.load().await.unwrap().is_none());

        let location = PersistedLocation::new("Austin, TX", None);
        store.save(&location).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(location));

        store.clear();
        assert!(store.saved().is_none());
    }

    #[tokio::test]
    async fn test_content_store_returns_everything() {
        let store = MemoryContentStore::new(vec![ContentItem::new("a")]);
        store.insert(ContentItem::new("b"));

        let items = store.fetch_all().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
    }
}
