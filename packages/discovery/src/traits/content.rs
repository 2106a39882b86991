//! Content store and notification traits.

use async_trait::async_trait;

use crate::error::ContentResult;
use crate::types::content::ContentItem;

/// Document store holding the Discover feed content.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch every item, unfiltered.
    async fn fetch_all(&self) -> ContentResult<Vec<ContentItem>>;
}

/// A user-visible, non-blocking notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Nothing was within the radius; all content is shown instead
    NoResultsWithinRadius { radius_miles: f64 },

    /// The content store could not be read
    ContentFetchFailed { message: String },
}

impl Notice {
    /// Message suitable for a toast or alert.
    pub fn message(&self) -> String {
        match self {
            Notice::NoResultsWithinRadius { radius_miles } => format!(
                "No results within {} miles. Showing all results instead.",
                radius_miles
            ),
            Notice::ContentFetchFailed { message } => {
                format!("Couldn't load content: {}", message)
            }
        }
    }
}

/// Sink for user-visible notices (alert, toast, banner).
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}
