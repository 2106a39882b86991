//! Notifier that emits notices as log events.

use tracing::{info, warn};

use crate::traits::content::{Notice, Notifier};

/// Logs notices instead of showing them.
///
/// Useful for headless hosts and the `discover` binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        match notice {
            Notice::NoResultsWithinRadius { radius_miles } => {
                info!(radius_miles, "{}", notice.message());
            }
            Notice::ContentFetchFailed { .. } => {
                warn!("{}", notice.message());
            }
        }
    }
}
