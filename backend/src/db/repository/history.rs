//! History repository trait for per-channel message events.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::Event;

/// Repository trait for channel message history.
///
/// Returned vectors are snapshots: callers may aggregate them without holding
/// any store lock.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// All events recorded for a channel, oldest first.
    ///
    /// # Returns
    /// * `Ok(Vec<Event>)` - Possibly empty history
    /// * `Err(RepositoryError::NotFound)` - If the channel is unknown
    async fn channel_history(&self, channel_id: &str) -> RepositoryResult<Vec<Event>>;

    /// Append events to a channel's history.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of events stored
    /// * `Err(RepositoryError)` - If the channel is unknown or an event names another channel
    async fn append_history(&self, channel_id: &str, events: Vec<Event>) -> RepositoryResult<usize>;
}
