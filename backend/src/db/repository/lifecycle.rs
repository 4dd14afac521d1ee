//! Store lifecycle: reset to a known snapshot.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::db::seed::MockSeed;

/// Repository trait for replacing the whole store contents.
#[async_trait]
pub trait LifecycleRepository: Send + Sync {
    /// Replace all users, channels and history with `seed`.
    async fn reset(&self, seed: MockSeed) -> RepositoryResult<()>;
}
