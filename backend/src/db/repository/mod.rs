//! Repository trait definitions for the mock store.
//!
//! Responsibilities are split across focused traits so handlers and tests can
//! depend on exactly what they use.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`directory`]: Users and channels
//! - [`history`]: Per-channel message history
//! - [`lifecycle`]: Reset and teardown of the whole store
//!
//! # Convenience Trait Bound
//!
//! For code that needs every capability, use [`FullRepository`]:
//!
//! ```ignore
//! async fn channel_snapshot<R: FullRepository>(repo: &R, id: &str) -> RepositoryResult<Vec<Event>> {
//!     repo.get_channel(id).await?;
//!     repo.channel_history(id).await
//! }
//! ```

pub mod directory;
pub mod error;
pub mod history;
pub mod lifecycle;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use directory::{ChannelRepository, UserRepository};
pub use history::HistoryRepository;
pub use lifecycle::LifecycleRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type implementing all four traits.
pub trait FullRepository:
    UserRepository + ChannelRepository + HistoryRepository + LifecycleRepository
{
}

// Blanket implementation: any type implementing all four traits is a FullRepository
impl<T> FullRepository for T where
    T: UserRepository + ChannelRepository + HistoryRepository + LifecycleRepository
{
}
