//! Storage layer for users, channels and channel history.
//!
//! Access goes through the Repository pattern so the in-memory store can be
//! swapped without touching handlers or services.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API, tests)                    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - Ingestion into a channel                             │
//! │  - Activity buckets and meeting suggestions per channel │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/)                        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────▼──────────────────────────────┐
//!     │             Local Repository                 │
//!     │               (in-memory)                    │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use seelack::db::{repositories::LocalRepository, services};
//!
//! # async fn example() -> Result<(), seelack::db::RepositoryError> {
//! let repo = LocalRepository::new();
//! let users = services::list_users(&repo).await?;
//! println!("Found {} users", users.len());
//! # Ok(())
//! # }
//! ```

pub mod repositories;
pub mod repository;
pub mod seed;
pub mod services;

pub use repositories::LocalRepository;
pub use repository::{
    ChannelRepository, ErrorContext, FullRepository, HistoryRepository, LifecycleRepository,
    RepositoryError, RepositoryResult, UserRepository,
};
pub use seed::MockSeed;
