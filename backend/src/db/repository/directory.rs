//! Directory repository traits: users and channels.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Channel, User, UserId, UserUpdate};

/// Repository trait for workspace users.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Check that the store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// List all users ordered by id.
    async fn list_users(&self) -> RepositoryResult<Vec<User>>;

    /// Fetch one user.
    ///
    /// # Returns
    /// * `Ok(User)` - The user
    /// * `Err(RepositoryError::NotFound)` - If no user has this id
    async fn get_user(&self, id: UserId) -> RepositoryResult<User>;

    /// Replace a user's editable fields.
    ///
    /// Channel assignments must name known channels; channel member lists are
    /// kept in sync with the new assignment.
    ///
    /// # Returns
    /// * `Ok(User)` - The updated user
    /// * `Err(RepositoryError)` - If the user or a channel is unknown
    async fn update_user(&self, id: UserId, update: UserUpdate) -> RepositoryResult<User>;

    /// Delete a user and drop them from every channel member list.
    ///
    /// # Returns
    /// * `Ok(User)` - The removed user
    /// * `Err(RepositoryError::NotFound)` - If no user has this id
    async fn delete_user(&self, id: UserId) -> RepositoryResult<User>;
}

/// Repository trait for channels and their assigned members.
#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// List all channels in insertion order.
    async fn list_channels(&self) -> RepositoryResult<Vec<Channel>>;

    /// Fetch one channel by its id.
    async fn get_channel(&self, channel_id: &str) -> RepositoryResult<Channel>;

    /// Replace a channel's member list (user keys).
    ///
    /// # Returns
    /// * `Ok(Channel)` - The updated channel
    /// * `Err(RepositoryError)` - If the channel or a user key is unknown
    async fn update_channel_members(
        &self,
        channel_id: &str,
        members: Vec<String>,
    ) -> RepositoryResult<Channel>;
}
