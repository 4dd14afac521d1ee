//! In-memory local repository implementation.
//!
//! Stores users, channels and per-channel history behind a single
//! `parking_lot::RwLock`. Reads hand out cloned snapshots, so aggregation never
//! runs while a lock is held.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use crate::db::repository::*;
use crate::db::seed::MockSeed;
use crate::models::{Channel, Event, User, UserId, UserUpdate};

/// In-memory local repository.
///
/// Cloning is cheap and every clone shares the same data.
///
/// # Example
/// ```
/// use seelack::db::repositories::LocalRepository;
/// use seelack::db::seed::MockSeed;
///
/// let repo = LocalRepository::new();
/// assert_eq!(repo.user_count(), 0);
///
/// repo.reset_with(MockSeed::empty());
/// assert_eq!(repo.channel_count(), 0);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    users: BTreeMap<UserId, User>,
    channels: Vec<Channel>,
    history: HashMap<String, Vec<Event>>,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            channels: Vec::new(),
            history: HashMap::new(),
            is_healthy: true,
        }
    }
}

impl LocalData {
    fn from_seed(seed: MockSeed, is_healthy: bool) -> Self {
        let mut history: HashMap<String, Vec<Event>> = seed
            .channels
            .iter()
            .map(|c| (c.channel_id.clone(), Vec::new()))
            .collect();

        let mut dropped = 0usize;
        for event in seed.history {
            match history.get_mut(&event.channel_id) {
                Some(events) => events.push(event),
                None => dropped += 1,
            }
        }
        if dropped > 0 {
            log::warn!("dropped {} seed events for unknown channels", dropped);
        }
        for events in history.values_mut() {
            events.sort_by_key(|e| e.timestamp);
        }

        Self {
            users: seed.users.into_iter().map(|u| (u.id, u)).collect(),
            channels: seed.channels,
            history,
            is_healthy,
        }
    }

    fn channel_index(&self, channel_id: &str) -> Option<usize> {
        self.channels.iter().position(|c| c.channel_id == channel_id)
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository pre-populated with `seed`.
    pub fn with_seed(seed: MockSeed) -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::from_seed(seed, true))),
        }
    }

    /// Replace all contents with `seed`, keeping the health flag.
    pub fn reset_with(&self, seed: MockSeed) {
        let mut data = self.data.write();
        let is_healthy = data.is_healthy;
        *data = LocalData::from_seed(seed, is_healthy);
        log::info!(
            "store reset: {} users, {} channels",
            data.users.len(),
            data.channels.len()
        );
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
        log::info!("store cleared");
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Get the number of users stored.
    pub fn user_count(&self) -> usize {
        self.data.read().users.len()
    }

    /// Get the number of channels stored.
    pub fn channel_count(&self) -> usize {
        self.data.read().channels.len()
    }

    /// Get the number of events stored across all channels.
    pub fn event_count(&self) -> usize {
        self.data.read().history.values().map(Vec::len).sum()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(
                RepositoryError::unavailable("Store is not healthy").with_operation(operation)
            );
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn user_not_found(operation: &str, id: UserId) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("User {} not found", id),
        ErrorContext::new(operation)
            .with_entity("user")
            .with_entity_id(id),
    )
}

fn channel_not_found(operation: &str, channel_id: &str) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("Channel {} not found", channel_id),
        ErrorContext::new(operation)
            .with_entity("channel")
            .with_entity_id(channel_id),
    )
}

/// Order-preserving de-duplication.
fn dedup(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

#[async_trait]
impl UserRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        self.check_health("list_users")?;
        Ok(self.data.read().users.values().cloned().collect())
    }

    async fn get_user(&self, id: UserId) -> RepositoryResult<User> {
        self.check_health("get_user")?;
        self.data
            .read()
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| user_not_found("get_user", id))
    }

    async fn update_user(&self, id: UserId, update: UserUpdate) -> RepositoryResult<User> {
        self.check_health("update_user")?;
        let mut data = self.data.write();

        if !data.users.contains_key(&id) {
            return Err(user_not_found("update_user", id));
        }

        let channels = dedup(update.channels);
        if let Some(unknown) = channels.iter().find(|c| data.channel_index(c).is_none()) {
            return Err(RepositoryError::validation_with_context(
                format!("Unknown channel {}", unknown),
                ErrorContext::new("update_user")
                    .with_entity("user")
                    .with_entity_id(id)
                    .with_details("channels must reference existing channels"),
            ));
        }

        let user_key = match data.users.get_mut(&id) {
            Some(user) => {
                user.user_name = update.user_name;
                user.grade = update.grade;
                user.channels = channels.clone();
                user.user_key.clone()
            }
            None => return Err(user_not_found("update_user", id)),
        };

        for channel in data.channels.iter_mut() {
            let assigned = channels.contains(&channel.channel_id);
            let listed = channel.members.contains(&user_key);
            if assigned && !listed {
                channel.members.push(user_key.clone());
            } else if !assigned && listed {
                channel.members.retain(|m| m != &user_key);
            }
        }

        data.users
            .get(&id)
            .cloned()
            .ok_or_else(|| user_not_found("update_user", id))
    }

    async fn delete_user(&self, id: UserId) -> RepositoryResult<User> {
        self.check_health("delete_user")?;
        let mut data = self.data.write();

        let removed = data
            .users
            .remove(&id)
            .ok_or_else(|| user_not_found("delete_user", id))?;

        for channel in data.channels.iter_mut() {
            channel.members.retain(|m| m != &removed.user_key);
        }

        log::info!("deleted user {} ({})", id, removed.user_key);
        Ok(removed)
    }
}

#[async_trait]
impl ChannelRepository for LocalRepository {
    async fn list_channels(&self) -> RepositoryResult<Vec<Channel>> {
        self.check_health("list_channels")?;
        Ok(self.data.read().channels.clone())
    }

    async fn get_channel(&self, channel_id: &str) -> RepositoryResult<Channel> {
        self.check_health("get_channel")?;
        let data = self.data.read();
        data.channel_index(channel_id)
            .map(|i| data.channels[i].clone())
            .ok_or_else(|| channel_not_found("get_channel", channel_id))
    }

    async fn update_channel_members(
        &self,
        channel_id: &str,
        members: Vec<String>,
    ) -> RepositoryResult<Channel> {
        self.check_health("update_channel_members")?;
        let mut data = self.data.write();

        let index = data
            .channel_index(channel_id)
            .ok_or_else(|| channel_not_found("update_channel_members", channel_id))?;

        let members = dedup(members);
        let known: HashSet<&str> = data.users.values().map(|u| u.user_key.as_str()).collect();
        if let Some(unknown) = members.iter().find(|m| !known.contains(m.as_str())) {
            return Err(RepositoryError::validation_with_context(
                format!("Unknown user {}", unknown),
                ErrorContext::new("update_channel_members")
                    .with_entity("channel")
                    .with_entity_id(channel_id)
                    .with_details("members must reference existing users"),
            ));
        }

        for user in data.users.values_mut() {
            let assigned = members.contains(&user.user_key);
            let listed = user.channels.iter().any(|c| c == channel_id);
            if assigned && !listed {
                user.channels.push(channel_id.to_string());
            } else if !assigned && listed {
                user.channels.retain(|c| c != channel_id);
            }
        }

        let channel = &mut data.channels[index];
        channel.members = members;
        Ok(channel.clone())
    }
}

#[async_trait]
impl HistoryRepository for LocalRepository {
    async fn channel_history(&self, channel_id: &str) -> RepositoryResult<Vec<Event>> {
        self.check_health("channel_history")?;
        self.data
            .read()
            .history
            .get(channel_id)
            .cloned()
            .ok_or_else(|| channel_not_found("channel_history", channel_id))
    }

    async fn append_history(
        &self,
        channel_id: &str,
        events: Vec<Event>,
    ) -> RepositoryResult<usize> {
        self.check_health("append_history")?;

        if let Some(foreign) = events.iter().find(|e| e.channel_id != channel_id) {
            return Err(RepositoryError::validation_with_context(
                format!(
                    "Event for channel {} cannot be appended to {}",
                    foreign.channel_id, channel_id
                ),
                ErrorContext::new("append_history")
                    .with_entity("channel")
                    .with_entity_id(channel_id),
            ));
        }

        let mut data = self.data.write();
        let history = data
            .history
            .get_mut(channel_id)
            .ok_or_else(|| channel_not_found("append_history", channel_id))?;

        let stored = events.len();
        history.extend(events);
        // Stable: events sharing a timestamp keep arrival order.
        history.sort_by_key(|e| e.timestamp);

        log::debug!("appended {} events to channel {}", stored, channel_id);
        Ok(stored)
    }
}

#[async_trait]
impl LifecycleRepository for LocalRepository {
    async fn reset(&self, seed: MockSeed) -> RepositoryResult<()> {
        self.reset_with(seed);
        Ok(())
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod local_tests;
