//! High-level database service layer.
//!
//! Repository-agnostic operations that combine the store with the pure
//! aggregation services. Handlers call these; they never aggregate while a
//! store lock is held because repositories return snapshots.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{FixedOffset, NaiveDateTime};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::repository::{FullRepository, RepositoryResult};
use super::seed::MockSeed;
use crate::models::{
    Bucket, Channel, ChannelMember, Event, MatchPolicy, MeetingSuggestion, OnlineUser, Presence,
    Scale, User, UserId, UserUpdate,
};
use crate::services::{self, RawHistoryRecord, SkippedRecord};

// ==================== Health & Lifecycle ====================

/// Check if the store is healthy.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Reset the store to the bundled mock data set anchored at `now`.
pub async fn initialize<R: FullRepository + ?Sized>(
    repo: &R,
    now: NaiveDateTime,
) -> RepositoryResult<()> {
    info!("Service layer: resetting store to the mock data set");
    repo.reset(MockSeed::default_dataset(now)).await
}

// ==================== Users ====================

pub async fn list_users<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<User>> {
    repo.list_users().await
}

pub async fn update_user<R: FullRepository + ?Sized>(
    repo: &R,
    id: UserId,
    update: UserUpdate,
) -> RepositoryResult<User> {
    info!("Service layer: updating user {}", id);
    repo.update_user(id, update).await
}

pub async fn delete_user<R: FullRepository + ?Sized>(repo: &R, id: UserId) -> RepositoryResult<User> {
    info!("Service layer: deleting user {}", id);
    repo.delete_user(id).await
}

/// Users whose presence is not offline, ordered by id.
pub async fn online_users<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<OnlineUser>> {
    let users = repo.list_users().await?;
    Ok(users
        .into_iter()
        .filter(|u| u.presence != Presence::Offline)
        .map(|u| OnlineUser {
            id: u.id,
            name: u.user_name,
            status: u.presence,
        })
        .collect())
}

// ==================== Channels ====================

pub async fn list_channels<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<Channel>> {
    repo.list_channels().await
}

pub async fn update_channel_members<R: FullRepository + ?Sized>(
    repo: &R,
    channel_id: &str,
    members: Vec<String>,
) -> RepositoryResult<Channel> {
    info!(
        "Service layer: setting {} members on channel {}",
        members.len(),
        channel_id
    );
    repo.update_channel_members(channel_id, members).await
}

/// Distinct posters of a channel in order of first posting, resolved to names.
pub async fn channel_members<R: FullRepository + ?Sized>(
    repo: &R,
    channel_id: &str,
) -> RepositoryResult<Vec<ChannelMember>> {
    let history = repo.channel_history(channel_id).await?;
    let names: HashMap<String, String> = repo
        .list_users()
        .await?
        .into_iter()
        .map(|u| (u.user_key, u.user_name))
        .collect();

    let mut seen = HashSet::new();
    Ok(history
        .into_iter()
        .filter(|e| seen.insert(e.user_id.clone()))
        .map(|e| ChannelMember {
            user_name: names.get(&e.user_id).cloned().unwrap_or_else(|| e.user_id.clone()),
            user_key: e.user_id,
        })
        .collect())
}

// ==================== History ====================

pub async fn channel_history<R: FullRepository + ?Sized>(
    repo: &R,
    channel_id: &str,
) -> RepositoryResult<Vec<Event>> {
    repo.channel_history(channel_id).await
}

/// Outcome of an ingestion request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    pub accepted: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// Normalize raw records and append the usable ones to a channel.
///
/// The channel must exist before anything is parsed; malformed records are
/// reported in the summary and never fail the request.
pub async fn ingest_history<R: FullRepository + ?Sized>(
    repo: &R,
    channel_id: &str,
    records: Vec<RawHistoryRecord>,
    offset: FixedOffset,
) -> RepositoryResult<IngestSummary> {
    repo.get_channel(channel_id).await?;

    let report = services::normalize_history(channel_id, records, offset);
    let accepted = if report.events.is_empty() {
        0
    } else {
        repo.append_history(channel_id, report.events).await?
    };

    info!(
        "Service layer: ingested {} records into {} ({} skipped)",
        accepted,
        channel_id,
        report.skipped.len()
    );
    Ok(IngestSummary {
        accepted,
        skipped: report.skipped,
    })
}

// ==================== Aggregation ====================

/// Bucketed activity of a channel at `scale`, anchored at `now`.
pub async fn channel_activity<R: FullRepository + ?Sized>(
    repo: &R,
    channel_id: &str,
    scale: Scale,
    now: NaiveDateTime,
) -> RepositoryResult<Vec<Bucket>> {
    let events = repo.channel_history(channel_id).await?;
    debug!(
        "Service layer: bucketing {} events of {} at {} scale",
        events.len(),
        channel_id,
        scale
    );
    Ok(services::bucket_events(&events, scale, now))
}

/// Meeting-time suggestion for `users` based on a channel's history.
pub async fn suggest_meeting_times<R: FullRepository + ?Sized>(
    repo: &R,
    channel_id: &str,
    users: &BTreeSet<String>,
    policy: MatchPolicy,
) -> RepositoryResult<MeetingSuggestion> {
    let events = repo.channel_history(channel_id).await?;
    Ok(services::suggest_meeting_times(&events, users, policy))
}

#[cfg(test)]
#[path = "services_tests.rs"]
mod services_tests;
