//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use std::collections::BTreeSet;

use chrono::{FixedOffset, NaiveDateTime};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    ActivityQuery, ActivityResponse, Channel, ChannelMember, Event, HealthResponse, IngestSummary,
    MeetingTimesRequest, MeetingTimesResponse, MessageResponse, OnlineUser, RawHistoryRecord,
    UpdateChannelMembersRequest, User, UserUpdate,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::models::time::{now_in, parse_timestamp, TIMESTAMP_FORMAT};
use crate::models::{Scale, UserId};
use crate::services::anchor_supported;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health & Lifecycle
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let store_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: store_status,
    }))
}

/// POST /api/init
///
/// Reset the store to the bundled mock data set.
pub async fn init_store(State(state): State<AppState>) -> HandlerResult<MessageResponse> {
    let now = now_in(state.aggregation.offset);
    db_services::initialize(state.repository.as_ref(), now).await?;
    Ok(Json(MessageResponse {
        message: "Store initialized".to_string(),
    }))
}

// =============================================================================
// Users
// =============================================================================

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> HandlerResult<Vec<User>> {
    Ok(Json(db_services::list_users(state.repository.as_ref()).await?))
}

/// PATCH /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<UserUpdate>,
) -> HandlerResult<User> {
    let user = db_services::update_user(state.repository.as_ref(), UserId::new(id), update).await?;
    Ok(Json(user))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    db_services::delete_user(state.repository.as_ref(), UserId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/online-users
pub async fn online_users(State(state): State<AppState>) -> HandlerResult<Vec<OnlineUser>> {
    Ok(Json(db_services::online_users(state.repository.as_ref()).await?))
}

// =============================================================================
// Channels
// =============================================================================

/// GET /api/channels
pub async fn list_channels(State(state): State<AppState>) -> HandlerResult<Vec<Channel>> {
    Ok(Json(db_services::list_channels(state.repository.as_ref()).await?))
}

/// PATCH /api/channels/{channel_id}
pub async fn update_channel_members(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Json(request): Json<UpdateChannelMembersRequest>,
) -> HandlerResult<Channel> {
    let channel = db_services::update_channel_members(
        state.repository.as_ref(),
        &channel_id,
        request.members,
    )
    .await?;
    Ok(Json(channel))
}

/// GET /api/channels/{channel_id}/members
///
/// Distinct posters of the channel, resolved to display names.
pub async fn channel_members(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> HandlerResult<Vec<ChannelMember>> {
    Ok(Json(
        db_services::channel_members(state.repository.as_ref(), &channel_id).await?,
    ))
}

// =============================================================================
// History
// =============================================================================

/// GET /api/history/{channel_id}
pub async fn get_history(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> HandlerResult<Vec<Event>> {
    Ok(Json(
        db_services::channel_history(state.repository.as_ref(), &channel_id).await?,
    ))
}

/// POST /api/history/{channel_id}
///
/// Ingest raw history records. Malformed records are skipped and reported.
pub async fn post_history(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Json(records): Json<Vec<RawHistoryRecord>>,
) -> HandlerResult<IngestSummary> {
    let summary = db_services::ingest_history(
        state.repository.as_ref(),
        &channel_id,
        records,
        state.aggregation.offset,
    )
    .await?;
    Ok(Json(summary))
}

// =============================================================================
// Aggregation
// =============================================================================

/// GET /api/channels/{channel_id}/activity?scale=day|week|month&now=...
///
/// A bad `scale`, an unparsable `now`, or a `now` too close to the date limit is a 400.
pub async fn get_activity(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Query(query): Query<ActivityQuery>,
) -> HandlerResult<ActivityResponse> {
    let scale = match query.scale.as_deref() {
        None | Some("") => Scale::Day,
        Some(raw) => raw.parse::<Scale>().map_err(AppError::BadRequest)?,
    };
    let now = match query.now.as_deref() {
        None | Some("") => now_in(state.aggregation.offset),
        Some(raw) => parse_anchor(raw, state.aggregation.offset)?,
    };
    if !anchor_supported(now) {
        return Err(AppError::BadRequest(format!(
            "now is out of the supported date range: {}",
            now
        )));
    }

    let buckets =
        db_services::channel_activity(state.repository.as_ref(), &channel_id, scale, now).await?;

    Ok(Json(ActivityResponse {
        scale,
        now: now.format(TIMESTAMP_FORMAT).to_string(),
        buckets,
    }))
}

/// Parse the `now` query value.
///
/// An unencoded `+` in an RFC 3339 offset reaches us as a space
/// (`2025-04-05T10:00:00 09:00`), so that form is retried with the sign restored.
fn parse_anchor(raw: &str, offset: FixedOffset) -> Result<NaiveDateTime, AppError> {
    match parse_timestamp(raw, offset) {
        Ok(now) => Ok(now),
        Err(err) => {
            let restored = raw
                .trim()
                .rsplit_once(' ')
                .filter(|(instant, _)| instant.contains('T'))
                .map(|(instant, zone)| format!("{}+{}", instant, zone));
            match restored {
                Some(candidate) => parse_timestamp(&candidate, offset).map_err(|_| err.into()),
                None => Err(err.into()),
            }
        }
    }
}

/// POST /api/channels/{channel_id}/meeting-times
pub async fn get_meeting_times(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Json(request): Json<MeetingTimesRequest>,
) -> HandlerResult<MeetingTimesResponse> {
    let selected: BTreeSet<String> = request.users.into_iter().collect();
    let suggestion = db_services::suggest_meeting_times(
        state.repository.as_ref(),
        &channel_id,
        &selected,
        state.aggregation.match_policy,
    )
    .await?;
    Ok(Json(suggestion.into()))
}
