//! Data Transfer Objects for the HTTP API.
//!
//! Store entities (`User`, `Channel`, `Event`, ...) already derive
//! Serialize/Deserialize and are returned as-is.

use serde::{Deserialize, Serialize};

use crate::models::{AvailabilitySlot, Bucket, MeetingSuggestion, Scale};

pub use crate::db::services::IngestSummary;
pub use crate::models::{Channel, ChannelMember, Event, OnlineUser, User, UserUpdate};
pub use crate::services::RawHistoryRecord;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Request body for replacing a channel's members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateChannelMembersRequest {
    pub members: Vec<String>,
}

/// Query parameters for the activity chart.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityQuery {
    /// `day` (default), `week` or `month`
    pub scale: Option<String>,
    /// Anchor instant; defaults to the current time in the reporting offset.
    /// RFC 3339 offsets should be percent-encoded (`%2B09:00`); a `+` decoded
    /// to a space is also accepted.
    pub now: Option<String>,
}

/// Activity chart response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityResponse {
    pub scale: Scale,
    /// Anchor used, formatted `YYYY/MM/DD HH:MM:SS`
    pub now: String,
    pub buckets: Vec<Bucket>,
}

/// Request body for meeting-time suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingTimesRequest {
    pub users: Vec<String>,
}

/// Meeting-time suggestion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingTimesResponse {
    /// `common_slots`, `most_active` or `no_candidates`
    pub kind: String,
    pub slots: Vec<AvailabilitySlot>,
}

impl From<MeetingSuggestion> for MeetingTimesResponse {
    fn from(suggestion: MeetingSuggestion) -> Self {
        Self {
            kind: suggestion.kind().to_string(),
            slots: suggestion.slots().to_vec(),
        }
    }
}
