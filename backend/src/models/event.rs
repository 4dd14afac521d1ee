//! Canonical event shape and the derived aggregation types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One recorded channel message.
///
/// `timestamp` is wall-clock time in the dashboard's reporting offset; only the
/// timestamp matters to the aggregation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub user_id: String,
    pub channel_id: String,
    pub timestamp: NaiveDateTime,
    pub text: String,
}

impl Event {
    pub fn new(
        user_id: impl Into<String>,
        channel_id: impl Into<String>,
        timestamp: NaiveDateTime,
        text: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            channel_id: channel_id.into(),
            timestamp,
            text: text.into(),
        }
    }
}

/// Charting granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    /// Last 24 hours, one bucket per hour.
    Day,
    /// Last 7 days, one bucket per day.
    Week,
    /// Six 5-day windows.
    Month,
}

impl Scale {
    /// Number of buckets produced for this scale.
    pub fn bucket_count(self) -> usize {
        match self {
            Scale::Day => 24,
            Scale::Week => 7,
            Scale::Month => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scale::Day => "day",
            Scale::Week => "week",
            Scale::Month => "month",
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Scale::Day),
            "week" => Ok(Scale::Week),
            "month" => Ok(Scale::Month),
            other => Err(format!(
                "Unknown scale: {} (expected day, week or month)",
                other
            )),
        }
    }
}

/// One window of a charted time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

/// A suggested time-of-day slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    /// `"HH:00"` label
    pub label: String,
    /// Count that ranked this slot (see [`MatchPolicy`])
    pub supporting_user_count: usize,
}

/// How the suggester counts support for a slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Count raw postings per slot. A slot matches when the posting count equals
    /// the number of selected users, so one busy user can stand in for another.
    #[default]
    RawCount,
    /// Count distinct selected users per slot.
    DistinctUsers,
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raw_count" | "raw" => Ok(MatchPolicy::RawCount),
            "distinct_users" | "distinct" => Ok(MatchPolicy::DistinctUsers),
            other => Err(format!("Unknown match policy: {}", other)),
        }
    }
}

/// Outcome of a meeting-time suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeetingSuggestion {
    /// No users selected, or none of them has any activity.
    NoCandidates,
    /// Slots where every selected user is considered active, ascending by label.
    CommonSlots(Vec<AvailabilitySlot>),
    /// Fallback: the busiest slots, descending by count.
    MostActive(Vec<AvailabilitySlot>),
}

impl MeetingSuggestion {
    /// The suggested slots; empty for [`MeetingSuggestion::NoCandidates`].
    pub fn slots(&self) -> &[AvailabilitySlot] {
        match self {
            MeetingSuggestion::NoCandidates => &[],
            MeetingSuggestion::CommonSlots(slots) | MeetingSuggestion::MostActive(slots) => slots,
        }
    }

    /// Stable machine-readable name of the outcome.
    pub fn kind(&self) -> &'static str {
        match self {
            MeetingSuggestion::NoCandidates => "no_candidates",
            MeetingSuggestion::CommonSlots(_) => "common_slots",
            MeetingSuggestion::MostActive(_) => "most_active",
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots().is_empty()
    }
}
