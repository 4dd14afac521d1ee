//! Wall-clock time handling for the dashboard.
//!
//! Every timestamp the aggregation engine sees is a `NaiveDateTime` expressed in
//! the dashboard's reporting offset. This module owns the label formats used by
//! the charts and the conversions from the raw timestamp shapes found in channel
//! history (Slack epoch strings, slash-separated wall-clock strings, RFC 3339).

use chrono::{DateTime, FixedOffset, NaiveDateTime, Timelike, Utc};

/// Label format for hourly buckets, e.g. `2025/04/05 15:00`.
pub const HOUR_LABEL_FORMAT: &str = "%Y/%m/%d %H:00";

/// Label format for daily buckets, e.g. `2025/04/05`.
pub const DAY_LABEL_FORMAT: &str = "%Y/%m/%d";

/// Label format for time-of-day slots, e.g. `09:00`.
pub const SLOT_LABEL_FORMAT: &str = "%H:00";

/// Full wall-clock format used when echoing an anchor instant.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

const WALL_CLOCK_FORMATS: &[&str] = &[
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Errors raised while interpreting a raw timestamp or offset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    #[error("timestamp is empty")]
    Empty,

    #[error("invalid epoch timestamp '{0}'")]
    InvalidEpoch(String),

    #[error("epoch seconds {0} are out of range")]
    OutOfRange(i64),

    #[error("unrecognized timestamp format '{0}'")]
    Unrecognized(String),

    #[error("invalid UTC offset '{0}' (expected +HH:MM or -HH:MM)")]
    InvalidOffset(String),
}

/// Parse a raw timestamp into wall-clock time in `offset`.
///
/// Epoch and RFC 3339 inputs describe instants and are shifted into `offset`;
/// wall-clock strings are taken as already being in the reporting offset.
pub fn parse_timestamp(raw: &str, offset: FixedOffset) -> Result<NaiveDateTime, TimestampError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(TimestampError::Empty);
    }

    if raw.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return parse_slack_ts(raw, offset);
    }

    for format in WALL_CLOCK_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(parsed);
        }
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|instant| instant.with_timezone(&offset).naive_local())
        .map_err(|_| TimestampError::Unrecognized(raw.to_string()))
}

/// Parse a Slack message `ts` (`"1601055549.000100"`).
///
/// Only the whole-second part is significant; the fractional part is a
/// per-channel sequence number and is ignored.
pub fn parse_slack_ts(ts: &str, offset: FixedOffset) -> Result<NaiveDateTime, TimestampError> {
    let seconds_part = ts.split('.').next().unwrap_or_default();
    if seconds_part.is_empty() {
        return Err(TimestampError::InvalidEpoch(ts.to_string()));
    }
    let seconds: i64 = seconds_part
        .parse()
        .map_err(|_| TimestampError::InvalidEpoch(ts.to_string()))?;

    DateTime::<Utc>::from_timestamp(seconds, 0)
        .map(|instant| instant.with_timezone(&offset).naive_local())
        .ok_or(TimestampError::OutOfRange(seconds))
}

/// Parse a `+HH:MM` / `-HH:MM` offset (`Z` and `UTC` are accepted as zero).
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset, TimestampError> {
    let invalid = || TimestampError::InvalidOffset(raw.to_string());
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'+') => (1, &trimmed[1..]),
        Some(b'-') => (-1, &trimmed[1..]),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Current wall-clock time in `offset`, truncated to whole seconds.
pub fn now_in(offset: FixedOffset) -> NaiveDateTime {
    let now = Utc::now().with_timezone(&offset).naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Truncate a wall-clock time to the start of its hour.
pub fn truncate_to_hour(at: NaiveDateTime) -> NaiveDateTime {
    at.date()
        .and_hms_opt(at.hour(), 0, 0)
        .unwrap_or(at)
}

/// `"HH:00"` slot label for a wall-clock time.
pub fn slot_label(at: NaiveDateTime) -> String {
    at.format(SLOT_LABEL_FORMAT).to_string()
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod time_tests;
