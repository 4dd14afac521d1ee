//! Boundary adapter from raw channel-history records to [`Event`]s.
//!
//! History arrives in several shapes (`message` vs `text`, Slack `ts` epoch
//! strings vs formatted `timestamp`s). Everything is normalized here so the
//! aggregation services only ever see the canonical event.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::models::time::parse_timestamp;
use crate::models::Event;

/// A history record as supplied by a client or a Slack export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHistoryRecord {
    #[serde(alias = "user")]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, alias = "message")]
    pub text: String,
    #[serde(alias = "timestamp")]
    pub ts: String,
}

/// A record the adapter refused, with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub index: usize,
    pub reason: String,
}

/// Result of normalizing a batch of records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub events: Vec<Event>,
    pub skipped: Vec<SkippedRecord>,
}

/// Normalize `records` for `channel_id`.
///
/// Records with unparsable timestamps, or that name a different channel, are
/// skipped and reported; they never abort the batch.
pub fn normalize_history(
    channel_id: &str,
    records: Vec<RawHistoryRecord>,
    offset: FixedOffset,
) -> IngestReport {
    let mut report = IngestReport::default();

    for (index, record) in records.into_iter().enumerate() {
        if let Some(ref record_channel) = record.channel_id {
            if record_channel != channel_id {
                report.skipped.push(SkippedRecord {
                    index,
                    reason: format!(
                        "record belongs to channel {} not {}",
                        record_channel, channel_id
                    ),
                });
                continue;
            }
        }

        match parse_timestamp(&record.ts, offset) {
            Ok(timestamp) => report.events.push(Event {
                user_id: record.user_id,
                channel_id: channel_id.to_string(),
                timestamp,
                text: record.text,
            }),
            Err(e) => {
                log::warn!(
                    "skipping history record {} for channel {}: {}",
                    index,
                    channel_id,
                    e
                );
                report.skipped.push(SkippedRecord {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn record(user: &str, ts: &str) -> RawHistoryRecord {
        RawHistoryRecord {
            user_id: user.to_string(),
            channel_id: None,
            text: "hi".to_string(),
            ts: ts.to_string(),
        }
    }

    #[test]
    fn test_accepts_both_field_spellings() {
        let json = r#"[
            {"user_id": "U1", "channel_id": "C1", "message": "a", "ts": "1601055549.000100"},
            {"user": "U2", "text": "b", "timestamp": "2025/04/05 09:00:00"}
        ]"#;
        let records: Vec<RawHistoryRecord> = serde_json::from_str(json).unwrap();
        let report = normalize_history("C1", records, utc());

        assert!(report.skipped.is_empty());
        assert_eq!(report.events.len(), 2);
        assert_eq!(report.events[0].text, "a");
        assert_eq!(report.events[1].user_id, "U2");
        assert_eq!(report.events[1].channel_id, "C1");
        assert_eq!(
            report.events[1].timestamp,
            NaiveDate::from_ymd_opt(2025, 4, 5)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_skips_malformed_timestamps_and_keeps_the_rest() {
        let records = vec![
            record("U1", "2025/04/05 09:00"),
            record("U2", "not a time"),
            record("U3", ""),
            record("U4", "2025/04/05 10:00"),
        ];
        let report = normalize_history("C1", records, utc());

        assert_eq!(report.events.len(), 2);
        let skipped: Vec<usize> = report.skipped.iter().map(|s| s.index).collect();
        assert_eq!(skipped, vec![1, 2]);
    }

    #[test]
    fn test_skips_records_for_other_channels() {
        let mut foreign = record("U1", "2025/04/05 09:00");
        foreign.channel_id = Some("C2".to_string());
        let report = normalize_history("C1", vec![foreign], utc());

        assert!(report.events.is_empty());
        assert!(report.skipped[0].reason.contains("C2"));
    }
}
