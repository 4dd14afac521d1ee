//! Service layer: the pure aggregation engine and its ingestion boundary.
//!
//! Nothing in here touches the store. Callers take a snapshot of a channel's
//! events and hand it to these functions.

pub mod activity;
pub mod ingest;
pub mod meeting;

pub use activity::{anchor_supported, bucket_events};
pub use ingest::{normalize_history, IngestReport, RawHistoryRecord, SkippedRecord};
pub use meeting::{suggest_meeting_times, MAX_SUGGESTIONS};
