//! Activity time series for the dashboard chart.
//!
//! Events are bucketed into a fixed number of chronological windows anchored at
//! the query instant `now` ("last N units ending now"), never calendar-aligned.
//! Every scale yields a fixed number of buckets, empty ones included.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::models::time::{truncate_to_hour, DAY_LABEL_FORMAT, HOUR_LABEL_FORMAT};
use crate::models::{Bucket, Event, Scale};

/// Width of one month-scale window, in days.
pub const MONTH_WINDOW_DAYS: i64 = 5;

/// Oldest instant any scale reaches back to from its anchor.
const MAX_LOOKBACK_DAYS: i64 = MONTH_WINDOW_DAYS * 5;

/// Whether every scale can be charted back from `now` without leaving the
/// representable date range.
pub fn anchor_supported(now: NaiveDateTime) -> bool {
    now.checked_sub_signed(Duration::days(MAX_LOOKBACK_DAYS))
        .is_some()
}

/// Bucket `events` for `scale`, anchored at `now`.
///
/// The result always holds [`Scale::bucket_count`] buckets in ascending order.
/// Events outside the charted range are ignored. `now` must satisfy
/// [`anchor_supported`]; callers taking anchors from user input check it first.
pub fn bucket_events(events: &[Event], scale: Scale, now: NaiveDateTime) -> Vec<Bucket> {
    let buckets = match scale {
        Scale::Day => bucket_by_hour(events, now),
        Scale::Week => bucket_by_day(events, now),
        Scale::Month => bucket_by_window(events, now),
    };

    log::debug!(
        "bucketed {} events at scale={} into {} buckets ({} counted)",
        events.len(),
        scale,
        buckets.len(),
        buckets.iter().map(|b| b.count).sum::<usize>()
    );

    buckets
}

/// 24 hourly buckets, the last one holding `now`'s hour.
fn bucket_by_hour(events: &[Event], now: NaiveDateTime) -> Vec<Bucket> {
    let mut counts: HashMap<NaiveDateTime, usize> = HashMap::new();
    for event in events {
        *counts.entry(truncate_to_hour(event.timestamp)).or_default() += 1;
    }

    let current_hour = truncate_to_hour(now);
    (0..24)
        .rev()
        .map(|hours_back| {
            let hour = current_hour - Duration::hours(hours_back);
            Bucket {
                label: hour.format(HOUR_LABEL_FORMAT).to_string(),
                count: counts.get(&hour).copied().unwrap_or(0),
            }
        })
        .collect()
}

/// 7 daily buckets, the last one holding `now`'s date.
fn bucket_by_day(events: &[Event], now: NaiveDateTime) -> Vec<Bucket> {
    let mut counts: HashMap<NaiveDate, usize> = HashMap::new();
    for event in events {
        *counts.entry(event.timestamp.date()).or_default() += 1;
    }

    let today = now.date();
    (0..7)
        .rev()
        .map(|days_back| {
            let day = today - Duration::days(days_back);
            Bucket {
                label: day.format(DAY_LABEL_FORMAT).to_string(),
                count: counts.get(&day).copied().unwrap_or(0),
            }
        })
        .collect()
}

/// Six 5-day windows starting at `now - 25 days`, labeled by their start date.
///
/// Window `i` covers the dates `[start_i, start_i + 5 days)`, so consecutive
/// windows never share a date and each event lands in at most one window.
/// The dashboard this replaces used inclusive ends on both sides and counted
/// every boundary date twice; the half-open windows are intentional.
fn bucket_by_window(events: &[Event], now: NaiveDateTime) -> Vec<Bucket> {
    let window_count = Scale::Month.bucket_count() as i64;
    let first_start = now.date() - Duration::days(MONTH_WINDOW_DAYS * (window_count - 1));

    let mut counts = vec![0usize; Scale::Month.bucket_count()];
    for event in events {
        let offset = (event.timestamp.date() - first_start).num_days();
        if (0..MONTH_WINDOW_DAYS * window_count).contains(&offset) {
            counts[(offset / MONTH_WINDOW_DAYS) as usize] += 1;
        }
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let start = first_start + Duration::days(MONTH_WINDOW_DAYS * i as i64);
            Bucket {
                label: start.format(DAY_LABEL_FORMAT).to_string(),
                count,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "activity_tests.rs"]
mod activity_tests;
