//! Naive meeting-time suggestions from historical posting times.
//!
//! Activity of the selected users is folded into `"HH:00"` slots. Slots where
//! every selected user is considered active win, ascending by label; when there
//! are none the busiest slots are offered instead.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::models::time::slot_label;
use crate::models::{AvailabilitySlot, Event, MatchPolicy, MeetingSuggestion};

/// Upper bound on suggested slots.
pub const MAX_SUGGESTIONS: usize = 5;

/// Suggest up to [`MAX_SUGGESTIONS`] time-of-day slots for `selected` users.
///
/// `events` should already be restricted to one channel. With
/// [`MatchPolicy::RawCount`] a slot matches when its posting count equals the
/// number of selected users; with [`MatchPolicy::DistinctUsers`] when every
/// selected user posted in it at least once.
pub fn suggest_meeting_times(
    events: &[Event],
    selected: &BTreeSet<String>,
    policy: MatchPolicy,
) -> MeetingSuggestion {
    if selected.is_empty() {
        return MeetingSuggestion::NoCandidates;
    }

    let histogram = slot_histogram(events, selected, policy);
    if histogram.is_empty() {
        log::debug!(
            "no activity for {} selected users across {} events",
            selected.len(),
            events.len()
        );
        return MeetingSuggestion::NoCandidates;
    }

    // BTreeMap iteration is already ascending by label.
    let common: Vec<AvailabilitySlot> = histogram
        .iter()
        .filter(|(_, count)| **count == selected.len())
        .take(MAX_SUGGESTIONS)
        .map(|(label, &count)| slot(label, count))
        .collect();

    if !common.is_empty() {
        return MeetingSuggestion::CommonSlots(common);
    }

    let mut ranked: Vec<(&String, &usize)> = histogram.iter().collect();
    // Stable sort keeps ascending labels among equal counts.
    ranked.sort_by(|a, b| b.1.cmp(a.1));

    MeetingSuggestion::MostActive(
        ranked
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(label, &count)| slot(label, count))
            .collect(),
    )
}

/// Per-slot support for the selected users.
fn slot_histogram(
    events: &[Event],
    selected: &BTreeSet<String>,
    policy: MatchPolicy,
) -> BTreeMap<String, usize> {
    let relevant = events.iter().filter(|e| selected.contains(&e.user_id));

    match policy {
        MatchPolicy::RawCount => {
            let mut counts = BTreeMap::new();
            for event in relevant {
                *counts.entry(slot_label(event.timestamp)).or_insert(0) += 1;
            }
            counts
        }
        MatchPolicy::DistinctUsers => {
            let mut users: BTreeMap<String, HashSet<&str>> = BTreeMap::new();
            for event in relevant {
                users
                    .entry(slot_label(event.timestamp))
                    .or_default()
                    .insert(event.user_id.as_str());
            }
            users
                .into_iter()
                .map(|(label, members)| (label, members.len()))
                .collect()
        }
    }
}

fn slot(label: &str, count: usize) -> AvailabilitySlot {
    AvailabilitySlot {
        label: label.to_string(),
        supporting_user_count: count,
    }
}

#[cfg(test)]
#[path = "meeting_tests.rs"]
mod meeting_tests;
