//! Bundled mock data set used for local development and the init endpoint.

use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::models::{Channel, Event, Presence, User, UserId};

/// Days of history generated by [`MockSeed::default_dataset`].
pub const SEED_HISTORY_DAYS: i64 = 30;

/// A complete store snapshot: users, channels and per-channel history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockSeed {
    pub users: Vec<User>,
    pub channels: Vec<Channel>,
    pub history: Vec<Event>,
}

/// Recurring posting habit of one seeded user.
struct Habit {
    user_key: &'static str,
    channel_id: &'static str,
    hour: u32,
    minute: u32,
    every_n_days: i64,
}

const HABITS: &[Habit] = &[
    Habit { user_key: "U001", channel_id: "general", hour: 9, minute: 10, every_n_days: 1 },
    Habit { user_key: "U001", channel_id: "general", hour: 14, minute: 20, every_n_days: 1 },
    Habit { user_key: "U001", channel_id: "dev", hour: 14, minute: 40, every_n_days: 1 },
    Habit { user_key: "U002", channel_id: "general", hour: 9, minute: 30, every_n_days: 1 },
    Habit { user_key: "U002", channel_id: "general", hour: 16, minute: 5, every_n_days: 1 },
    Habit { user_key: "U003", channel_id: "dev", hour: 10, minute: 15, every_n_days: 2 },
    Habit { user_key: "U003", channel_id: "dev", hour: 14, minute: 5, every_n_days: 2 },
];

impl MockSeed {
    /// An empty seed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Three users across the `general` and `dev` channels, with
    /// [`SEED_HISTORY_DAYS`] days of habitual postings ending at `now`.
    ///
    /// Postings later than `now` are left out, so charts anchored at `now`
    /// never see future activity.
    pub fn default_dataset(now: NaiveDateTime) -> Self {
        let users = vec![
            seed_user(1, "U001", "Sato", 3, &["general", "dev"], Presence::Online),
            seed_user(2, "U002", "Suzuki", 2, &["general"], Presence::Online),
            seed_user(3, "U003", "Tanaka", 4, &["dev"], Presence::Away),
        ];

        let channels = vec![
            seed_channel("general", &["U001", "U002"]),
            seed_channel("dev", &["U001", "U003"]),
        ];

        let today = now.date();
        let mut history = Vec::new();
        for days_ago in (0..SEED_HISTORY_DAYS).rev() {
            let date = today - Duration::days(days_ago);
            for habit in HABITS {
                if days_ago % habit.every_n_days != 0 {
                    continue;
                }
                let Some(time) = NaiveTime::from_hms_opt(habit.hour, habit.minute, 0) else {
                    continue;
                };
                let timestamp = date.and_time(time);
                if timestamp > now {
                    continue;
                }
                history.push(Event::new(
                    habit.user_key,
                    habit.channel_id,
                    timestamp,
                    format!("{} checking in", habit.user_key),
                ));
            }
        }

        Self {
            users,
            channels,
            history,
        }
    }
}

fn seed_user(
    id: i64,
    user_key: &str,
    user_name: &str,
    grade: u8,
    channels: &[&str],
    presence: Presence,
) -> User {
    User {
        id: UserId::new(id),
        user_key: user_key.to_string(),
        user_name: user_name.to_string(),
        grade,
        channels: channels.iter().map(|c| c.to_string()).collect(),
        presence,
    }
}

fn seed_channel(name: &str, members: &[&str]) -> Channel {
    Channel {
        channel_id: name.to_string(),
        channel_name: name.to_string(),
        members: members.iter().map(|m| m.to_string()).collect(),
    }
}
