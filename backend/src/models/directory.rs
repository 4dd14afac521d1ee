//! Workspace directory entities: users and channels.

use serde::{Deserialize, Serialize};

/// Identifier of a user row in the mock store.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl UserId {
    pub fn new(value: i64) -> Self {
        UserId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Presence shown on the online-users widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Online,
    Away,
    #[default]
    Offline,
}

/// A workspace member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Slack-style user key (`U…`), the value carried by events
    pub user_key: String,
    /// Display name, falling back to the real name
    pub user_name: String,
    pub grade: u8,
    /// Channel ids the user is assigned to
    pub channels: Vec<String>,
    #[serde(default)]
    pub presence: Presence,
}

/// A channel and its assigned members (user keys).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub channel_id: String,
    pub channel_name: String,
    pub members: Vec<String>,
}

/// Editable fields of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub user_name: String,
    pub grade: u8,
    pub channels: Vec<String>,
}

/// Entry of the online-users widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlineUser {
    pub id: UserId,
    pub name: String,
    pub status: Presence,
}

/// A user who has posted in a channel.
///
/// `user_name` falls back to the raw key when the poster is not in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMember {
    pub user_key: String,
    pub user_name: String,
}
