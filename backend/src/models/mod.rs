pub mod directory;
pub mod event;
pub mod time;

pub use directory::*;
pub use event::*;
pub use time::{parse_timestamp, parse_utc_offset, TimestampError};
