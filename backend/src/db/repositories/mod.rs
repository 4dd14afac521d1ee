//! Repository implementations module.
//!
//! - `local`: In-memory implementation for development, tests and the bundled server
pub mod local;

pub use local::LocalRepository;
