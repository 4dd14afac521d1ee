//! # SeeLACK Backend
//!
//! Activity analytics for a Slack-like workspace.
//!
//! This crate buckets channel message history into dashboard time series and
//! suggests meeting times from the posting habits of selected users. A small
//! in-memory directory of users and channels backs a REST API for the frontend.
//!
//! ## Architecture
//!
//! - [`models`]: Events, directory entities, scales and timestamp handling
//! - [`services`]: The pure aggregation engine and the history ingestion adapter
//! - [`db`]: Repository traits, the in-memory store and the service layer over it
//! - [`config`]: `seelack.toml` loading with environment overrides
//! - [`http`]: Axum-based HTTP server and request handlers
//!

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
