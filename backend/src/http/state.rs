//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::AggregationConfig;
use crate::db::repository::FullRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for store operations
    pub repository: Arc<dyn FullRepository>,
    /// Reporting offset and meeting match policy
    pub aggregation: AggregationConfig,
}

impl AppState {
    /// Create a new application state with default aggregation settings.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            aggregation: AggregationConfig::default(),
        }
    }

    pub fn with_aggregation(mut self, aggregation: AggregationConfig) -> Self {
        self.aggregation = aggregation;
        self
    }
}
