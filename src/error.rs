//! Error types for the search engine
//!
//! The search has exactly one failure mode: running out of time. It is
//! modelled as an error so that `?` unwinds every pending search frame
//! back to the iterative deepening loop.

use std::time::Duration;
use thiserror::Error;

/// Errors raised while searching a position
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The per-decision budget ran out. Caught by the root driver only.
    #[error("search deadline exceeded: {elapsed:?} elapsed of {budget:?} budget")]
    Timeout { elapsed: Duration, budget: Duration },
}

/// Errors raised while loading engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A positional table does not cover every square
    #[error("positional table `{table}` has {len} entries (expected {expected})")]
    TableSize {
        table: &'static str,
        len: usize,
        expected: usize,
    },
}

/// Result type alias for search operations
pub type SearchResult<T> = Result<T, SearchError>;
