//! Published state of a movies query.

use chrono::{DateTime, Utc};
use reelscout_core::MovieSummary;

use crate::errors::QueryError;

/// Whether the key has ever settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// No result has been produced for the key yet
    Pending,
    /// The last settled fetch succeeded
    Success,
    /// The last settled fetch failed
    Error,
}

/// Whether a request for the key is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Nothing in flight
    Idle,
    /// A request is in flight
    Fetching,
}

/// Snapshot of the query for one key.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Search text this snapshot belongs to, as committed
    pub key: String,
    /// Settled state of the key
    pub status: QueryStatus,
    /// In-flight state of the key
    pub fetch_status: FetchStatus,
    /// Last successful hits; kept while refetching or after a later error
    pub data: Option<Vec<MovieSummary>>,
    /// Error from the last settled fetch, if it failed
    pub error: Option<QueryError>,
    /// When the last fetch settled
    pub updated_at: Option<DateTime<Utc>>,
}

impl QueryResult {
    /// Result for a blank key: settled, empty, never fetched.
    pub fn empty(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            status: QueryStatus::Success,
            fetch_status: FetchStatus::Idle,
            data: Some(Vec::new()),
            error: None,
            updated_at: None,
        }
    }

    /// True while the first fetch for the key is in flight.
    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Pending && self.is_fetching()
    }

    /// True whenever a request is in flight, refetches included.
    pub fn is_fetching(&self) -> bool {
        self.fetch_status == FetchStatus::Fetching
    }

    /// True when the last settled fetch succeeded.
    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    /// True when the last settled fetch failed.
    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    /// Hits to display, empty when there is no data.
    pub fn movies(&self) -> &[MovieSummary] {
        self.data.as_deref().unwrap_or(&[])
    }
}
