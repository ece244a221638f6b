//! Per-key result cache backing the movies query.
//!
//! Each key keeps its own `{status, data, error}` entry. Entries carry the
//! id of the newest request issued for them so that an older response for
//! the same key cannot overwrite a newer one.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use chrono::Utc;
use lru::LruCache;
use reelscout_core::MovieSummary;

use super::result::{FetchStatus, QueryResult, QueryStatus};
use crate::errors::QueryError;

/// Cached state for one search key.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    status: QueryStatus,
    fetching: bool,
    data: Option<Vec<MovieSummary>>,
    error: Option<QueryError>,
    request_id: u64,
    updated_at: Option<chrono::DateTime<Utc>>,
    settled_at: Option<Instant>,
}

impl CacheEntry {
    fn pending() -> Self {
        Self {
            status: QueryStatus::Pending,
            fetching: false,
            data: None,
            error: None,
            request_id: 0,
            updated_at: None,
            settled_at: None,
        }
    }

    /// Whether revisiting this key should issue a new request.
    pub fn needs_fetch(&self, stale_time: Option<Duration>) -> bool {
        if self.fetching {
            return false;
        }
        match self.status {
            QueryStatus::Pending | QueryStatus::Error => true,
            QueryStatus::Success => match (stale_time, self.settled_at) {
                (Some(max_age), Some(settled_at)) => settled_at.elapsed() >= max_age,
                _ => false,
            },
        }
    }

    /// Snapshot of this entry published under `key`.
    pub fn to_result(&self, key: &str) -> QueryResult {
        QueryResult {
            key: key.to_string(),
            status: self.status,
            fetch_status: if self.fetching {
                FetchStatus::Fetching
            } else {
                FetchStatus::Idle
            },
            data: self.data.clone(),
            error: self.error.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// LRU-bounded map from search key to cached state.
#[derive(Debug)]
pub struct QueryCache {
    entries: LruCache<String, CacheEntry>,
    next_request_id: u64,
}

impl QueryCache {
    /// Creates a cache holding at most `capacity` keys, never fewer than one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            next_request_id: 0,
        }
    }

    /// Returns the entry for `key`, marking it most recently used.
    pub fn get(&mut self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Marks `key` as fetching under a fresh request id and returns the id.
    ///
    /// Existing data and status are kept so a refetch does not flash back to
    /// a loading state. A key that never produced data goes back to pending
    /// and drops its previous error.
    pub fn begin_fetch(&mut self, key: &str) -> u64 {
        self.next_request_id += 1;
        let request_id = self.next_request_id;

        let entry = self
            .entries
            .get_or_insert_mut(key.to_string(), CacheEntry::pending);
        entry.fetching = true;
        entry.request_id = request_id;
        if entry.data.is_none() {
            entry.status = QueryStatus::Pending;
            entry.error = None;
        }
        request_id
    }

    /// Whether a request for `key` is in flight.
    pub fn is_fetching(&self, key: &str) -> bool {
        self.entries.peek(key).is_some_and(|entry| entry.fetching)
    }

    /// Records the outcome of request `request_id` for `key`.
    ///
    /// Returns false, leaving the cache untouched, when a newer request for
    /// the key has been issued since or the entry was evicted.
    pub fn complete(
        &mut self,
        key: &str,
        request_id: u64,
        outcome: Result<Vec<MovieSummary>, QueryError>,
    ) -> bool {
        let Some(entry) = self.entries.peek_mut(key) else {
            return false;
        };
        if entry.request_id != request_id {
            return false;
        }

        entry.fetching = false;
        entry.updated_at = Some(Utc::now());
        entry.settled_at = Some(Instant::now());
        match outcome {
            Ok(movies) => {
                entry.status = QueryStatus::Success;
                entry.data = Some(movies);
                entry.error = None;
            }
            Err(error) => {
                entry.status = QueryStatus::Error;
                entry.error = Some(error);
            }
        }
        true
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no key is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
