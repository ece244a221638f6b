//! Movies query: keyed, cached fetching driven by the committed search text.
//!
//! The query follows one current key at a time. Blank keys settle at once to
//! an empty list without touching the network. Other keys are fetched on a
//! spawned task and cached per key; a response only becomes visible if its
//! key is still current when it lands, so a slow answer for an abandoned
//! search can never replace the results of a newer one.

pub mod cache;
pub mod result;

use std::sync::Arc;

use parking_lot::Mutex;
use reelscout_core::MovieSummary;
use reelscout_core::config::QueryConfig;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub use self::cache::QueryCache;
pub use self::result::{FetchStatus, QueryResult, QueryStatus};
use crate::errors::QueryError;
use crate::providers::MovieFetcher;
use crate::store::{SearchStore, StatusSink};

/// Runs a single search for `key` through `fetcher`.
///
/// Blank keys resolve to an empty list without calling the fetcher. The
/// untrimmed key is what gets sent.
///
/// # Errors
///
/// - `QueryError::NotFound` - The payload reported `Response: "False"`
/// - `QueryError::Transport` - The fetcher could not reach its backend
/// - `QueryError::Decode` - The backend answered with an unexpected body
pub async fn fetch_movies(
    fetcher: &dyn MovieFetcher,
    key: &str,
) -> Result<Vec<MovieSummary>, QueryError> {
    if key.trim().is_empty() {
        return Ok(Vec::new());
    }

    let payload = fetcher.search(key).await?;
    if payload.is_not_found() {
        return Err(QueryError::NotFound {
            message: payload.error_message().to_string(),
        });
    }
    Ok(payload.into_movies())
}

struct QueryState {
    current_key: String,
    cache: QueryCache,
}

struct QueryInner {
    fetcher: Arc<dyn MovieFetcher>,
    sink: Arc<dyn StatusSink>,
    config: QueryConfig,
    state: Mutex<QueryState>,
    results: watch::Sender<QueryResult>,
}

/// Handle to a movies query. Clones share the same cache and current key.
#[derive(Clone)]
pub struct MoviesQuery {
    inner: Arc<QueryInner>,
}

impl std::fmt::Debug for MoviesQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoviesQuery")
            .field("fetcher", &self.inner.fetcher)
            .field("result", &*self.inner.results.borrow())
            .finish()
    }
}

impl MoviesQuery {
    /// Creates a query reporting "not found" messages to `sink`.
    ///
    /// The query starts on the blank key, settled with no results.
    pub fn new(
        fetcher: Arc<dyn MovieFetcher>,
        sink: Arc<dyn StatusSink>,
        config: QueryConfig,
    ) -> Self {
        let (results, _) = watch::channel(QueryResult::empty(""));
        let state = QueryState {
            current_key: String::new(),
            cache: QueryCache::new(config.cache_capacity),
        };

        Self {
            inner: Arc::new(QueryInner {
                fetcher,
                sink,
                config,
                state: Mutex::new(state),
                results,
            }),
        }
    }

    /// Creates a query whose status messages go to `store`.
    pub fn for_store(
        fetcher: Arc<dyn MovieFetcher>,
        store: &SearchStore,
        config: QueryConfig,
    ) -> Self {
        Self::new(fetcher, Arc::new(store.clone()), config)
    }

    /// Switches the query to `key`.
    ///
    /// Setting the current key again does nothing. A key with a fresh
    /// successful cache entry is served from the cache; otherwise a fetch is
    /// started.
    ///
    /// # Panics
    ///
    /// Panics if a fetch is needed and no Tokio runtime is running.
    pub fn set_key(&self, key: impl Into<String>) {
        let key = key.into();
        let mut state = self.inner.state.lock();
        if state.current_key == key {
            return;
        }
        state.current_key = key.clone();

        if key.trim().is_empty() {
            self.inner.results.send_replace(QueryResult::empty(key));
            return;
        }

        let stale_time = self.inner.config.stale_time;
        let needs_fetch = state
            .cache
            .get(&key)
            .is_none_or(|entry| entry.needs_fetch(stale_time));

        if needs_fetch {
            let request_id = state.cache.begin_fetch(&key);
            self.spawn_fetch(key.clone(), request_id);
        } else {
            debug!(%key, "Serving movies from cache");
        }

        self.publish(&mut state);
    }

    /// Fetches the current key again, keeping any data already shown.
    ///
    /// Does nothing while a request for the key is already in flight.
    ///
    /// # Panics
    ///
    /// Panics if no Tokio runtime is running.
    pub fn refetch(&self) {
        let mut state = self.inner.state.lock();
        let key = state.current_key.clone();
        if key.trim().is_empty() || state.cache.is_fetching(&key) {
            return;
        }

        let request_id = state.cache.begin_fetch(&key);
        self.spawn_fetch(key, request_id);
        self.publish(&mut state);
    }

    /// Latest snapshot for the current key.
    pub fn result(&self) -> QueryResult {
        self.inner.results.borrow().clone()
    }

    /// Current key.
    pub fn key(&self) -> String {
        self.inner.state.lock().current_key.clone()
    }

    /// Subscribes to snapshots of the current key.
    pub fn subscribe(&self) -> watch::Receiver<QueryResult> {
        self.inner.results.subscribe()
    }

    /// Waits until no request is in flight for the current key.
    pub async fn settled(&self) -> QueryResult {
        self.wait_until(|result| !result.is_fetching()).await
    }

    /// Waits until `key` is current and settled.
    pub async fn settled_for(&self, key: &str) -> QueryResult {
        self.wait_until(|result| result.key == key && !result.is_fetching())
            .await
    }

    async fn wait_until(&self, done: impl FnMut(&QueryResult) -> bool) -> QueryResult {
        let mut rx = self.subscribe();
        match rx.wait_for(done).await {
            Ok(result) => result.clone(),
            // The sender lives in `self`, so the channel cannot close here
            Err(_) => self.result(),
        }
    }

    /// Follows `store`'s committed search text until the store is dropped.
    ///
    /// Only `search_text` drives the query; edits to the input text alone
    /// never start a fetch.
    ///
    /// # Panics
    ///
    /// Panics if no Tokio runtime is running.
    pub fn bind_store(&self, store: &SearchStore) -> JoinHandle<()> {
        let mut rx = store.subscribe();
        let initial = rx.borrow_and_update().search_text.clone();
        self.set_key(initial);

        let query = self.clone();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let key = rx.borrow_and_update().search_text.clone();
                query.set_key(key);
            }
        })
    }

    fn spawn_fetch(&self, key: String, request_id: u64) {
        debug!(%key, request_id, "Fetching movies");
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let outcome = fetch_movies(inner.fetcher.as_ref(), &key).await;
            if let Err(error) = &outcome {
                if !error.is_not_found() {
                    warn!(%key, %error, "Movie search failed");
                }
            }
            inner.complete(&key, request_id, outcome);
        });
    }

    fn publish(&self, state: &mut QueryState) {
        self.inner.publish(state);
    }
}

impl QueryInner {
    fn complete(&self, key: &str, request_id: u64, outcome: Result<Vec<MovieSummary>, QueryError>) {
        let mut state = self.state.lock();
        let not_found = match &outcome {
            Err(QueryError::NotFound { message }) => Some(message.clone()),
            _ => None,
        };

        if !state.cache.complete(key, request_id, outcome) {
            debug!(key, request_id, "Dropping superseded movie response");
            return;
        }
        if state.current_key != key {
            debug!(key, "Caching movie response for inactive search");
            return;
        }

        if let Some(message) = not_found {
            self.sink.set_message(&message);
        }
        self.publish(&mut state);
    }

    fn publish(&self, state: &mut QueryState) {
        let key = state.current_key.clone();
        let result = match state.cache.get(&key) {
            Some(entry) => entry.to_result(&key),
            None => QueryResult::empty(key),
        };
        self.results.send_replace(result);
    }
}
