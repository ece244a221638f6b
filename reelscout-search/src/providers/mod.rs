//! Fetcher implementations feeding the movies query.

use async_trait::async_trait;
use reelscout_core::{MovieDetail, SearchPayload};

use crate::errors::FetchError;

pub mod database;
pub mod demo;
#[cfg(test)]
pub mod mock;
pub mod proxy;

pub use database::DatabaseFetcher;
pub use demo::DemoDatabase;
#[cfg(test)]
pub use mock::MockFetcher;
pub use proxy::ProxyFetcher;

/// Trait for movie search fetchers.
///
/// Implementations provide search results through different backends
/// (the HTTP proxy, an in-process database, mock fetchers for testing).
#[async_trait]
pub trait MovieFetcher: Send + Sync + std::fmt::Debug {
    /// Fetch the search payload for `title`, passed through unmodified.
    ///
    /// A `Response: "False"` payload is a successful fetch; interpreting it
    /// is left to the caller.
    ///
    /// # Errors
    /// - `FetchError::Transport` - Network connectivity issues
    /// - `FetchError::Status` - Non-success HTTP status
    /// - `FetchError::Decode` - Body is not a search payload
    async fn search(&self, title: &str) -> Result<SearchPayload, FetchError>;

    /// Fetch details for a single title.
    ///
    /// # Errors
    /// Same as [`MovieFetcher::search`].
    async fn detail(&self, imdb_id: &str) -> Result<MovieDetail, FetchError>;
}
