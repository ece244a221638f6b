//! In-process fetcher backed directly by a movie database.

use std::sync::Arc;

use async_trait::async_trait;
use reelscout_core::{MovieDetail, SearchPayload};
use serde::de::DeserializeOwned;

use super::MovieFetcher;
use crate::errors::FetchError;
use crate::omdb::MovieDatabase;

/// Fetcher that skips the proxy and asks a [`MovieDatabase`] itself.
///
/// Used by the CLI in development mode, where the offline catalog lives in
/// the same process.
#[derive(Debug, Clone)]
pub struct DatabaseFetcher {
    database: Arc<dyn MovieDatabase>,
}

impl DatabaseFetcher {
    /// Wraps `database` so the query can call it without a proxy.
    pub fn new(database: Arc<dyn MovieDatabase>) -> Self {
        Self { database }
    }
}

fn decode<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, FetchError> {
    serde_json::from_value(body).map_err(|e| FetchError::Decode {
        reason: e.to_string(),
    })
}

#[async_trait]
impl MovieFetcher for DatabaseFetcher {
    async fn search(&self, title: &str) -> Result<SearchPayload, FetchError> {
        decode(self.database.search(title).await?)
    }

    async fn detail(&self, imdb_id: &str) -> Result<MovieDetail, FetchError> {
        decode(self.database.lookup(imdb_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::DemoDatabase;

    #[tokio::test]
    async fn test_decodes_demo_catalog() {
        let fetcher = DatabaseFetcher::new(Arc::new(DemoDatabase::new()));

        let payload = fetcher.search("frozen").await.unwrap();

        assert!(!payload.is_not_found());
        assert!(payload.into_movies().iter().all(|m| m.title.contains("Frozen")));
    }

    #[tokio::test]
    async fn test_detail_by_id() {
        let fetcher = DatabaseFetcher::new(Arc::new(DemoDatabase::new()));

        let detail = fetcher.detail("tt0133093").await.unwrap();

        assert_eq!(detail.title.as_deref(), Some("The Matrix"));
    }
}
