//! HTTP fetcher talking to the Reelscout proxy.

use async_trait::async_trait;
use reelscout_core::config::ClientConfig;
use reelscout_core::{MovieDetail, SearchPayload};
use serde::de::DeserializeOwned;

use super::MovieFetcher;
use crate::errors::FetchError;

/// Fetcher calling `GET /api/movies` on a running proxy.
#[derive(Debug, Clone)]
pub struct ProxyFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl ProxyFetcher {
    /// Creates a fetcher for the proxy described by `config`.
    ///
    /// # Errors
    ///
    /// - `FetchError::Transport` - If the HTTP client cannot be built
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| FetchError::Transport {
                reason: format!("HTTP client setup failed: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.proxy_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Proxy URL for a title search. The title is sent as typed, untrimmed.
    pub fn search_url(&self, title: &str) -> String {
        format!(
            "{}/api/movies?title={}",
            self.base_url,
            urlencoding::encode(title)
        )
    }

    /// Proxy URL for a lookup by IMDb identifier.
    pub fn detail_url(&self, imdb_id: &str) -> String {
        format!("{}/api/movies/{}", self.base_url, urlencoding::encode(imdb_id))
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(|e| FetchError::Decode {
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl MovieFetcher for ProxyFetcher {
    async fn search(&self, title: &str) -> Result<SearchPayload, FetchError> {
        self.get(&self.search_url(title)).await
    }

    async fn detail(&self, imdb_id: &str) -> Result<MovieDetail, FetchError> {
        self.get(&self.detail_url(imdb_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(base: &str) -> ProxyFetcher {
        ProxyFetcher::new(&ClientConfig {
            proxy_base_url: base.to_string(),
            ..ClientConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_search_url_matches_proxy_route() {
        let fetcher = fetcher("http://localhost:3000/");

        assert_eq!(
            fetcher.search_url("Frozen"),
            "http://localhost:3000/api/movies?title=Frozen"
        );
    }

    #[test]
    fn test_search_url_keeps_surrounding_whitespace() {
        let fetcher = fetcher("http://localhost:3000");

        assert_eq!(
            fetcher.search_url(" Frozen "),
            "http://localhost:3000/api/movies?title=%20Frozen%20"
        );
    }

    #[test]
    fn test_detail_url() {
        let fetcher = fetcher("http://localhost:3000");

        assert_eq!(
            fetcher.detail_url("tt2294629"),
            "http://localhost:3000/api/movies/tt2294629"
        );
    }

    #[tokio::test]
    async fn test_unreachable_proxy_is_transport_error() {
        let fetcher = fetcher("http://127.0.0.1:1");

        let result = fetcher.search("Frozen").await;

        assert!(matches!(result, Err(FetchError::Transport { .. })));
    }
}
