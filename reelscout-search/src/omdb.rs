//! Upstream movie database access using the OMDb API.

use async_trait::async_trait;
use reelscout_core::config::UpstreamConfig;
use serde_json::Value;

use crate::errors::UpstreamError;

/// Source of raw movie database bodies.
///
/// Bodies are returned as untyped JSON so the proxy can hand them to the
/// browser exactly as the database produced them.
#[async_trait]
pub trait MovieDatabase: Send + Sync + std::fmt::Debug {
    /// Search titles matching `title`.
    ///
    /// # Errors
    /// - `UpstreamError::Configuration` - No credential configured
    /// - `UpstreamError::Request` - Network failure or timeout
    /// - `UpstreamError::Status` - Non-success HTTP status
    /// - `UpstreamError::Decode` - Body is not JSON
    async fn search(&self, title: &str) -> Result<Value, UpstreamError>;

    /// Look up a single title by IMDb identifier.
    ///
    /// # Errors
    /// Same as [`MovieDatabase::search`].
    async fn lookup(&self, imdb_id: &str) -> Result<Value, UpstreamError>;
}

/// OMDb HTTP client holding the server-side credential.
#[derive(Clone)]
pub struct OmdbClient {
    client: reqwest::Client,
    base_url: String,
    config: UpstreamConfig,
}

impl std::fmt::Debug for OmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OmdbClient")
            .field("base_url", &self.base_url)
            .field("config", &self.config)
            .finish()
    }
}

impl OmdbClient {
    /// Create an OMDb client from upstream configuration.
    ///
    /// A missing credential is not rejected here; every request checks it
    /// and fails with `UpstreamError::Configuration` instead of sending an
    /// empty `apikey`.
    ///
    /// # Errors
    ///
    /// - `UpstreamError::Request` - If the HTTP client cannot be built
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| UpstreamError::Request {
                reason: format!("HTTP client setup failed: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            config: config.clone(),
        })
    }

    /// Upstream URL for a title search.
    ///
    /// # Errors
    ///
    /// - `UpstreamError::Configuration` - If no credential is configured
    pub fn search_url(&self, title: &str) -> Result<String, UpstreamError> {
        Ok(format!(
            "{}/?apikey={}&s={}",
            self.base_url,
            urlencoding::encode(self.api_key()?),
            urlencoding::encode(title)
        ))
    }

    /// Upstream URL for a lookup by IMDb identifier.
    ///
    /// # Errors
    ///
    /// - `UpstreamError::Configuration` - If no credential is configured
    pub fn lookup_url(&self, imdb_id: &str) -> Result<String, UpstreamError> {
        Ok(format!(
            "{}/?apikey={}&i={}",
            self.base_url,
            urlencoding::encode(self.api_key()?),
            urlencoding::encode(imdb_id)
        ))
    }

    fn api_key(&self) -> Result<&str, UpstreamError> {
        Ok(self.config.require_api_key()?)
    }

    async fn get_json(&self, url: &str) -> Result<Value, UpstreamError> {
        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| UpstreamError::Request {
                    reason: e.without_url().to_string(),
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(|e| UpstreamError::Decode {
            reason: e.without_url().to_string(),
        })
    }
}

#[async_trait]
impl MovieDatabase for OmdbClient {
    async fn search(&self, title: &str) -> Result<Value, UpstreamError> {
        let url = self.search_url(title)?;
        tracing::debug!(title, "Searching movie database");
        self.get_json(&url).await
    }

    async fn lookup(&self, imdb_id: &str) -> Result<Value, UpstreamError> {
        let url = self.lookup_url(imdb_id)?;
        tracing::debug!(imdb_id, "Looking up movie");
        self.get_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_key(api_key: Option<&str>) -> OmdbClient {
        let config = UpstreamConfig {
            api_key: api_key.map(str::to_string),
            ..UpstreamConfig::default()
        };
        OmdbClient::new(&config).unwrap()
    }

    #[test]
    fn test_search_url_carries_key_and_title() {
        let client = client_with_key(Some("test-api-key"));

        let url = client.search_url("Frozen").unwrap();

        assert_eq!(url, "https://omdbapi.com/?apikey=test-api-key&s=Frozen");
        assert!(url.contains("apikey=test-api-key&s=Frozen"));
    }

    #[test]
    fn test_search_url_encodes_title() {
        let client = client_with_key(Some("k"));

        let url = client.search_url("Star Wars & Co").unwrap();

        assert!(url.ends_with("&s=Star%20Wars%20%26%20Co"));
    }

    #[test]
    fn test_lookup_url_uses_imdb_id() {
        let client = client_with_key(Some("test-api-key"));

        assert_eq!(
            client.lookup_url("tt2294629").unwrap(),
            "https://omdbapi.com/?apikey=test-api-key&i=tt2294629"
        );
    }

    #[test]
    fn test_missing_key_fails_fast() {
        for key in [None, Some(""), Some("  ")] {
            let client = client_with_key(key);
            assert!(matches!(
                client.search_url("Frozen"),
                Err(UpstreamError::Configuration(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_search_without_key_never_sends_request() {
        let config = UpstreamConfig {
            // Unroutable: a request attempt would surface as UpstreamError::Request
            base_url: "http://127.0.0.1:1".to_string(),
            ..UpstreamConfig::default()
        };
        let client = OmdbClient::new(&config).unwrap();

        let result = client.search("Frozen").await;

        assert!(matches!(result, Err(UpstreamError::Configuration(_))));
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = client_with_key(Some("secret-value"));

        assert!(!format!("{client:?}").contains("secret-value"));
    }
}
