//! Centralized configuration for Reelscout.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::path::PathBuf;
use std::time::Duration;

use crate::mode::RuntimeMode;

/// Environment variable holding the movie database credential.
pub const API_KEY_VARIABLE: &str = "OMDB_API_KEY";

/// Errors raised while building or validating configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing movie database API key ({variable} is unset or empty)")]
    MissingApiKey { variable: &'static str },

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Central configuration for all Reelscout components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct ReelscoutConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub query: QueryConfig,
    pub client: ClientConfig,
    pub runtime_mode: RuntimeMode,
}

/// Proxy server binding and static asset configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind the proxy to
    pub host: String,
    /// Port to bind the proxy to
    pub port: u16,
    /// Directory served as the fallback for non-API routes
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            static_dir: None,
        }
    }
}

impl ServerConfig {
    /// Address string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Upstream movie database communication.
///
/// The API key stays on the server; browsers only ever see the proxy.
#[derive(Clone)]
pub struct UpstreamConfig {
    /// Base URL of the movie database, without trailing query
    pub base_url: String,
    /// Credential appended as `apikey=` to every upstream request
    pub api_key: Option<String>,
    /// HTTP request timeout for upstream calls
    pub request_timeout: Duration,
    /// User agent for HTTP requests
    pub user_agent: &'static str,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://omdbapi.com".to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(10),
            user_agent: "reelscout/0.1.0",
        }
    }
}

// Hand-written so the credential never ends up in logs.
impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout", &self.request_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl UpstreamConfig {
    /// Returns the configured API key, rejecting absent or blank values.
    ///
    /// # Errors
    ///
    /// - `ConfigError::MissingApiKey` - If no usable key is configured
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey {
                variable: API_KEY_VARIABLE,
            })
    }
}

/// Client-side query cache behavior.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Maximum number of search keys kept in the result cache
    pub cache_capacity: usize,
    /// Age after which a cached result is refetched on revisit (None = never)
    pub stale_time: Option<Duration>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 100,
            stale_time: None,
        }
    }
}

/// Settings for clients talking to the proxy.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the proxy server
    pub proxy_base_url: String,
    /// HTTP request timeout for proxy calls
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            proxy_base_url: "http://127.0.0.1:3000".to_string(),
            request_timeout: Duration::from_secs(15),
        }
    }
}

impl ReelscoutConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Creates configuration from an arbitrary variable lookup.
    ///
    /// Unparseable numeric values are ignored with a warning and the
    /// default is kept.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(key) = lookup(API_KEY_VARIABLE) {
            config.upstream.api_key = Some(key);
        }

        if let Some(url) = lookup("REELSCOUT_UPSTREAM_URL") {
            config.upstream.base_url = url;
        }

        if let Some(seconds) = parse_var::<u64, _>(&lookup, "REELSCOUT_REQUEST_TIMEOUT") {
            config.upstream.request_timeout = Duration::from_secs(seconds);
            config.client.request_timeout = Duration::from_secs(seconds);
        }

        if let Some(host) = lookup("REELSCOUT_HOST") {
            config.server.host = host;
        }

        if let Some(port) = parse_var::<u16, _>(&lookup, "REELSCOUT_PORT") {
            config.server.port = port;
        }

        if let Some(url) = lookup("REELSCOUT_PROXY_URL") {
            config.client.proxy_base_url = url;
        }

        if let Some(capacity) = parse_var::<usize, _>(&lookup, "REELSCOUT_CACHE_CAPACITY") {
            config.query.cache_capacity = capacity.max(1);
        }

        if let Some(seconds) = parse_var::<u64, _>(&lookup, "REELSCOUT_STALE_TIME") {
            config.query.stale_time = Some(Duration::from_secs(seconds));
        }

        if let Some(mode) = lookup("REELSCOUT_MODE") {
            match mode.parse() {
                Ok(mode) => config.runtime_mode = mode,
                Err(e) => tracing::warn!("Ignoring REELSCOUT_MODE: {e}"),
            }
        }

        config
    }

    /// Validates the configuration for serving the proxy.
    ///
    /// Production mode needs a credential up front; development mode serves
    /// the offline catalog and needs none.
    ///
    /// # Errors
    ///
    /// - `ConfigError::MissingApiKey` - Production mode without a credential
    /// - `ConfigError::InvalidUrl` - Upstream base URL does not parse
    pub fn validate_for_server(&self) -> Result<(), ConfigError> {
        validate_url(&self.upstream.base_url)?;
        if self.runtime_mode.is_production() {
            self.upstream.require_api_key()?;
        }
        Ok(())
    }

    /// Validates the configuration for clients of the proxy.
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidUrl` - Proxy base URL does not parse
    pub fn validate_for_client(&self) -> Result<(), ConfigError> {
        validate_url(&self.client.proxy_base_url)
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {name}: '{raw}' is not a valid value");
            None
        }
    }
}

fn validate_url(raw: &str) -> Result<(), ConfigError> {
    url::Url::parse(raw)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> ReelscoutConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ReelscoutConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = config_from(&[]);

        assert_eq!(config.upstream.base_url, "https://omdbapi.com");
        assert!(config.upstream.api_key.is_none());
        assert_eq!(config.server.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.query.cache_capacity, 100);
        assert!(config.query.stale_time.is_none());
    }

    #[test]
    fn test_environment_overrides() {
        let config = config_from(&[
            ("OMDB_API_KEY", "test-api-key"),
            ("REELSCOUT_PORT", "8080"),
            ("REELSCOUT_STALE_TIME", "60"),
            ("REELSCOUT_MODE", "production"),
        ]);

        assert_eq!(config.upstream.require_api_key(), Ok("test-api-key"));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.query.stale_time, Some(Duration::from_secs(60)));
        assert!(config.runtime_mode.is_production());
    }

    #[test]
    fn test_invalid_numbers_keep_defaults() {
        let config = config_from(&[("REELSCOUT_PORT", "eighty"), ("REELSCOUT_MODE", "staging")]);

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.runtime_mode, RuntimeMode::default());
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let config = config_from(&[("OMDB_API_KEY", "   ")]);

        assert_eq!(
            config.upstream.require_api_key(),
            Err(ConfigError::MissingApiKey {
                variable: API_KEY_VARIABLE
            })
        );
    }

    #[test]
    fn test_production_server_requires_api_key() {
        let mut config = config_from(&[("REELSCOUT_MODE", "prod")]);
        assert!(matches!(
            config.validate_for_server(),
            Err(ConfigError::MissingApiKey { .. })
        ));

        config.runtime_mode = RuntimeMode::Development;
        assert!(config.validate_for_server().is_ok());
    }

    #[test]
    fn test_invalid_upstream_url_rejected() {
        let config = config_from(&[("REELSCOUT_UPSTREAM_URL", "not a url")]);

        assert!(matches!(
            config.validate_for_server(),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_debug_output_redacts_api_key() {
        let config = config_from(&[("OMDB_API_KEY", "secret-value")]);
        let rendered = format!("{:?}", config.upstream);

        assert!(!rendered.contains("secret-value"));
        assert!(rendered.contains("<redacted>"));
    }
}
