//! Error types for movie search functionality.

use reelscout_core::ConfigError;
use thiserror::Error;

/// Errors raised while talking to the upstream movie database.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The client cannot build a request without its credential.
    #[error("Movie database is not configured: {0}")]
    Configuration(#[from] ConfigError),

    /// The request never produced a response.
    #[error("Request to movie database failed: {reason}")]
    Request {
        /// The reason for the request failure
        reason: String,
    },

    /// The database answered with a non-success HTTP status.
    #[error("Movie database returned HTTP {status}")]
    Status {
        /// HTTP status code returned by the database
        status: u16,
    },

    /// The database answered with a body that is not JSON.
    #[error("Movie database returned an unreadable body: {reason}")]
    Decode {
        /// The reason the body could not be decoded
        reason: String,
    },
}

/// Errors raised by a [`MovieFetcher`](crate::providers::MovieFetcher).
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network communication error occurred.
    #[error("Network error: {reason}")]
    Transport {
        /// The reason for the network error
        reason: String,
    },

    /// The proxy answered with a non-success HTTP status.
    #[error("Proxy returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code returned by the proxy
        status: u16,
        /// Error body returned alongside the status
        body: String,
    },

    /// Failed to parse the response body.
    #[error("Parse error: {reason}")]
    Decode {
        /// The reason for the parse error
        reason: String,
    },
}

impl From<UpstreamError> for FetchError {
    fn from(error: UpstreamError) -> Self {
        match error {
            UpstreamError::Decode { reason } => FetchError::Decode { reason },
            other => FetchError::Transport {
                reason: other.to_string(),
            },
        }
    }
}

/// Error state carried by a movies query result.
///
/// Cloneable so the same error can sit in the cache and in every published
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The database answered `Response: "False"`; displays its text verbatim.
    #[error("{message}")]
    NotFound {
        /// Error text supplied by the database
        message: String,
    },

    /// The request failed before a payload was received.
    #[error("Network error: {reason}")]
    Transport {
        /// The reason for the transport failure
        reason: String,
    },

    /// A payload arrived but could not be understood.
    #[error("Unexpected response: {reason}")]
    Decode {
        /// The reason the payload was rejected
        reason: String,
    },
}

impl QueryError {
    /// True for the database's "not found" answer as opposed to a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, QueryError::NotFound { .. })
    }
}

impl From<FetchError> for QueryError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::Decode { reason } => QueryError::Decode { reason },
            other => QueryError::Transport {
                reason: other.to_string(),
            },
        }
    }
}
