//! Error mapping for proxy responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reelscout_core::ConfigError;
use reelscout_search::UpstreamError;
use serde_json::json;

/// Failures a proxy request can end in.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// The `title` query parameter is absent or blank.
    #[error("Missing required query parameter: title")]
    MissingTitle,

    /// The server has no usable upstream credential.
    #[error("Server is not configured: {0}")]
    Configuration(ConfigError),

    /// The upstream database could not be reached or answered badly.
    #[error("{0}")]
    Upstream(UpstreamError),
}

impl From<UpstreamError> for ProxyError {
    fn from(error: UpstreamError) -> Self {
        match error {
            UpstreamError::Configuration(config) => ProxyError::Configuration(config),
            other => ProxyError::Upstream(other),
        }
    }
}

impl ProxyError {
    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingTitle => StatusCode::BAD_REQUEST,
            ProxyError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ProxyError::MissingTitle => {
                tracing::debug!(status = status.as_u16(), "Rejected search without title");
            }
            ProxyError::Configuration(error) => {
                tracing::error!(%error, "Upstream credential missing");
            }
            ProxyError::Upstream(error) => {
                tracing::warn!(%error, "Upstream request failed");
            }
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
