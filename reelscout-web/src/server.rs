//! Proxy server for Reelscout
//!
//! Exposes the movie database behind a small JSON API so that the API key
//! stays on the server.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::routing::get;
use reelscout_core::{ReelscoutConfig, ReelscoutError, RuntimeMode};
use reelscout_search::{DemoDatabase, MovieDatabase, OmdbClient};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{api_health, api_movie_detail, api_movies};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database every request is forwarded to
    pub database: Arc<dyn MovieDatabase>,
    /// Mode the server was started in
    pub runtime_mode: RuntimeMode,
    /// Server start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Creates state for a server starting now.
    pub fn new(database: Arc<dyn MovieDatabase>, runtime_mode: RuntimeMode) -> Self {
        Self {
            database,
            runtime_mode,
            started_at: Instant::now(),
        }
    }
}

/// Picks the database backing the proxy for the configured runtime mode.
///
/// # Errors
///
/// - `ReelscoutError::Server` - If the HTTP client cannot be constructed
pub fn build_database(config: &ReelscoutConfig) -> Result<Arc<dyn MovieDatabase>, ReelscoutError> {
    match config.runtime_mode {
        RuntimeMode::Development => {
            tracing::info!("Serving the offline demo catalog");
            Ok(Arc::new(DemoDatabase::new()))
        }
        RuntimeMode::Production => {
            let client = OmdbClient::new(&config.upstream).map_err(|e| ReelscoutError::Server {
                reason: e.to_string(),
            })?;
            tracing::info!(base_url = %config.upstream.base_url, "Proxying the movie database");
            Ok(Arc::new(client))
        }
    }
}

/// Builds the proxy router. Unmatched paths fall through to `static_dir`
/// when one is given.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/api/health", get(api_health))
        .route("/api/movies", get(api_movies))
        .route("/api/movies/{imdb_id}", get(api_movie_detail));

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Runs the proxy until interrupted.
///
/// # Errors
///
/// - `ReelscoutError::Configuration` - If the configuration cannot serve requests
/// - `ReelscoutError::Io` - If the listener cannot be bound or the server fails
pub async fn run_server(config: ReelscoutConfig) -> Result<(), ReelscoutError> {
    config.validate_for_server()?;

    let database = build_database(&config)?;
    let state = AppState::new(database, config.runtime_mode);
    let app = build_router(state, config.server.static_dir.as_deref());

    let listener = tokio::net::TcpListener::bind(config.server.bind_address()).await?;
    let address = listener.local_addr()?;
    tracing::info!(%address, mode = %config.runtime_mode, "Reelscout proxy listening");
    println!("Reelscout proxy running on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Reelscout proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "Cannot listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use reelscout_core::config::UpstreamConfig;
    use reelscout_search::UpstreamError;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    #[derive(Debug, Default)]
    struct StubDatabase {
        titles: Mutex<Vec<String>>,
        ids: Mutex<Vec<String>>,
        failing: bool,
    }

    impl StubDatabase {
        fn failing() -> Self {
            Self {
                failing: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl MovieDatabase for StubDatabase {
        async fn search(&self, title: &str) -> Result<Value, UpstreamError> {
            self.titles.lock().unwrap().push(title.to_string());
            if self.failing {
                return Err(UpstreamError::Status { status: 503 });
            }
            if title == "InvalidMovie" {
                return Ok(json!({ "Response": "False", "Error": "Movie not found!" }));
            }
            Ok(json!({
                "Search": [{
                    "Title": title,
                    "Year": "2013",
                    "imdbID": "tt2294629",
                    "Type": "movie",
                    "Poster": "N/A"
                }],
                "totalResults": "1",
                "Response": "True"
            }))
        }

        async fn lookup(&self, imdb_id: &str) -> Result<Value, UpstreamError> {
            self.ids.lock().unwrap().push(imdb_id.to_string());
            Ok(json!({ "Title": "Frozen", "imdbID": imdb_id, "Response": "True" }))
        }
    }

    fn router_with(database: Arc<dyn MovieDatabase>) -> Router {
        build_router(AppState::new(database, RuntimeMode::Development), None)
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_search_relays_upstream_body() {
        let database = Arc::new(StubDatabase::default());
        let (status, body) = get_json(router_with(database.clone()), "/api/movies?title=Frozen").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["Response"], "True");
        assert_eq!(body["Search"][0]["Title"], "Frozen");
        assert_eq!(*database.titles.lock().unwrap(), vec!["Frozen".to_string()]);
    }

    #[tokio::test]
    async fn test_relay_keeps_the_whole_upstream_document() {
        let database = Arc::new(StubDatabase::default());
        let expected = database.search("Frozen").await.unwrap();

        let (status, body) = get_json(router_with(database), "/api/movies?title=Frozen").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, expected);
    }

    #[tokio::test]
    async fn test_title_is_forwarded_decoded_and_untrimmed() {
        let database = Arc::new(StubDatabase::default());
        let (status, _) = get_json(router_with(database.clone()), "/api/movies?title=%20Frozen%20II").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(*database.titles.lock().unwrap(), vec![" Frozen II".to_string()]);
    }

    #[tokio::test]
    async fn test_not_found_body_is_still_ok() {
        let (status, body) = get_json(
            router_with(Arc::new(StubDatabase::default())),
            "/api/movies?title=InvalidMovie",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "Response": "False", "Error": "Movie not found!" }));
    }

    #[tokio::test]
    async fn test_missing_or_blank_title_is_bad_request() {
        for uri in ["/api/movies", "/api/movies?title=", "/api/movies?title=%20%20"] {
            let database = Arc::new(StubDatabase::default());
            let (status, body) = get_json(router_with(database.clone()), uri).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(body["error"].as_str().unwrap().contains("title"));
            assert!(database.titles.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_missing_api_key_is_server_error() {
        let client = OmdbClient::new(&UpstreamConfig {
            api_key: None,
            ..UpstreamConfig::default()
        })
        .unwrap();
        let (status, body) = get_json(router_with(Arc::new(client)), "/api/movies?title=Frozen").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("OMDB_API_KEY"));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway() {
        let (status, body) = get_json(
            router_with(Arc::new(StubDatabase::failing())),
            "/api/movies?title=Frozen",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_detail_forwards_imdb_id() {
        let database = Arc::new(StubDatabase::default());
        let (status, body) = get_json(router_with(database.clone()), "/api/movies/tt2294629").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["imdbID"], "tt2294629");
        assert_eq!(*database.ids.lock().unwrap(), vec!["tt2294629".to_string()]);
    }

    #[tokio::test]
    async fn test_health_reports_mode() {
        let (status, body) = get_json(router_with(Arc::new(StubDatabase::default())), "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["mode"], RuntimeMode::Development.to_string());
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let response = router_with(Arc::new(StubDatabase::default()))
            .oneshot(
                Request::get("/api/movies?title=Frozen")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn test_static_dir_is_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>reelscout</h1>").unwrap();
        let state = AppState::new(Arc::new(StubDatabase::default()), RuntimeMode::Development);
        let router = build_router(state, Some(dir.path()));

        let response = router
            .oneshot(Request::get("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"<h1>reelscout</h1>");
    }

    #[test]
    fn test_development_mode_needs_no_key() {
        let config = ReelscoutConfig {
            runtime_mode: RuntimeMode::Development,
            ..ReelscoutConfig::default()
        };

        assert!(build_database(&config).is_ok());
    }
}
