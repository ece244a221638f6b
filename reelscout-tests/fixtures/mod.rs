//! Shared fixtures: a stub movie database and a proxy in front of it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use reelscout_core::RuntimeMode;
use reelscout_core::config::{ClientConfig, QueryConfig, UpstreamConfig};
use reelscout_search::{
    MovieDatabase, MoviesQuery, OmdbClient, ProxyFetcher, QueryResult, SearchStore,
};
use reelscout_web::{AppState, build_router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const TEST_API_KEY: &str = "test-api-key";

#[derive(Clone)]
struct StubState {
    queries: Arc<Mutex<Vec<String>>>,
    status: StatusCode,
}

/// Stand-in for the movie database on an ephemeral local port.
///
/// Records every raw query string it receives. Searches for `Frozen` return
/// two hits; every other title is answered with `Movie not found!`.
pub struct StubUpstream {
    pub base_url: String,
    queries: Arc<Mutex<Vec<String>>>,
}

impl StubUpstream {
    pub async fn start() -> Self {
        Self::start_with_status(StatusCode::OK).await
    }

    /// Starts a stub that answers every request with `status`.
    pub async fn start_with_status(status: StatusCode) -> Self {
        let queries = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            queries: Arc::clone(&queries),
            status,
        };
        let router = Router::new().route("/", get(stub_handler)).with_state(state);

        Self {
            base_url: serve(router).await,
            queries,
        }
    }

    /// Raw query strings received so far.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

async fn stub_handler(
    State(state): State<StubState>,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.queries.lock().unwrap().push(raw.unwrap_or_default());

    if state.status != StatusCode::OK {
        return (state.status, "upstream unavailable").into_response();
    }

    let body = match (params.get("s"), params.get("i")) {
        (Some(title), _) => search_body(title),
        (None, Some(imdb_id)) => detail_body(imdb_id),
        (None, None) => json!({ "Response": "False", "Error": "Incorrect IMDb ID." }),
    };
    axum::Json(body).into_response()
}

fn search_body(title: &str) -> Value {
    if title != "Frozen" {
        return json!({ "Response": "False", "Error": "Movie not found!" });
    }
    json!({
        "Search": [
            {
                "Title": "Frozen",
                "Year": "2013",
                "imdbID": "tt2294629",
                "Type": "movie",
                "Poster": "https://m.media-amazon.com/images/M/frozen.jpg"
            },
            {
                "Title": "Frozen II",
                "Year": "2019",
                "imdbID": "tt4520988",
                "Type": "movie",
                "Poster": "N/A"
            }
        ],
        "totalResults": "2",
        "Response": "True"
    })
}

fn detail_body(imdb_id: &str) -> Value {
    if imdb_id != "tt2294629" {
        return json!({ "Response": "False", "Error": "Incorrect IMDb ID." });
    }
    json!({
        "Title": "Frozen",
        "Year": "2013",
        "Genre": "Animation, Adventure, Comedy",
        "Director": "Chris Buck, Jennifer Lee",
        "Actors": "Kristen Bell, Idina Menzel, Jonathan Groff",
        "Plot": "A princess sets off on a journey to find her sister.",
        "Poster": "https://m.media-amazon.com/images/M/frozen.jpg",
        "imdbRating": "7.4",
        "imdbID": "tt2294629",
        "Type": "movie",
        "Response": "True"
    })
}

/// Serves `router` on an ephemeral port and returns its base URL.
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{address}")
}

/// Starts the proxy against `upstream_base`, with `api_key` as its credential.
pub async fn start_proxy(upstream_base: &str, api_key: Option<&str>) -> String {
    let client = OmdbClient::new(&UpstreamConfig {
        base_url: upstream_base.to_string(),
        api_key: api_key.map(str::to_string),
        ..UpstreamConfig::default()
    })
    .unwrap();
    start_proxy_with(Arc::new(client), RuntimeMode::Production).await
}

pub async fn start_proxy_with(database: Arc<dyn MovieDatabase>, mode: RuntimeMode) -> String {
    serve(build_router(AppState::new(database, mode), None)).await
}

pub fn proxy_fetcher(proxy_base: &str) -> Arc<ProxyFetcher> {
    Arc::new(
        ProxyFetcher::new(&ClientConfig {
            proxy_base_url: proxy_base.to_string(),
            ..ClientConfig::default()
        })
        .unwrap(),
    )
}

/// A store and a query bound to it, fetching through the proxy.
pub fn client_for(proxy_base: &str) -> (SearchStore, MoviesQuery) {
    let store = SearchStore::new();
    let query = MoviesQuery::for_store(proxy_fetcher(proxy_base), &store, QueryConfig::default());
    let _ = query.bind_store(&store);
    (store, query)
}

/// Waits for `key` to settle, failing the test instead of hanging.
pub async fn settled(query: &MoviesQuery, key: &str) -> QueryResult {
    tokio::time::timeout(Duration::from_secs(5), query.settled_for(key))
        .await
        .unwrap_or_else(|_| panic!("query for {key:?} did not settle"))
}
