//! API handlers proxying the movie database

use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::errors::ProxyError;
use crate::server::AppState;

/// Query string of a title search.
#[derive(Debug, Deserialize)]
pub struct MovieSearchParams {
    /// Title to search for, forwarded as given
    pub title: Option<String>,
}

/// Forwards a title search upstream and relays the JSON document it returns.
///
/// The body is re-serialized, so field order may differ from the upstream
/// bytes while every field and value is kept. A `Response: "False"` body is
/// still a 200; clients read the `Error` field themselves.
///
/// # Errors
///
/// - `ProxyError::MissingTitle` - If `title` is absent or blank
/// - `ProxyError::Upstream` - If the database is unconfigured or unreachable
pub async fn api_movies(
    State(state): State<AppState>,
    Query(params): Query<MovieSearchParams>,
) -> Result<Json<Value>, ProxyError> {
    let title = params
        .title
        .filter(|title| !title.trim().is_empty())
        .ok_or(ProxyError::MissingTitle)?;

    tracing::info!(%title, "Proxying movie search");
    let body = state.database.search(&title).await?;
    Ok(Json(body))
}

/// Forwards a detail lookup upstream and relays the JSON document it returns.
///
/// # Errors
///
/// - `ProxyError::Upstream` - If the database is unconfigured or unreachable
pub async fn api_movie_detail(
    State(state): State<AppState>,
    Path(imdb_id): Path<String>,
) -> Result<Json<Value>, ProxyError> {
    tracing::info!(%imdb_id, "Proxying movie lookup");
    let body = state.database.lookup(&imdb_id).await?;
    Ok(Json(body))
}

/// Reports liveness, runtime mode and uptime.
pub async fn api_health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "mode": state.runtime_mode.to_string(),
        "uptime_secs": state.started_at.elapsed().as_secs(),
    }))
}
