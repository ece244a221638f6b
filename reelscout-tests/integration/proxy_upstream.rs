//! Proxy endpoint against a stub upstream.

use axum::http::StatusCode;
use serde_json::Value;

use crate::fixtures::{StubUpstream, TEST_API_KEY, start_proxy};

async fn get(url: &str) -> (u16, Value) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_search_sends_key_and_title_upstream() {
    let upstream = StubUpstream::start().await;
    let proxy = start_proxy(&upstream.base_url, Some(TEST_API_KEY)).await;

    let (status, body) = get(&format!("{proxy}/api/movies?title=Frozen")).await;

    assert_eq!(status, 200);
    assert_eq!(body["Response"], "True");
    assert_eq!(body["Search"].as_array().unwrap().len(), 2);
    assert_eq!(upstream.queries(), vec!["apikey=test-api-key&s=Frozen".to_string()]);
}

#[tokio::test]
async fn test_title_is_percent_encoded_upstream() {
    let upstream = StubUpstream::start().await;
    let proxy = start_proxy(&upstream.base_url, Some(TEST_API_KEY)).await;

    let (status, _) = get(&format!("{proxy}/api/movies?title=Frozen%20II%26more")).await;

    assert_eq!(status, 200);
    assert_eq!(
        upstream.queries(),
        vec!["apikey=test-api-key&s=Frozen%20II%26more".to_string()]
    );
}

#[tokio::test]
async fn test_not_found_is_relayed_verbatim() {
    let upstream = StubUpstream::start().await;
    let proxy = start_proxy(&upstream.base_url, Some(TEST_API_KEY)).await;

    let (status, body) = get(&format!("{proxy}/api/movies?title=InvalidMovie")).await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        serde_json::json!({ "Response": "False", "Error": "Movie not found!" })
    );
}

#[tokio::test]
async fn test_missing_title_never_reaches_upstream() {
    let upstream = StubUpstream::start().await;
    let proxy = start_proxy(&upstream.base_url, Some(TEST_API_KEY)).await;

    for path in ["/api/movies", "/api/movies?title=", "/api/movies?title=%20%20%20"] {
        let (status, body) = get(&format!("{proxy}{path}")).await;
        assert_eq!(status, 400, "{path}");
        assert!(body["error"].is_string());
    }

    assert!(upstream.queries().is_empty());
}

#[tokio::test]
async fn test_missing_api_key_is_server_error() {
    let upstream = StubUpstream::start().await;
    let proxy = start_proxy(&upstream.base_url, None).await;

    let (status, body) = get(&format!("{proxy}/api/movies?title=Frozen")).await;

    assert_eq!(status, 500);
    assert!(body["error"].as_str().unwrap().contains("OMDB_API_KEY"));
    assert!(upstream.queries().is_empty());
}

#[tokio::test]
async fn test_blank_api_key_is_server_error() {
    let upstream = StubUpstream::start().await;
    let proxy = start_proxy(&upstream.base_url, Some("   ")).await;

    let (status, _) = get(&format!("{proxy}/api/movies?title=Frozen")).await;

    assert_eq!(status, 500);
    assert!(upstream.queries().is_empty());
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let upstream = StubUpstream::start_with_status(StatusCode::SERVICE_UNAVAILABLE).await;
    let proxy = start_proxy(&upstream.base_url, Some(TEST_API_KEY)).await;

    let (status, body) = get(&format!("{proxy}/api/movies?title=Frozen")).await;

    assert_eq!(status, 502);
    assert!(body["error"].as_str().unwrap().contains("503"));
    assert!(!body["error"].as_str().unwrap().contains(TEST_API_KEY));
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    let proxy = start_proxy("http://127.0.0.1:9", Some(TEST_API_KEY)).await;

    let (status, body) = get(&format!("{proxy}/api/movies?title=Frozen")).await;

    assert_eq!(status, 502);
    assert!(!body["error"].as_str().unwrap().contains(TEST_API_KEY));
}

#[tokio::test]
async fn test_detail_uses_id_parameter() {
    let upstream = StubUpstream::start().await;
    let proxy = start_proxy(&upstream.base_url, Some(TEST_API_KEY)).await;

    let (status, body) = get(&format!("{proxy}/api/movies/tt2294629")).await;

    assert_eq!(status, 200);
    assert_eq!(body["Title"], "Frozen");
    assert_eq!(upstream.queries(), vec!["apikey=test-api-key&i=tt2294629".to_string()]);
}
