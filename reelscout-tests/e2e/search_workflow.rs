//! Search session against the proxy, in both runtime modes.

use std::sync::Arc;

use reelscout_core::RuntimeMode;
use reelscout_search::{DEFAULT_MESSAGE, DemoDatabase, MovieFetcher};

use crate::fixtures::{
    StubUpstream, TEST_API_KEY, client_for, proxy_fetcher, settled, start_proxy,
    start_proxy_with,
};

#[tokio::test]
async fn test_search_then_open_detail() {
    let upstream = StubUpstream::start().await;
    let proxy = start_proxy(&upstream.base_url, Some(TEST_API_KEY)).await;
    let (store, query) = client_for(&proxy);
    assert_eq!(store.message(), DEFAULT_MESSAGE);

    store.set_input_text("Frozen");
    store.commit_input();
    let result = settled(&query, "Frozen").await;
    let first = &result.movies()[0];
    assert_eq!(first.detail_path(), "/movies/tt2294629");

    let detail = proxy_fetcher(&proxy).detail(&first.imdb_id).await.unwrap();
    assert!(!detail.is_not_found());
    assert_eq!(detail.title.as_deref(), Some("Frozen"));
    assert_eq!(
        detail.poster_url(),
        Some("https://m.media-amazon.com/images/M/frozen.jpg")
    );
    assert_eq!(detail.cast().len(), 3);
    assert_eq!(detail.rating(), Some(7.4));

    store.reset();
    settled(&query, "").await;
    assert_eq!(store.message(), DEFAULT_MESSAGE);
    assert_eq!(
        upstream.queries(),
        vec![
            "apikey=test-api-key&s=Frozen".to_string(),
            "apikey=test-api-key&i=tt2294629".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_failed_search_then_recovery() {
    let upstream = StubUpstream::start().await;
    let proxy = start_proxy(&upstream.base_url, Some(TEST_API_KEY)).await;
    let (store, query) = client_for(&proxy);

    store.set_search_text("InvalidMovie");
    let failed = settled(&query, "InvalidMovie").await;
    assert!(failed.is_error());
    assert_eq!(store.message(), "Movie not found!");

    store.set_search_text("Frozen");
    let found = settled(&query, "Frozen").await;
    assert!(found.is_success());
    assert_eq!(found.movies().len(), 2);
}

#[tokio::test]
async fn test_unknown_id_detail_reports_not_found() {
    let upstream = StubUpstream::start().await;
    let proxy = start_proxy(&upstream.base_url, Some(TEST_API_KEY)).await;

    let detail = proxy_fetcher(&proxy).detail("tt0000000").await.unwrap();

    assert!(detail.is_not_found());
    assert_eq!(detail.error.as_deref(), Some("Incorrect IMDb ID."));
}

#[tokio::test]
async fn test_development_proxy_serves_demo_catalog() {
    let proxy = start_proxy_with(Arc::new(DemoDatabase::new()), RuntimeMode::Development).await;
    let (store, query) = client_for(&proxy);

    store.set_search_text("matrix");
    let result = settled(&query, "matrix").await;
    let titles: Vec<&str> = result.movies().iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["The Matrix", "The Matrix Reloaded"]);

    store.set_search_text("InvalidMovie");
    let result = settled(&query, "InvalidMovie").await;
    assert!(result.is_error());
    assert_eq!(store.message(), "Movie not found!");

    let detail = proxy_fetcher(&proxy).detail("tt0133093").await.unwrap();
    assert_eq!(detail.title.as_deref(), Some("The Matrix"));
}
