//! Search store and movies query fetching through the proxy.

use reelscout_search::DEFAULT_MESSAGE;

use crate::fixtures::{StubUpstream, TEST_API_KEY, client_for, settled, start_proxy};

async fn setup() -> (StubUpstream, String) {
    let upstream = StubUpstream::start().await;
    let proxy = start_proxy(&upstream.base_url, Some(TEST_API_KEY)).await;
    (upstream, proxy)
}

#[tokio::test]
async fn test_committed_title_lists_upstream_hits() {
    let (upstream, proxy) = setup().await;
    let (store, query) = client_for(&proxy);

    store.set_search_text("Frozen");
    let result = settled(&query, "Frozen").await;

    assert!(result.is_success());
    assert_eq!(result.movies().len(), 2);
    assert_eq!(result.movies()[0].imdb_id, "tt2294629");
    assert_eq!(result.movies()[1].poster_url(), None);
    assert_eq!(upstream.queries().len(), 1);
}

#[tokio::test]
async fn test_whitespace_title_makes_no_request() {
    let (upstream, proxy) = setup().await;
    let (store, query) = client_for(&proxy);

    store.set_search_text("   ");
    let result = settled(&query, "   ").await;

    assert!(result.is_success());
    assert!(result.movies().is_empty());
    assert!(upstream.queries().is_empty());
}

#[tokio::test]
async fn test_not_found_sets_error_and_store_message() {
    let (_upstream, proxy) = setup().await;
    let (store, query) = client_for(&proxy);

    store.set_search_text("InvalidMovie");
    let result = settled(&query, "InvalidMovie").await;

    assert!(result.is_error());
    assert_eq!(result.error.unwrap().to_string(), "Movie not found!");
    assert_eq!(store.message(), "Movie not found!");
}

#[tokio::test]
async fn test_typing_alone_never_fetches() {
    let (upstream, proxy) = setup().await;
    let (store, query) = client_for(&proxy);

    for text in ["F", "Fr", "Fro", "Frozen"] {
        store.set_input_text(text);
    }
    tokio::task::yield_now().await;

    assert_eq!(query.key(), "");
    assert!(upstream.queries().is_empty());

    store.commit_input();
    settled(&query, "Frozen").await;
    assert_eq!(upstream.queries().len(), 1);
}

#[tokio::test]
async fn test_reset_after_error_restores_prompt() {
    let (_upstream, proxy) = setup().await;
    let (store, query) = client_for(&proxy);

    store.set_input_text("InvalidMovie");
    store.commit_input();
    settled(&query, "InvalidMovie").await;
    store.reset();
    let result = settled(&query, "").await;

    assert_eq!(store.message(), DEFAULT_MESSAGE);
    assert_eq!(store.input_text(), "");
    assert!(result.movies().is_empty());
}

#[tokio::test]
async fn test_revisited_title_is_served_from_cache() {
    let (upstream, proxy) = setup().await;
    let (store, query) = client_for(&proxy);

    store.set_search_text("Frozen");
    settled(&query, "Frozen").await;
    store.set_search_text("InvalidMovie");
    settled(&query, "InvalidMovie").await;
    store.set_search_text("Frozen");
    let result = settled(&query, "Frozen").await;

    assert_eq!(result.movies().len(), 2);
    assert_eq!(upstream.queries().len(), 2);
}

#[tokio::test]
async fn test_refetch_hits_upstream_again() {
    let (upstream, proxy) = setup().await;
    let (store, query) = client_for(&proxy);

    store.set_search_text("Frozen");
    settled(&query, "Frozen").await;
    query.refetch();
    let result = settled(&query, "Frozen").await;

    assert!(result.is_success());
    assert_eq!(upstream.queries().len(), 2);
}
