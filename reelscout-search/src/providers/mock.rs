//! Mock fetcher implementation for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use reelscout_core::{MovieDetail, MovieSummary, SearchPayload};
use tokio::sync::oneshot;

use super::MovieFetcher;
use crate::errors::FetchError;

#[derive(Debug, Clone)]
enum Scripted {
    Payload(SearchPayload),
    Transport(String),
}

/// Mock fetcher for testing.
///
/// Titles answer with scripted payloads (unknown titles answer
/// `Movie not found!`), every call is recorded, and a title can be held
/// until the test releases it.
#[derive(Debug, Default)]
pub struct MockFetcher {
    scripted: Mutex<HashMap<String, Scripted>>,
    held: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    /// Creates a new mock fetcher with no scripted titles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `title` with the given hits.
    pub fn with_movies(self, title: &str, movies: Vec<MovieSummary>) -> Self {
        self.scripted
            .lock()
            .unwrap()
            .insert(title.to_string(), Scripted::Payload(SearchPayload::found(movies)));
        self
    }

    /// Answers `title` with a `Response: "False"` payload.
    pub fn with_not_found(self, title: &str, message: &str) -> Self {
        self.scripted.lock().unwrap().insert(
            title.to_string(),
            Scripted::Payload(SearchPayload::not_found(message)),
        );
        self
    }

    /// Fails `title` with a transport error.
    pub fn with_transport_error(self, title: &str, reason: &str) -> Self {
        self.scripted
            .lock()
            .unwrap()
            .insert(title.to_string(), Scripted::Transport(reason.to_string()));
        self
    }

    /// Holds the next fetch of `title` until the returned sender fires.
    pub fn hold(&self, title: &str) -> oneshot::Sender<()> {
        let (release, held) = oneshot::channel();
        self.held.lock().unwrap().insert(title.to_string(), held);
        release
    }

    /// Titles fetched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of fetches so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

/// Two-item result used across query tests.
pub fn frozen_movies() -> Vec<MovieSummary> {
    vec![
        MovieSummary {
            title: "Frozen".to_string(),
            year: "2013".to_string(),
            imdb_id: "tt2294629".to_string(),
            poster: "https://m.media-amazon.com/images/M/frozen.jpg".to_string(),
            media_type: "movie".to_string(),
        },
        MovieSummary {
            title: "Frozen II".to_string(),
            year: "2019".to_string(),
            imdb_id: "tt4520988".to_string(),
            poster: "https://m.media-amazon.com/images/M/frozen2.jpg".to_string(),
            media_type: "movie".to_string(),
        },
    ]
}

#[async_trait]
impl MovieFetcher for MockFetcher {
    async fn search(&self, title: &str) -> Result<SearchPayload, FetchError> {
        self.calls.lock().unwrap().push(title.to_string());

        let held = self.held.lock().unwrap().remove(title);
        if let Some(held) = held {
            let _ = held.await;
        }

        let scripted = self.scripted.lock().unwrap().get(title).cloned();
        match scripted {
            Some(Scripted::Payload(payload)) => Ok(payload),
            Some(Scripted::Transport(reason)) => Err(FetchError::Transport { reason }),
            None => Ok(SearchPayload::not_found("Movie not found!")),
        }
    }

    async fn detail(&self, imdb_id: &str) -> Result<MovieDetail, FetchError> {
        Ok(MovieDetail {
            imdb_id: Some(imdb_id.to_string()),
            response: Some("True".to_string()),
            ..MovieDetail::default()
        })
    }
}
