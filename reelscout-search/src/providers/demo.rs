//! Demo movie database for development without an API key.

use async_trait::async_trait;
use reelscout_core::{MovieDetail, MovieSummary, SearchPayload};
use serde_json::Value;

use crate::errors::UpstreamError;
use crate::omdb::MovieDatabase;

/// Error text the real database uses for searches without hits.
pub const NOT_FOUND_MESSAGE: &str = "Movie not found!";

/// Error text the real database uses for unknown identifiers.
pub const INCORRECT_ID_MESSAGE: &str = "Incorrect IMDb ID.";

struct DemoEntry {
    imdb_id: &'static str,
    title: &'static str,
    year: &'static str,
    media_type: &'static str,
    director: &'static str,
    actors: &'static str,
    genre: &'static str,
    runtime: &'static str,
    rating: &'static str,
    plot: &'static str,
}

const CATALOG: &[DemoEntry] = &[
    DemoEntry {
        imdb_id: "tt2294629",
        title: "Frozen",
        year: "2013",
        media_type: "movie",
        director: "Chris Buck, Jennifer Lee",
        actors: "Kristen Bell, Idina Menzel, Jonathan Groff",
        genre: "Animation, Adventure, Comedy",
        runtime: "102 min",
        rating: "7.4",
        plot: "A princess sets off on a journey to find her sister, whose icy powers have trapped their kingdom in eternal winter.",
    },
    DemoEntry {
        imdb_id: "tt4520988",
        title: "Frozen II",
        year: "2019",
        media_type: "movie",
        director: "Chris Buck, Jennifer Lee",
        actors: "Kristen Bell, Idina Menzel, Josh Gad",
        genre: "Animation, Adventure, Comedy",
        runtime: "103 min",
        rating: "6.8",
        plot: "Anna, Elsa, Kristoff, Olaf and Sven leave Arendelle to travel to an ancient, autumn-bound forest.",
    },
    DemoEntry {
        imdb_id: "tt4007502",
        title: "Frozen Fever",
        year: "2015",
        media_type: "movie",
        director: "Chris Buck, Jennifer Lee",
        actors: "Kristen Bell, Idina Menzel, Jonathan Groff",
        genre: "Animation, Short, Comedy",
        runtime: "8 min",
        rating: "7.0",
        plot: "On Anna's birthday, Elsa and Kristoff are determined to give her the best celebration ever.",
    },
    DemoEntry {
        imdb_id: "tt0133093",
        title: "The Matrix",
        year: "1999",
        media_type: "movie",
        director: "Lana Wachowski, Lilly Wachowski",
        actors: "Keanu Reeves, Laurence Fishburne, Carrie-Anne Moss",
        genre: "Action, Sci-Fi",
        runtime: "136 min",
        rating: "8.7",
        plot: "A computer hacker learns the true nature of his reality and his role in the war against its controllers.",
    },
    DemoEntry {
        imdb_id: "tt0234215",
        title: "The Matrix Reloaded",
        year: "2003",
        media_type: "movie",
        director: "Lana Wachowski, Lilly Wachowski",
        actors: "Keanu Reeves, Laurence Fishburne, Carrie-Anne Moss",
        genre: "Action, Sci-Fi",
        runtime: "138 min",
        rating: "7.2",
        plot: "Freedom fighters revolt against machines with the help of a chosen one and his allies.",
    },
    DemoEntry {
        imdb_id: "tt0816692",
        title: "Interstellar",
        year: "2014",
        media_type: "movie",
        director: "Christopher Nolan",
        actors: "Matthew McConaughey, Anne Hathaway, Jessica Chastain",
        genre: "Adventure, Drama, Sci-Fi",
        runtime: "169 min",
        rating: "8.7",
        plot: "A team of explorers travel through a wormhole in space in an attempt to ensure humanity's survival.",
    },
    DemoEntry {
        imdb_id: "tt0903747",
        title: "Breaking Bad",
        year: "2008–2013",
        media_type: "series",
        director: "N/A",
        actors: "Bryan Cranston, Aaron Paul, Anna Gunn",
        genre: "Crime, Drama, Thriller",
        runtime: "49 min",
        rating: "9.5",
        plot: "A chemistry teacher diagnosed with cancer turns to manufacturing methamphetamine.",
    },
];

/// Demo database for development and testing.
///
/// Answers with bodies shaped exactly like the real database's, including
/// the `Response: "False"` failure bodies, so every layer above it behaves
/// the same offline.
#[derive(Debug, Default)]
pub struct DemoDatabase;

impl DemoDatabase {
    /// Creates the demo database over the built-in catalog.
    pub fn new() -> Self {
        Self
    }

    fn summary(entry: &DemoEntry) -> MovieSummary {
        MovieSummary {
            title: entry.title.to_string(),
            year: entry.year.to_string(),
            imdb_id: entry.imdb_id.to_string(),
            poster: poster_for(entry.imdb_id),
            media_type: entry.media_type.to_string(),
        }
    }

    fn detail(entry: &DemoEntry) -> MovieDetail {
        let text = |value: &str| Some(value.to_string());
        MovieDetail {
            title: text(entry.title),
            year: text(entry.year),
            rated: text("N/A"),
            released: text("N/A"),
            runtime: text(entry.runtime),
            genre: text(entry.genre),
            director: text(entry.director),
            actors: text(entry.actors),
            plot: text(entry.plot),
            poster: Some(poster_for(entry.imdb_id)),
            imdb_rating: text(entry.rating),
            imdb_id: text(entry.imdb_id),
            media_type: text(entry.media_type),
            response: text("True"),
            error: None,
        }
    }
}

fn poster_for(imdb_id: &str) -> String {
    format!("https://img.omdbapi.com/demo/{imdb_id}.jpg")
}

fn to_body<T: serde::Serialize>(value: &T) -> Result<Value, UpstreamError> {
    serde_json::to_value(value).map_err(|e| UpstreamError::Decode {
        reason: e.to_string(),
    })
}

#[async_trait]
impl MovieDatabase for DemoDatabase {
    async fn search(&self, title: &str) -> Result<Value, UpstreamError> {
        let needle = title.trim().to_lowercase();
        let matches: Vec<MovieSummary> = if needle.is_empty() {
            Vec::new()
        } else {
            CATALOG
                .iter()
                .filter(|entry| entry.title.to_lowercase().contains(&needle))
                .map(Self::summary)
                .collect()
        };

        if matches.is_empty() {
            return to_body(&SearchPayload::not_found(NOT_FOUND_MESSAGE));
        }
        to_body(&SearchPayload::found(matches))
    }

    async fn lookup(&self, imdb_id: &str) -> Result<Value, UpstreamError> {
        match CATALOG.iter().find(|entry| entry.imdb_id == imdb_id.trim()) {
            Some(entry) => to_body(&Self::detail(entry)),
            None => Ok(serde_json::json!({
                "Response": "False",
                "Error": INCORRECT_ID_MESSAGE,
            })),
        }
    }
}
