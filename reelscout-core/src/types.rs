//! Movie database wire types shared by the proxy and its clients.
//!
//! Field names follow the upstream JSON exactly (`Title`, `imdbID`, ...), so
//! bodies can pass through the proxy untouched and still deserialize here.

use serde::{Deserialize, Serialize};

/// Placeholder the movie database uses for absent values.
pub const NOT_AVAILABLE: &str = "N/A";

/// `Response` value marking a failed lookup.
pub const RESPONSE_FALSE: &str = "False";

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// Title of the movie or series
    #[serde(rename = "Title")]
    pub title: String,
    /// Release year, or a range such as "2019–2021" for series
    #[serde(rename = "Year")]
    pub year: String,
    /// IMDb identifier
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// Poster URL or "N/A"
    #[serde(rename = "Poster")]
    pub poster: String,
    /// Media type (movie, series, episode)
    #[serde(rename = "Type", default)]
    pub media_type: String,
}

impl MovieSummary {
    /// Poster URL, or `None` when the database has no poster.
    pub fn poster_url(&self) -> Option<&str> {
        available(&self.poster)
    }

    /// Path of the detail page for this movie.
    pub fn detail_path(&self) -> String {
        format!("/movies/{}", self.imdb_id)
    }
}

/// Body of a title search, as returned by the database and the proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPayload {
    #[serde(rename = "Search", default, skip_serializing_if = "Option::is_none")]
    pub search: Option<Vec<MovieSummary>>,
    #[serde(
        rename = "totalResults",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub total_results: Option<String>,
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchPayload {
    /// Successful payload wrapping the given hits.
    pub fn found(movies: Vec<MovieSummary>) -> Self {
        Self {
            total_results: Some(movies.len().to_string()),
            search: Some(movies),
            response: "True".to_string(),
            error: None,
        }
    }

    /// Failed payload carrying the database's error text.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            search: None,
            total_results: None,
            response: RESPONSE_FALSE.to_string(),
            error: Some(message.into()),
        }
    }

    /// True when the database reported `Response: "False"`.
    pub fn is_not_found(&self) -> bool {
        self.response == RESPONSE_FALSE
    }

    /// Error text reported with a failed payload.
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("Unknown error")
    }

    /// Consumes the payload and returns its hits, empty when absent.
    pub fn into_movies(self) -> Vec<MovieSummary> {
        self.search.unwrap_or_default()
    }
}

/// Body of a lookup by IMDb identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Rated")]
    pub rated: Option<String>,
    #[serde(rename = "Released")]
    pub released: Option<String>,
    #[serde(rename = "Runtime")]
    pub runtime: Option<String>,
    #[serde(rename = "Genre")]
    pub genre: Option<String>,
    #[serde(rename = "Director")]
    pub director: Option<String>,
    #[serde(rename = "Actors")]
    pub actors: Option<String>,
    #[serde(rename = "Plot")]
    pub plot: Option<String>,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "Type")]
    pub media_type: Option<String>,
    #[serde(rename = "Response")]
    pub response: Option<String>,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

impl MovieDetail {
    /// True when the database reported `Response: "False"`.
    pub fn is_not_found(&self) -> bool {
        self.response.as_deref() == Some(RESPONSE_FALSE)
    }

    pub fn poster_url(&self) -> Option<&str> {
        self.poster.as_deref().and_then(available)
    }

    pub fn plot(&self) -> Option<&str> {
        self.plot.as_deref().and_then(available)
    }

    /// Numeric rating out of ten, if the database has one.
    pub fn rating(&self) -> Option<f32> {
        self.imdb_rating
            .as_deref()
            .and_then(available)
            .and_then(|r| r.parse().ok())
    }

    /// Cast list split on commas.
    pub fn cast(&self) -> Vec<&str> {
        self.actors
            .as_deref()
            .and_then(available)
            .map(|actors| actors.split(',').map(str::trim).collect())
            .unwrap_or_default()
    }
}

fn available(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.is_empty() || value == NOT_AVAILABLE {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_search_payload_from_database_body() {
        let body = json!({
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
        });

        let payload: SearchPayload = serde_json::from_value(body).unwrap();

        assert!(!payload.is_not_found());
        assert_eq!(payload.total_results.as_deref(), Some("2"));
        let movies = payload.into_movies();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].detail_path(), "/movies/tt2294629");
        assert!(movies[0].poster_url().is_some());
        assert_eq!(movies[1].poster_url(), None);
    }

    #[test]
    fn test_not_found_payload() {
        let payload: SearchPayload =
            serde_json::from_value(json!({"Response": "False", "Error": "Movie not found!"}))
                .unwrap();

        assert!(payload.is_not_found());
        assert_eq!(payload.error_message(), "Movie not found!");
        assert!(payload.into_movies().is_empty());
    }

    #[test]
    fn test_constructed_payload_serializes_with_database_names() {
        let value = serde_json::to_value(SearchPayload::not_found("Too many results.")).unwrap();

        assert_eq!(value, json!({"Response": "False", "Error": "Too many results."}));
    }

    #[test]
    fn test_detail_accessors_filter_placeholders() {
        let detail: MovieDetail = serde_json::from_value(json!({
            "Title": "Frozen",
            "imdbRating": "7.4",
            "Actors": "Kristen Bell, Idina Menzel, Jonathan Groff",
            "Plot": "N/A",
            "Poster": "N/A",
            "Response": "True"
        }))
        .unwrap();

        assert_eq!(detail.rating(), Some(7.4));
        assert_eq!(detail.cast(), vec!["Kristen Bell", "Idina Menzel", "Jonathan Groff"]);
        assert_eq!(detail.plot(), None);
        assert_eq!(detail.poster_url(), None);
        assert!(!detail.is_not_found());
    }
}
