//! HTTP request handlers

pub mod api;

pub use api::{MovieSearchParams, api_health, api_movie_detail, api_movies};
