//! Integration tests for Reelscout
//!
//! These tests run the proxy router against a stub movie database on a local
//! port and drive it over real HTTP, both directly and through the client
//! store and query.

#[path = "fixtures/mod.rs"]
mod fixtures;

#[path = "style.rs"]
mod style;

#[path = "integration/proxy_upstream.rs"]
mod proxy_upstream;

#[path = "integration/query_flow.rs"]
mod query_flow;
