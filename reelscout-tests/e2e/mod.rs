//! End-to-end tests for Reelscout
//!
//! These tests walk through complete user sessions: searching, reading the
//! result list, drilling into a movie and starting over, with every request
//! crossing the proxy over HTTP.

#[path = "../fixtures/mod.rs"]
mod fixtures;

mod search_workflow;
