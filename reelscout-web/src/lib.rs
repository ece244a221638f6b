//! Reelscout Web - Movie search proxy server

#![deny(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Thin JSON proxy in front of the movie database. Browsers and the CLI talk
//! to this server; only the server knows the database API key.

pub mod errors;
pub mod handlers;
pub mod server;

// Re-export main types
pub use errors::ProxyError;
pub use server::{AppState, build_database, build_router, run_server};
