//! Reelscout Search - Movie lookup, search state and query caching

#![deny(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Provides the upstream movie database client used by the proxy, the
//! fetchers clients use to reach the proxy, and the client-side state layer:
//! an observable search store and a keyed, cached movies query.

pub mod errors;
pub mod omdb;
pub mod providers;
pub mod query;
pub mod store;

// Re-export main types
pub use errors::{FetchError, QueryError, UpstreamError};
pub use omdb::{MovieDatabase, OmdbClient};
pub use providers::{DatabaseFetcher, DemoDatabase, MovieFetcher, ProxyFetcher};
pub use query::{FetchStatus, MoviesQuery, QueryResult, QueryStatus, fetch_movies};
pub use store::{DEFAULT_MESSAGE, SearchState, SearchStore, StatusSink};
