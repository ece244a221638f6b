//! CLI command implementations

use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Subcommand};
use reelscout_core::{MovieDetail, ReelscoutConfig, RuntimeMode};
use reelscout_search::{
    DatabaseFetcher, DemoDatabase, MovieFetcher, MoviesQuery, ProxyFetcher, QueryResult,
    SearchStore,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the proxy server
    Server {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
        /// Runtime mode: production proxies the movie database, development
        /// serves the offline demo catalog
        #[arg(long)]
        mode: Option<RuntimeMode>,
        /// Directory of static files served for unmatched paths
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
    /// Search movies by title
    Search {
        /// Title to search for, sent as typed
        title: String,
        #[command(flatten)]
        client: ClientArgs,
    },
    /// Show details for one movie
    Detail {
        /// IMDb identifier, e.g. tt2294629
        imdb_id: String,
        #[command(flatten)]
        client: ClientArgs,
    },
    /// Search interactively, one line at a time
    Interactive {
        #[command(flatten)]
        client: ClientArgs,
    },
}

/// Options shared by commands that talk to the proxy.
#[derive(Args)]
pub struct ClientArgs {
    /// Base URL of the proxy server
    #[arg(long)]
    proxy_url: Option<String>,
    /// Development mode searches the offline demo catalog in-process
    #[arg(long)]
    mode: Option<RuntimeMode>,
}

impl ClientArgs {
    fn apply(self, mut config: ReelscoutConfig) -> ReelscoutConfig {
        if let Some(proxy_url) = self.proxy_url {
            config.client.proxy_base_url = proxy_url;
        }
        if let Some(mode) = self.mode {
            config.runtime_mode = mode;
        }
        config
    }
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands, config: ReelscoutConfig) -> anyhow::Result<()> {
    match command {
        Commands::Server {
            host,
            port,
            mode,
            static_dir,
        } => {
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(mode) = mode {
                config.runtime_mode = mode;
            }
            if static_dir.is_some() {
                config.server.static_dir = static_dir;
            }
            start_server(config).await
        }
        Commands::Search { title, client } => {
            let config = client.apply(config);
            let fetcher = build_fetcher(&config)?;
            let output = search_movies(fetcher, &config, &title).await;
            print!("{output}");
            Ok(())
        }
        Commands::Detail { imdb_id, client } => {
            let config = client.apply(config);
            let fetcher = build_fetcher(&config)?;
            let detail = fetcher
                .detail(&imdb_id)
                .await
                .with_context(|| format!("Failed to look up {imdb_id}"))?;
            print!("{}", render_detail(&detail));
            Ok(())
        }
        Commands::Interactive { client } => {
            let config = client.apply(config);
            let fetcher = build_fetcher(&config)?;
            let store = SearchStore::new();
            let query = MoviesQuery::for_store(fetcher, &store, config.query.clone());
            let binding = query.bind_store(&store);

            let stdin = BufReader::new(tokio::io::stdin());
            let result = run_interactive(stdin, std::io::stdout(), &store, &query).await;
            binding.abort();
            result
        }
    }
}

/// Start the proxy server
///
/// # Errors
/// - Configuration rejected, e.g. production mode without an API key
/// - Listener could not be bound
pub async fn start_server(config: ReelscoutConfig) -> anyhow::Result<()> {
    tracing::info!(
        address = %config.server.bind_address(),
        mode = %config.runtime_mode,
        "Starting proxy server"
    );

    if let Err(error) = reelscout_web::run_server(config).await {
        tracing::error!(%error, "Proxy server failed");
        anyhow::bail!(error.user_message());
    }
    Ok(())
}

/// Fetcher for client commands: the proxy in production, the demo catalog
/// in-process in development.
///
/// # Errors
/// - Proxy URL invalid or HTTP client could not be built
pub fn build_fetcher(config: &ReelscoutConfig) -> anyhow::Result<Arc<dyn MovieFetcher>> {
    if config.runtime_mode.is_development() {
        return Ok(Arc::new(DatabaseFetcher::new(Arc::new(DemoDatabase::new()))));
    }

    config
        .validate_for_client()
        .context("Invalid proxy configuration")?;
    let fetcher = ProxyFetcher::new(&config.client).context("Failed to create proxy client")?;
    Ok(Arc::new(fetcher))
}

/// Runs one search through a fresh store and query and renders the outcome.
pub async fn search_movies(
    fetcher: Arc<dyn MovieFetcher>,
    config: &ReelscoutConfig,
    title: &str,
) -> String {
    let store = SearchStore::new();
    let query = MoviesQuery::for_store(fetcher, &store, config.query.clone());
    let binding = query.bind_store(&store);

    store.set_input_text(title);
    store.commit_input();
    let result = query.settled_for(title).await;
    binding.abort();

    render_result(&result, &store.message())
}

/// Line-based search loop.
///
/// Plain lines are typed into the search box and committed. `:input <text>`
/// only types, `:commit` submits the typed text, `:reset` clears the search,
/// `:refetch` repeats the current search and `:quit` leaves.
///
/// # Errors
/// - Reading input or writing output failed
pub async fn run_interactive<R, W>(
    input: R,
    mut out: W,
    store: &SearchStore,
    query: &MoviesQuery,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{}", store.message())?;
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        match line.as_str() {
            ":quit" | ":q" => break,
            ":help" => {
                writeln!(
                    out,
                    "Type a title to search. Commands: :input <text>, :commit, :reset, :refetch, :quit"
                )?;
            }
            ":reset" => {
                store.reset();
                writeln!(out, "{}", store.message())?;
            }
            ":refetch" => {
                query.refetch();
                let result = query.settled().await;
                write!(out, "{}", render_result(&result, &store.message()))?;
            }
            ":commit" => {
                store.commit_input();
                let result = query.settled_for(&store.search_text()).await;
                write!(out, "{}", render_result(&result, &store.message()))?;
            }
            _ => {
                if let Some(text) = line.strip_prefix(":input ") {
                    store.set_input_text(text);
                    writeln!(out, "> {}", store.input_text())?;
                    continue;
                }
                store.set_input_text(line);
                store.commit_input();
                let result = query.settled_for(&store.search_text()).await;
                write!(out, "{}", render_result(&result, &store.message()))?;
            }
        }
        out.flush()?;
    }

    Ok(())
}

/// Renders a settled query: the hit list, or the store message when there is
/// nothing to list.
pub fn render_result(result: &QueryResult, message: &str) -> String {
    let mut output = String::new();

    if let Some(error) = &result.error {
        if result.is_error() && !error.is_not_found() {
            let _ = writeln!(output, "Search failed: {error}");
            return output;
        }
    }

    let movies = result.movies();
    if result.is_error() || movies.is_empty() {
        let _ = writeln!(output, "{message}");
        return output;
    }

    for movie in movies {
        let _ = writeln!(
            output,
            "{} ({})  {}",
            movie.title,
            movie.year,
            movie.detail_path()
        );
        let _ = writeln!(
            output,
            "    poster: {}",
            movie.poster_url().unwrap_or("no poster")
        );
    }
    output
}

/// Renders a detail lookup.
pub fn render_detail(detail: &MovieDetail) -> String {
    let mut output = String::new();

    if detail.is_not_found() {
        let _ = writeln!(
            output,
            "{}",
            detail.error.as_deref().unwrap_or("Movie not found!")
        );
        return output;
    }

    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    let _ = writeln!(output, "{} ({})", text(&detail.title), text(&detail.year));
    let _ = writeln!(
        output,
        "    poster: {}",
        detail.poster_url().unwrap_or("no poster")
    );
    if let Some(genre) = &detail.genre {
        let _ = writeln!(output, "    genre: {genre}");
    }
    if let Some(director) = &detail.director {
        let _ = writeln!(output, "    director: {director}");
    }
    let cast = detail.cast();
    if !cast.is_empty() {
        let _ = writeln!(output, "    cast: {}", cast.join(", "));
    }
    if let Some(rating) = detail.rating() {
        let _ = writeln!(output, "    rating: {rating:.1}/10");
    }
    if let Some(plot) = detail.plot() {
        let _ = writeln!(output, "    {plot}");
    }
    output
}

#[cfg(test)]
mod tests {
    use reelscout_core::MovieSummary;
    use reelscout_search::{DEFAULT_MESSAGE, QueryError};

    use super::*;

    fn demo_config() -> ReelscoutConfig {
        ReelscoutConfig {
            runtime_mode: RuntimeMode::Development,
            ..ReelscoutConfig::default()
        }
    }

    fn demo_query() -> (SearchStore, MoviesQuery) {
        let config = demo_config();
        let fetcher = build_fetcher(&config).unwrap();
        let store = SearchStore::new();
        let query = MoviesQuery::for_store(fetcher, &store, config.query.clone());
        (store, query)
    }

    #[test]
    fn test_render_result_lists_movies() {
        let result = QueryResult {
            data: Some(vec![MovieSummary {
                title: "Frozen".to_string(),
                year: "2013".to_string(),
                imdb_id: "tt2294629".to_string(),
                poster: "N/A".to_string(),
                media_type: "movie".to_string(),
            }]),
            ..QueryResult::empty("Frozen")
        };

        let output = render_result(&result, DEFAULT_MESSAGE);

        assert!(output.contains("Frozen (2013)  /movies/tt2294629"));
        assert!(output.contains("poster: no poster"));
    }

    #[test]
    fn test_render_result_shows_message_when_empty() {
        let output = render_result(&QueryResult::empty(""), DEFAULT_MESSAGE);

        assert_eq!(output.trim(), DEFAULT_MESSAGE);
    }

    #[test]
    fn test_render_result_reports_transport_errors() {
        let result = QueryResult {
            status: reelscout_search::QueryStatus::Error,
            error: Some(QueryError::Transport {
                reason: "connection refused".to_string(),
            }),
            ..QueryResult::empty("Frozen")
        };

        let output = render_result(&result, DEFAULT_MESSAGE);

        assert!(output.starts_with("Search failed"));
        assert!(output.contains("connection refused"));
    }

    #[test]
    fn test_render_detail_not_found() {
        let detail = MovieDetail {
            response: Some("False".to_string()),
            error: Some("Incorrect IMDb ID.".to_string()),
            ..MovieDetail::default()
        };

        assert_eq!(render_detail(&detail).trim(), "Incorrect IMDb ID.");
    }

    #[tokio::test]
    async fn test_search_movies_in_development_mode() {
        let config = demo_config();
        let fetcher = build_fetcher(&config).unwrap();

        let output = search_movies(fetcher, &config, "Frozen").await;

        assert!(output.contains("Frozen (2013)"));
        assert!(output.contains("/movies/tt2294629"));
    }

    #[tokio::test]
    async fn test_search_movies_not_found_prints_message() {
        let config = demo_config();
        let fetcher = build_fetcher(&config).unwrap();

        let output = search_movies(fetcher, &config, "InvalidMovie").await;

        assert_eq!(output.trim(), "Movie not found!");
    }

    #[tokio::test]
    async fn test_search_movies_blank_title_prints_prompt() {
        let config = demo_config();
        let fetcher = build_fetcher(&config).unwrap();

        let output = search_movies(fetcher, &config, "   ").await;

        assert_eq!(output.trim(), DEFAULT_MESSAGE);
    }

    #[tokio::test]
    async fn test_interactive_session() {
        let (store, query) = demo_query();
        let binding = query.bind_store(&store);
        let input: &[u8] = b"Matrix\nInvalidMovie\n:reset\n:quit\nFrozen\n";
        let mut out = Vec::new();

        run_interactive(input, &mut out, &store, &query).await.unwrap();
        binding.abort();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("The Matrix (1999)"));
        assert!(out.contains("Movie not found!"));
        assert!(out.ends_with(&format!("{DEFAULT_MESSAGE}\n")));
        assert!(!out.contains("Frozen"));
        assert_eq!(store.search_text(), "");
    }

    #[tokio::test]
    async fn test_interactive_input_does_not_search_until_commit() {
        let (store, query) = demo_query();
        let binding = query.bind_store(&store);
        let input: &[u8] = b":input Interstellar\n";
        let mut out = Vec::new();

        run_interactive(input, &mut out, &store, &query).await.unwrap();

        assert_eq!(store.input_text(), "Interstellar");
        assert_eq!(store.search_text(), "");
        assert_eq!(query.key(), "");

        let input: &[u8] = b":commit\n";
        let mut out = Vec::new();
        run_interactive(input, &mut out, &store, &query).await.unwrap();
        binding.abort();

        assert_eq!(query.key(), "Interstellar");
        assert!(String::from_utf8(out).unwrap().contains("Interstellar (2014)"));
    }

    #[test]
    fn test_client_args_override_config() {
        let args = ClientArgs {
            proxy_url: Some("http://10.0.0.2:8080".to_string()),
            mode: Some(RuntimeMode::Development),
        };

        let config = args.apply(ReelscoutConfig::default());

        assert_eq!(config.client.proxy_base_url, "http://10.0.0.2:8080");
        assert!(config.runtime_mode.is_development());
    }
}
