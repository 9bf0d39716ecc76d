/// ghslack - GitHub organization data for Slack, ChatGPT answers, and a small
/// REST API over a synchronized document store.
///
/// The crate runs as two processes:
/// 1. `ghslack-server` serves Slack slash commands and the REST API, and runs
///    the periodic GitHub synchronization in the background
/// 2. `ghslack-sync` runs a single synchronization cycle and exits
///
/// # Architecture
///
/// The system uses:
/// - axum for the HTTP surface, with JWT bearer authentication
/// - sqlx over SQLite as the document store
/// - reqwest for GitHub, ChatGPT and Slack `response_url` calls
/// - slack-morphism for `chat.postMessage`
/// - Tokio for async runtime
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use ghslack::api::{AppState, router};
/// use ghslack::core::config::AppConfig;
/// use ghslack::storage::DocumentStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     ghslack::setup_logging();
///
///     let config = AppConfig::from_env()?;
///     let store = DocumentStore::connect(&config.database_url).await?;
///     let state = Arc::new(AppState::from_config(&config, store)?);
///
///     let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
///     axum::serve(listener, router(state)).await?;
///     Ok(())
/// }
/// ```
// Module declarations
pub mod api;
pub mod clients;
pub mod core;
pub mod errors;
pub mod slack;
pub mod storage;
pub mod worker;

/// Configure structured JSON logging.
///
/// The level comes from `RUST_LOG` and defaults to `info`. Calling this more
/// than once is harmless; only the first call installs the subscriber.
///
/// # Example
///
/// ```
/// ghslack::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
