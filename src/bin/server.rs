use std::sync::Arc;

use anyhow::Context;
use ghslack::api::{AppState, router};
use ghslack::clients::{GitHubClient, SlackClient};
use ghslack::core::config::AppConfig;
use ghslack::storage::DocumentStore;
use ghslack::worker::{FailureNotifier, SyncJob};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ghslack::setup_logging();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let store = DocumentStore::connect(&config.database_url)
        .await
        .context("Failed to connect to the document store")?;

    let github = GitHubClient::new(
        &config.github_api_url,
        &config.github_token,
        &config.github_org,
    )?;
    let mut sync = SyncJob::new(github, store.clone(), config.sync_concurrency);
    if config.slack_notify_sync_failures {
        sync = sync.with_failure_notifier(FailureNotifier {
            slack: SlackClient::new(config.slack_bot_token.clone()),
            channel_id: config.slack_channel_id.clone(),
        });
    }
    let period = config.sync_interval();
    tokio::spawn(async move { sync.run_forever(period).await });

    let state = Arc::new(AppState::from_config(&config, store)?);
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(addr = %addr, org = %config.github_org, "Server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
