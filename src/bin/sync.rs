use anyhow::Context;
use ghslack::clients::GitHubClient;
use ghslack::core::config::AppConfig;
use ghslack::storage::DocumentStore;
use ghslack::worker::SyncJob;
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

    let report = SyncJob::new(github, store, config.sync_concurrency)
        .run_once()
        .await?;
    info!(?report, "Synchronization complete");
    Ok(())
}
