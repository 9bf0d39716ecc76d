use std::sync::Arc;

use crate::clients::{ChatGptClient, GitHubClient, SlackClient};
use crate::core::commands::CommandTable;
use crate::core::config::AppConfig;
use crate::errors::AppError;
use crate::slack::CommandDispatcher;
use crate::storage::DocumentStore;

/// Shared state behind every route.
#[derive(Debug)]
pub struct AppState {
    pub store: DocumentStore,
    pub github: GitHubClient,
    pub dispatcher: Arc<CommandDispatcher>,
    pub slack_signing_secret: String,
    pub jwt_secret: String,
    pub jwt_expiry_secs: u64,
}

impl AppState {
    /// Builds the outbound clients and the command table from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a client cannot be constructed or the command
    /// table cannot be loaded.
    pub fn from_config(config: &AppConfig, store: DocumentStore) -> Result<Self, AppError> {
        let github = GitHubClient::new(
            &config.github_api_url,
            &config.github_token,
            &config.github_org,
        )?;
        let chatgpt = ChatGptClient::new(
            config.chatgpt_api_key.clone(),
            &config.openai_api_url,
            config.openai_model().to_string(),
        );
        let commands = CommandTable::load(config.slack_commands_path.as_deref())?;

        let dispatcher = CommandDispatcher::new(
            github.clone(),
            chatgpt,
            SlackClient::new(config.slack_bot_token.clone()),
            commands,
            config.slack_channel_id.clone(),
        );

        Ok(Self {
            store,
            github,
            dispatcher: Arc::new(dispatcher),
            slack_signing_secret: config.slack_signing_secret.clone(),
            jwt_secret: config.jwt_secret.clone(),
            jwt_expiry_secs: config.jwt_expiry_secs,
        })
    }
}
