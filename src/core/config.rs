use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {var}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub github_token: String,
    pub github_org: String,
    pub github_api_url: String,
    pub slack_bot_token: String,
    pub slack_signing_secret: String,
    pub slack_channel_id: String,
    pub slack_commands_path: Option<String>,
    pub slack_notify_sync_failures: bool,
    pub chatgpt_api_key: String,
    pub openai_api_url: String,
    pub openai_model: Option<String>,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiry_secs: u64,
    pub port: u16,
    pub sync_interval_secs: u64,
    pub sync_concurrency: usize,
}

impl AppConfig {
    /// Reads the configuration from the process environment, loading a
    /// `.env` file first when one is present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` for an unset required variable and
    /// `ConfigError::Invalid` for a value that does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            github_token: required("GITHUB_TOKEN")?,
            github_org: required("GITHUB_ORG")?,
            github_api_url: optional("GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            slack_bot_token: required("SLACK_BOT_TOKEN")?,
            slack_signing_secret: required("SLACK_SIGNING_SECRET")?,
            slack_channel_id: required("SLACK_CHANNEL")?,
            slack_commands_path: optional("SLACK_COMMANDS_PATH"),
            slack_notify_sync_failures: parsed_or("SLACK_NOTIFY_SYNC_FAILURES", false)?,
            chatgpt_api_key: required("CHATGPT_API_KEY")?,
            openai_api_url: optional("OPENAI_API_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_API_URL.to_string()),
            openai_model: optional("OPENAI_MODEL"),
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_expiry_secs: parsed_or("JWT_EXPIRY_SECS", 3600)?,
            port: parsed_or("PORT", 4000)?,
            sync_interval_secs: parsed_or("SYNC_INTERVAL_SECS", 300)?,
            sync_concurrency: parsed_or("SYNC_CONCURRENCY", 8)?,
        })
    }

    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    #[must_use]
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs.max(1))
    }

    #[must_use]
    pub fn openai_model(&self) -> &str {
        self.openai_model.as_deref().unwrap_or(DEFAULT_OPENAI_MODEL)
    }
}

fn optional(var: &'static str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    optional(var).ok_or(ConfigError::Missing(var))
}

fn parsed_or<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}
