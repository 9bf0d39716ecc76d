//! Client modules for external API interactions

pub mod github_client;
pub mod llm_client;
pub mod slack_client;

pub use github_client::GitHubClient;
pub use llm_client::ChatGptClient;
pub use slack_client::SlackClient;
