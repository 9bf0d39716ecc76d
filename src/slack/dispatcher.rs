//! Slash command dispatch: validate, resolve, acknowledge, execute, format,
//! respond.

use std::str::FromStr;

use tracing::{error, info, warn};

use super::command_parser::SlackCommandEvent;
use super::formatter::{
    FAILURE_MESSAGE, format_last_commit, format_org_details, format_repo_details,
    format_repo_list, format_team_details, format_team_list, format_user_details,
    format_user_list,
};
use crate::clients::{ChatGptClient, GitHubClient, SlackClient};
use crate::core::commands::{CommandTable, SlackCommand};
use crate::errors::AppError;

/// How a single command invocation ended.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The channel did not match; nothing was executed or sent.
    Unauthorized,
    /// The command is not in the supported set; nothing was executed.
    Unknown,
    /// The formatted reply that was sent to the response URL.
    Completed(String),
    /// The handler failed and the failure text was sent instead.
    Failed(AppError),
}

/// A command that passed validation and resolution.
#[derive(Debug, Clone)]
pub struct ResolvedCommand {
    pub command: SlackCommand,
    pub ack_text: String,
}

pub struct CommandDispatcher {
    github: GitHubClient,
    chatgpt: ChatGptClient,
    slack: SlackClient,
    commands: CommandTable,
    channel_id: String,
}

impl std::fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("channel_id", &self.channel_id)
            .field("commands", &self.commands.len())
            .finish_non_exhaustive()
    }
}

impl CommandDispatcher {
    #[must_use]
    pub fn new(
        github: GitHubClient,
        chatgpt: ChatGptClient,
        slack: SlackClient,
        commands: CommandTable,
        channel_id: String,
    ) -> Self {
        Self {
            github,
            chatgpt,
            slack,
            commands,
            channel_id,
        }
    }

    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` when the event comes from any channel
    /// other than the configured one.
    pub fn validate_channel(&self, event: &SlackCommandEvent) -> Result<(), AppError> {
        if event.channel_id == self.channel_id {
            Ok(())
        } else {
            warn!(
                channel_id = %event.channel_id,
                command = %event.command,
                "Rejected command from unauthorized channel"
            );
            Err(AppError::Unauthorized("Unauthorized".to_string()))
        }
    }

    /// Looks the command up in both the supported set and the ack table.
    #[must_use]
    pub fn resolve(&self, command: &str) -> Option<ResolvedCommand> {
        let parsed = SlackCommand::from_str(command).ok()?;
        let ack_text = self.commands.ack_text(command)?;
        Some(ResolvedCommand {
            command: parsed,
            ack_text: ack_text.to_string(),
        })
    }

    /// Runs the whole state machine for one event.
    pub async fn dispatch(&self, event: &SlackCommandEvent) -> DispatchOutcome {
        if self.validate_channel(event).is_err() {
            return DispatchOutcome::Unauthorized;
        }

        let Some(resolved) = self.resolve(&event.command) else {
            info!(command = %event.command, "Unknown slash command");
            return DispatchOutcome::Unknown;
        };

        self.run(event, &resolved).await
    }

    /// Acknowledge, execute, format and respond for an already resolved
    /// command. The HTTP route calls this on a spawned task.
    pub async fn run(&self, event: &SlackCommandEvent, resolved: &ResolvedCommand) -> DispatchOutcome {
        info!(
            command = %resolved.command,
            user = %event.user_name,
            "Dispatching slash command"
        );

        if let Err(e) = self
            .slack
            .send_response(&event.response_url, &resolved.ack_text)
            .await
        {
            warn!(command = %resolved.command, "Failed to send acknowledgement: {}", e);
        }

        match self.execute(resolved.command, &event.text).await {
            Ok(reply) => {
                if let Err(e) = self.slack.send_response(&event.response_url, &reply).await {
                    error!(command = %resolved.command, "Failed to send reply: {}", e);
                    return DispatchOutcome::Failed(e);
                }
                DispatchOutcome::Completed(reply)
            }
            Err(e) => {
                error!(
                    command = %resolved.command,
                    text = %event.text,
                    kind = ?e.kind(),
                    "Slash command failed: {}",
                    e
                );
                if let Err(send_err) = self
                    .slack
                    .send_response(&event.response_url, FAILURE_MESSAGE)
                    .await
                {
                    error!("Failed to send failure message: {}", send_err);
                }
                DispatchOutcome::Failed(e)
            }
        }
    }

    /// Calls the handler bound to `command` and renders its result.
    ///
    /// # Errors
    ///
    /// Propagates the GitHub or ChatGPT adapter error unchanged.
    pub async fn execute(&self, command: SlackCommand, text: &str) -> Result<String, AppError> {
        match command {
            SlackCommand::RepoList => {
                let repos = self.github.list_repositories().await?;
                Ok(format_repo_list(&repos))
            }
            SlackCommand::RepoDetails => {
                let details = self.github.get_repository_details(text).await?;
                Ok(format_repo_details(text, &details))
            }
            SlackCommand::UserList => {
                let members = self.github.list_members().await?;
                Ok(format_user_list(&members))
            }
            SlackCommand::UserDetails => {
                let details = self.github.get_user_details(text).await?;
                Ok(format_user_details(text, &details))
            }
            SlackCommand::TeamList => {
                let teams = self.github.list_teams().await?;
                Ok(format_team_list(&teams))
            }
            SlackCommand::TeamDetails => {
                let details = self.github.get_team_details(text).await?;
                Ok(format_team_details(text, &details))
            }
            SlackCommand::OrgDetails => {
                let org = self.github.get_organization().await?;
                Ok(format_org_details(&org))
            }
            SlackCommand::LastCommit => {
                let commit = self.github.get_last_commit(text).await?;
                Ok(format_last_commit(text, &commit))
            }
            SlackCommand::Ask => self.chatgpt.ask(text).await,
        }
    }
}
