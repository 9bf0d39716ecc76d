//! Static Slack command table.
//!
//! Maps each slash command to the acknowledgement text sent before the
//! command's slow work starts. Loaded once at startup and read-only after.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::{error, info};

use crate::errors::AppError;

const BUILTIN_COMMANDS: &str = include_str!("../../config/slack-commands.yaml");

#[derive(Debug, Clone, Deserialize)]
pub struct SlackCommandEntry {
    pub command: String,
    pub response: SlackCommandResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlackCommandResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct SlackConfigFile {
    slack: SlackSection,
}

#[derive(Debug, Deserialize)]
struct SlackSection {
    commands: Vec<SlackCommandEntry>,
}

#[derive(Debug, Clone)]
pub struct CommandTable {
    acks: HashMap<String, String>,
}

impl CommandTable {
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the YAML does not have the
    /// `slack.commands[].{command, response.text}` shape.
    pub fn from_yaml(yaml: &str) -> Result<Self, AppError> {
        let file: SlackConfigFile = serde_yaml::from_str(yaml)
            .map_err(|e| AppError::Validation(format!("Invalid Slack command table: {e}")))?;

        let acks = file
            .slack
            .commands
            .into_iter()
            .map(|entry| (entry.command, entry.response.text))
            .collect();

        Ok(Self { acks })
    }

    /// The table bundled from `config/slack-commands.yaml`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the bundled YAML does not parse.
    pub fn builtin() -> Result<Self, AppError> {
        Self::from_yaml(BUILTIN_COMMANDS).inspect_err(|e| {
            error!(error = %e, "Bundled Slack command table is invalid");
        })
    }

    /// Loads the table from `path`, or the bundled table when no path is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: Option<&str>) -> Result<Self, AppError> {
        let Some(path) = path else {
            return Self::builtin();
        };

        let yaml = std::fs::read_to_string(Path::new(path)).map_err(|e| {
            AppError::Internal(format!("Failed to read Slack command table {path}: {e}"))
        })?;
        let table = Self::from_yaml(&yaml).inspect_err(|e| {
            error!(path = %path, error = %e, "Failed to parse Slack command table");
        })?;
        info!(path = %path, commands = table.len(), "Loaded Slack command table");
        Ok(table)
    }

    #[must_use]
    pub fn ack_text(&self, command: &str) -> Option<&str> {
        self.acks.get(command).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.acks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.acks.is_empty()
    }
}

/// The fixed set of commands the dispatcher knows how to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlackCommand {
    RepoList,
    RepoDetails,
    UserList,
    UserDetails,
    TeamList,
    TeamDetails,
    OrgDetails,
    LastCommit,
    Ask,
}

impl SlackCommand {
    pub const ALL: [SlackCommand; 9] = [
        SlackCommand::RepoList,
        SlackCommand::RepoDetails,
        SlackCommand::UserList,
        SlackCommand::UserDetails,
        SlackCommand::TeamList,
        SlackCommand::TeamDetails,
        SlackCommand::OrgDetails,
        SlackCommand::LastCommit,
        SlackCommand::Ask,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SlackCommand::RepoList => "/repo-list",
            SlackCommand::RepoDetails => "/repo-details",
            SlackCommand::UserList => "/user-list",
            SlackCommand::UserDetails => "/user-details",
            SlackCommand::TeamList => "/team-list",
            SlackCommand::TeamDetails => "/team-details",
            SlackCommand::OrgDetails => "/org-details",
            SlackCommand::LastCommit => "/last-commit",
            SlackCommand::Ask => "/ask",
        }
    }
}

impl fmt::Display for SlackCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlackCommand {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SlackCommand::ALL
            .into_iter()
            .find(|cmd| cmd.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("Unknown command: {s}")))
    }
}
