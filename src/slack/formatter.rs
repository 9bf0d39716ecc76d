//! Plain-text renderings of GitHub data for slash command replies.

use crate::core::models::{
    CommitSummary, MemberSummary, OrganizationProfile, RepositoryDetails, RepositorySummary,
    TeamDetails, TeamSummary, UserDetails,
};

/// Sent in place of a reply whenever a handler fails.
pub const FAILURE_MESSAGE: &str =
    "An error occurred while processing the command. Please try again later.";

/// Ephemeral reply for a command outside the supported set.
pub const UNKNOWN_COMMAND_MESSAGE: &str = "Unknown command. Please try again.";

fn or_placeholder<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => placeholder,
    }
}

fn bullets<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| format!("• {}", item.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn bullets_or(items: &[String], placeholder: &str) -> String {
    if items.is_empty() {
        placeholder.to_string()
    } else {
        bullets(items)
    }
}

#[must_use]
pub fn format_repo_list(repos: &[RepositorySummary]) -> String {
    let lines = bullets(repos.iter().map(|repo| {
        let visibility = if repo.private { "Private" } else { "Public" };
        format!("{} ({visibility})", repo.name)
    }));
    format!("Repositories in the organization:\n\n{lines}")
}

#[must_use]
pub fn format_repo_details(repo_name: &str, details: &RepositoryDetails) -> String {
    format!(
        "Repository Details for {repo_name}:\n\n\
         Name: {}\n\
         Description: {}\n\
         Private: {}\n\
         URL: {}\n\
         Created At: {}\n\
         Updated At: {}\n\
         Contributors: {}\n\
         Languages: {}\n\
         Teams: {}",
        details.name,
        or_placeholder(details.description.as_deref(), "No description provided"),
        details.private,
        details.url,
        or_placeholder(details.created_at.as_deref(), "Unknown"),
        or_placeholder(details.updated_at.as_deref(), "Unknown"),
        details.contributors.join(", "),
        details.languages.join(", "),
        details.teams.join(", "),
    )
}

#[must_use]
pub fn format_user_list(members: &[MemberSummary]) -> String {
    format!(
        "Users in the organization:\n\n{}",
        bullets(members.iter().map(|m| m.login.as_str()))
    )
}

#[must_use]
pub fn format_user_details(username: &str, details: &UserDetails) -> String {
    let profile = &details.profile;
    format!(
        "User Details for {username}:\n\n\
         Login: {}\n\
         Name: {}\n\
         Email: {}\n\
         Location: {}\n\
         Bio: {}\n\
         Public Repos: {}\n\
         Followers: {}\n\
         Following: {}\n\
         Created At: {}\n\
         Updated At: {}\n\
         Repositories:\n{}\n\
         Organizations:\n{}",
        profile.login,
        or_placeholder(profile.name.as_deref(), "No name provided"),
        or_placeholder(profile.email.as_deref(), "No email provided"),
        or_placeholder(profile.location.as_deref(), "No location provided"),
        or_placeholder(profile.bio.as_deref(), "No bio provided"),
        profile.public_repos,
        profile.followers,
        profile.following,
        or_placeholder(profile.created_at.as_deref(), "Unknown"),
        or_placeholder(profile.updated_at.as_deref(), "Unknown"),
        bullets_or(&details.repositories, "No repositories"),
        bullets_or(&details.organizations, "No organizations"),
    )
}

#[must_use]
pub fn format_team_list(teams: &[TeamSummary]) -> String {
    format!(
        "Teams in the organization:\n\n{}",
        bullets(teams.iter().map(|t| t.name.as_str()))
    )
}

#[must_use]
pub fn format_team_details(team_name: &str, details: &TeamDetails) -> String {
    let members = if details.members.is_empty() {
        "No members".to_string()
    } else {
        bullets(details.members.iter().map(|m| m.login.as_str()))
    };

    format!(
        "Team Details for {team_name}:\n\n\
         Name: {}\n\
         Description: {}\n\
         Privacy: {}\n\
         Permission: {}\n\n\
         Members:\n{members}\n\n\
         Repositories:\n{}",
        details.name,
        or_placeholder(details.description.as_deref(), "No description provided"),
        or_placeholder(details.privacy.as_deref(), "Unknown"),
        or_placeholder(details.permission.as_deref(), "Unknown"),
        bullets_or(&details.repositories, "No repositories associated"),
    )
}

#[must_use]
pub fn format_org_details(org: &OrganizationProfile) -> String {
    format!(
        "Organization Details:\n\n\
         Login: {}\n\
         Name: {}\n\
         Description: {}\n\
         Blog: {}\n\
         Location: {}\n\
         Email: {}\n\
         Public Repos: {}\n\
         Public Gists: {}\n\
         Followers: {}\n\
         Following: {}\n\
         Created At: {}\n\
         Updated At: {}",
        org.login,
        or_placeholder(org.name.as_deref(), "No name provided"),
        or_placeholder(org.description.as_deref(), "No description provided"),
        or_placeholder(org.blog.as_deref(), "No blog provided"),
        or_placeholder(org.location.as_deref(), "No location provided"),
        or_placeholder(org.email.as_deref(), "No email provided"),
        org.public_repos,
        org.public_gists,
        org.followers,
        org.following,
        or_placeholder(org.created_at.as_deref(), "Unknown"),
        or_placeholder(org.updated_at.as_deref(), "Unknown"),
    )
}

#[must_use]
pub fn format_last_commit(repo_name: &str, commit: &CommitSummary) -> String {
    format!(
        "Last Commit Details for {repo_name}:\n\n\
         SHA: {}\n\
         Author: {}\n\
         Message: {}\n\
         Date: {}",
        commit.sha, commit.author, commit.message, commit.date
    )
}
