//! GitHub REST API client
//!
//! Read-only access to a single organization. Every call surfaces upstream
//! failures immediately as an `AppError`; there is no retry or backoff.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::core::models::{
    CommitSummary, MemberSummary, OrganizationProfile, RepositoryDetails, RepositorySummary,
    TeamDetails, TeamSummary, UserDetails, UserProfile,
};
use crate::errors::AppError;

/// Requested page size for every list endpoint and the threshold below which
/// a page is taken to be the last one. GitHub caps `per_page` at 100.
pub const PAGE_SIZE: usize = 100;

const CLIENT_USER_AGENT: &str = concat!("ghslack/", env!("CARGO_PKG_VERSION"));

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("static regex compile"));

/// Rejects empty names and anything that is not a plain GitHub login,
/// repository or team name before it is put into a URL path.
///
/// # Errors
///
/// Returns `AppError::Validation` naming the offending field.
pub fn validate_name(kind: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("A {kind} name is required")));
    }
    // "." and ".." would be resolved away by URL normalisation.
    if !NAME_RE.is_match(trimmed) || trimmed.chars().all(|c| c == '.') {
        return Err(AppError::Validation(format!(
            "Invalid {kind} name: {trimmed}"
        )));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Deserialize)]
struct NameOnly {
    name: String,
}

#[derive(Debug, Deserialize)]
struct LoginOnly {
    login: String,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: String,
    commit: CommitBody,
}

#[derive(Debug, Deserialize)]
struct CommitBody {
    message: String,
    author: CommitAuthor,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    name: String,
    date: String,
}

/// GitHub API client bound to one organization and one bearer token.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_url: String,
    org: String,
}

impl GitHubClient {
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the token is not a valid header value or
    /// the HTTP client cannot be built.
    pub fn new(base_url: &str, token: &str, org: &str) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| AppError::Internal(format!("Invalid GitHub token: {e}")))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let http = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            org: org.to_string(),
        })
    }

    #[must_use]
    pub fn organization(&self) -> &str {
        &self.org
    }

    fn org_segment(&self) -> String {
        urlencoding::encode(&self.org).into_owned()
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        target: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                error!(operation, target, "GitHub request failed: {}", e);
                AppError::Internal(format!("Failed to {operation} for {target}"))
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            warn!(operation, target, "GitHub returned 404");
            return Err(AppError::NotFound(format!("{target} not found on GitHub")));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            error!(operation, target, %status, body = %body, "GitHub API error");
            return Err(AppError::Internal(format!(
                "Failed to {operation} for {target}"
            )));
        }

        response.json::<T>().await.map_err(|e| {
            error!(operation, target, "Failed to decode GitHub response: {}", e);
            AppError::Internal(format!("Failed to {operation} for {target}"))
        })
    }

    // ------------------------------------------------------------------------
    // Organization
    // ------------------------------------------------------------------------

    /// # Errors
    ///
    /// Propagates upstream failures.
    pub async fn get_organization(&self) -> Result<OrganizationProfile, AppError> {
        let path = format!("/orgs/{}", self.org_segment());
        self.get_json("fetch organization details", &self.org, &path, &[])
            .await
    }

    /// Follows `page` until a batch comes back shorter than [`PAGE_SIZE`].
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        operation: &str,
        target: &str,
        path: &str,
    ) -> Result<Vec<T>, AppError> {
        let mut all = Vec::new();
        let mut page = 1_u32;

        loop {
            let batch: Vec<T> = self
                .get_json(
                    operation,
                    target,
                    path,
                    &[
                        ("page", page.to_string()),
                        ("per_page", PAGE_SIZE.to_string()),
                    ],
                )
                .await?;

            let last_page = batch.len() < PAGE_SIZE;
            all.extend(batch);
            if last_page {
                break;
            }
            page += 1;
        }

        info!(operation, target, count = all.len(), pages = page, "Fetched paginated list");
        Ok(all)
    }

    /// Lists every repository of the organization.
    ///
    /// # Errors
    ///
    /// Propagates the first failing page; partial results are discarded.
    pub async fn list_repositories(&self) -> Result<Vec<RepositorySummary>, AppError> {
        let path = format!("/orgs/{}/repos", self.org_segment());
        self.get_all_pages("fetch organization repositories", &self.org, &path)
            .await
    }

    /// # Errors
    ///
    /// Propagates the first failing page.
    pub async fn list_members(&self) -> Result<Vec<MemberSummary>, AppError> {
        let path = format!("/orgs/{}/members", self.org_segment());
        self.get_all_pages("fetch organization members", &self.org, &path)
            .await
    }

    /// # Errors
    ///
    /// Propagates the first failing page.
    pub async fn list_teams(&self) -> Result<Vec<TeamSummary>, AppError> {
        let path = format!("/orgs/{}/teams", self.org_segment());
        self.get_all_pages("fetch organization teams", &self.org, &path)
            .await
    }

    // ------------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------------

    /// # Errors
    ///
    /// `Validation` for a malformed username, otherwise upstream failures.
    pub async fn get_user(&self, username: &str) -> Result<UserProfile, AppError> {
        let username = validate_name("user", username)?;
        let path = format!("/users/{}", urlencoding::encode(&username));
        self.get_json("fetch user details", &username, &path, &[])
            .await
    }

    /// # Errors
    ///
    /// `Validation` for a malformed username, otherwise upstream failures.
    pub async fn get_user_repositories(&self, username: &str) -> Result<Vec<String>, AppError> {
        let username = validate_name("user", username)?;
        let path = format!("/users/{}/repos", urlencoding::encode(&username));
        let repos: Vec<NameOnly> = self
            .get_json("fetch user repositories", &username, &path, &[])
            .await?;
        Ok(repos.into_iter().map(|r| r.name).collect())
    }

    /// # Errors
    ///
    /// `Validation` for a malformed username, otherwise upstream failures.
    pub async fn get_user_organizations(&self, username: &str) -> Result<Vec<String>, AppError> {
        let username = validate_name("user", username)?;
        let path = format!("/users/{}/orgs", urlencoding::encode(&username));
        let orgs: Vec<LoginOnly> = self
            .get_json("fetch user organizations", &username, &path, &[])
            .await?;
        Ok(orgs.into_iter().map(|o| o.login).collect())
    }

    /// Profile plus repository and organization names, fetched sequentially.
    ///
    /// # Errors
    ///
    /// Fails on the first failing call.
    pub async fn get_user_details(&self, username: &str) -> Result<UserDetails, AppError> {
        let profile = self.get_user(username).await?;
        let repositories = self.get_user_repositories(&profile.login).await?;
        let organizations = self.get_user_organizations(&profile.login).await?;
        Ok(UserDetails {
            profile,
            repositories,
            organizations,
        })
    }

    // ------------------------------------------------------------------------
    // Teams
    // ------------------------------------------------------------------------

    /// # Errors
    ///
    /// Propagates the first failing page.
    pub async fn get_team_members(&self, team_id: u64) -> Result<Vec<MemberSummary>, AppError> {
        let path = format!("/teams/{team_id}/members");
        self.get_all_pages("fetch team members", &format!("team {team_id}"), &path)
            .await
    }

    /// # Errors
    ///
    /// Propagates upstream failures.
    pub async fn get_team_repositories(&self, team_id: u64) -> Result<Vec<String>, AppError> {
        let path = format!("/teams/{team_id}/repos");
        let repos: Vec<NameOnly> = self
            .get_json(
                "fetch team repositories",
                &format!("team {team_id}"),
                &path,
                &[],
            )
            .await?;
        Ok(repos.into_iter().map(|r| r.name).collect())
    }

    /// Looks the team up by display name in the organization's team list.
    ///
    /// # Errors
    ///
    /// `NotFound` when no team has that name.
    pub async fn get_team_details(&self, team_name: &str) -> Result<TeamDetails, AppError> {
        let wanted = team_name.trim();
        if wanted.is_empty() {
            return Err(AppError::Validation("A team name is required".to_string()));
        }

        let teams = self.list_teams().await?;
        let Some(team) = teams.into_iter().find(|t| t.name == wanted) else {
            warn!(team = %wanted, "Team not found");
            return Err(AppError::NotFound(format!("Team \"{wanted}\" not found")));
        };

        let members = self.get_team_members(team.id).await?;
        let repositories = self.get_team_repositories(team.id).await?;

        Ok(TeamDetails {
            id: team.id,
            name: team.name,
            description: team.description,
            privacy: team.privacy,
            permission: team.permission,
            members,
            repositories,
        })
    }

    // ------------------------------------------------------------------------
    // Repositories
    // ------------------------------------------------------------------------

    fn repo_path(&self, repo: &str, suffix: &str) -> String {
        format!(
            "/repos/{}/{}{}",
            self.org_segment(),
            urlencoding::encode(repo),
            suffix
        )
    }

    /// # Errors
    ///
    /// `Validation` for a malformed name, otherwise upstream failures.
    pub async fn get_repository(&self, repo: &str) -> Result<RepositorySummary, AppError> {
        let repo = validate_name("repository", repo)?;
        let path = self.repo_path(&repo, "");
        self.get_json("fetch repository details", &repo, &path, &[])
            .await
    }

    /// # Errors
    ///
    /// `Validation` for a malformed name, otherwise upstream failures.
    pub async fn get_repository_contributors(&self, repo: &str) -> Result<Vec<String>, AppError> {
        let repo = validate_name("repository", repo)?;
        let path = self.repo_path(&repo, "/contributors");
        let contributors: Vec<LoginOnly> = self
            .get_json("fetch repository contributors", &repo, &path, &[])
            .await?;
        Ok(contributors.into_iter().map(|c| c.login).collect())
    }

    /// Language names, sorted alphabetically.
    ///
    /// # Errors
    ///
    /// `Validation` for a malformed name, otherwise upstream failures.
    pub async fn get_repository_languages(&self, repo: &str) -> Result<Vec<String>, AppError> {
        let repo = validate_name("repository", repo)?;
        let path = self.repo_path(&repo, "/languages");
        let languages: Value = self
            .get_json("fetch repository languages", &repo, &path, &[])
            .await?;
        let mut names: Vec<String> = languages
            .as_object()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        Ok(names)
    }

    /// # Errors
    ///
    /// `Validation` for a malformed name, otherwise upstream failures.
    pub async fn get_repository_teams(&self, repo: &str) -> Result<Vec<String>, AppError> {
        let repo = validate_name("repository", repo)?;
        let path = self.repo_path(&repo, "/teams");
        let teams: Vec<NameOnly> = self
            .get_json("fetch repository teams", &repo, &path, &[])
            .await?;
        Ok(teams.into_iter().map(|t| t.name).collect())
    }

    /// Repository metadata together with contributors, languages and teams.
    ///
    /// # Errors
    ///
    /// Fails on the first failing call.
    pub async fn get_repository_details(&self, repo: &str) -> Result<RepositoryDetails, AppError> {
        let summary = self.get_repository(repo).await?;
        let contributors = self.get_repository_contributors(&summary.name).await?;
        let languages = self.get_repository_languages(&summary.name).await?;
        let teams = self.get_repository_teams(&summary.name).await?;

        Ok(RepositoryDetails {
            name: summary.name,
            description: summary.description,
            private: summary.private,
            url: summary.html_url,
            created_at: summary.created_at,
            updated_at: summary.updated_at,
            contributors,
            languages,
            teams,
        })
    }

    /// The commit `HEAD` points at on the default branch.
    ///
    /// # Errors
    ///
    /// `Validation` for a malformed name, otherwise upstream failures.
    pub async fn get_last_commit(&self, repo: &str) -> Result<CommitSummary, AppError> {
        let repo = validate_name("repository", repo)?;
        let path = self.repo_path(&repo, "/commits/HEAD");
        let commit: CommitResponse = self
            .get_json("fetch last commit details", &repo, &path, &[])
            .await?;

        Ok(CommitSummary {
            sha: commit.sha,
            author: commit.commit.author.name,
            message: commit.commit.message,
            date: commit.commit.author.date,
        })
    }
}
