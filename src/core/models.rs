use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A record persisted in one collection of the document store, identified by
/// a natural key that is unique within that collection.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;

    fn key(&self) -> &str;
}

// ============================================================================
// Persisted entities
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    pub description: Option<String>,
    pub avatar_url: Option<String>,
}

impl Document for Organization {
    const COLLECTION: &'static str = "organizations";

    fn key(&self) -> &str {
        &self.name
    }
}

/// A GitHub account mirrored from the organization. Not to be confused with
/// [`Account`], which is an application login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubUser {
    pub username: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
}

impl Document for GitHubUser {
    const COLLECTION: &'static str = "github_users";

    fn key(&self) -> &str {
        &self.username
    }
}

/// Keyed by name alone: unique only within the configured organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub private: bool,
    pub organization: String,
}

impl Document for Repository {
    const COLLECTION: &'static str = "repositories";

    fn key(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub description: Option<String>,
    pub organization: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub repositories: Vec<String>,
}

impl Document for Team {
    const COLLECTION: &'static str = "teams";

    fn key(&self) -> &str {
        &self.name
    }
}

/// Application login, keyed by email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    pub password_hash: String,
    pub name: String,
}

impl Document for Account {
    const COLLECTION: &'static str = "accounts";

    fn key(&self) -> &str {
        &self.email
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub employees: Vec<String>,
}

impl Document for Project {
    const COLLECTION: &'static str = "projects";

    fn key(&self) -> &str {
        &self.id
    }
}

// ============================================================================
// GitHub API shapes
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationProfile {
    pub login: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub avatar_url: Option<String>,
    pub blog: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub public_gists: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub login: String,
    #[serde(rename = "html_url", default)]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub private: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSummary {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub description: Option<String>,
    pub privacy: Option<String>,
    pub permission: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepositoryDetails {
    pub name: String,
    pub description: Option<String>,
    pub private: bool,
    pub url: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub contributors: Vec<String>,
    pub languages: Vec<String>,
    pub teams: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserDetails {
    pub profile: UserProfile,
    pub repositories: Vec<String>,
    pub organizations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamDetails {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub privacy: Option<String>,
    pub permission: Option<String>,
    pub members: Vec<MemberSummary>,
    pub repositories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitSummary {
    pub sha: String,
    pub author: String,
    pub message: String,
    pub date: String,
}

// ============================================================================
// Normalization
// ============================================================================

impl From<&OrganizationProfile> for Organization {
    fn from(profile: &OrganizationProfile) -> Self {
        Self {
            name: profile.login.clone(),
            description: profile.description.clone(),
            avatar_url: profile.avatar_url.clone(),
        }
    }
}

impl From<&UserProfile> for GitHubUser {
    fn from(profile: &UserProfile) -> Self {
        Self {
            username: profile.login.clone(),
            name: profile.name.clone(),
            avatar_url: profile.avatar_url.clone(),
            company: profile.company.clone(),
            location: profile.location.clone(),
        }
    }
}

impl Repository {
    #[must_use]
    pub fn from_summary(summary: &RepositorySummary, organization: &str) -> Self {
        Self {
            name: summary.name.clone(),
            description: summary.description.clone(),
            url: summary.html_url.clone(),
            private: summary.private,
            organization: organization.to_string(),
        }
    }
}

impl Team {
    #[must_use]
    pub fn from_summary(summary: &TeamSummary, organization: &str) -> Self {
        Self {
            name: summary.name.clone(),
            description: summary.description.clone(),
            organization: organization.to_string(),
            members: Vec::new(),
            repositories: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEMBER_JSON: &str = r#"{
        "login": "octocat",
        "id": 1,
        "node_id": "MDQ6VXNlcjE=",
        "avatar_url": "https://github.com/images/error/octocat_happy.gif",
        "gravatar_id": "",
        "url": "https://api.github.com/users/octocat",
        "html_url": "https://github.com/octocat",
        "followers_url": "https://api.github.com/users/octocat/followers",
        "repos_url": "https://api.github.com/users/octocat/repos",
        "organizations_url": "https://api.github.com/users/octocat/orgs",
        "type": "User",
        "site_admin": false
    }"#;

    #[test]
    fn test_member_summary_decodes_github_payload() {
        let member: MemberSummary = serde_json::from_str(MEMBER_JSON).unwrap();
        assert_eq!(member.login, "octocat");
        assert_eq!(member.url, "https://github.com/octocat");

        let members: Vec<MemberSummary> =
            serde_json::from_str(&format!("[{MEMBER_JSON}, {MEMBER_JSON}]")).unwrap();
        assert_eq!(members.len(), 2);
    }

    #[test]
    fn test_repository_summary_decodes_github_payload() {
        let payload = r#"{
            "id": 1296269,
            "node_id": "MDEwOlJlcG9zaXRvcnkxMjk2MjY5",
            "name": "api",
            "full_name": "acme/api",
            "owner": {
                "login": "acme",
                "id": 9919,
                "url": "https://api.github.com/users/acme",
                "html_url": "https://github.com/acme",
                "type": "Organization",
                "site_admin": false
            },
            "private": true,
            "html_url": "https://github.com/acme/api",
            "description": "Public API",
            "fork": false,
            "url": "https://api.github.com/repos/acme/api",
            "homepage": null,
            "language": "Rust",
            "forks_count": 9,
            "stargazers_count": 80,
            "default_branch": "main",
            "topics": ["api", "rust"],
            "visibility": "private",
            "permissions": { "admin": false, "push": true, "pull": true },
            "created_at": "2011-01-26T19:01:12Z",
            "updated_at": "2011-01-26T19:14:43Z",
            "pushed_at": "2011-01-26T19:06:43Z"
        }"#;

        let repo: RepositorySummary = serde_json::from_str(payload).unwrap();
        assert_eq!(repo.name, "api");
        assert_eq!(repo.html_url, "https://github.com/acme/api");
        assert!(repo.private);
        assert_eq!(repo.description.as_deref(), Some("Public API"));
        assert_eq!(repo.created_at.as_deref(), Some("2011-01-26T19:01:12Z"));
    }

    #[test]
    fn test_team_summary_decodes_github_payload() {
        let payload = r#"{
            "id": 1,
            "node_id": "MDQ6VGVhbTE=",
            "url": "https://api.github.com/teams/1",
            "html_url": "https://github.com/orgs/acme/teams/justice-league",
            "name": "Justice League",
            "slug": "justice-league",
            "description": "A great team.",
            "privacy": "closed",
            "notification_setting": "notifications_enabled",
            "permission": "admin",
            "members_url": "https://api.github.com/teams/1/members{/member}",
            "repositories_url": "https://api.github.com/teams/1/repos",
            "parent": null
        }"#;

        let team: TeamSummary = serde_json::from_str(payload).unwrap();
        assert_eq!(team.id, 1);
        assert_eq!(team.name, "Justice League");
        assert_eq!(team.slug, "justice-league");
        assert_eq!(team.privacy.as_deref(), Some("closed"));
        assert_eq!(team.permission.as_deref(), Some("admin"));
    }

    #[test]
    fn test_user_profile_decodes_github_payload() {
        let payload = r#"{
            "login": "octocat",
            "id": 1,
            "node_id": "MDQ6VXNlcjE=",
            "avatar_url": "https://github.com/images/error/octocat_happy.gif",
            "url": "https://api.github.com/users/octocat",
            "html_url": "https://github.com/octocat",
            "type": "User",
            "site_admin": false,
            "name": "monalisa octocat",
            "company": "GitHub",
            "blog": "https://github.com/blog",
            "location": "San Francisco",
            "email": null,
            "hireable": false,
            "bio": "There once was...",
            "twitter_username": "monatheoctocat",
            "public_repos": 2,
            "public_gists": 1,
            "followers": 20,
            "following": 0,
            "created_at": "2008-01-14T04:33:35Z",
            "updated_at": "2008-01-14T04:33:35Z"
        }"#;

        let profile: UserProfile = serde_json::from_str(payload).unwrap();
        assert_eq!(profile.login, "octocat");
        assert_eq!(profile.name.as_deref(), Some("monalisa octocat"));
        assert_eq!(profile.company.as_deref(), Some("GitHub"));
        assert!(profile.email.is_none());
        assert_eq!(profile.followers, 20);

        let user = GitHubUser::from(&profile);
        assert_eq!(user.key(), "octocat");
        assert_eq!(user.location.as_deref(), Some("San Francisco"));
    }

    #[test]
    fn test_organization_profile_decodes_github_payload() {
        let payload = r#"{
            "login": "acme",
            "id": 1,
            "node_id": "MDEyOk9yZ2FuaXphdGlvbjE=",
            "url": "https://api.github.com/orgs/acme",
            "repos_url": "https://api.github.com/orgs/acme/repos",
            "members_url": "https://api.github.com/orgs/acme/members{/member}",
            "avatar_url": "https://github.com/images/error/octocat_happy.gif",
            "description": "A great organization",
            "name": "Acme Inc",
            "company": null,
            "blog": "https://github.com/blog",
            "location": "San Francisco",
            "email": "octocat@github.com",
            "is_verified": true,
            "has_organization_projects": true,
            "public_repos": 2,
            "public_gists": 1,
            "followers": 20,
            "following": 0,
            "html_url": "https://github.com/acme",
            "type": "Organization",
            "created_at": "2008-01-14T04:33:35Z",
            "updated_at": "2014-03-03T18:58:10Z"
        }"#;

        let profile: OrganizationProfile = serde_json::from_str(payload).unwrap();
        assert_eq!(profile.login, "acme");
        assert_eq!(profile.name.as_deref(), Some("Acme Inc"));
        assert_eq!(profile.public_repos, 2);

        let org = Organization::from(&profile);
        assert_eq!(org.key(), "acme");
        assert_eq!(org.description.as_deref(), Some("A great organization"));
    }

    #[test]
    fn test_repository_normalization_uses_html_url() {
        let summary = RepositorySummary {
            name: "api".into(),
            description: None,
            html_url: "https://github.com/acme/api".into(),
            private: true,
            created_at: None,
            updated_at: None,
        };
        let repo = Repository::from_summary(&summary, "acme");
        assert_eq!(repo.key(), "api");
        assert_eq!(repo.url, "https://github.com/acme/api");
        assert_eq!(repo.organization, "acme");
        assert!(repo.private);
    }

    #[test]
    fn test_organization_keyed_by_login() {
        let profile = OrganizationProfile {
            login: "acme".into(),
            description: Some("Widgets".into()),
            ..Default::default()
        };
        let org = Organization::from(&profile);
        assert_eq!(org.key(), "acme");
        assert_eq!(org.description.as_deref(), Some("Widgets"));
    }
}
