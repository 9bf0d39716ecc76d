mod common;

use std::collections::HashSet;

use common::{ORG, repo_json};
use ghslack::clients::GitHubClient;
use ghslack::clients::github_client::PAGE_SIZE;
use ghslack::errors::{AppError, ErrorKind};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> GitHubClient {
    GitHubClient::new(&server.uri(), "ghp_test", ORG).unwrap()
}

fn page(prefix: &str, count: usize) -> Value {
    Value::Array(
        (0..count)
            .map(|i| repo_json(&format!("{prefix}-{i:03}")))
            .collect(),
    )
}

#[tokio::test]
async fn test_list_repositories_follows_pages() {
    let server = MockServer::start().await;
    let per_page = PAGE_SIZE.to_string();

    Mock::given(method("GET"))
        .and(path(format!("/orgs/{ORG}/repos")))
        .and(query_param("page", "1"))
        .and(query_param("per_page", per_page.as_str()))
        .and(header("authorization", "Bearer ghp_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page("a", PAGE_SIZE)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/orgs/{ORG}/repos")))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page("b", 7)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/orgs/{ORG}/repos")))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page("c", 1)))
        .expect(0)
        .mount(&server)
        .await;

    let repos = client(&server).list_repositories().await.unwrap();

    assert_eq!(repos.len(), PAGE_SIZE + 7);
    assert_eq!(repos[0].name, "a-000");
    assert_eq!(repos[PAGE_SIZE].name, "b-000");
    let names: HashSet<_> = repos.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names.len(), repos.len(), "no entry may be duplicated");
}

#[tokio::test]
async fn test_list_repositories_stops_on_empty_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/orgs/{ORG}/repos")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let repos = client(&server).list_repositories().await.unwrap();
    assert!(repos.is_empty());
}

#[tokio::test]
async fn test_upstream_404_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/repos/{ORG}/ghost")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    let err = client(&server).get_repository_details("ghost").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_upstream_failure_maps_to_internal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/orgs/{ORG}/members")))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = client(&server).list_members().await.unwrap_err();
    assert!(matches!(err, AppError::Internal(_)));
}

#[tokio::test]
async fn test_team_details_unknown_team_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/orgs/{ORG}/teams")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Core", "slug": "core" }
        ])))
        .mount(&server)
        .await;

    let err = client(&server).get_team_details("ghosts").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_team_details_collects_members_and_repositories() {
    let server = MockServer::start().await;
    common::mount_organization(&server).await;

    let details = client(&server).get_team_details("Core").await.unwrap();

    assert_eq!(details.id, 42);
    let logins: Vec<_> = details.members.iter().map(|m| m.login.as_str()).collect();
    assert_eq!(logins, ["ada", "grace"]);
    assert_eq!(details.repositories, ["api"]);
    assert_eq!(details.permission.as_deref(), Some("push"));
}

#[tokio::test]
async fn test_repository_details_combines_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/repos/{ORG}/api")))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_json("api")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/repos/{ORG}/api/contributors")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "login": "ada" }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/repos/{ORG}/api/languages")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Rust": 900, "Shell": 20 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/repos/{ORG}/api/teams")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "name": "Core" }])))
        .mount(&server)
        .await;

    let details = client(&server).get_repository_details("api").await.unwrap();

    assert_eq!(details.url, "https://github.com/acme/api");
    assert_eq!(details.contributors, ["ada"]);
    assert_eq!(details.languages, ["Rust", "Shell"]);
    assert_eq!(details.teams, ["Core"]);
}

#[tokio::test]
async fn test_last_commit_reads_head() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/repos/{ORG}/api/commits/HEAD")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sha": "abc123",
            "commit": {
                "message": "Fix the engine",
                "author": { "name": "Ada", "date": "2024-03-01T12:00:00Z" }
            }
        })))
        .mount(&server)
        .await;

    let commit = client(&server).get_last_commit("api").await.unwrap();
    assert_eq!(commit.sha, "abc123");
    assert_eq!(commit.author, "Ada");
    assert_eq!(commit.message, "Fix the engine");
}

#[tokio::test]
async fn test_invalid_name_never_reaches_github() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server).get_user("../orgs/acme").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    let err = client(&server).get_last_commit("").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

fn member_json(login: &str) -> Value {
    json!({
        "login": login,
        "id": 1,
        "node_id": "MDQ6VXNlcjE=",
        "avatar_url": format!("https://avatars.githubusercontent.com/{login}"),
        "url": format!("https://api.github.com/users/{login}"),
        "html_url": format!("https://github.com/{login}"),
        "type": "User",
        "site_admin": false
    })
}

#[tokio::test]
async fn test_list_members_reads_full_member_objects_across_pages() {
    let server = MockServer::start().await;
    let first: Vec<Value> = (0..PAGE_SIZE).map(|i| member_json(&format!("dev{i:03}"))).collect();

    Mock::given(method("GET"))
        .and(path(format!("/orgs/{ORG}/members")))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(first)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/orgs/{ORG}/members")))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([member_json("octocat")])))
        .expect(1)
        .mount(&server)
        .await;

    let members = client(&server).list_members().await.unwrap();

    assert_eq!(members.len(), PAGE_SIZE + 1);
    let last = members.last().unwrap();
    assert_eq!(last.login, "octocat");
    assert_eq!(last.url, "https://github.com/octocat");
}

#[tokio::test]
async fn test_team_members_are_paginated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/teams/7/members"))
        .and(query_param("per_page", PAGE_SIZE.to_string().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([member_json("ada")])))
        .expect(1)
        .mount(&server)
        .await;

    let members = client(&server).get_team_members(7).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].url, "https://github.com/ada");
}

#[tokio::test]
async fn test_dot_names_never_leave_the_organization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sha": "deadbeef",
            "commit": { "message": "other repo", "author": { "name": "x", "date": "2024-01-01T00:00:00Z" } }
        })))
        .expect(0)
        .mount(&server)
        .await;

    let github = client(&server);
    for name in [".", ".."] {
        let err = github.get_last_commit(name).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "last commit for {name:?}");
        let err = github.get_repository_details(name).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "repo details for {name:?}");
        let err = github.get_user_details(name).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "user details for {name:?}");
    }
}
