#![allow(dead_code)]

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use ghslack::api::AppState;
use ghslack::core::config::AppConfig;
use ghslack::slack::signature::compute_signature;
use ghslack::storage::DocumentStore;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ORG: &str = "acme";
pub const CHANNEL: &str = "C_AUTHORIZED";
pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const JWT_SECRET: &str = "test-jwt-secret";

/// Configuration pointing every outbound client at `upstream`.
pub fn test_config(upstream: &str) -> AppConfig {
    AppConfig {
        github_token: "ghp_test".to_string(),
        github_org: ORG.to_string(),
        github_api_url: upstream.to_string(),
        slack_bot_token: "xoxb-test".to_string(),
        slack_signing_secret: SIGNING_SECRET.to_string(),
        slack_channel_id: CHANNEL.to_string(),
        slack_commands_path: None,
        slack_notify_sync_failures: false,
        chatgpt_api_key: "sk-test".to_string(),
        openai_api_url: upstream.to_string(),
        openai_model: Some("gpt-test".to_string()),
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiry_secs: 3600,
        port: 0,
        sync_interval_secs: 300,
        sync_concurrency: 4,
    }
}

pub async fn memory_store() -> DocumentStore {
    DocumentStore::connect("sqlite::memory:").await.unwrap()
}

pub async fn test_state(upstream: &str) -> (Arc<AppState>, DocumentStore) {
    let store = memory_store().await;
    let state = AppState::from_config(&test_config(upstream), store.clone()).unwrap();
    (Arc::new(state), store)
}

pub fn now_ts() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
        .to_string()
}

/// Headers Slack would attach to `body`.
pub fn slack_headers(body: &str) -> (String, String) {
    let ts = now_ts();
    let sig = compute_signature(&ts, body, SIGNING_SECRET);
    (ts, sig)
}

pub fn slash_body(channel_id: &str, command: &str, text: &str, response_url: &str) -> String {
    format!(
        "team_id=T1&channel_id={}&channel_name=general&user_id=U1&user_name=octocat&command={}&text={}&response_url={}",
        urlencoding::encode(channel_id),
        urlencoding::encode(command),
        urlencoding::encode(text),
        urlencoding::encode(response_url),
    )
}

pub fn repo_json(name: &str) -> Value {
    json!({
        "id": 1296269,
        "name": name,
        "full_name": format!("{ORG}/{name}"),
        "description": format!("{name} service"),
        "url": format!("https://api.github.com/repos/{ORG}/{name}"),
        "html_url": format!("https://github.com/{ORG}/{name}"),
        "private": false,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-02-01T00:00:00Z"
    })
}

pub fn user_json(login: &str) -> Value {
    json!({
        "login": login,
        "id": 583231,
        "url": format!("https://api.github.com/users/{login}"),
        "html_url": format!("https://github.com/{login}"),
        "type": "User",
        "name": format!("{login} name"),
        "avatar_url": format!("https://avatars.example/{login}"),
        "company": "Acme",
        "location": "Earth",
        "public_repos": 3,
        "followers": 1,
        "following": 2
    })
}

/// A small but complete organization: two members, two repositories, one
/// team with one extra member who is not an organization member.
pub async fn mount_organization(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/orgs/{ORG}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": ORG,
            "name": "Acme Inc",
            "description": "Widgets",
            "avatar_url": "https://avatars.example/acme",
            "public_repos": 2
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/orgs/{ORG}/members")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "login": "ada",
                "url": "https://api.github.com/users/ada",
                "html_url": "https://github.com/ada"
            },
            {
                "login": "linus",
                "url": "https://api.github.com/users/linus",
                "html_url": "https://github.com/linus"
            }
        ])))
        .mount(server)
        .await;

    for login in ["ada", "linus", "grace"] {
        Mock::given(method("GET"))
            .and(path(format!("/users/{login}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json(login)))
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(format!("/orgs/{ORG}/repos")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([repo_json("api"), repo_json("web")])),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/orgs/{ORG}/teams")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 42,
            "name": "Core",
            "slug": "core",
            "description": "Core team",
            "privacy": "closed",
            "permission": "push"
        }])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/teams/42/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "login": "ada",
                "url": "https://api.github.com/users/ada",
                "html_url": "https://github.com/ada"
            },
            {
                "login": "grace",
                "url": "https://api.github.com/users/grace",
                "html_url": "https://github.com/grace"
            }
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/teams/42/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "name": "api" }])))
        .mount(server)
        .await;
}
