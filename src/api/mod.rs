//! HTTP surface: Slack routes, auth, and the REST API

pub mod accounts;
pub mod auth;
pub mod dashboard;
pub mod github;
pub mod projects;
pub mod slack;
pub mod state;
pub mod users;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::{Json, Router, middleware};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use auth::{AuthenticatedUser, Claims};
pub use state::AppState;

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Builds the full router. Everything under `/api` except register and login
/// sits behind the bearer-token middleware.
pub fn router(state: Arc<AppState>) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/slack/commands", post(slack::slash_command))
        .route("/slack/events", post(slack::events))
        .route("/api/auth/register", post(accounts::register))
        .route("/api/auth/login", post(accounts::login));

    let protected = Router::new()
        .route("/api/auth/users/{email}", delete(accounts::delete_account))
        .route("/api/dashboard", get(dashboard::dashboard))
        .route(
            "/api/users",
            get(users::list_users).post(users::create_user),
        )
        .route(
            "/api/users/{username}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/api/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/api/projects/{id}",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/api/github/organizations", get(github::organizations))
        .route("/api/github/users", get(github::users))
        .route("/api/github/users/{username}", get(github::user))
        .route("/api/github/repositories", get(github::repositories))
        .route("/api/github/teams", get(github::teams))
        .route("/api/github/teams/{team}/users", get(github::team_users))
        .route(
            "/api/github/teams/{team}/repositories",
            get(github::team_repositories),
        )
        .route("/api/github/live/org", get(github::live_organization))
        .route("/api/github/live/repos", get(github::live_repositories))
        .route("/api/github/live/repos/{repo}", get(github::live_repository))
        .route(
            "/api/github/live/repos/{repo}/last-commit",
            get(github::live_last_commit),
        )
        .route("/api/github/live/members", get(github::live_members))
        .route("/api/github/live/users/{username}", get(github::live_user))
        .route("/api/github/live/teams", get(github::live_teams))
        .route("/api/github/live/teams/{team}", get(github::live_team))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::auth_middleware,
        ));

    public
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
