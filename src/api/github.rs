//! GitHub views: what the last sync stored, and live pass-throughs.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};

use super::state::AppState;
use crate::core::models::{
    CommitSummary, GitHubUser, MemberSummary, Organization, OrganizationProfile, Repository,
    RepositoryDetails, RepositorySummary, Team, TeamDetails, TeamSummary, UserDetails,
};
use crate::errors::AppError;

type ApiResult<T> = Result<Json<T>, AppError>;

// ============================================================================
// Stored
// ============================================================================

pub async fn organizations(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Organization>> {
    Ok(Json(state.store.list().await?))
}

pub async fn users(State(state): State<Arc<AppState>>) -> ApiResult<Vec<GitHubUser>> {
    Ok(Json(state.store.list().await?))
}

pub async fn user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> ApiResult<GitHubUser> {
    state
        .store
        .find::<GitHubUser>(&username)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("User {username} not found")))
}

pub async fn repositories(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Repository>> {
    Ok(Json(state.store.list().await?))
}

pub async fn teams(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Team>> {
    Ok(Json(state.store.list().await?))
}

pub async fn team_users(
    State(state): State<Arc<AppState>>,
    Path(team): Path<String>,
) -> ApiResult<Vec<GitHubUser>> {
    Ok(Json(state.store.users_in_team(&team).await?))
}

pub async fn team_repositories(
    State(state): State<Arc<AppState>>,
    Path(team): Path<String>,
) -> ApiResult<Vec<Repository>> {
    Ok(Json(state.store.repositories_in_team(&team).await?))
}

// ============================================================================
// Live
// ============================================================================

pub async fn live_organization(
    State(state): State<Arc<AppState>>,
) -> ApiResult<OrganizationProfile> {
    Ok(Json(state.github.get_organization().await?))
}

pub async fn live_repositories(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Vec<RepositorySummary>> {
    Ok(Json(state.github.list_repositories().await?))
}

pub async fn live_repository(
    State(state): State<Arc<AppState>>,
    Path(repo): Path<String>,
) -> ApiResult<RepositoryDetails> {
    Ok(Json(state.github.get_repository_details(&repo).await?))
}

pub async fn live_last_commit(
    State(state): State<Arc<AppState>>,
    Path(repo): Path<String>,
) -> ApiResult<CommitSummary> {
    Ok(Json(state.github.get_last_commit(&repo).await?))
}

pub async fn live_members(State(state): State<Arc<AppState>>) -> ApiResult<Vec<MemberSummary>> {
    Ok(Json(state.github.list_members().await?))
}

pub async fn live_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> ApiResult<UserDetails> {
    Ok(Json(state.github.get_user_details(&username).await?))
}

pub async fn live_teams(State(state): State<Arc<AppState>>) -> ApiResult<Vec<TeamSummary>> {
    Ok(Json(state.github.list_teams().await?))
}

pub async fn live_team(
    State(state): State<Arc<AppState>>,
    Path(team): Path<String>,
) -> ApiResult<TeamDetails> {
    Ok(Json(state.github.get_team_details(&team).await?))
}
