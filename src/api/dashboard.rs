use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use super::state::AppState;
use crate::core::models::{GitHubUser, Organization, Repository, Team};
use crate::errors::AppError;

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub organizations: Vec<Organization>,
    pub users: Vec<GitHubUser>,
    pub repositories: Vec<Repository>,
    pub teams: Vec<Team>,
}

/// `GET /api/dashboard`: everything the last sync stored.
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Json<Dashboard>, AppError> {
    Ok(Json(Dashboard {
        organizations: state.store.list().await?,
        users: state.store.list().await?,
        repositories: state.store.list().await?,
        teams: state.store.list().await?,
    }))
}
