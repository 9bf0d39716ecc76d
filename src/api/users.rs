//! CRUD over the stored GitHub user collection.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::info;

use super::state::AppState;
use crate::core::models::GitHubUser;
use crate::errors::AppError;

/// Writable fields; the username comes from the path on update.
#[derive(Debug, Deserialize)]
pub struct UserInput {
    #[serde(default)]
    pub username: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
}

impl UserInput {
    fn into_user(self, username: String) -> GitHubUser {
        GitHubUser {
            username,
            name: self.name,
            avatar_url: self.avatar_url,
            company: self.company,
            location: self.location,
        }
    }
}

fn not_found(username: &str) -> AppError {
    AppError::NotFound(format!("User {username} not found"))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GitHubUser>>, AppError> {
    Ok(Json(state.store.list().await?))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<GitHubUser>, AppError> {
    state
        .store
        .find::<GitHubUser>(&username)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(&username))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(input): Json<UserInput>,
) -> Result<(StatusCode, Json<GitHubUser>), AppError> {
    let username = input.username.trim().to_string();
    if username.is_empty() {
        return Err(AppError::Validation("username is required".to_string()));
    }

    let user = input.into_user(username);
    state.store.insert_new(&user).await?;
    info!(username = %user.username, "Created user");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    Json(input): Json<UserInput>,
) -> Result<Json<GitHubUser>, AppError> {
    if state.store.find::<GitHubUser>(&username).await?.is_none() {
        return Err(not_found(&username));
    }

    let user = input.into_user(username);
    state.store.upsert(&user).await?;
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.store.delete::<GitHubUser>(&username).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(&username))
    }
}
