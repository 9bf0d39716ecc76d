//! Application logins: register, login, delete.

use std::sync::Arc;

use axum::{Extension, Json};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::auth::{AuthenticatedUser, hash_password, issue_token, verify_password};
use super::state::AppState;
use crate::core::models::Account;
use crate::errors::AppError;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccountResponse {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AppError::Validation(format!("{field} is required")))
    } else {
        Ok(trimmed)
    }
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let email = required("email", &req.email)?.to_lowercase();
    let name = required("name", &req.name)?.to_string();
    if req.password.is_empty() {
        return Err(AppError::Validation("password is required".to_string()));
    }

    let account = Account {
        email: email.clone(),
        password_hash: hash_password(&req.password)?,
        name: name.clone(),
    };
    state
        .store
        .insert_new(&account)
        .await
        .map_err(|e| match e {
            AppError::Validation(_) => AppError::Validation("Account already exists".to_string()),
            other => other,
        })?;

    info!(email = %email, "Registered account");
    Ok((StatusCode::CREATED, Json(AccountResponse { email, name })))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let email = req.email.trim().to_lowercase();
    let Some(account) = state.store.find::<Account>(&email).await? else {
        warn!(email = %email, "Login for unknown account");
        return Err(invalid());
    };
    if !verify_password(&req.password, &account.password_hash) {
        warn!(email = %email, "Login with wrong password");
        return Err(invalid());
    }

    let token = issue_token(&account.email, &state.jwt_secret, state.jwt_expiry_secs)?;
    Ok(Json(TokenResponse { token }))
}

/// `DELETE /api/auth/users/{email}`
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(email): Path<String>,
) -> Result<StatusCode, AppError> {
    let email = email.trim().to_lowercase();
    if !state.store.delete::<Account>(&email).await? {
        return Err(AppError::NotFound(format!("Account {email} not found")));
    }
    info!(email = %email, by = %user.email, "Deleted account");
    Ok(StatusCode::NO_CONTENT)
}
