//! Bearer-token authentication for the REST surface.

use std::sync::Arc;

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::state::AppState;
use crate::errors::AppError;

/// JWT claims. `sub` is the account email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
    pub iat: u64,
}

impl Claims {
    #[must_use]
    pub fn new(email: impl Into<String>, expiry_secs: u64) -> Self {
        let now = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
        Self {
            sub: email.into(),
            exp: now + expiry_secs,
            iat: now,
        }
    }
}

/// Identity attached to the request extensions by [`auth_middleware`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub email: String,
}

/// # Errors
///
/// Returns `AppError::Internal` if signing fails.
pub fn issue_token(email: &str, secret: &str, expiry_secs: u64) -> Result<String, AppError> {
    let claims = Claims::new(email, expiry_secs);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {e}")))
}

/// Decodes an HS256 token and checks its expiry.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` for a malformed, forged or expired token.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Rejects the request with 401 unless it carries a valid bearer token.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` when the header is missing or the token
/// does not validate.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = bearer_token(request.headers()) else {
        debug!(path = %request.uri().path(), "Missing bearer token");
        return Err(AppError::Unauthorized(
            "Authorization token required".to_string(),
        ));
    };

    let claims = validate_token(token, &state.jwt_secret).map_err(|e| {
        warn!(path = %request.uri().path(), "Rejected token: {}", e);
        AppError::Unauthorized("Invalid or expired token".to_string())
    })?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser { email: claims.sub });
    Ok(next.run(request).await)
}

/// Argon2id PHC string for `password`.
///
/// # Errors
///
/// Returns `AppError::Internal` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

#[must_use]
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        warn!("Stored password hash is not a valid PHC string");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
