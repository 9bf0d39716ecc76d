//! Inbound Slack routes: slash commands and Events API verification.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tracing::{info, warn};

use super::state::AppState;
use crate::errors::AppError;
use crate::slack::command_parser::parse_form_data;
use crate::slack::formatter::UNKNOWN_COMMAND_MESSAGE;
use crate::slack::response_builder::create_ephemeral_payload;
use crate::slack::signature::verify_slack_signature;

const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";
const SIGNATURE_HEADER: &str = "x-slack-signature";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn verify_request(state: &AppState, headers: &HeaderMap, body: &str) -> Result<(), AppError> {
    let timestamp = header_str(headers, TIMESTAMP_HEADER);
    let signature = header_str(headers, SIGNATURE_HEADER);

    if verify_slack_signature(body, timestamp, signature, &state.slack_signing_secret) {
        Ok(())
    } else {
        Err(AppError::Unauthorized("Invalid Slack signature".to_string()))
    }
}

/// `POST /slack/commands`
///
/// Answers within Slack's synchronous window: 401 for a foreign channel, the
/// unknown-command reply for anything unsupported, otherwise an empty 200
/// while the command runs on its own task.
pub async fn slash_command(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, AppError> {
    verify_request(&state, &headers, &body)?;

    let event = parse_form_data(&body)?;
    state.dispatcher.validate_channel(&event)?;
    event.parsed_response_url()?;

    let Some(resolved) = state.dispatcher.resolve(&event.command) else {
        info!(command = %event.command, "Unknown slash command");
        return Ok(Json(create_ephemeral_payload(UNKNOWN_COMMAND_MESSAGE)).into_response());
    };

    let dispatcher = Arc::clone(&state.dispatcher);
    tokio::spawn(async move {
        dispatcher.run(&event, &resolved).await;
    });

    Ok(StatusCode::OK.into_response())
}

/// `POST /slack/events`: echoes the `challenge` of a URL verification.
pub async fn events(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<Value>, AppError> {
    verify_request(&state, &headers, &body)?;

    let payload: Value = serde_json::from_str(&body)
        .map_err(|e| AppError::Validation(format!("Invalid event payload: {e}")))?;

    match payload.get("challenge").and_then(Value::as_str) {
        Some(challenge) => Ok(Json(json!({ "challenge": challenge }))),
        None => {
            warn!("Slack event without a challenge");
            Err(AppError::Validation("Missing challenge".to_string()))
        }
    }
}
