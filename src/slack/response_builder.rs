//! Response-related utilities for Slack interactions.
//!
//! This module provides standardized ways to create and format
//! responses sent to Slack.

use serde_json::{Value, json};

/// Create a JSON payload for a message visible to the whole channel
///
/// Used for both the acknowledgement and the final reply of a slash command,
/// posted to the command's `response_url`.
///
/// # Examples
///
/// ```
/// use ghslack::slack::response_builder::create_in_channel_payload;
///
/// let payload = create_in_channel_payload("Fetching the repository list...");
/// assert_eq!(payload["response_type"], "in_channel");
/// ```
#[must_use]
pub fn create_in_channel_payload(text: &str) -> Value {
    json!({
        "response_type": "in_channel",
        "text": text
    })
}

/// Create a JSON payload for an ephemeral response
///
/// Ephemeral messages are only visible to the user who triggered the command.
/// Used for synchronous replies such as the unknown-command message.
#[must_use]
pub fn create_ephemeral_payload(text: &str) -> Value {
    json!({
        "response_type": "ephemeral",
        "text": text
    })
}
