//! Slack API client module
//!
//! Two outbound paths: replies to a slash command's `response_url`, and
//! `chat.postMessage` for messages not tied to a command.

use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use slack_morphism::hyper_tokio::{SlackClientHyperConnector, SlackHyperClient};
use slack_morphism::prelude::SlackApiChatPostMessageRequest;
use slack_morphism::{SlackApiToken, SlackApiTokenValue, SlackChannelId, SlackMessageContent};
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::slack::response_builder::create_in_channel_payload;

// Build the Slack client connector safely without panicking.
// If connector construction fails, store None and surface an AppError at call sites.
static SLACK_CLIENT: std::sync::LazyLock<Option<SlackHyperClient>> =
    std::sync::LazyLock::new(|| match SlackClientHyperConnector::new() {
        Ok(connector) => Some(SlackHyperClient::new(connector)),
        Err(e) => {
            warn!("Failed to create Slack HTTP connector: {}", e);
            None
        }
    });

#[derive(Clone)]
pub struct SlackClient {
    http: Client,
    token: SlackApiToken,
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient").finish_non_exhaustive()
    }
}

impl SlackClient {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self {
            http: Client::new(),
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
        }
    }

    /// Posts `text` to a slash command's response URL as an `in_channel`
    /// message. No retry: a failed send is reported to the caller.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` on transport failure or a non-2xx status.
    pub async fn send_response(&self, response_url: &str, text: &str) -> Result<(), AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let resp = self
            .http
            .post(response_url)
            .headers(headers)
            .json(&create_in_channel_payload(text))
            .send()
            .await
            .map_err(|e| {
                error!(
                    operation = "send_response",
                    url = %response_url,
                    error = %e,
                    "Error sending Slack response"
                );
                AppError::Internal(format!("Failed to send Slack response: {e}"))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body_text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            error!(
                operation = "send_response",
                url = %response_url,
                %status,
                body = %body_text,
                "response_url POST failed"
            );
            return Err(AppError::Internal(format!(
                "Slack response_url returned {status}"
            )));
        }

        info!(url = %response_url, "Response sent successfully");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the connector is unavailable or Slack rejects the call.
    pub async fn post_message(&self, channel_id: &str, message: &str) -> Result<(), AppError> {
        let session = SLACK_CLIENT
            .as_ref()
            .ok_or_else(|| AppError::Internal("Slack HTTP connector not initialized".to_string()))?
            .open_session(&self.token);

        let post_req = SlackApiChatPostMessageRequest::new(
            SlackChannelId(channel_id.to_string()),
            SlackMessageContent::new().with_text(message.to_string()),
        );

        session
            .chat_post_message(&post_req)
            .await
            .inspect_err(|e| {
                error!(
                    operation = "post_message",
                    channel = %channel_id,
                    error = %e,
                    "Slack chat.postMessage failed"
                );
            })?;
        info!(channel = %channel_id, "Message posted to Slack");
        Ok(())
    }
}
