//! LLM (OpenAI) API client module
//!
//! Forwards free-text questions from `/ask` to the chat completions endpoint.

use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{error, info};

use crate::errors::AppError;

const MAX_OUTPUT_TOKENS: u32 = 4096;
const TEMPERATURE: f64 = 0.7;

pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

fn role_str(role: &MessageRole) -> &'static str {
    match role {
        MessageRole::system => "system",
        MessageRole::user => "user",
        MessageRole::assistant => "assistant",
        MessageRole::function => "function",
        MessageRole::tool => "tool",
    }
}

/// ChatGPT client used by the `/ask` command
#[derive(Debug, Clone)]
pub struct ChatGptClient {
    http: Client,
    api_key: String,
    base_url: String,
    model_name: String,
}

impl ChatGptClient {
    pub fn new(api_key: String, base_url: &str, model_name: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model_name,
        }
    }

    pub fn build_prompt(&self, question: &str) -> Vec<ChatCompletionMessage> {
        vec![ChatCompletionMessage {
            role: MessageRole::user,
            content: Content::Text(question.to_string()),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        }]
    }

    pub fn build_request_body(&self, prompt: &[ChatCompletionMessage]) -> Value {
        let messages: Vec<Value> = prompt
            .iter()
            .map(|msg| {
                let content = match &msg.content {
                    Content::Text(text) => json!(text),
                    // Only text prompts are ever built here.
                    _ => json!(""),
                };
                json!({ "role": role_str(&msg.role), "content": content })
            })
            .collect();

        json!({
            "model": self.model_name,
            "messages": messages,
            "n": 1,
            "max_tokens": MAX_OUTPUT_TOKENS,
            "temperature": TEMPERATURE,
        })
    }

    /// Sends `question` as a single user message and returns the first
    /// choice's text, trimmed.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty question; `Internal` for transport failures,
    /// non-success statuses, and responses without a usable choice.
    pub async fn ask(&self, question: &str) -> Result<String, AppError> {
        if question.trim().is_empty() {
            return Err(AppError::Validation(
                "Please provide a question to ask".to_string(),
            ));
        }

        let prompt = self.build_prompt(question);

        #[cfg(feature = "debug-logs")]
        info!("Using ChatGPT prompt:\n{:?}", prompt);

        #[cfg(not(feature = "debug-logs"))]
        info!(
            model = %self.model_name,
            estimated_tokens = estimate_tokens(question),
            "Sending question to ChatGPT"
        );

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.build_request_body(&prompt))
            .send()
            .await
            .map_err(|e| {
                error!(operation = "ask", model = %self.model_name, error = %e, "OpenAI API request failed");
                AppError::Internal("Failed to generate response".to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(
                operation = "ask",
                model = %self.model_name,
                %status,
                body = %error_text,
                "OpenAI API error"
            );
            return Err(AppError::Internal("Failed to generate response".to_string()));
        }

        let response_json: Value = response.json().await.map_err(|e| {
            error!(operation = "ask", model = %self.model_name, error = %e, "Failed to parse OpenAI response");
            AppError::Internal("Failed to generate response".to_string())
        })?;

        extract_first_choice(&response_json).ok_or_else(|| {
            error!(operation = "ask", model = %self.model_name, "ChatGPT returned no usable choice");
            AppError::Internal("No response received from ChatGPT".to_string())
        })
    }
}

/// First choice's message content, trimmed; `None` when absent or blank.
#[must_use]
pub fn extract_first_choice(response: &Value) -> Option<String> {
    response
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToString::to_string)
}
