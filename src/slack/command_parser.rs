use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

use crate::errors::AppError;

/// The slash command fields the dispatcher works with.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SlackCommandEvent {
    pub team_id: String,
    pub channel_id: String,
    pub channel_name: String,
    pub user_id: String,
    pub user_name: String,
    pub command: String,
    pub text: String,
    pub response_url: String,
}

impl SlackCommandEvent {
    /// The parsed `response_url`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` unless it is an absolute http(s) URL.
    pub fn parsed_response_url(&self) -> Result<Url, AppError> {
        let url = Url::parse(&self.response_url)
            .map_err(|e| AppError::Validation(format!("Invalid response_url: {e}")))?;
        match url.scheme() {
            "https" | "http" => Ok(url),
            other => Err(AppError::Validation(format!(
                "Unsupported response_url scheme: {other}"
            ))),
        }
    }
}

/// Decodes one `application/x-www-form-urlencoded` component.
///
/// `+` is turned into a space before percent-decoding, so an encoded plus
/// (`%2B`) survives as a literal `+`.
///
/// # Examples
///
/// ```
/// use ghslack::slack::command_parser::decode_url_component;
///
/// assert_eq!(decode_url_component("hello%20world").unwrap(), "hello world");
/// assert_eq!(decode_url_component("hello+world").unwrap(), "hello world");
/// assert_eq!(decode_url_component("c%2B%2B").unwrap(), "c++");
/// ```
///
/// # Errors
///
/// Returns an error message if the decoded bytes are not UTF-8.
pub fn decode_url_component(input: &str) -> Result<String, String> {
    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|s| s.to_string())
        .map_err(|e| format!("Failed to decode URL component: {e}"))
}

/// Parses the raw body of a Slack slash command request.
///
/// Missing fields default to empty strings; the dispatcher decides what an
/// empty value means.
///
/// # Examples
///
/// ```
/// use ghslack::slack::command_parser::parse_form_data;
///
/// let form_data = "team_id=T123&channel_id=C123&channel_name=general&\
///                  user_id=U123&user_name=octocat&command=%2Frepo-details&\
///                  text=api&response_url=https%3A%2F%2Fhooks.slack.com%2Fx";
///
/// let event = parse_form_data(form_data).unwrap();
/// assert_eq!(event.command, "/repo-details");
/// assert_eq!(event.text, "api");
/// ```
///
/// # Errors
///
/// Returns `AppError::Validation` if a key or value is not valid UTF-8 after
/// decoding.
pub fn parse_form_data(form_data: &str) -> Result<SlackCommandEvent, AppError> {
    let mut map: HashMap<String, String> = HashMap::new();

    for pair in form_data.split('&') {
        let Some((raw_key, raw_value)) = pair.split_once('=') else {
            continue;
        };
        let key = decode_url_component(raw_key)
            .map_err(|e| AppError::Validation(format!("Failed to decode key: {e}")))?;
        let value = decode_url_component(raw_value)
            .map_err(|e| AppError::Validation(format!("Failed to decode value: {e}")))?;
        map.insert(key, value);
    }

    let mut take = |name: &str| map.remove(name).unwrap_or_default();

    Ok(SlackCommandEvent {
        team_id: take("team_id"),
        channel_id: take("channel_id"),
        channel_name: take("channel_name"),
        user_id: take("user_id"),
        user_name: take("user_name"),
        command: take("command"),
        text: take("text").trim().to_string(),
        response_url: take("response_url"),
    })
}
