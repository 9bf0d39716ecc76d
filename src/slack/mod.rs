//! All Slack-specific functionality

pub mod command_parser;
pub mod dispatcher;
pub mod formatter;
pub mod response_builder;
pub mod signature;

// Re-export main types for convenience
pub use command_parser::{SlackCommandEvent, parse_form_data};
pub use dispatcher::{CommandDispatcher, DispatchOutcome, ResolvedCommand};
