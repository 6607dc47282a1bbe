use chrono::Local;
use rustyline::error::ReadlineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
    System,
}

/// One entry of the chat log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    /// Local wall-clock time at creation, already formatted for display.
    pub timestamp: String,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: Local::now().format("%H:%M:%S").to_string(),
        }
    }
}

/// Server route a message is answered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endpoint {
    Search,
    KbAnswer,
    #[default]
    Answer,
}

impl Endpoint {
    pub const ALL: [Endpoint; 3] = [Endpoint::Search, Endpoint::KbAnswer, Endpoint::Answer];

    /// Resolves a selector value the way the dropdown does: anything
    /// unrecognised lands on the default route.
    pub fn from_selection(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Search => "search",
            Endpoint::KbAnswer => "kbanswer",
            Endpoint::Answer => "answer",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Search => "/search",
            Endpoint::KbAnswer => "/kbanswer",
            Endpoint::Answer => "/answer",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown endpoint `{0}` (expected search, kbanswer or answer)")]
pub struct UnknownEndpoint(pub String);

impl FromStr for Endpoint {
    type Err = UnknownEndpoint;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "search" => Ok(Endpoint::Search),
            "kbanswer" => Ok(Endpoint::KbAnswer),
            "answer" => Ok(Endpoint::Answer),
            other => Err(UnknownEndpoint(other.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
}

/// Success body. `message` is usually a string, but whatever JSON value the
/// server put there is shown rather than discarded.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    pub message: serde_json::Value,
}

impl ChatResponse {
    pub fn text(&self) -> String {
        match &self.message {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// Status and body of an HTTP exchange, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// How a dispatched request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Success(String),
    HttpError(u16),
    ParseError,
    NetworkError,
}

impl Reply {
    pub fn kind(&self) -> &'static str {
        match self {
            Reply::Success(_) => "success",
            Reply::HttpError(_) => "http_error",
            Reply::ParseError => "parse_error",
            Reply::NetworkError => "network_error",
        }
    }
}

// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Terminal error: {0}")]
    Terminal(#[from] clearscreen::Error),
    #[error("Readline error: {0}")]
    Readline(String),
}

impl From<ReadlineError> for Error {
    fn from(err: ReadlineError) -> Self {
        Error::Readline(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_paths() {
        assert_eq!(Endpoint::Search.path(), "/search");
        assert_eq!(Endpoint::KbAnswer.path(), "/kbanswer");
        assert_eq!(Endpoint::Answer.path(), "/answer");
        assert_eq!(Endpoint::default(), Endpoint::Answer);
    }

    #[test]
    fn endpoint_parse_is_case_insensitive() {
        assert_eq!("Search".parse::<Endpoint>(), Ok(Endpoint::Search));
        assert_eq!(" KBANSWER ".parse::<Endpoint>(), Ok(Endpoint::KbAnswer));
        assert!("ask".parse::<Endpoint>().is_err());
    }

    #[test]
    fn unknown_selection_falls_back_to_answer() {
        assert_eq!(Endpoint::from_selection("search"), Endpoint::Search);
        assert_eq!(Endpoint::from_selection(""), Endpoint::Answer);
        assert_eq!(Endpoint::from_selection("whatever"), Endpoint::Answer);
    }

    #[test]
    fn request_serializes_to_message_field() {
        let body = serde_json::to_string(&ChatRequest { message: "hi".into() }).unwrap();
        assert_eq!(body, r#"{"message":"hi"}"#);
    }

    #[test]
    fn response_text_shows_non_string_values() {
        let text = |body: &str| serde_json::from_str::<ChatResponse>(body).map(|r| r.text());

        assert_eq!(text(r#"{"message":"hi"}"#).unwrap(), "hi");
        assert_eq!(text(r#"{"message":42}"#).unwrap(), "42");
        assert_eq!(text(r#"{"message":null}"#).unwrap(), "null");
        assert_eq!(text(r#"{"message":["a"]}"#).unwrap(), r#"["a"]"#);
        assert!(text(r#"{"error":"x"}"#).is_err());
    }

    #[test]
    fn message_timestamp_is_clock_time() {
        let msg = Message::new(Sender::User, "hello");
        assert_eq!(msg.timestamp.len(), 8);
        assert_eq!(msg.timestamp.matches(':').count(), 2);
    }
}
