//! Out-of-band messages from a background process.
//!
//! A push-notification worker may ask the shell to open a path. Payloads
//! are JSON objects of the form `{"type": "navigate", "path": "/..."}`.

use serde::Deserialize;

/// A message received on the background channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundMessage {
    /// Open `path` in the shell.
    Navigate(String),
    /// Any other message kind. Reported, never acted on.
    Unknown(String),
}

/// Malformed background payloads.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// The payload was not a message object.
    #[error("invalid message payload: {0}")]
    Invalid(#[source] serde_json::Error),

    /// A navigate message without a path.
    #[error("navigate message is missing a path")]
    MissingPath,
}

#[derive(Deserialize)]
struct RawMessage {
    #[serde(rename = "type")]
    kind: String,
    path: Option<String>,
}

impl BackgroundMessage {
    /// Interpret a JSON value received on the channel.
    pub fn from_value(value: serde_json::Value) -> Result<Self, MessageError> {
        let raw: RawMessage = serde_json::from_value(value).map_err(MessageError::Invalid)?;
        match raw.kind.as_str() {
            "navigate" => raw
                .path
                .map(Self::Navigate)
                .ok_or(MessageError::MissingPath),
            _ => Ok(Self::Unknown(raw.kind)),
        }
    }

    /// Interpret a JSON string received on the channel.
    pub fn parse(payload: &str) -> Result<Self, MessageError> {
        let value = serde_json::from_str(payload).map_err(MessageError::Invalid)?;
        Self::from_value(value)
    }
}
