use std::path::PathBuf;

use serde_json::Value as JsonValue;
use thiserror::Error;

/// Malformed widget configuration. Raised synchronously while constructing a
/// [`crate::TextField`] (or loading [`crate::FieldSettings`]) so that a broken
/// form definition fails loudly instead of silently losing autocomplete.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("text field: parameter \"autocomplete\" must be a hash")]
    NotAnObject,
    #[error("text field: parameter \"autocomplete.action\" missing")]
    MissingAction,
    #[error("text field: parameter \"autocomplete.params\" must be a hash")]
    ParamsNotMap,
    #[error("text field: parameter \"autocomplete.form_params\" must be an array of field names")]
    FormParamsNotList,
    #[error("failed to read settings from {path}: {message}")]
    SettingsUnreadable { path: PathBuf, message: String },
    #[error("invalid field settings: {0}")]
    InvalidSettings(String),
}

/// Failure of the transport itself, i.e. no usable reply was received.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("lookup request failed: {0}")]
    Request(String),
    #[error("lookup endpoint answered with HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode lookup reply: {0}")]
    Decode(String),
}

/// What the host's `on_error` callback receives.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupFailure {
    /// The lookup service processed the query and reported a domain error.
    #[error("{}", remote_message(.0))]
    Remote(JsonValue),
    /// The query never produced a reply (network, HTTP status, bad body).
    #[error("{0}")]
    Transport(String),
}

/// String payloads print bare, anything else as JSON.
fn remote_message(err: &JsonValue) -> String {
    match err {
        JsonValue::String(msg) => msg.clone(),
        other => other.to_string(),
    }
}
