//! Request/reply shapes of the remote lookup and the transport seam.

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;

use crate::error::LookupError;

/// Payload sent to the lookup service for every query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupRequest {
    pub action: String,
    pub value: String,
    pub params: JsonMap<String, JsonValue>,
    /// Current values of the sibling fields named in `form_params`.
    pub form_params: JsonMap<String, JsonValue>,
}

/// One entry of the suggestion list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// Submitted when the entry is chosen.
    pub value: String,
    /// Shown in the list and in the field once chosen.
    pub label: String,
}

impl Suggestion {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Deserialize)]
struct WireSuggestion {
    value: String,
    #[serde(default)]
    label: Option<String>,
}

/// A reply the service actually produced.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupReply {
    Suggestions(Vec<Suggestion>),
    /// Domain level error reported by the service (e.g. unknown action).
    Error(JsonValue),
}

impl LookupReply {
    /// Decodes a reply body: either a list of `{ value, label }` entries or an
    /// object carrying an `error` member.
    pub fn from_json(body: JsonValue) -> Result<Self, LookupError> {
        match body {
            JsonValue::Array(_) => {
                let entries: Vec<WireSuggestion> =
                    serde_json::from_value(body).map_err(|e| LookupError::Decode(e.to_string()))?;
                Ok(LookupReply::Suggestions(
                    entries
                        .into_iter()
                        .map(|entry| {
                            let label = entry.label.unwrap_or_else(|| entry.value.clone());
                            Suggestion {
                                value: entry.value,
                                label,
                            }
                        })
                        .collect(),
                ))
            }
            JsonValue::Object(mut obj) => match obj.remove("error") {
                Some(err) if !err.is_null() => Ok(LookupReply::Error(err)),
                _ => Err(LookupError::Decode(
                    "expected a suggestion list or an error object".to_string(),
                )),
            },
            other => Err(LookupError::Decode(format!(
                "unexpected reply of type {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Performs the remote lookup. Injected into the field so that the widget
/// never knows how queries travel.
#[async_trait]
pub trait LookupTransport: Send + Sync {
    async fn send_query(&self, request: LookupRequest) -> Result<LookupReply, LookupError>;
}
