use serde_json::Value as JsonValue;

use crate::error::LookupFailure;

/// Capabilities the surrounding form provides to a text field.
///
/// All methods are invoked synchronously from the field's event handlers.
pub trait FieldHost: Send + Sync {
    /// Current value of the sibling field `name`; `Null` when unknown.
    fn field_value(&self, name: &str) -> JsonValue;

    /// The submittable value changed (typing, paste or a chosen suggestion).
    fn on_change(&self, value: &str);

    /// A lookup failed. The field stays usable.
    fn on_error(&self, failure: &LookupFailure);
}
