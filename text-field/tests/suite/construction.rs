use std::sync::Arc;

use oxi_text_field::ConfigError;
use oxi_text_field::FieldContent;
use oxi_text_field::FieldServices;
use oxi_text_field::TextField;
use oxi_text_field::field_event_channel;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::RecordingHost;
use crate::common::ScriptedTransport;

fn build(content: serde_json::Value) -> Result<TextField, ConfigError> {
    let content: FieldContent = match serde_json::from_value(content) {
        Ok(content) => content,
        Err(e) => panic!("bad fixture: {e}"),
    };
    let (events, _rx) = field_event_channel();
    TextField::new(
        content,
        FieldServices {
            host: Arc::new(RecordingHost::default()),
            transport: Arc::new(ScriptedTransport::immediate()),
            events,
        },
    )
}

#[test]
fn misconfigured_autocomplete_fails_construction() {
    let cases = [
        (json!({ "autocomplete": {} }), ConfigError::MissingAction),
        (
            json!({ "autocomplete": { "action": "a", "params": "realm=x" } }),
            ConfigError::ParamsNotMap,
        ),
        (
            json!({ "autocomplete": { "action": "a", "form_params": { "profile": 1 } } }),
            ConfigError::FormParamsNotList,
        ),
    ];
    for (content, expected) in cases {
        match build(content.clone()) {
            Ok(_) => panic!("accepted {content}"),
            Err(err) => assert_eq!(err, expected),
        }
    }
}

#[test]
fn initial_value_seeds_the_field() {
    let field = match build(json!({ "value": "0xcafe", "autocomplete": { "action": "a" } })) {
        Ok(field) => field,
        Err(e) => panic!("rejected valid content: {e}"),
    };
    assert_eq!(field.value(), Some("0xcafe"));
    assert_eq!(field.display_text(), "0xcafe");
    assert!(field.has_autocomplete());
    assert!(!field.is_dropdown_open());
}

#[test]
fn missing_value_displays_empty() {
    let field = match build(json!({})) {
        Ok(field) => field,
        Err(e) => panic!("rejected valid content: {e}"),
    };
    assert_eq!(field.value(), None);
    assert_eq!(field.display_text(), "");
    assert!(!field.has_autocomplete());
}
