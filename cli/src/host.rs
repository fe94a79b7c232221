use std::collections::HashMap;

use oxi_text_field::FieldHost;
use oxi_text_field::LookupFailure;
use serde_json::Value as JsonValue;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;
use tracing::debug;

/// Callback made by the field, queued until the driver prints it.
#[derive(Debug, Clone, PartialEq)]
pub enum HostNotice {
    Change(String),
    Error(LookupFailure),
}

/// Form host backed by fixed sibling values. Callbacks are forwarded as
/// [`HostNotice`]s so they are printed in order with the field state.
pub struct CliHost {
    form: HashMap<String, JsonValue>,
    tx: UnboundedSender<HostNotice>,
}

impl CliHost {
    pub fn new(form: HashMap<String, JsonValue>) -> (Self, UnboundedReceiver<HostNotice>) {
        let (tx, rx) = unbounded_channel();
        (Self { form, tx }, rx)
    }

    fn notify(&self, notice: HostNotice) {
        if let Err(e) = self.tx.send(notice) {
            debug!("dropping host notice: {e}");
        }
    }
}

impl FieldHost for CliHost {
    fn field_value(&self, name: &str) -> JsonValue {
        self.form.get(name).cloned().unwrap_or(JsonValue::Null)
    }

    fn on_change(&self, value: &str) {
        self.notify(HostNotice::Change(value.to_string()));
    }

    fn on_error(&self, failure: &LookupFailure) {
        self.notify(HostNotice::Error(failure.clone()));
    }
}
