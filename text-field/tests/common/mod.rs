#![allow(clippy::expect_used, clippy::unwrap_used, dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use oxi_text_field::FieldContent;
use oxi_text_field::FieldEvent;
use oxi_text_field::FieldHost;
use oxi_text_field::FieldServices;
use oxi_text_field::FieldSettings;
use oxi_text_field::LookupError;
use oxi_text_field::LookupFailure;
use oxi_text_field::LookupReply;
use oxi_text_field::LookupRequest;
use oxi_text_field::LookupTransport;
use oxi_text_field::Suggestion;
use oxi_text_field::TextField;
use oxi_text_field::field_event_channel;
use serde_json::Value as JsonValue;
use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::oneshot;

/// Host that records every callback and serves sibling field values from a
/// mutable map.
#[derive(Default)]
pub struct RecordingHost {
    changes: Mutex<Vec<String>>,
    errors: Mutex<Vec<LookupFailure>>,
    form: Mutex<HashMap<String, JsonValue>>,
}

impl RecordingHost {
    pub fn set_form_value(&self, name: &str, value: JsonValue) {
        self.form.lock().unwrap().insert(name.to_string(), value);
    }

    pub fn changes(&self) -> Vec<String> {
        self.changes.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<LookupFailure> {
        self.errors.lock().unwrap().clone()
    }
}

impl FieldHost for RecordingHost {
    fn field_value(&self, name: &str) -> JsonValue {
        self.form
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or(JsonValue::Null)
    }

    fn on_change(&self, value: &str) {
        self.changes.lock().unwrap().push(value.to_string());
    }

    fn on_error(&self, failure: &LookupFailure) {
        self.errors.lock().unwrap().push(failure.clone());
    }
}

enum Scripted {
    Reply(LookupReply),
    Fail(String),
}

type Gate = oneshot::Sender<Result<LookupReply, LookupError>>;

/// Transport that records requests. Replies are either scripted up front by
/// query value (unknown values get an empty list) or, in gated mode, held
/// until the test releases them, so arrival order can be chosen freely.
#[derive(Default)]
pub struct ScriptedTransport {
    gated: bool,
    requests: Mutex<Vec<LookupRequest>>,
    scripted: Mutex<HashMap<String, Scripted>>,
    gates: Mutex<Vec<(String, Gate)>>,
}

impl ScriptedTransport {
    pub fn immediate() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        Self {
            gated: true,
            ..Self::default()
        }
    }

    pub fn reply(&self, value: &str, reply: LookupReply) {
        self.scripted
            .lock()
            .unwrap()
            .insert(value.to_string(), Scripted::Reply(reply));
    }

    pub fn fail(&self, value: &str, message: &str) {
        self.scripted
            .lock()
            .unwrap()
            .insert(value.to_string(), Scripted::Fail(message.to_string()));
    }

    pub fn requests(&self) -> Vec<LookupRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn queried_values(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.value).collect()
    }

    /// Complete the in-flight query for `value`, waiting for its task to
    /// reach the transport first.
    pub async fn release(&self, value: &str, reply: LookupReply) {
        for _ in 0..1000 {
            let gate = {
                let mut gates = self.gates.lock().unwrap();
                gates
                    .iter()
                    .position(|(v, _)| v == value)
                    .map(|idx| gates.remove(idx).1)
            };
            if let Some(gate) = gate {
                gate.send(Ok(reply)).expect("field dropped the lookup");
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("no in-flight lookup for {value:?}");
    }
}

#[async_trait]
impl LookupTransport for ScriptedTransport {
    async fn send_query(&self, request: LookupRequest) -> Result<LookupReply, LookupError> {
        let value = request.value.clone();
        self.requests.lock().unwrap().push(request);

        if self.gated {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().push((value, tx));
            return rx
                .await
                .unwrap_or_else(|_| Err(LookupError::Request("gate dropped".to_string())));
        }

        match self.scripted.lock().unwrap().get(&value) {
            Some(Scripted::Reply(reply)) => Ok(reply.clone()),
            Some(Scripted::Fail(message)) => Err(LookupError::Request(message.clone())),
            None => Ok(LookupReply::Suggestions(Vec::new())),
        }
    }
}

pub fn suggestions(pairs: &[(&str, &str)]) -> LookupReply {
    LookupReply::Suggestions(
        pairs
            .iter()
            .map(|(value, label)| Suggestion::new(*value, *label))
            .collect(),
    )
}

pub fn lookup_content(value: Option<&str>, autocomplete: JsonValue) -> FieldContent {
    FieldContent {
        value: value.map(str::to_string),
        autocomplete: Some(autocomplete),
    }
}

pub fn simple_lookup() -> JsonValue {
    json!({ "action": "lookup" })
}

/// A field wired to recording fakes plus the receiving end of its events.
pub struct Harness {
    pub field: TextField,
    pub rx: UnboundedReceiver<FieldEvent>,
    pub host: Arc<RecordingHost>,
    pub transport: Arc<ScriptedTransport>,
}

impl Harness {
    pub fn new(content: FieldContent, transport: ScriptedTransport) -> Self {
        Self::with_settings(content, transport, FieldSettings::default())
    }

    pub fn with_settings(
        content: FieldContent,
        transport: ScriptedTransport,
        settings: FieldSettings,
    ) -> Self {
        let host = Arc::new(RecordingHost::default());
        let transport = Arc::new(transport);
        let (events, rx) = field_event_channel();
        let services = FieldServices {
            host: host.clone(),
            transport: transport.clone(),
            events,
        };
        let field = TextField::new(content, services)
            .expect("valid field config")
            .with_settings(settings);
        Self {
            field,
            rx,
            host,
            transport,
        }
    }

    /// Wait for the next event and apply it.
    pub async fn next_event(&mut self) {
        let event = tokio::time::timeout(Duration::from_secs(5), self.rx.recv())
            .await
            .expect("timed out waiting for a field event")
            .expect("event channel closed");
        self.field.handle_event(event);
    }

    /// Apply events until nothing happens for a second.
    pub async fn settle(&mut self) {
        while let Ok(Some(event)) = tokio::time::timeout(Duration::from_secs(1), self.rx.recv()).await
        {
            self.field.handle_event(event);
        }
    }

    /// The labels currently listed.
    pub fn labels(&self) -> Vec<String> {
        self.field
            .search_results()
            .iter()
            .map(|s| s.label.clone())
            .collect()
    }
}
