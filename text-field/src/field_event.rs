use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;

use crate::error::LookupError;
use crate::lookup::LookupReply;

/// Completions of background work, delivered back to the field's owner.
///
/// Timers and lookups run as tasks and never touch field state; the owner
/// passes each event to [`crate::TextField::handle_event`] from its own loop.
#[derive(Debug)]
pub enum FieldEvent {
    /// The debounce delay armed with `generation` elapsed.
    DebounceElapsed { generation: u64, value: String },
    /// A lookup issued with race token `token` completed.
    LookupFinished {
        token: u64,
        outcome: Result<LookupReply, LookupError>,
    },
}

#[derive(Clone, Debug)]
pub struct FieldEventSender {
    tx: UnboundedSender<FieldEvent>,
}

impl FieldEventSender {
    pub fn new(tx: UnboundedSender<FieldEvent>) -> Self {
        Self { tx }
    }

    /// Send an event to the owner. The receiver is gone once the widget was
    /// torn down; late completions are dropped then.
    pub(crate) fn send(&self, event: FieldEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::debug!("text field event dropped after teardown: {:?}", e.0);
        }
    }
}

/// Creates the sender handed to the field and the receiver its owner drains.
pub fn field_event_channel() -> (FieldEventSender, UnboundedReceiver<FieldEvent>) {
    let (tx, rx) = unbounded_channel();
    (FieldEventSender::new(tx), rx)
}
