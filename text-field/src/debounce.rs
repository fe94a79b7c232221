//! One-shot delay in front of the lookup.
//!
//! Every keystroke re-arms the timer, so a burst of typing results in a single
//! tick carrying the value present when typing stopped. It guarantees:
//!
//! 1. At most one timer is armed; arming cancels the previous one.
//! 2. A tick that was already queued when its timer got cancelled is
//!    recognised by its generation and rejected by [`Debouncer::accept`].
//! 3. Dropping the debouncer cancels the pending timer.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::field_event::FieldEvent;
use crate::field_event::FieldEventSender;

pub(crate) struct Debouncer {
    generation: u64,
    pending: Option<CancellationToken>,
    tx: FieldEventSender,
}

impl Debouncer {
    pub(crate) fn new(tx: FieldEventSender) -> Self {
        Self {
            generation: 0,
            pending: None,
            tx,
        }
    }

    /// Arm the timer for `value`, replacing any pending one.
    pub(crate) fn schedule(&mut self, delay: Duration, value: String) {
        self.cancel();
        self.generation += 1;

        let generation = self.generation;
        let cancel = CancellationToken::new();
        self.pending = Some(cancel.clone());
        let tx = self.tx.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    tx.send(FieldEvent::DebounceElapsed { generation, value });
                }
            }
        });
    }

    pub(crate) fn cancel(&mut self) {
        if let Some(cancel) = self.pending.take() {
            cancel.cancel();
        }
    }

    /// Consume a tick. Returns `false` for ticks of cancelled or replaced
    /// timers.
    pub(crate) fn accept(&mut self, generation: u64) -> bool {
        if self.pending.is_some() && generation == self.generation {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
