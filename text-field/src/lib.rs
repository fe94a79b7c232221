//! Headless text input with optional server backed autocomplete.
//!
//! [`TextField`] owns the state; rendering is left to the host. Background
//! work (the debounce timer, lookups) reports back as [`FieldEvent`]s which
//! the owner feeds into [`TextField::handle_event`] from a single loop:
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use oxi_text_field::*;
//! # async fn drive(host: Arc<dyn FieldHost>, transport: Arc<dyn LookupTransport>) -> Result<(), ConfigError> {
//! let (events, mut rx) = field_event_channel();
//! let content = FieldContent {
//!     value: None,
//!     autocomplete: Some(serde_json::json!({ "action": "cert_search" })),
//! };
//! let mut field = TextField::new(content, FieldServices { host, transport, events })?;
//! field.on_text_input("alice");
//! while let Some(event) = rx.recv().await {
//!     field.handle_event(event);
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod debounce;
mod dropdown;
mod error;
mod field;
mod field_event;
mod host;
mod lookup;
mod race;
pub mod sanitize;

pub use config::AutocompleteConfig;
pub use config::DEFAULT_DEBOUNCE;
pub use config::DEFAULT_MIN_QUERY_CHARS;
pub use config::FieldContent;
pub use config::FieldSettings;
pub use dropdown::DropdownState;
pub use error::ConfigError;
pub use error::LookupError;
pub use error::LookupFailure;
pub use field::CaretRestore;
pub use field::FieldServices;
pub use field::FieldSnapshot;
pub use field::KeyOutcome;
pub use field::PasteOutcome;
pub use field::PointerOutcome;
pub use field::PointerTarget;
pub use field::Selection;
pub use field::SuggestionRow;
pub use field::TextField;
pub use field_event::FieldEvent;
pub use field_event::FieldEventSender;
pub use field_event::field_event_channel;
pub use host::FieldHost;
pub use lookup::LookupReply;
pub use lookup::LookupRequest;
pub use lookup::LookupTransport;
pub use lookup::Suggestion;
pub use sanitize::Trailing;
pub use sanitize::cleanup;
