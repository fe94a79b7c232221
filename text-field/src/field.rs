//! The text field with optional server backed autocomplete.
//!
//! The field value is two-fold: text typed or pasted by the user is submitted
//! as is, while choosing an entry from the suggestion list submits the
//! entry's value and shows its label instead.

use std::sync::Arc;

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use serde::Serialize;
use serde_json::Map as JsonMap;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::config::AutocompleteConfig;
use crate::config::FieldContent;
use crate::config::FieldSettings;
use crate::debounce::Debouncer;
use crate::dropdown::Dropdown;
use crate::dropdown::DropdownState;
use crate::error::ConfigError;
use crate::error::LookupError;
use crate::error::LookupFailure;
use crate::field_event::FieldEvent;
use crate::field_event::FieldEventSender;
use crate::host::FieldHost;
use crate::lookup::LookupReply;
use crate::lookup::LookupRequest;
use crate::lookup::LookupTransport;
use crate::lookup::Suggestion;
use crate::race::QueryRaceGuard;
use crate::sanitize::Trailing;
use crate::sanitize::cleanup;

/// Whether the host should stop processing a key or pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Handled by the field; stop propagation and the default action.
    Consumed,
    Ignored,
}

/// Where a mouse button went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Input,
    SuggestionList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    /// Prevent the default action so the input keeps focus while a list
    /// entry is clicked.
    Suppress,
    PassThrough,
}

/// Caret selection in character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn caret(position: usize) -> Self {
        Self {
            start: position,
            end: position,
        }
    }
}

/// Result of a paste. The host must suppress its native paste handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteOutcome {
    pub value: String,
    pub caret: usize,
}

/// Focus the input and put the caret at `position`. Handed out by
/// [`TextField::after_render`] once the view shows the pasted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretRestore {
    pub position: usize,
}

/// Render model of a suggestion row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionRow {
    pub value: String,
    pub label: String,
    pub active: bool,
}

/// Serializable view of the field for renderers and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSnapshot {
    pub value: Option<String>,
    pub label: Option<String>,
    pub display: String,
    pub dropdown_open: bool,
    pub suggestions: Vec<SuggestionRow>,
}

/// Collaborators injected into a [`TextField`].
#[derive(Clone)]
pub struct FieldServices {
    pub host: Arc<dyn FieldHost>,
    pub transport: Arc<dyn LookupTransport>,
    pub events: FieldEventSender,
}

pub struct TextField {
    value: Option<String>,
    label: Option<String>,
    autocomplete: Option<AutocompleteConfig>,
    settings: FieldSettings,
    dropdown: Dropdown,
    race: QueryRaceGuard,
    /// Input of the most recent `schedule_query`, or the value of the last
    /// chosen suggestion.
    last_queried: Option<String>,
    debouncer: Debouncer,
    caret_restore: Option<CaretRestore>,
    host: Arc<dyn FieldHost>,
    transport: Arc<dyn LookupTransport>,
    events: FieldEventSender,
}

impl TextField {
    /// Validates the autocomplete descriptor and seeds the field with the
    /// initial value. Must be called within a tokio runtime once autocomplete
    /// is used, since timers and lookups run as tasks.
    pub fn new(content: FieldContent, services: FieldServices) -> Result<Self, ConfigError> {
        let autocomplete = content.autocomplete_config()?;
        let FieldServices {
            host,
            transport,
            events,
        } = services;
        Ok(Self {
            value: content.value,
            label: None,
            autocomplete,
            settings: FieldSettings::default(),
            dropdown: Dropdown::default(),
            race: QueryRaceGuard::default(),
            last_queried: None,
            debouncer: Debouncer::new(events.clone()),
            caret_restore: None,
            host,
            transport,
            events,
        })
    }

    pub fn with_settings(mut self, settings: FieldSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Text the input shows: the chosen suggestion's label if any, the value
    /// otherwise.
    pub fn display_text(&self) -> &str {
        match self.label.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => self.value.as_deref().unwrap_or(""),
        }
    }

    pub fn has_autocomplete(&self) -> bool {
        self.autocomplete.is_some()
    }

    pub fn dropdown_state(&self) -> DropdownState {
        self.dropdown.state()
    }

    pub fn is_dropdown_open(&self) -> bool {
        self.dropdown.is_open()
    }

    pub fn search_results(&self) -> &[Suggestion] {
        self.dropdown.results()
    }

    pub fn active_suggestion(&self) -> Option<&Suggestion> {
        self.dropdown
            .active_idx()
            .and_then(|idx| self.dropdown.get(idx))
    }

    /// Whether a debounce timer is armed.
    pub fn is_query_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Whether the newest lookup was sent and has not replied yet.
    pub fn is_lookup_in_flight(&self) -> bool {
        self.race.is_awaiting()
    }

    pub fn suggestions(&self) -> impl Iterator<Item = (&Suggestion, bool)> + '_ {
        let active = self.dropdown.active_idx();
        self.dropdown
            .results()
            .iter()
            .enumerate()
            .map(move |(idx, suggestion)| (suggestion, Some(idx) == active))
    }

    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            value: self.value.clone(),
            label: self.label.clone(),
            display: self.display_text().to_string(),
            dropdown_open: self.is_dropdown_open(),
            suggestions: self
                .suggestions()
                .map(|(s, active)| SuggestionRow {
                    value: s.value.clone(),
                    label: s.label.clone(),
                    active,
                })
                .collect(),
        }
    }

    /// The input's text changed through typing.
    pub fn on_text_input(&mut self, raw: &str) {
        let value = cleanup(raw, Trailing::Keep);
        self.set_value(value);
    }

    /// Replaces the native paste: the cleaned clipboard text is spliced over
    /// `selection`. The caret is restored via [`Self::after_render`].
    pub fn on_paste(&mut self, clipboard: &str, selection: Selection) -> PasteOutcome {
        let pasted = cleanup(clipboard, Trailing::Trim);
        let current = self.value.clone().unwrap_or_default();
        let len = current.chars().count();

        let start = selection.start.min(selection.end).min(len);
        let end = selection.start.max(selection.end).min(len);
        let head: String = current.chars().take(start).collect();
        let tail: String = current.chars().skip(end).collect();

        let value = format!("{head}{pasted}{tail}");
        let caret = start + pasted.chars().count();

        self.caret_restore = Some(CaretRestore { position: caret });
        self.set_value(value.clone());
        PasteOutcome { value, caret }
    }

    /// Call once the view finished rendering; returns the caret placement
    /// still owed from a paste.
    pub fn after_render(&mut self) -> Option<CaretRestore> {
        self.caret_restore.take()
    }

    fn set_value(&mut self, value: String) {
        self.value = Some(value.clone());
        self.host.on_change(&value);
        self.schedule_query(&value);
    }

    /// Debounced lookup for `value`. Does nothing without autocomplete or when
    /// `value` is what was queried last.
    pub fn schedule_query(&mut self, value: &str) {
        if self.autocomplete.is_none() || self.last_queried.as_deref() == Some(value) {
            return;
        }
        self.restart_query(Some(value.to_string()));
    }

    fn restart_query(&mut self, value: Option<String>) {
        self.last_queried = value.clone();
        self.debouncer.cancel();
        self.race.invalidate();

        // Never show the previous value's list while the new one is pending.
        self.dropdown.clear();
        self.label = None;

        let value = value.unwrap_or_default();
        if value.chars().count() < self.settings.min_query_chars {
            self.dropdown.close();
            return;
        }
        self.debouncer.schedule(self.settings.debounce, value);
    }

    /// Apply a completion of background work.
    pub fn handle_event(&mut self, event: FieldEvent) {
        match event {
            FieldEvent::DebounceElapsed { generation, value } => {
                if self.debouncer.accept(generation) {
                    self.issue_query(value);
                } else {
                    trace!(generation, "ignoring tick of a replaced debounce timer");
                }
            }
            FieldEvent::LookupFinished { token, outcome } => self.apply_lookup(token, outcome),
        }
    }

    fn issue_query(&mut self, value: String) {
        let Some(autocomplete) = &self.autocomplete else {
            return;
        };

        let form_params: JsonMap<_, _> = autocomplete
            .form_params
            .iter()
            .map(|name| (name.clone(), self.host.field_value(name)))
            .collect();
        let request = LookupRequest {
            action: autocomplete.action.clone(),
            value,
            params: autocomplete.params.clone(),
            form_params,
        };
        let token = self.race.issue();
        debug!(token, action = %request.action, value = %request.value, "issuing autocomplete lookup");

        let transport = Arc::clone(&self.transport);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = transport.send_query(request).await;
            events.send(FieldEvent::LookupFinished { token, outcome });
        });
    }

    fn apply_lookup(&mut self, token: u64, outcome: Result<LookupReply, LookupError>) {
        if !self.race.finish(token) {
            trace!(token, "discarding reply of a superseded lookup");
            return;
        }

        match outcome {
            Ok(LookupReply::Suggestions(results)) => {
                debug!(token, count = results.len(), "autocomplete results received");
                if results.is_empty() {
                    self.dropdown.clear();
                    self.dropdown.close();
                } else {
                    self.dropdown.replace(results);
                    self.dropdown.open();
                }
            }
            Ok(LookupReply::Error(err)) => {
                debug!(token, "lookup service reported an error: {err}");
                self.dropdown.close();
                self.host.on_error(&LookupFailure::Remote(err));
            }
            Err(err) => {
                warn!(token, "autocomplete lookup failed: {err}");
                self.dropdown.close();
                self.host.on_error(&LookupFailure::Transport(err.to_string()));
            }
        }
    }

    /// Keyboard handling for the suggestion list. Keys are only claimed while
    /// the list is open.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.kind == KeyEventKind::Release || !self.dropdown.is_open() {
            return KeyOutcome::Ignored;
        }

        match key.code {
            KeyCode::Enter => {
                if let Some(idx) = self.dropdown.active_idx() {
                    self.select_result(idx);
                }
                KeyOutcome::Consumed
            }
            KeyCode::Esc => {
                self.dropdown.close();
                KeyOutcome::Consumed
            }
            KeyCode::Up => {
                self.dropdown.move_up_wrap();
                KeyOutcome::Consumed
            }
            KeyCode::Down => {
                self.dropdown.move_down_wrap();
                KeyOutcome::Consumed
            }
            _ => KeyOutcome::Ignored,
        }
    }

    pub fn handle_mouse_down(&self, target: PointerTarget) -> PointerOutcome {
        match target {
            PointerTarget::Input => PointerOutcome::PassThrough,
            PointerTarget::SuggestionList => PointerOutcome::Suppress,
        }
    }

    /// Commit the suggestion at `index` (Enter on the active entry, or a click
    /// on a list entry). Returns `false` when there is no such entry.
    pub fn select_result(&mut self, index: usize) -> bool {
        let Some(choice) = self.dropdown.get(index).cloned() else {
            return false;
        };
        self.value = Some(choice.value.clone());
        self.label = Some(choice.label);
        self.host.on_change(&choice.value);
        self.last_queried = Some(choice.value);
        self.dropdown.close();
        true
    }

    pub fn on_focus(&mut self) {
        let Some(autocomplete) = &self.autocomplete else {
            return;
        };
        if autocomplete.depends_on_form() {
            // Sibling fields may have changed since the list was fetched.
            let value = self.value.clone();
            self.restart_query(value);
        } else if !self.dropdown.is_empty() {
            self.dropdown.open();
        }
    }

    pub fn on_blur(&mut self) {
        self.dropdown.close();
    }

    /// Stop pending work. Also done on drop.
    pub fn teardown(&mut self) {
        self.debouncer.cancel();
        self.dropdown.close();
    }
}

impl Drop for TextField {
    fn drop(&mut self) {
        self.teardown();
    }
}
