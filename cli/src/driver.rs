use std::io::Write;

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use oxi_text_field::FieldEvent;
use oxi_text_field::FieldSnapshot;
use oxi_text_field::LookupFailure;
use oxi_text_field::PointerTarget;
use oxi_text_field::Selection;
use oxi_text_field::TextField;
use serde::Serialize;
use serde_json::Value as JsonValue;
use serde_json::json;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::trace;
use tracing::warn;

use crate::host::HostNotice;
use crate::script::Command;

/// One line of output.
#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum Report<'a> {
    State(&'a FieldSnapshot),
    Change(&'a str),
    Error(JsonValue),
}

/// Owns the field and is its only mutator: script commands and background
/// completions are applied from the same loop.
pub struct Driver<W> {
    field: TextField,
    events: UnboundedReceiver<FieldEvent>,
    notices: UnboundedReceiver<HostNotice>,
    last_state: Option<FieldSnapshot>,
    out: W,
}

impl<W: Write> Driver<W> {
    pub fn new(
        field: TextField,
        events: UnboundedReceiver<FieldEvent>,
        notices: UnboundedReceiver<HostNotice>,
        out: W,
    ) -> Self {
        Self {
            field,
            events,
            notices,
            last_state: None,
            out,
        }
    }

    pub fn field(&self) -> &TextField {
        &self.field
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Run the script read from `input`. Background completions are applied
    /// as they arrive while waiting for the next line. On end of input the
    /// outstanding work is awaited as with `wait`.
    pub async fn run<R>(&mut self, input: R) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        self.flush(true)?;
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<Command>() {
                        Ok(Command::Quit) => return Ok(()),
                        Ok(command) => self.apply(command).await?,
                        Err(e) => warn!("skipping script line `{line}`: {e}"),
                    }
                }
                Some(event) = self.events.recv() => {
                    self.field.handle_event(event);
                    self.flush(false)?;
                }
            }
        }
        self.wait().await
    }

    pub async fn apply(&mut self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::Type(text) => self.field.on_text_input(&text),
            Command::Paste(text) => {
                let end = self.field.value().map_or(0, |v| v.chars().count());
                let pasted = self.field.on_paste(&text, Selection::caret(end));
                if let Some(caret) = self.field.after_render() {
                    trace!(value = %pasted.value, caret = caret.position, "pasted");
                }
            }
            Command::Up => self.press(KeyCode::Up),
            Command::Down => self.press(KeyCode::Down),
            Command::Enter => self.press(KeyCode::Enter),
            Command::Esc => self.press(KeyCode::Esc),
            Command::Focus => self.field.on_focus(),
            Command::Blur => self.field.on_blur(),
            Command::Click(index) => self.click(index),
            Command::Wait => self.wait().await?,
            Command::Quit => {}
        }
        self.flush(true)
    }

    /// Apply completions until no timer is armed and no lookup is outstanding.
    pub async fn wait(&mut self) -> anyhow::Result<()> {
        while self.field.is_query_pending() || self.field.is_lookup_in_flight() {
            let Some(event) = self.events.recv().await else {
                break;
            };
            self.field.handle_event(event);
            self.flush(false)?;
        }
        Ok(())
    }

    fn press(&mut self, code: KeyCode) {
        let outcome = self.field.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
        trace!(?code, ?outcome, "key handled");
    }

    fn click(&mut self, index: usize) {
        if !self.field.is_dropdown_open() {
            warn!(index, "ignoring click, the suggestion list is closed");
            return;
        }
        let outcome = self.field.handle_mouse_down(PointerTarget::SuggestionList);
        trace!(index, ?outcome, "mouse down on the suggestion list");
        if !self.field.select_result(index) {
            warn!(index, "ignoring click past the end of the suggestion list");
        }
    }

    /// Print queued host callbacks, then the field state if it changed or
    /// `always` is set.
    fn flush(&mut self, always: bool) -> anyhow::Result<()> {
        while let Ok(notice) = self.notices.try_recv() {
            match notice {
                HostNotice::Change(value) => self.write(&Report::Change(&value))?,
                HostNotice::Error(failure) => self.write(&Report::Error(failure_json(&failure)))?,
            }
        }

        let state = self.field.snapshot();
        if always || self.last_state.as_ref() != Some(&state) {
            self.write(&Report::State(&state))?;
            self.last_state = Some(state);
        }
        self.out.flush()?;
        Ok(())
    }

    fn write(&mut self, report: &Report<'_>) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.out, report)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

fn failure_json(failure: &LookupFailure) -> JsonValue {
    match failure {
        LookupFailure::Remote(err) => json!({ "remote": err }),
        LookupFailure::Transport(msg) => json!({ "transport": msg }),
    }
}
