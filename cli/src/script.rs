//! Line oriented interaction scripts.

use std::str::FromStr;

use thiserror::Error;

/// One scripted interaction with the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the input's text as if typed.
    Type(String),
    /// Paste at the end of the current value.
    Paste(String),
    Up,
    Down,
    Enter,
    Esc,
    Focus,
    Blur,
    /// Click the n-th list entry, counting from zero.
    Click(usize),
    /// Let pending timers and lookups complete.
    Wait,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ParseCommandError(String);

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (word, rest) = match line.split_once(' ') {
            Some((word, rest)) => (word, Some(rest)),
            None => (line.trim_end(), None),
        };
        let text = || rest.unwrap_or_default().to_string();

        let command = match word {
            "type" => Command::Type(text()),
            "paste" => Command::Paste(text()),
            "up" => Command::Up,
            "down" => Command::Down,
            "enter" => Command::Enter,
            "esc" => Command::Esc,
            "focus" => Command::Focus,
            "blur" => Command::Blur,
            "click" => {
                let index = rest.map(str::trim).unwrap_or_default();
                let index = index
                    .parse()
                    .map_err(|_| ParseCommandError(format!("click needs an index, got `{index}`")))?;
                Command::Click(index)
            }
            "wait" => Command::Wait,
            "quit" => Command::Quit,
            other => return Err(ParseCommandError(format!("unknown command `{other}`"))),
        };
        Ok(command)
    }
}
