//! Normalization applied to every keystroke and paste before it reaches the
//! field value.
//!
//! Text copied out of documents and mails tends to carry line breaks and
//! wrapping quotation marks (`„…“`, `"…"`, `'…'`). None of these are ever part
//! of a value the user means to submit, so they are stripped here.

/// Whether the trailing run of whitespace/quotes is removed as well.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trailing {
    /// Keep trailing characters. Used while typing so that a space typed at
    /// the end of the value survives until the next word is typed.
    Keep,
    /// Strip trailing whitespace and quotes. Used for pasted text.
    Trim,
}

/// Strips line breaks, the leading run of whitespace/quotes and, with
/// [`Trailing::Trim`], the trailing run too.
pub fn cleanup(text: &str, trailing: Trailing) -> String {
    let joined: String = text.chars().filter(|c| !is_line_break(*c)).collect();
    let stripped = joined.trim_start_matches(is_wrapping);
    match trailing {
        Trailing::Keep => stripped.to_string(),
        Trailing::Trim => stripped.trim_end_matches(is_wrapping).to_string(),
    }
}

fn is_line_break(ch: char) -> bool {
    matches!(ch, '\r' | '\n')
}

fn is_wrapping(ch: char) -> bool {
    ch.is_whitespace() || is_quote(ch)
}

fn is_quote(ch: char) -> bool {
    matches!(
        ch,
        '"' | '\''
            | '\u{201E}' // „
            | '\u{201C}' // “
            | '\u{201D}' // ”
            | '\u{201A}' // ‚
            | '\u{2018}' // ‘
            | '\u{2019}' // ’
            | '\u{00AB}' // «
            | '\u{00BB}' // »
    )
}
