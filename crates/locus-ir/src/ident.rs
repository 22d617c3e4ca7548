//! Identifier escaping for the backend's textual IR.
//!
//! A "safe" identifier (`[A-Za-z0-9_]+`) is emitted verbatim. Anything else
//! is wrapped in backticks with a backslash-escaped body. `unescape_id`
//! inverts the body transform only; callers that strip delimiters themselves
//! keep track of whether a token was quoted.

use std::fmt;
use std::str::CharIndices;

/// True iff `s` needs no quoting: one or more ASCII letters, digits, or
/// underscores, and nothing else.
pub fn is_safe_id(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Escape an identifier for embedding in the textual IR.
///
/// Safe identifiers come back unchanged. Unsafe ones are returned as
/// `` `body` `` where the body has backslashes doubled, backticks escaped as
/// `` \` ``, and control characters rendered as `\n`/`\r`/`\t`/`\xNN`.
pub fn escape_id(id: &str) -> String {
    if is_safe_id(id) {
        return id.to_string();
    }

    let mut out = String::with_capacity(id.len() + 2);
    out.push('`');
    for c in id.chars() {
        match c {
            '`' => out.push_str("\\`"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            // Remaining control code points all sit below U+0100.
            c if c.is_control() => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('`');
    out
}

/// Invert the body transform of a previously quoted identifier token.
///
/// The input is the text between the backtick delimiters, not the delimited
/// token itself. Accepts a superset of what [`escape_id`] emits: quote and
/// NUL short escapes plus `\uNNNN`/`\UNNNNNNNN` forms decode too.
pub fn unescape_id(body: &str) -> Result<String, UnescapeError> {
    let mut out = String::with_capacity(body.len());
    let mut it = body.char_indices();
    while let Some((at, c)) = it.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some((_, esc)) = it.next() else {
            return Err(UnescapeError {
                offset: at,
                kind: UnescapeErrorKind::TruncatedEscape,
            });
        };
        match esc {
            '`' => out.push('`'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            '0' => out.push('\0'),
            'x' => out.push(take_hex(&mut it, at, 2)?),
            'u' => out.push(take_hex(&mut it, at, 4)?),
            'U' => out.push(take_hex(&mut it, at, 8)?),
            other => {
                return Err(UnescapeError {
                    offset: at,
                    kind: UnescapeErrorKind::UnknownEscape(other),
                });
            }
        }
    }
    Ok(out)
}

fn take_hex(it: &mut CharIndices<'_>, at: usize, digits: u32) -> Result<char, UnescapeError> {
    let mut v: u32 = 0;
    for _ in 0..digits {
        let Some((_, c)) = it.next() else {
            return Err(UnescapeError {
                offset: at,
                kind: UnescapeErrorKind::TruncatedEscape,
            });
        };
        let Some(d) = c.to_digit(16) else {
            return Err(UnescapeError {
                offset: at,
                kind: UnescapeErrorKind::InvalidHexDigit(c),
            });
        };
        v = (v << 4) | d;
    }
    char::from_u32(v).ok_or(UnescapeError {
        offset: at,
        kind: UnescapeErrorKind::InvalidCodePoint(v),
    })
}

/// Malformed escape sequence in a quoted identifier body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnescapeError {
    /// Byte offset of the backslash that started the bad sequence.
    pub offset: usize,
    pub kind: UnescapeErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnescapeErrorKind {
    TruncatedEscape,
    UnknownEscape(char),
    InvalidHexDigit(char),
    InvalidCodePoint(u32),
}

impl fmt::Display for UnescapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            UnescapeErrorKind::TruncatedEscape => {
                write!(f, "truncated escape sequence at byte {}", self.offset)
            }
            UnescapeErrorKind::UnknownEscape(c) => {
                write!(f, "unknown escape sequence \\{c} at byte {}", self.offset)
            }
            UnescapeErrorKind::InvalidHexDigit(c) => {
                write!(f, "invalid hex digit {c:?} at byte {}", self.offset)
            }
            UnescapeErrorKind::InvalidCodePoint(v) => {
                write!(f, "\\U{v:08x} is not a valid code point (byte {})", self.offset)
            }
        }
    }
}

impl std::error::Error for UnescapeError {}
