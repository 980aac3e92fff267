//! Classification of a single config file line.
//!
//! ```text
//! # comment            -> Comment
//!                      -> Blank
//!   name = value       -> Entry { name: "name", value: "value" }
//! url = a=b            -> Entry { name: "url",  value: "a=b" }
//! key =                -> Entry { name: "key",  value: "" }
//! no separator here    -> Malformed("no separator here")
//! ```
//!
//! There is no quoting, escaping or inline comment syntax: everything after
//! the first `=` (minus surrounding whitespace) is the value.

/// Marks a line that is ignored in full.
pub const COMMENT_MARKER: char = '#';

/// Separates the name from the value.  Only the first occurrence counts.
pub const SEPARATOR: char = '=';

/// A `(name, value)` pair borrowed from one line, both sides trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// What a physical line turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Empty or whitespace only.
    Blank,
    /// First non-whitespace character is [`COMMENT_MARKER`].
    Comment,
    /// A `name = value` pair.
    Entry(Entry<'a>),
    /// Non-blank, non-comment text without a [`SEPARATOR`]; holds the trimmed line.
    Malformed(&'a str),
}

/// Classifies one raw line (a trailing `\n` or `\r\n` is allowed).
///
/// # Examples
///
/// ```rust
/// use flagfile_core::loader::line::{classify, Entry, Line};
///
/// assert_eq!(
///     classify("  server-port = 9090  \n"),
///     Line::Entry(Entry { name: "server-port", value: "9090" })
/// );
/// assert_eq!(classify("# server-port = 9090"), Line::Comment);
/// ```
pub fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim();

    if line.is_empty() {
        return Line::Blank;
    }
    if line.starts_with(COMMENT_MARKER) {
        return Line::Comment;
    }

    match line.split_once(SEPARATOR) {
        Some((name, value)) => Line::Entry(Entry {
            name: name.trim(),
            value: value.trim(),
        }),
        None => Line::Malformed(line),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
