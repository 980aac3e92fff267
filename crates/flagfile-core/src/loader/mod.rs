//! Config file loader: applies `name = value` lines to a flag registry.
//!
//! A config file holds one assignment per line, using exactly the names and
//! value syntax accepted on the command line:
//!
//! ```text
//! # Database configuration
//! db-url = example.com:5432
//!
//! # Server configuration
//! server-port = 9090
//! debug = true
//! ```
//!
//! # Semantics
//!
//! - Blank lines and lines whose first non-whitespace character is `#` are
//!   ignored.
//! - Every other line must contain `=`.  The text before the first `=` is the
//!   flag name and the rest is the value; both are trimmed.
//! - Each entry is applied to the registry immediately, in file order.  The
//!   same name may appear many times; the last assignment wins.
//! - The first error stops the load.  Entries applied before the failing line
//!   stay applied; there is no rollback.
//!
//! # Layering
//!
//! Because every entry goes through [`SettingRegistry::set`], loading several
//! files in sequence overrides values one at a time: a setting only present in
//! an earlier file keeps its value after a later file is loaded.
//!
//! # Memory
//!
//! The file is streamed through a single reused line buffer, so memory use is
//! bounded by the longest line rather than the file size.  Lines longer than
//! [`MAX_LINE_LEN`] bytes are rejected with [`LoadError::Read`].

pub mod line;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::domain::registry::{SetError, SettingRegistry};
use crate::domain::value::ValueError;
use line::{classify, Entry, Line};

/// Longest accepted line, in bytes, excluding the line terminator.
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// Errors that abort a config file load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened.
    #[error("failed to open config file '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A non-blank, non-comment line has no `=`.
    #[error(
        "{}:{line_number}: failed to split line (expected to find an '='): {line}",
        .path.display()
    )]
    Format {
        path: PathBuf,
        line_number: usize,
        line: String,
    },

    /// The name does not match any declared flag (this includes the empty name).
    #[error("{}:{line_number}: unknown setting '{name}'", .path.display())]
    UnknownSetting {
        path: PathBuf,
        line_number: usize,
        name: String,
    },

    /// The value is not valid for the flag's kind.
    #[error(
        "{}:{line_number}: failed to set '{name}' to value '{value}': {source}",
        .path.display()
    )]
    InvalidValue {
        path: PathBuf,
        line_number: usize,
        name: String,
        value: String,
        #[source]
        source: ValueError,
    },

    /// Reading failed after the file was opened (I/O error, invalid UTF-8, or
    /// a line longer than [`MAX_LINE_LEN`]).
    #[error("failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LoadError {
    /// The file the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Open { path, .. }
            | LoadError::Format { path, .. }
            | LoadError::UnknownSetting { path, .. }
            | LoadError::InvalidValue { path, .. }
            | LoadError::Read { path, .. } => path,
        }
    }

    /// The 1-based line number for errors tied to a specific line.
    pub fn line_number(&self) -> Option<usize> {
        match self {
            LoadError::Format { line_number, .. }
            | LoadError::UnknownSetting { line_number, .. }
            | LoadError::InvalidValue { line_number, .. } => Some(*line_number),
            LoadError::Open { .. } | LoadError::Read { .. } => None,
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Reads the config file at `path` and applies every entry to `registry`.
///
/// # Errors
///
/// Returns the first [`LoadError`] encountered.  Entries before the failing
/// line remain applied.
///
/// # Examples
///
/// ```rust,no_run
/// use flagfile_core::{load, FlagRegistry};
///
/// let mut registry = FlagRegistry::new();
/// registry.int("server-port", 8080, "Server port").unwrap();
///
/// if std::path::Path::new("./defaults.conf").exists() {
///     load(&mut registry, "./defaults.conf").unwrap();
/// }
/// ```
pub fn load<R, P>(registry: &mut R, path: P) -> Result<(), LoadError>
where
    R: SettingRegistry + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    // The file handle is dropped on every return path below.
    load_reader(registry, BufReader::new(file), path)
}

/// Applies every entry read from `reader` to `registry`.
///
/// `origin` only labels errors and log lines; nothing is opened.
///
/// # Errors
///
/// Same as [`load`], minus [`LoadError::Open`].
pub fn load_reader<R, B>(registry: &mut R, mut reader: B, origin: &Path) -> Result<(), LoadError>
where
    R: SettingRegistry + ?Sized,
    B: BufRead,
{
    let mut buf = String::new();
    let mut line_number = 0usize;
    let mut applied = 0usize;

    loop {
        buf.clear();
        let read = read_bounded_line(&mut reader, &mut buf).map_err(|source| LoadError::Read {
            path: origin.to_path_buf(),
            source,
        })?;
        if read == 0 {
            break;
        }
        line_number += 1;

        match classify(&buf) {
            Line::Blank | Line::Comment => {}
            Line::Malformed(line) => {
                return Err(LoadError::Format {
                    path: origin.to_path_buf(),
                    line_number,
                    line: line.to_string(),
                });
            }
            Line::Entry(entry) => {
                apply(registry, entry, origin, line_number)?;
                applied += 1;
            }
        }
    }

    debug!(
        "{}: applied {applied} setting(s) from {line_number} line(s)",
        origin.display()
    );
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn apply<R>(
    registry: &mut R,
    entry: Entry<'_>,
    origin: &Path,
    line_number: usize,
) -> Result<(), LoadError>
where
    R: SettingRegistry + ?Sized,
{
    registry
        .set(entry.name, entry.value)
        .map_err(|err| match err {
            SetError::UnknownFlag(name) => LoadError::UnknownSetting {
                path: origin.to_path_buf(),
                line_number,
                name,
            },
            SetError::InvalidValue {
                name,
                value,
                source,
            } => LoadError::InvalidValue {
                path: origin.to_path_buf(),
                line_number,
                name,
                value,
                source,
            },
        })?;

    debug!(
        "{}:{line_number}: {} = {:?}",
        origin.display(),
        entry.name,
        entry.value
    );
    Ok(())
}

/// Reads one line into `buf`, refusing to buffer more than [`MAX_LINE_LEN`]
/// bytes of content.  Returns the number of bytes consumed (0 at end of input).
fn read_bounded_line<B: BufRead>(reader: &mut B, buf: &mut String) -> io::Result<usize> {
    let limit = MAX_LINE_LEN as u64 + 1;
    let read = reader.by_ref().take(limit).read_line(buf)?;
    if read as u64 == limit && !buf.ends_with('\n') {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("line exceeds {MAX_LINE_LEN} bytes"),
        ));
    }
    Ok(read)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
