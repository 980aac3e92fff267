//! Flag value kinds and their text conversions.
//!
//! Every flag holds a [`FlagValue`] of a fixed [`FlagKind`].  Values arrive as
//! text (from a config file line or a command-line argument) and are converted
//! by [`FlagValue::parse`]; they leave as text through the `Display` impl.
//!
//! # Text forms
//!
//! | Kind       | Accepted text                                              |
//! |------------|------------------------------------------------------------|
//! | `string`   | anything, verbatim (including the empty string)            |
//! | `bool`     | `1 t T TRUE true True` / `0 f F FALSE false False`         |
//! | `int`      | `-42`, `0x2A`, `0o52`, `0b101010`, `052`, `1_000`          |
//! | `uint`     | same as `int` without a minus sign                         |
//! | `float`    | `3.14`, `-1e9`, `inf`, `NaN`                               |
//! | `duration` | see [`crate::domain::duration`]                            |

use std::fmt;
use std::num::{ParseFloatError, ParseIntError};
use std::time::Duration;

use thiserror::Error;

use crate::domain::duration::{format_duration, parse_duration, DurationError};

/// Reasons a piece of text cannot be converted into a flag value.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValueError {
    #[error("invalid boolean {0:?}")]
    InvalidBool(String),

    #[error("invalid integer {text:?}: {source}")]
    InvalidInt {
        text: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid float {text:?}: {source}")]
    InvalidFloat {
        text: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("invalid duration {text:?}: {source}")]
    InvalidDuration {
        text: String,
        #[source]
        source: DurationError,
    },
}

/// The closed set of types a flag can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagKind {
    String,
    Int,
    Uint,
    Float,
    Bool,
    Duration,
}

impl FlagKind {
    /// Short lowercase name used in usage output (`"string"`, `"int"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            FlagKind::String => "string",
            FlagKind::Int => "int",
            FlagKind::Uint => "uint",
            FlagKind::Float => "float",
            FlagKind::Bool => "bool",
            FlagKind::Duration => "duration",
        }
    }
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed flag value.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
}

impl FlagValue {
    /// Converts `text` into a value of `kind`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] when `text` is not a valid value of `kind`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flagfile_core::domain::value::{FlagKind, FlagValue};
    ///
    /// assert_eq!(FlagValue::parse(FlagKind::Int, "0x10").unwrap(), FlagValue::Int(16));
    /// assert!(FlagValue::parse(FlagKind::Bool, "yes").is_err());
    /// ```
    pub fn parse(kind: FlagKind, text: &str) -> Result<FlagValue, ValueError> {
        match kind {
            FlagKind::String => Ok(FlagValue::Str(text.to_string())),
            FlagKind::Int => parse_int(text).map(FlagValue::Int),
            FlagKind::Uint => parse_uint(text).map(FlagValue::Uint),
            FlagKind::Float => text
                .parse::<f64>()
                .map(FlagValue::Float)
                .map_err(|source| ValueError::InvalidFloat {
                    text: text.to_string(),
                    source,
                }),
            FlagKind::Bool => parse_bool(text).map(FlagValue::Bool),
            FlagKind::Duration => parse_duration(text)
                .map(FlagValue::Duration)
                .map_err(|source| ValueError::InvalidDuration {
                    text: text.to_string(),
                    source,
                }),
        }
    }

    /// Returns the kind of this value.
    pub fn kind(&self) -> FlagKind {
        match self {
            FlagValue::Str(_) => FlagKind::String,
            FlagValue::Int(_) => FlagKind::Int,
            FlagValue::Uint(_) => FlagKind::Uint,
            FlagValue::Float(_) => FlagKind::Float,
            FlagValue::Bool(_) => FlagKind::Bool,
            FlagValue::Duration(_) => FlagKind::Duration,
        }
    }

    /// Returns `true` for the zero value of the kind (`""`, `0`, `false`, `0s`).
    ///
    /// Usage output omits `(default ...)` for zero defaults.
    pub fn is_zero(&self) -> bool {
        match self {
            FlagValue::Str(s) => s.is_empty(),
            FlagValue::Int(v) => *v == 0,
            FlagValue::Uint(v) => *v == 0,
            FlagValue::Float(v) => *v == 0.0,
            FlagValue::Bool(v) => !*v,
            FlagValue::Duration(d) => d.is_zero(),
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Str(s) => f.write_str(s),
            FlagValue::Int(v) => write!(f, "{v}"),
            FlagValue::Uint(v) => write!(f, "{v}"),
            FlagValue::Float(v) => write!(f, "{v}"),
            FlagValue::Bool(v) => write!(f, "{v}"),
            FlagValue::Duration(d) => f.write_str(&format_duration(*d)),
        }
    }
}

// ── Scalar parsers ────────────────────────────────────────────────────────────

/// Parses the boolean spellings accepted on the command line.
pub fn parse_bool(text: &str) -> Result<bool, ValueError> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ValueError::InvalidBool(text.to_string())),
    }
}

/// Parses a signed 64-bit integer with an optional base prefix.
pub fn parse_int(text: &str) -> Result<i64, ValueError> {
    let literal = IntLiteral::split(text);
    i64::from_str_radix(&literal.signed_digits(), literal.radix).map_err(|source| ValueError::InvalidInt {
        text: text.to_string(),
        source,
    })
}

/// Parses an unsigned 64-bit integer with an optional base prefix.
pub fn parse_uint(text: &str) -> Result<u64, ValueError> {
    let literal = IntLiteral::split(text);
    // A minus sign stays in so `from_str_radix` rejects it as an invalid digit.
    u64::from_str_radix(&literal.signed_digits(), literal.radix).map_err(|source| ValueError::InvalidInt {
        text: text.to_string(),
        source,
    })
}

/// An integer literal split into sign, radix and digit string.
struct IntLiteral {
    negative: bool,
    radix: u32,
    digits: String,
}

impl IntLiteral {
    fn split(text: &str) -> Self {
        let (negative, unsigned) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };

        let (radix, body, prefixed) = match unsigned.get(..2) {
            Some("0x") | Some("0X") => (16, &unsigned[2..], true),
            Some("0o") | Some("0O") => (8, &unsigned[2..], true),
            Some("0b") | Some("0B") => (2, &unsigned[2..], true),
            _ if unsigned.len() > 1 && unsigned.starts_with('0') => (8, &unsigned[1..], true),
            _ => (10, unsigned, false),
        };

        // Underscores are separators only between digits (or right after a
        // base prefix).  Misplaced ones are left in so parsing rejects them.
        let digits = if body.contains('_') && underscores_ok(body, prefixed) {
            body.replace('_', "")
        } else {
            body.to_string()
        };

        Self {
            negative,
            radix,
            digits,
        }
    }

    /// The digits with an explicit sign, so a second sign (`"++5"`) is rejected.
    fn signed_digits(&self) -> String {
        let sign = if self.negative { '-' } else { '+' };
        format!("{sign}{}", self.digits)
    }
}

fn underscores_ok(body: &str, prefixed: bool) -> bool {
    !body.ends_with('_') && !body.contains("__") && (prefixed || !body.starts_with('_'))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── bool ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_bool_accepts_all_spellings() {
        for text in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(text), Ok(true), "{text}");
        }
        for text in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(text), Ok(false), "{text}");
        }
    }

    #[test]
    fn test_parse_bool_rejects_other_words() {
        assert!(parse_bool("yes").is_err());
        assert!(parse_bool("tRuE").is_err());
        assert!(parse_bool("").is_err());
    }

    // ── int / uint ────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_int_decimal_and_sign() {
        assert_eq!(parse_int("9090"), Ok(9090));
        assert_eq!(parse_int("-17"), Ok(-17));
        assert_eq!(parse_int("+17"), Ok(17));
        assert_eq!(parse_int("0"), Ok(0));
    }

    #[test]
    fn test_parse_int_base_prefixes() {
        assert_eq!(parse_int("0x2A"), Ok(42));
        assert_eq!(parse_int("0X2a"), Ok(42));
        assert_eq!(parse_int("0o52"), Ok(42));
        assert_eq!(parse_int("0b101010"), Ok(42));
        assert_eq!(parse_int("052"), Ok(42));
        assert_eq!(parse_int("-0x10"), Ok(-16));
    }

    #[test]
    fn test_parse_int_underscores_between_digits() {
        assert_eq!(parse_int("1_000_000"), Ok(1_000_000));
        assert_eq!(parse_int("0x_FF"), Ok(255));
        assert!(parse_int("_1").is_err());
        assert!(parse_int("1_").is_err());
        assert!(parse_int("1__0").is_err());
    }

    #[test]
    fn test_parse_int_extremes() {
        assert_eq!(parse_int("-9223372036854775808"), Ok(i64::MIN));
        assert_eq!(parse_int("9223372036854775807"), Ok(i64::MAX));
        assert!(parse_int("9223372036854775808").is_err());
    }

    #[test]
    fn test_parse_int_rejects_garbage() {
        assert!(parse_int("not_an_int").is_err());
        assert!(parse_int("").is_err());
        assert!(parse_int("0x").is_err());
        assert!(parse_int("08").is_err());
        assert!(parse_int("1.5").is_err());
        assert!(parse_int("++5").is_err());
    }

    #[test]
    fn test_parse_uint_rejects_negative() {
        assert_eq!(parse_uint("18446744073709551615"), Ok(u64::MAX));
        assert!(parse_uint("-1").is_err());
    }

    // ── FlagValue ─────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_string_is_verbatim() {
        // Arrange / Act
        let value = FlagValue::parse(FlagKind::String, "a = b # not a comment").unwrap();

        // Assert
        assert_eq!(value, FlagValue::Str("a = b # not a comment".to_string()));
    }

    #[test]
    fn test_parse_float_values() {
        assert_eq!(
            FlagValue::parse(FlagKind::Float, "2.5e3").unwrap(),
            FlagValue::Float(2500.0)
        );
        assert!(FlagValue::parse(FlagKind::Float, "two").is_err());
    }

    #[test]
    fn test_parse_duration_error_carries_text() {
        // Arrange / Act
        let err = FlagValue::parse(FlagKind::Duration, "soon").unwrap_err();

        // Assert
        match err {
            ValueError::InvalidDuration { text, .. } => assert_eq!(text, "soon"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_kind_matches_parsed_value() {
        for kind in [
            FlagKind::String,
            FlagKind::Int,
            FlagKind::Uint,
            FlagKind::Float,
            FlagKind::Bool,
            FlagKind::Duration,
        ] {
            let value = FlagValue::parse(kind, "1s").or_else(|_| FlagValue::parse(kind, "1"));
            assert_eq!(value.unwrap().kind(), kind);
        }
    }

    #[test]
    fn test_display_renders_text_form() {
        assert_eq!(FlagValue::Str("example.com:5432".into()).to_string(), "example.com:5432");
        assert_eq!(FlagValue::Int(-3).to_string(), "-3");
        assert_eq!(FlagValue::Bool(true).to_string(), "true");
        assert_eq!(FlagValue::Float(0.5).to_string(), "0.5");
        assert_eq!(
            FlagValue::Duration(Duration::from_secs(90)).to_string(),
            "1m30s"
        );
    }

    #[test]
    fn test_zero_values() {
        assert!(FlagValue::Str(String::new()).is_zero());
        assert!(FlagValue::Int(0).is_zero());
        assert!(FlagValue::Bool(false).is_zero());
        assert!(FlagValue::Duration(Duration::ZERO).is_zero());
        assert!(!FlagValue::Uint(8080).is_zero());
        assert!(!FlagValue::Str("localhost".into()).is_zero());
    }
}
