//! Text form of duration flags.
//!
//! Durations are written as a sequence of decimal numbers, each with an
//! optional fraction and a mandatory unit suffix:
//!
//! ```text
//! 300ms   1.5s   1h30m   2h45m10.5s   0
//! ```
//!
//! | Unit            | Meaning      |
//! |-----------------|--------------|
//! | `ns`            | nanoseconds  |
//! | `us`, `µs`, `μs`| microseconds |
//! | `ms`            | milliseconds |
//! | `s`             | seconds      |
//! | `m`             | minutes      |
//! | `h`             | hours        |
//!
//! The bare value `0` is the only number accepted without a unit.  Negative
//! durations cannot be represented by [`std::time::Duration`] and are rejected.
//!
//! [`format_duration`] renders the canonical form that [`parse_duration`]
//! accepts, so `format_duration(parse_duration(s)?)` normalises `s`
//! (e.g. `"90m"` becomes `"1h30m0s"`).

use std::time::Duration;

use thiserror::Error;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;
const NANOS_PER_MIN: u128 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MIN;

/// Fraction digits beyond this count cannot change the result at nanosecond
/// precision and are ignored.
const MAX_FRACTION_DIGITS: usize = 20;

/// Reasons a duration string is rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DurationError {
    /// The text was empty or only a sign.
    #[error("empty duration")]
    Empty,

    /// The text started with `-`.
    #[error("negative durations are not supported")]
    Negative,

    /// A component had no digits before its unit (e.g. `"ms"` or `"."`).
    #[error("expected a number")]
    MissingNumber,

    /// A number was not followed by a unit (e.g. `"10"`).
    #[error("missing unit after number")]
    MissingUnit,

    /// The unit suffix is not one of the recognised units.
    #[error("unknown unit {0:?}")]
    UnknownUnit(String),

    /// The total exceeds the largest representable value (`u64::MAX` nanoseconds).
    #[error("duration overflows")]
    Overflow,
}

/// Parses a duration such as `"1h30m"` or `"250ms"`.
///
/// # Errors
///
/// Returns a [`DurationError`] describing the first problem found.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use flagfile_core::domain::duration::parse_duration;
///
/// assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
/// assert_eq!(parse_duration("1.5ms").unwrap(), Duration::from_micros(1500));
/// ```
pub fn parse_duration(text: &str) -> Result<Duration, DurationError> {
    let mut rest = text;
    if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    } else if rest.starts_with('-') {
        return Err(DurationError::Negative);
    }

    if rest.is_empty() {
        return Err(DurationError::Empty);
    }
    if rest == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, frac, after_number) = split_number(rest)?;
        let unit_len = after_number
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_number.len());
        let (unit, tail) = after_number.split_at(unit_len);
        if unit.is_empty() {
            return Err(DurationError::MissingUnit);
        }
        let scale = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit(unit.to_string()))?;

        let whole_nanos = parse_digits(whole)?
            .checked_mul(scale)
            .ok_or(DurationError::Overflow)?;
        total = total
            .checked_add(whole_nanos)
            .and_then(|t| t.checked_add(fraction_nanos(frac, scale)))
            .ok_or(DurationError::Overflow)?;
        rest = tail;
    }

    if total > u128::from(u64::MAX) {
        return Err(DurationError::Overflow);
    }
    Ok(Duration::from_nanos(total as u64))
}

/// Renders `d` in canonical form: `"0s"`, `"750ns"`, `"1.5µs"`, `"250ms"`,
/// `"42s"`, `"1m30s"`, `"2h0m0.5s"`.
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < NANOS_PER_MICRO {
        return format!("{nanos}ns");
    }
    if nanos < NANOS_PER_MILLI {
        return format!("{}µs", decimal(nanos, NANOS_PER_MICRO, 3));
    }
    if nanos < NANOS_PER_SEC {
        return format!("{}ms", decimal(nanos, NANOS_PER_MILLI, 6));
    }

    let hours = nanos / NANOS_PER_HOUR;
    let minutes = (nanos % NANOS_PER_HOUR) / NANOS_PER_MIN;
    let seconds = decimal(nanos % NANOS_PER_MIN, NANOS_PER_SEC, 9);

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Splits the leading `digits[.digits]` off `text`.
///
/// At least one digit must appear on one side of the dot.
fn split_number(text: &str) -> Result<(&str, &str, &str), DurationError> {
    let whole_len = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let (whole, rest) = text.split_at(whole_len);

    let (frac, rest) = match rest.strip_prefix('.') {
        Some(after_dot) => {
            let frac_len = after_dot
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after_dot.len());
            after_dot.split_at(frac_len)
        }
        None => ("", rest),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(DurationError::MissingNumber);
    }
    Ok((whole, frac, rest))
}

fn parse_digits(digits: &str) -> Result<u128, DurationError> {
    if digits.is_empty() {
        return Ok(0);
    }
    digits.parse::<u128>().map_err(|_| DurationError::Overflow)
}

/// Converts the fractional digits of a component into nanoseconds, truncating
/// anything below one nanosecond.
fn fraction_nanos(frac: &str, scale: u128) -> u128 {
    let digits = &frac[..frac.len().min(MAX_FRACTION_DIGITS)];
    if digits.is_empty() {
        return 0;
    }
    // At most 20 digits, so both the value and the power of ten fit in u128
    // and their product with an hour's worth of nanoseconds does too.
    let value: u128 = digits.parse().unwrap_or(0);
    let divisor = 10u128.pow(digits.len() as u32);
    value * scale / divisor
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "\u{00B5}s" | "\u{03BC}s" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(NANOS_PER_MIN),
        "h" => Some(NANOS_PER_HOUR),
        _ => None,
    }
}

/// Formats `value / unit` with up to `digits` fraction digits, dropping
/// trailing zeros and the dot when the fraction is zero.
fn decimal(value: u128, unit: u128, digits: usize) -> String {
    let whole = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:0digits$}");
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
