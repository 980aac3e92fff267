//! Flag registry: the set of named, typed settings a program exposes.
//!
//! A program declares each flag once (name, default, usage text) and then
//! populates the registry from layered sources: config files via
//! [`crate::loader::load`] and command-line arguments via
//! [`crate::args::ArgParser`].  Both sources assign through the same
//! [`SettingRegistry::set`] operation, so a value that is valid on the command
//! line is valid in a config file and vice versa.
//!
//! # Ownership
//!
//! The registry is a plain value owned by the caller and passed by `&mut`
//! wherever it is populated.  There is no process-wide instance; each test can
//! build its own registry without interfering with others.
//!
//! # Ordering
//!
//! Flags are kept in a `BTreeMap`, so [`FlagRegistry::iter`] and the usage
//! output list flags in lexical name order regardless of declaration order.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::domain::value::{FlagKind, FlagValue, ValueError};

/// Errors raised while assigning a value to a flag.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SetError {
    /// No flag with this name has been declared.
    #[error("flag provided but not defined: {0:?}")]
    UnknownFlag(String),

    /// The text is not a valid value for the flag's kind.
    #[error("invalid value {value:?} for flag {name:?}: {source}")]
    InvalidValue {
        name: String,
        value: String,
        #[source]
        source: ValueError,
    },
}

/// Errors raised while declaring flags.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A flag with this name already exists.
    #[error("flag redefined: {0:?}")]
    DuplicateFlag(String),

    /// The name is empty, starts with `-`, or contains `=`.
    #[error("invalid flag name {0:?}")]
    InvalidName(String),
}

/// Anything that can assign a flag from its text form.
///
/// This is the only capability the config-file loader needs, which keeps the
/// loader testable against a mock registry.
#[cfg_attr(test, mockall::automock)]
pub trait SettingRegistry {
    /// Looks up the flag `name`, converts `value` to its kind and stores it.
    ///
    /// # Errors
    ///
    /// Returns [`SetError::UnknownFlag`] if no flag is named `name`, or
    /// [`SetError::InvalidValue`] if `value` does not parse.
    fn set(&mut self, name: &str, value: &str) -> Result<(), SetError>;
}

/// A single declared flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Flag {
    name: String,
    usage: String,
    default: FlagValue,
    value: FlagValue,
    set: bool,
}

impl Flag {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn kind(&self) -> FlagKind {
        self.default.kind()
    }

    /// The value the flag was declared with.
    pub fn default_value(&self) -> &FlagValue {
        &self.default
    }

    /// The current value (the default until the flag is assigned).
    pub fn value(&self) -> &FlagValue {
        &self.value
    }

    /// `true` once the flag has been assigned from any source.
    pub fn is_set(&self) -> bool {
        self.set
    }

    /// Bool flags may appear on the command line without a value.
    pub fn is_bool(&self) -> bool {
        self.kind() == FlagKind::Bool
    }
}

/// The set of all declared flags, keyed by name.
#[derive(Debug, Default, Clone)]
pub struct FlagRegistry {
    flags: BTreeMap<String, Flag>,
}

impl FlagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Declaration ───────────────────────────────────────────────────────────

    /// Declares a flag whose kind is taken from `default`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidName`] for an empty name, a name
    /// starting with `-`, or a name containing `=`; returns
    /// [`RegistryError::DuplicateFlag`] if the name is already declared.
    pub fn define(
        &mut self,
        name: &str,
        default: FlagValue,
        usage: &str,
    ) -> Result<(), RegistryError> {
        if name.is_empty() || name.starts_with('-') || name.contains('=') {
            return Err(RegistryError::InvalidName(name.to_string()));
        }
        if self.flags.contains_key(name) {
            return Err(RegistryError::DuplicateFlag(name.to_string()));
        }

        self.flags.insert(
            name.to_string(),
            Flag {
                name: name.to_string(),
                usage: usage.to_string(),
                value: default.clone(),
                default,
                set: false,
            },
        );
        Ok(())
    }

    pub fn string(&mut self, name: &str, default: &str, usage: &str) -> Result<(), RegistryError> {
        self.define(name, FlagValue::Str(default.to_string()), usage)
    }

    pub fn int(&mut self, name: &str, default: i64, usage: &str) -> Result<(), RegistryError> {
        self.define(name, FlagValue::Int(default), usage)
    }

    pub fn uint(&mut self, name: &str, default: u64, usage: &str) -> Result<(), RegistryError> {
        self.define(name, FlagValue::Uint(default), usage)
    }

    pub fn float(&mut self, name: &str, default: f64, usage: &str) -> Result<(), RegistryError> {
        self.define(name, FlagValue::Float(default), usage)
    }

    pub fn bool(&mut self, name: &str, default: bool, usage: &str) -> Result<(), RegistryError> {
        self.define(name, FlagValue::Bool(default), usage)
    }

    pub fn duration(
        &mut self,
        name: &str,
        default: Duration,
        usage: &str,
    ) -> Result<(), RegistryError> {
        self.define(name, FlagValue::Duration(default), usage)
    }

    // ── Lookup ────────────────────────────────────────────────────────────────

    pub fn lookup(&self, name: &str) -> Option<&Flag> {
        self.flags.get(name)
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(Flag::is_set)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.lookup(name)?.value() {
            FlagValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.lookup(name)?.value() {
            FlagValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_uint(&self, name: &str) -> Option<u64> {
        match self.lookup(name)?.value() {
            FlagValue::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        match self.lookup(name)?.value() {
            FlagValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.lookup(name)?.value() {
            FlagValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_duration(&self, name: &str) -> Option<Duration> {
        match self.lookup(name)?.value() {
            FlagValue::Duration(d) => Some(*d),
            _ => None,
        }
    }

    /// All declared flags in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.flags.values()
    }

    /// Only the flags that have been assigned, in name order.
    pub fn iter_set(&self) -> impl Iterator<Item = &Flag> {
        self.flags.values().filter(|f| f.is_set())
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    // ── Usage ─────────────────────────────────────────────────────────────────

    /// Writes one usage block per flag, in name order:
    ///
    /// ```text
    ///   -server-port int
    ///     	Server port (default 8080)
    ///   -debug
    ///     	Enable debug mode
    /// ```
    ///
    /// Bool flags omit the kind because they take no argument on the command
    /// line.  The default is shown unless it is the kind's zero value; string
    /// defaults are quoted.
    pub fn write_usage<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        for flag in self.iter() {
            write_flag_usage(out, flag.name(), flag.kind(), flag.usage(), flag.default_value())?;
        }
        Ok(())
    }
}

impl SettingRegistry for FlagRegistry {
    fn set(&mut self, name: &str, value: &str) -> Result<(), SetError> {
        let flag = self
            .flags
            .get_mut(name)
            .ok_or_else(|| SetError::UnknownFlag(name.to_string()))?;

        let parsed = FlagValue::parse(flag.kind(), value).map_err(|source| {
            SetError::InvalidValue {
                name: name.to_string(),
                value: value.to_string(),
                source,
            }
        })?;

        flag.value = parsed;
        flag.set = true;
        Ok(())
    }
}

/// Formats a single usage block.  Shared with the argument parser so config
/// options render the same way as flags.
pub(crate) fn write_flag_usage<W: fmt::Write>(
    out: &mut W,
    name: &str,
    kind: FlagKind,
    usage: &str,
    default: &FlagValue,
) -> fmt::Result {
    write!(out, "  -{name}")?;
    if kind != FlagKind::Bool {
        write!(out, " {kind}")?;
    }
    write!(out, "\n    \t{usage}")?;
    if !default.is_zero() {
        match default {
            FlagValue::Str(s) => write!(out, " (default {s:?})")?,
            other => write!(out, " (default {other})")?,
        }
    }
    writeln!(out)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
