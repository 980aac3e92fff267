//! Command-line parsing against a [`FlagRegistry`].
//!
//! Arguments are assigned through the same [`SettingRegistry::set`] call the
//! config-file loader uses, so a setting behaves identically whether it comes
//! from a file or from the command line.
//!
//! # Syntax
//!
//! ```text
//! -name            bool flags only: sets the flag to true
//! --name           same, two dashes are equivalent to one
//! -name=value      any flag
//! -name value      non-bool flags only
//! --               ends flag parsing (consumed)
//! ```
//!
//! Parsing stops at the first argument that is not a flag (or a lone `-`);
//! that argument and everything after it are returned as positional
//! arguments.
//!
//! # Config file options
//!
//! [`ArgParser::config_file_option`] declares an option such as
//! `--config-file=PATH`.  Each occurrence loads the file at that point in the
//! argument list, so later arguments override the file and earlier ones are
//! overridden by it:
//!
//! ```text
//! myapp --config-file=/etc/myapp/global.conf --config-file=./local.conf --debug
//! ```

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::domain::registry::{write_flag_usage, FlagRegistry, SetError, SettingRegistry};
use crate::domain::value::{FlagKind, FlagValue};
use crate::loader::{self, LoadError};

/// Errors raised while parsing command-line arguments.
#[derive(Debug, Error)]
pub enum ArgError {
    /// `-h`, `-help` or `--help` was given and no such flag is declared.
    #[error("help requested")]
    HelpRequested,

    /// The argument starts with a dash but is not a well-formed flag
    /// (e.g. `---x` or `-=x`).
    #[error("bad flag syntax: {0}")]
    BadSyntax(String),

    /// No flag or config option with this name exists.
    #[error("flag provided but not defined: -{0}")]
    UnknownFlag(String),

    /// A non-bool flag or a config option was last in the list without a value.
    #[error("flag needs an argument: -{0}")]
    MissingValue(String),

    /// The registry rejected the value.
    #[error(transparent)]
    InvalidValue(#[from] SetError),

    /// A config file named on the command line failed to load.
    #[error(transparent)]
    ConfigFile(#[from] LoadError),
}

/// A repeatable option whose value is a config file path.
#[derive(Debug, Clone)]
struct ConfigOption {
    name: String,
    usage: String,
}

/// Parses command-line arguments into a [`FlagRegistry`].
///
/// # Example
///
/// ```rust
/// use flagfile_core::{ArgParser, FlagRegistry};
///
/// let mut registry = FlagRegistry::new();
/// registry.int("server-port", 8080, "Server port").unwrap();
/// registry.bool("debug", false, "Enable debug mode").unwrap();
///
/// let parser = ArgParser::new().config_file_option("config-file", "Configuration file");
/// let rest = parser
///     .parse(&mut registry, ["--server-port", "9090", "-debug", "serve"])
///     .unwrap();
///
/// assert_eq!(registry.get_int("server-port"), Some(9090));
/// assert_eq!(registry.get_bool("debug"), Some(true));
/// assert_eq!(rest, ["serve"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArgParser {
    config_options: Vec<ConfigOption>,
}

impl ArgParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `name` as a config file option.  Its value is a path that is
    /// loaded into the registry as soon as the option is parsed.
    pub fn config_file_option(mut self, name: &str, usage: &str) -> Self {
        self.config_options.push(ConfigOption {
            name: name.to_string(),
            usage: usage.to_string(),
        });
        self
    }

    /// Parses `args` (without the program name) into `registry`.
    ///
    /// Returns the positional arguments left after the flags.
    ///
    /// # Errors
    ///
    /// Returns the first [`ArgError`] encountered.  Flags and config files
    /// processed before the failing argument remain applied.
    pub fn parse<I, S>(&self, registry: &mut FlagRegistry, args: I) -> Result<Vec<String>, ArgError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::<String>::into);

        while let Some(arg) = args.next() {
            if arg == "--" {
                break;
            }
            if arg.len() < 2 || !arg.starts_with('-') {
                // First positional argument: keep it and everything after it.
                let mut rest = vec![arg];
                rest.extend(args);
                return Ok(rest);
            }

            let (name, inline_value) = split_flag(&arg)?;

            if let Some(option) = self.config_option(name) {
                let path = match inline_value {
                    Some(value) => value.to_string(),
                    None => args
                        .next()
                        .ok_or_else(|| ArgError::MissingValue(option.name.clone()))?,
                };
                debug!("loading config file {path} (from -{name})");
                loader::load(registry, &path)?;
                continue;
            }

            let is_bool = match registry.lookup(name) {
                Some(flag) => flag.is_bool(),
                None if name == "h" || name == "help" => return Err(ArgError::HelpRequested),
                None => return Err(ArgError::UnknownFlag(name.to_string())),
            };

            let value = match (inline_value, is_bool) {
                (Some(value), _) => value.to_string(),
                (None, true) => "true".to_string(),
                (None, false) => args
                    .next()
                    .ok_or_else(|| ArgError::MissingValue(name.to_string()))?,
            };
            registry.set(name, &value)?;
        }

        Ok(args.collect())
    }

    /// Renders usage text: config options first, then every declared flag.
    pub fn usage(&self, registry: &FlagRegistry) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_usage(registry, &mut out);
        out
    }

    fn write_usage<W: fmt::Write>(&self, registry: &FlagRegistry, out: &mut W) -> fmt::Result {
        for option in &self.config_options {
            // Rendered as a string-valued option with no default.
            write_flag_usage(
                out,
                &option.name,
                FlagKind::String,
                &option.usage,
                &FlagValue::Str(String::new()),
            )?;
        }
        registry.write_usage(out)
    }

    fn config_option(&self, name: &str) -> Option<&ConfigOption> {
        self.config_options.iter().find(|o| o.name == name)
    }
}

/// Splits `-name`, `--name`, `-name=value` into name and optional value.
fn split_flag(arg: &str) -> Result<(&str, Option<&str>), ArgError> {
    let body = arg
        .strip_prefix("--")
        .or_else(|| arg.strip_prefix('-'))
        .unwrap_or(arg);

    if body.is_empty() || body.starts_with('-') || body.starts_with('=') {
        return Err(ArgError::BadSyntax(arg.to_string()));
    }

    Ok(match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
