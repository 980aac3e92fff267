//! # flagfile-core
//!
//! Typed program settings ("flags") that can be populated from config files
//! with exactly the same semantics as command-line arguments.
//!
//! A program declares its flags once, in a [`FlagRegistry`], and then layers
//! its sources on top of the built-in defaults:
//!
//! ```text
//! defaults  ->  config file(s)  ->  command line
//! ```
//!
//! Each layer assigns values one at a time through
//! [`SettingRegistry::set`], so a later layer overrides only the settings it
//! mentions.
//!
//! # Modules
//!
//! - **`domain`** – Flag value kinds (string, int, uint, float, bool,
//!   duration), their text parsers, and the registry itself.  No I/O.
//!
//! - **`loader`** – Streams a `name = value` config file into a registry,
//!   stopping at the first error.
//!
//! - **`args`** – Parses command-line arguments into the same registry and
//!   supports a repeatable `--config-file=PATH` option that invokes the
//!   loader mid-parse.
//!
//! # Example
//!
//! ```rust,no_run
//! use flagfile_core::{ArgParser, FlagRegistry};
//!
//! let mut registry = FlagRegistry::new();
//! registry.string("db-url", "localhost:5432", "Database URL").unwrap();
//! registry.int("server-port", 8080, "Server port").unwrap();
//! registry.bool("debug", false, "Enable debug mode").unwrap();
//!
//! // myapp --config-file=/etc/myapp/global.conf --config-file=./local.conf
//! let parser = ArgParser::new().config_file_option("config-file", "Configuration file");
//! parser.parse(&mut registry, std::env::args().skip(1)).unwrap();
//! ```

pub mod args;
pub mod domain;
pub mod loader;

pub use args::{ArgError, ArgParser};
pub use domain::registry::{Flag, FlagRegistry, RegistryError, SetError, SettingRegistry};
pub use domain::value::{FlagKind, FlagValue, ValueError};
pub use loader::{load, load_reader, LoadError};
