//! flagfile demo application.
//!
//! Shows the three configuration layers working together:
//!
//! ```text
//! main()
//!  └─ settings::declare()        -- built-in defaults
//!  └─ settings::load_defaults()  -- ./defaults.conf, if present
//!  └─ ArgParser::parse()         -- command line, with --config-file=PATH
//!  └─ print effective settings as TOML
//! ```
//!
//! # Usage
//!
//! ```text
//! flagfile-app [--config-file=PATH]... [--db-url=URL] [--server-host=HOST]
//!              [--server-port=PORT] [--debug] [--timeout=DURATION]
//! ```
//!
//! `--config-file` may be repeated; files and flags are applied left to right
//! so later values override earlier ones.  Log verbosity follows `RUST_LOG`
//! (default `info`); logs go to stderr, the settings document to stdout.

mod settings;

use std::path::Path;

use anyhow::Context;
use flagfile_core::{ArgError, ArgParser};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use settings::EffectiveSettings;

/// Loaded before the command line when it exists in the working directory.
const DEFAULTS_PATH: &str = "./defaults.conf";

const CONFIG_FILE_OPTION: &str = "config-file";

fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut registry = settings::declare().context("failed to declare settings")?;

    settings::load_defaults(&mut registry, Path::new(DEFAULTS_PATH));

    let parser = ArgParser::new()
        .config_file_option(CONFIG_FILE_OPTION, "Configuration file (may be repeated)");

    let rest = match parser.parse(&mut registry, std::env::args().skip(1)) {
        Ok(rest) => rest,
        Err(ArgError::HelpRequested) => {
            eprint!("Usage of flagfile-app:\n{}", parser.usage(&registry));
            return Ok(());
        }
        Err(e) => return Err(e).context("invalid command line"),
    };
    if !rest.is_empty() {
        warn!("ignoring positional arguments: {rest:?}");
    }

    let effective = EffectiveSettings::from_registry(&registry)?;
    info!(
        "server {}:{} (database {}, debug {})",
        effective.server_host, effective.server_port, effective.db_url, effective.debug
    );

    let document =
        toml::to_string_pretty(&effective).context("failed to render effective settings")?;
    print!("{document}");
    Ok(())
}
