//! Settings declared by the demo application and their effective values.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use flagfile_core::domain::duration::format_duration;
use flagfile_core::{load, FlagRegistry, RegistryError};
use serde::Serialize;
use tracing::{debug, info, warn};

pub const DB_URL: &str = "db-url";
pub const SERVER_HOST: &str = "server-host";
pub const SERVER_PORT: &str = "server-port";
pub const DEBUG: &str = "debug";
pub const TIMEOUT: &str = "timeout";

/// Declares every setting with its built-in default.
///
/// # Errors
///
/// Only fails if two declarations collide, which is a programming error.
pub fn declare() -> Result<FlagRegistry, RegistryError> {
    let mut registry = FlagRegistry::new();
    registry.string(DB_URL, "localhost:5432", "Database URL")?;
    registry.string(SERVER_HOST, "localhost", "Server host")?;
    registry.int(SERVER_PORT, 8080, "Server port")?;
    registry.bool(DEBUG, false, "Enable debug mode")?;
    registry.duration(TIMEOUT, Duration::from_secs(30), "Request timeout")?;
    Ok(registry)
}

/// Loads the defaults file at `path` if it exists.
///
/// A broken defaults file is reported and skipped so the command line can
/// still fix things up.
pub fn load_defaults(registry: &mut FlagRegistry, path: &Path) {
    if !path.exists() {
        debug!("no defaults file at {}", path.display());
        return;
    }
    match load(registry, path) {
        Ok(()) => info!("loaded defaults from {}", path.display()),
        Err(e) => warn!("error loading default config: {e}"),
    }
}

/// The final value of every setting after all layers were applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EffectiveSettings {
    pub db_url: String,
    pub server_host: String,
    pub server_port: i64,
    pub debug: bool,
    /// Canonical duration text, e.g. `"1m30s"`.
    pub timeout: String,
    /// Settings assigned by a config file or the command line.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overridden: Vec<String>,
}

impl EffectiveSettings {
    /// Reads every declared setting back out of `registry`.
    ///
    /// # Errors
    ///
    /// Fails if a setting is missing or has an unexpected kind.
    pub fn from_registry(registry: &FlagRegistry) -> anyhow::Result<Self> {
        Ok(Self {
            db_url: registry
                .get_str(DB_URL)
                .with_context(|| format!("string setting {DB_URL} missing"))?
                .to_string(),
            server_host: registry
                .get_str(SERVER_HOST)
                .with_context(|| format!("string setting {SERVER_HOST} missing"))?
                .to_string(),
            server_port: registry
                .get_int(SERVER_PORT)
                .with_context(|| format!("int setting {SERVER_PORT} missing"))?,
            debug: registry
                .get_bool(DEBUG)
                .with_context(|| format!("bool setting {DEBUG} missing"))?,
            timeout: registry
                .get_duration(TIMEOUT)
                .map(format_duration)
                .with_context(|| format!("duration setting {TIMEOUT} missing"))?,
            overridden: registry
                .iter_set()
                .map(|flag| flag.name().to_string())
                .collect(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
