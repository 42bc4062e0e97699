// SPDX-License-Identifier: MIT
// Adapter configuration.
//
// Priority (highest to lowest):
//   1. CLI / env — passed as `Some(value)` from clap
//   2. TOML file at `{config_dir}/config.toml`
//   3. Built-in defaults

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::error;

const DEFAULT_LOG: &str = "info";

// ─── TOML config file ─────────────────────────────────────────────────────────

/// `{config_dir}/config.toml` — all fields are optional overrides.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// Explicit path to the gocode binary (default: search $PATH).
    gocode_binary: Option<PathBuf>,
    /// Append `.` to inserted package names (default: false).
    package_dot: Option<bool>,
    /// Ordered class priority for candidate grouping (default: none).
    sort_class: Option<Vec<String>>,
    /// Serve eligible requests from the package cache (default: false).
    use_cache: Option<bool>,
    /// Directory holding the indexer's package dumps (default: data dir).
    cache_dir: Option<PathBuf>,
    /// Log level filter string, e.g. "debug", "info,gocoda=trace" (default: "info").
    log: Option<String>,
    /// Verbose per-request logging (default: false).
    debug: Option<bool>,
}

fn load_toml(config_dir: &Path) -> Option<TomlConfig> {
    let path = config_dir.join("config.toml");
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse config.toml — using defaults");
            None
        }
    }
}

// ─── AdapterConfig ────────────────────────────────────────────────────────────

/// Adapter configuration, captured once at construction.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Explicit gocode path (GOCODA_GOCODE_BINARY env var).
    /// None = search $PATH at request time.
    pub gocode_binary: Option<PathBuf>,
    /// Append `.` to the inserted word for package candidates, so accepting
    /// `fmt` leaves the cursor ready for the member name.
    pub package_dot: bool,
    /// Class priority for candidate ordering; empty = keep gocode's order.
    /// Recognised classes: package, func, type, var, const.
    pub sort_class: Vec<String>,
    /// Serve package-qualifier requests from the on-disk cache when possible.
    pub use_cache: bool,
    /// Directory holding the external indexer's `<qualifier>json` dumps.
    pub cache_dir: PathBuf,
    /// Log level filter string (GOCODA_LOG env var).
    pub log: String,
    /// Verbose per-request logging.
    pub debug: bool,
}

impl AdapterConfig {
    /// Build config from CLI/env args + optional TOML file.
    pub fn new(
        gocode_binary: Option<PathBuf>,
        cache_dir: Option<PathBuf>,
        use_cache: Option<bool>,
        package_dot: Option<bool>,
        sort_class: Option<Vec<String>>,
        log: Option<String>,
        debug: Option<bool>,
    ) -> Self {
        let toml = load_toml(&default_config_dir()).unwrap_or_default();

        let gocode_binary = gocode_binary.or(toml.gocode_binary);
        let package_dot = package_dot.or(toml.package_dot).unwrap_or(false);
        let sort_class = sort_class.or(toml.sort_class).unwrap_or_default();
        let use_cache = use_cache.or(toml.use_cache).unwrap_or(false);
        let cache_dir = cache_dir
            .or(toml.cache_dir)
            .unwrap_or_else(default_cache_dir);
        let log = log
            .or(toml.log)
            .unwrap_or_else(|| DEFAULT_LOG.to_string());
        let debug = debug.or(toml.debug).unwrap_or(false);

        Self {
            gocode_binary,
            package_dot,
            sort_class,
            use_cache,
            cache_dir,
            log,
            debug,
        }
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            gocode_binary: None,
            package_dot: false,
            sort_class: Vec::new(),
            use_cache: false,
            cache_dir: default_cache_dir(),
            log: DEFAULT_LOG.to_string(),
            debug: false,
        }
    }
}

fn default_config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("gocoda");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config").join("gocoda");
    }
    PathBuf::from(".gocoda")
}

fn default_cache_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        return PathBuf::from(xdg).join("gocoda");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".cache").join("gocoda");
    }
    PathBuf::from(".gocoda")
}
