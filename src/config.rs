//! Configuration management for chnroutes.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "/etc/chnroutes/config.yaml";

/// Environment variable overriding the listen address
pub const ENV_BIND: &str = "BIND";
/// Environment variable overriding the registry file path
pub const ENV_REGISTRY: &str = "CHNROUTES_REGISTRY";
/// Environment variable overriding the assets directory
pub const ENV_ASSETS: &str = "CHNROUTES_ASSETS";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Listen address for the HTTP server
    pub bind: String,

    /// Path to the RIR delegated-statistics file
    pub registry: PathBuf,

    /// Directory holding `<platform>/<file>` templates and static assets
    pub assets_dir: PathBuf,

    /// ISO 3166 country code whose ranges are served
    pub country: String,

    /// Reload the registry automatically when the file changes
    pub watch: bool,

    /// Merge adjacent ranges (output switches to address order)
    pub aggregate: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8089".to_string(),
            registry: PathBuf::from("apnic.txt"),
            assets_dir: PathBuf::from("templates"),
            country: "CN".to_string(),
            watch: true,
            aggregate: false,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file, then apply environment overrides.
    ///
    /// A missing file at [`DEFAULT_CONFIG_PATH`] is not an error and yields
    /// the defaults; an explicitly chosen path must exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if !path.exists() && path == Path::new(DEFAULT_CONFIG_PATH) {
            Config::default()
        } else {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            Self::from_yaml(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from YAML text. An empty document yields defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply `BIND`, `CHNROUTES_REGISTRY` and `CHNROUTES_ASSETS` if set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok().filter(|v| !v.is_empty()));
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = lookup(ENV_BIND) {
            self.bind = normalize_bind(&bind);
        }
        if let Some(registry) = lookup(ENV_REGISTRY) {
            self.registry = PathBuf::from(registry);
        }
        if let Some(assets) = lookup(ENV_ASSETS) {
            self.assets_dir = PathBuf::from(assets);
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;

        if self.country.len() != 2 || !self.country.chars().all(|c| c.is_ascii_alphabetic()) {
            anyhow::bail!(
                "Invalid country '{}'. Use a two-letter code like 'CN'",
                self.country
            );
        }

        if self.registry.as_os_str().is_empty() {
            anyhow::bail!("registry path must not be empty");
        }

        if self.assets_dir.as_os_str().is_empty() {
            anyhow::bail!("assets_dir must not be empty");
        }

        Ok(())
    }

    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        normalize_bind(&self.bind)
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", self.bind))
    }
}

/// Accept the `:8089` shorthand for "all interfaces".
fn normalize_bind(bind: &str) -> String {
    if bind.starts_with(':') {
        format!("0.0.0.0{}", bind)
    } else {
        bind.to_string()
    }
}
