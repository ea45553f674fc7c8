//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/lenses-cli/lenses-cli.toml`
//! 3. Local config: `./.lenses-cli.toml` (working directory)
//! 4. Environment variables: `LENSES_*` prefix
//! 5. Global command-line flags

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use clap::ValueEnum;
use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const MASK: &str = "********";

/// Structured output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

/// Effective settings for one invocation.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Control plane base URL, e.g. `https://lenses.example.com:9991`
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub timeout_secs: u64,
    /// Accept invalid TLS certificates
    pub insecure: bool,
    pub output: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: String::new(),
            token: None,
            user: None,
            password: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            insecure: false,
            output: OutputFormat::default(),
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("host", &self.host)
            .field("token", &self.token.as_ref().map(|_| MASK))
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| MASK))
            .field("timeout_secs", &self.timeout_secs)
            .field("insecure", &self.insecure)
            .field("output", &self.output)
            .finish()
    }
}

/// Partial settings from one layer; `None` means "not specified here".
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RawSettings {
    pub host: Option<String>,
    pub token: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub timeout_secs: Option<u64>,
    pub insecure: Option<bool>,
    pub output: Option<OutputFormat>,
}

/// Get the XDG config directory for lenses-cli.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "lenses-cli").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("lenses-cli.toml"))
}

/// Get the path to the local config file in `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".lenses-cli.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ApplicationError::config(format!("read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| ApplicationError::config(format!("parse {}: {}", path.display(), e)))
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Overlay wins where it specifies a value.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            host: overlay.host.clone().unwrap_or_else(|| self.host.clone()),
            token: overlay.token.clone().or_else(|| self.token.clone()),
            user: overlay.user.clone().or_else(|| self.user.clone()),
            password: overlay.password.clone().or_else(|| self.password.clone()),
            timeout_secs: overlay.timeout_secs.unwrap_or(self.timeout_secs),
            insecure: overlay.insecure.unwrap_or(self.insecure),
            output: overlay.output.unwrap_or(self.output),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Directory searched for `.lenses-cli.toml`, usually the working directory
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        current = current.merge_with(&Self::env_overrides()?);

        Ok(current)
    }

    /// Read `LENSES_*` environment variables.
    fn env_overrides() -> Result<RawSettings, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(Environment::with_prefix("LENSES").separator("__"))
            .build()
            .map_err(config_err)?;

        let mut raw = RawSettings {
            host: config.get_string("host").ok(),
            token: config.get_string("token").ok(),
            user: config.get_string("user").ok(),
            password: config.get_string("password").ok(),
            ..Default::default()
        };
        if let Ok(val) = config.get_string("timeout_secs") {
            raw.timeout_secs = Some(val.parse().map_err(|e| {
                ApplicationError::config(format!("LENSES_TIMEOUT_SECS '{val}': {e}"))
            })?);
        }
        if let Ok(val) = config.get_bool("insecure") {
            raw.insecure = Some(val);
        }
        if let Ok(val) = config.get_string("output") {
            raw.output = Some(
                val.parse()
                    .map_err(|e| ApplicationError::config(format!("LENSES_OUTPUT: {e}")))?,
            );
        }
        Ok(raw)
    }

    /// Show the effective configuration as TOML, secrets masked.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        let masked = Self {
            token: self.token.as_ref().map(|_| MASK.to_string()),
            password: self.password.as_ref().map(|_| MASK.to_string()),
            ..self.clone()
        };
        toml::to_string_pretty(&masked)
            .map_err(|e| ApplicationError::config(format!("serialize config: {e}")))
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# lenses-cli configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/lenses-cli/lenses-cli.toml
#   Local:  ./.lenses-cli.toml
#   Env:    LENSES_* environment variables
#   Flags:  --host, --token, --user, --password, --timeout, --insecure, --output

# Base URL of the control plane
# host = "https://lenses.example.com:9991"

# Session token, sent as X-Kafka-Lenses-Token
# token = "..."

# Credentials exchanged for a token when no token is set
# user = "admin"
# password = "admin"

# Request timeout in seconds
# timeout_secs = 30

# Accept invalid TLS certificates
# insecure = false

# Default output format: table, json or yaml
# output = "table"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::config(e.to_string())
}
