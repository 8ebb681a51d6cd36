// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Layers, lowest priority first: built-in defaults, `config.toml` in the
//! platform config directory (or the `--config` path), then `SHOTLOG_*`
//! environment variables with `__` between nested keys
//! (`SHOTLOG_GATEWAY__URL`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "SHOTLOG";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG` is unset
    pub log_level: String,
    /// Where shots and storyboards are stored
    pub gateway: GatewayConfig,
}

/// Connection settings for the hosted shot table and storyboard bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`
    #[serde(default)]
    pub url: Option<String>,
    /// API key sent as `apikey` and bearer token
    #[serde(default)]
    pub api_key: Option<String>,
    /// Table that holds one row per shot
    pub table: String,
    /// Storage bucket for storyboard images
    pub bucket: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            table: "film_shots".to_string(),
            bucket: "storyboards".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Copy with secrets masked, for display
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut shown = self.clone();
        if shown.gateway.api_key.is_some() {
            shown.gateway.api_key = Some("********".to_string());
        }
        shown
    }

    /// Look up a single dotted key (`gateway.table`) for `shotlog config`
    pub fn get(&self, key: &str) -> Option<String> {
        let value = toml::Value::try_from(self.redacted()).ok()?;
        let mut current = &value;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(match current {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// Default location of `config.toml`
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "shotlog", "shotlog")
        .map(|d| d.config_dir().join("config.toml"))
}

/// Log file used while the TUI owns the terminal
#[must_use]
pub fn log_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "shotlog", "shotlog")
        .map(|d| d.data_local_dir().join("shotlog.log"))
}

/// Load configuration from defaults, an optional file, and the environment.
///
/// An explicit `path` must exist; the default location is optional.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let defaults = Config::default();
    let mut builder = config::Config::builder()
        .set_default("log_level", defaults.log_level)?
        .set_default("gateway.table", defaults.gateway.table)?
        .set_default("gateway.bucket", defaults.gateway.bucket)?
        .set_default("gateway.timeout_secs", defaults.gateway.timeout_secs)?;

    match path {
        Some(p) => {
            builder = builder.add_source(config::File::from(p).required(true));
        }
        None => {
            if let Some(p) = default_path() {
                builder = builder.add_source(config::File::from(p).required(false));
            }
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__"),
    );

    let settings = builder.build().context("Failed to read configuration")?;
    let config: Config = settings
        .try_deserialize()
        .context("Invalid configuration")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
log_level = "debug"

[gateway]
url = "https://example.supabase.co"
api_key = "secret"
table = "shots_2025"
"#
        )
        .unwrap();

        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.gateway.url.as_deref(), Some("https://example.supabase.co"));
        assert_eq!(config.gateway.table, "shots_2025");
        assert_eq!(config.gateway.bucket, "storyboards");
        assert_eq!(config.gateway.timeout_secs, 30);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_get_dotted_key_and_redaction() {
        let mut config = Config::default();
        config.gateway.api_key = Some("secret".into());
        assert_eq!(config.get("gateway.table").as_deref(), Some("film_shots"));
        assert_eq!(config.get("gateway.timeout_secs").as_deref(), Some("30"));
        assert_eq!(config.get("gateway.api_key").as_deref(), Some("********"));
        assert_eq!(config.get("gateway.nope"), None);
    }
}
