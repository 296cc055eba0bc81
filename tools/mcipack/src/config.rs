//! mcipack configuration
//!
//! Layered with figment, lowest to highest priority:
//! 1. Built-in defaults
//! 2. `config/mcipack.{toml,yaml,json}` in the working directory
//! 3. The file passed with `--config`
//! 4. `MCIPACK_` environment variables (`__` separates nested keys,
//!    e.g. `MCIPACK_CODEC__OVERLAP=strict`)

use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use mci_codec::CodecConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Console log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

/// Logging section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// EnvFilter directive (trace, debug, info, warn, error, or per-target)
    pub level: String,
    pub format: LogFormat,
    pub ansi: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            ansi: true,
        }
    }
}

/// Top-level tool configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub codec: CodecConfig,
    pub log: LogSettings,
}

const ENV_PREFIX: &str = "MCIPACK_";

fn base_figment() -> Figment {
    Figment::from(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file("config/mcipack.toml"))
        .merge(Yaml::file("config/mcipack.yaml"))
        .merge(Json::file("config/mcipack.json"))
}

fn file_provider(figment: Figment, path: &Path) -> Result<Figment> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .context("Config file must have an extension")?;

    let figment = match extension {
        "toml" => figment.merge(Toml::file(path)),
        "yaml" | "yml" => figment.merge(Yaml::file(path)),
        "json" => figment.merge(Json::file(path)),
        _ => bail!("Unsupported config file format: {}", extension),
    };
    Ok(figment)
}

/// Load configuration from every layer
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let mut figment = base_figment();

    if let Some(path) = explicit {
        if !path.exists() {
            bail!("Config file not found: {}", path.display());
        }
        figment = file_provider(figment, path)?;
    }

    extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
}

fn extract(figment: Figment) -> Result<AppConfig> {
    let config: AppConfig = figment
        .extract()
        .context("Failed to load configuration")?;
    config
        .codec
        .validate()
        .context("Invalid codec configuration")?;
    Ok(config)
}
