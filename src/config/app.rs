// src/config/app.rs
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::defaults::*;
use crate::crypto::kdf::{generate_salt, DerivationParameters};
use crate::error::{CoreError, Result};

/// Path of an explicit config file
pub const CONFIG_ENV: &str = "CRYPTOLAB_CONFIG";

/// Overrides `[kdf] iterations`
pub const ITERATIONS_ENV: &str = "CRYPTOLAB_KDF_ITERATIONS";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub kdf: KdfSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfSettings {
    pub iterations: u32,
    pub salt_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub filter: String,
}

impl Default for KdfSettings {
    fn default() -> Self {
        default_kdf()
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        default_logging()
    }
}

impl KdfSettings {
    /// Parameters for a new artifact: fresh salt, configured iterations
    pub fn fresh_parameters(&self) -> DerivationParameters {
        DerivationParameters::new(generate_salt(self.salt_len), self.iterations)
    }
}

impl Config {
    fn validate(&self) -> Result<()> {
        if self.kdf.iterations == 0 {
            return Err(CoreError::Config("kdf.iterations must be ≥1".into()));
        }
        if self.kdf.salt_len == 0 {
            return Err(CoreError::Config("kdf.salt_len must be ≥1".into()));
        }
        Ok(())
    }
}

/// Parse and validate a TOML document; missing keys take their defaults
pub fn from_toml_str(content: &str) -> Result<Config> {
    let conf: Config = toml::from_str(content)?;
    conf.validate()?;
    Ok(conf)
}

/// `$CRYPTOLAB_CONFIG`, then `./cryptolab.toml`, then the user config dir
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    let local = Path::new(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local.to_path_buf());
    }
    dirs::config_dir()
        .map(|dir| dir.join("cryptolab").join("config.toml"))
        .filter(|path| path.exists())
}

/// Load config without caching; errors are reported, not papered over
pub fn try_load() -> Result<Config> {
    let mut conf = match config_path() {
        Some(path) => from_toml_str(&std::fs::read_to_string(&path)?)?,
        None => Config::default(),
    };

    if let Ok(value) = std::env::var(ITERATIONS_ENV) {
        conf.kdf.iterations = value
            .trim()
            .parse()
            .map_err(|e| CoreError::Config(format!("{ITERATIONS_ENV}={value}: {e}")))?;
    }

    conf.validate()?;
    Ok(conf)
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Global config — loaded once, falls back to defaults if loading fails
pub fn load() -> &'static Config {
    CONFIG.get_or_init(|| {
        try_load().unwrap_or_else(|err| {
            warn!(error = %err, "config not loaded — using built-in defaults");
            Config::default()
        })
    })
}
