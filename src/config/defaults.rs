// src/config/defaults.rs
use crate::config::app::{KdfSettings, LoggingSettings};
use crate::consts::{DEFAULT_PBKDF2_ITERATIONS, SALT_LEN};

pub const DEFAULT_LOG_FILTER: &str = "info";

/// File name looked up in the working directory and in the user config dir
pub const CONFIG_FILE_NAME: &str = "cryptolab.toml";

pub fn default_kdf() -> KdfSettings {
    KdfSettings {
        iterations: DEFAULT_PBKDF2_ITERATIONS,
        salt_len: SALT_LEN,
    }
}

pub fn default_logging() -> LoggingSettings {
    LoggingSettings {
        filter: DEFAULT_LOG_FILTER.into(),
    }
}
