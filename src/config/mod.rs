// src/config/mod.rs
//! Configuration system for crypto-labs
//!
//! Central, lazy-loaded global config with TOML + env overrides.
//! Only callers (the CLI) read it; the crypto core takes explicit parameters.

pub use app::{
    config_path, from_toml_str, load, try_load, Config, KdfSettings, LoggingSettings, CONFIG_ENV,
    ITERATIONS_ENV,
};

mod app;
mod defaults;
