// src/error.rs
//! Public error type for the entire crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid derivation parameters: {0}")]
    InvalidParameters(String),

    /// Wrong key, wrong IV or corrupted ciphertext — deliberately indistinguishable
    #[error("decryption failed")]
    DecryptionFailed,

    #[error("malformed envelope: {len} bytes is shorter than the IV header")]
    MalformedEnvelope { len: usize },

    #[error("operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl From<toml::de::Error> for CoreError {
    fn from(err: toml::de::Error) -> Self {
        CoreError::Config(err.to_string())
    }
}
