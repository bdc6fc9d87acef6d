// tests/common.rs
//! Shared test utilities — logging setup and a shared RSA key pair

use std::sync::OnceLock;

use crypto_labs::{generate_key_pair, import_key, GeneratedKeyPair, KeyUsages, SymmetricKey};

#[cfg(feature = "logging")]
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize test-friendly logging
/// Call once at the start of any test that needs logs
#[allow(dead_code)]
pub fn setup() {
    #[cfg(feature = "logging")]
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer()) // works in `cargo test`
        .with(EnvFilter::from_default_env()) // respects RUST_LOG=
        .try_init()
        .ok(); // idempotent — safe to call multiple times

    #[cfg(not(feature = "logging"))]
    { /* no-op */ }
}

/// RSA-2048 generation is slow; every test in a binary shares one pair
#[allow(dead_code)]
pub fn key_pair() -> &'static GeneratedKeyPair {
    static KEY_PAIR: OnceLock<GeneratedKeyPair> = OnceLock::new();
    KEY_PAIR.get_or_init(|| generate_key_pair().expect("RSA key generation"))
}

/// Deterministic encrypt/decrypt key built from a repeated byte
#[allow(dead_code)]
pub fn fixed_key(byte: u8) -> SymmetricKey {
    import_key(&hex::encode([byte; 32]), KeyUsages::ENCRYPT_DECRYPT).expect("valid key")
}
