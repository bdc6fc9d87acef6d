// src/crypto/kdf.rs
//! PBKDF2-HMAC-SHA256 passphrase → AES-256-CBC key
//!
//! Derived keys are restricted to encrypt/decrypt and, like every
//! [`SymmetricKey`], expose no raw bytes. The salt must be persisted next to
//! whatever the key encrypts: a different salt silently derives a different
//! key and decryption then fails at the padding check.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use tracing::debug;

use crate::aliases::{zeroed_key, ExposeSecret, ExposeSecretMut};
use crate::consts::{KDF_CANCEL_CHECK_INTERVAL, SALT_LEN};
use crate::crypto::rng::random_vec;
use crate::error::{CoreError, Result};
use crate::key_ops::{KeyUsages, SymmetricKey};

type HmacSha256 = Hmac<Sha256>;

/// PRF hash used inside PBKDF2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum HashAlgorithm {
    #[default]
    Sha256,
}

impl HashAlgorithm {
    pub const fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "SHA-256",
        }
    }

    /// Inverse of [`name`](Self::name)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SHA-256" => Some(HashAlgorithm::Sha256),
            _ => None,
        }
    }
}

/// Salt, iteration count and PRF hash for one derivation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationParameters {
    pub salt: Vec<u8>,
    pub iterations: u32,
    pub hash: HashAlgorithm,
}

impl DerivationParameters {
    pub fn new(salt: impl Into<Vec<u8>>, iterations: u32) -> Self {
        Self {
            salt: salt.into(),
            iterations,
            hash: HashAlgorithm::Sha256,
        }
    }

    /// Parameters with a fresh [`SALT_LEN`]-byte salt from the OS CSPRNG
    pub fn generate(iterations: u32) -> Self {
        Self::new(generate_salt(SALT_LEN), iterations)
    }

    fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(CoreError::InvalidParameters(
                "PBKDF2 iterations must be ≥1".into(),
            ));
        }
        if self.salt.is_empty() {
            return Err(CoreError::InvalidParameters("salt must not be empty".into()));
        }
        Ok(())
    }
}

/// Fresh random salt of `len` bytes
pub fn generate_salt(len: usize) -> Vec<u8> {
    random_vec(len)
}

/// Shared flag a caller flips to abandon a running derivation
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Derive a non-exportable encrypt/decrypt key from a passphrase
pub fn derive_key(passphrase: &str, params: &DerivationParameters) -> Result<SymmetricKey> {
    params.validate()?;
    debug!(
        iterations = params.iterations,
        salt_len = params.salt.len(),
        hash = params.hash.name(),
        "pbkdf2 derive"
    );

    let mut out_key = zeroed_key();
    match params.hash {
        HashAlgorithm::Sha256 => pbkdf2_hmac::<Sha256>(
            passphrase.as_bytes(),
            &params.salt,
            params.iterations,
            out_key.expose_secret_mut(),
        ),
    }
    Ok(SymmetricKey::new(out_key, KeyUsages::ENCRYPT_DECRYPT))
}

/// Same as [`derive_key`] but polls `cancel` every
/// [`KDF_CANCEL_CHECK_INTERVAL`] rounds
///
/// A cancelled derivation returns [`CoreError::Cancelled`]; the partial state
/// is zeroized and never handed out.
pub fn derive_key_cancellable(
    passphrase: &str,
    params: &DerivationParameters,
    cancel: &CancellationFlag,
) -> Result<SymmetricKey> {
    params.validate()?;
    debug!(
        iterations = params.iterations,
        salt_len = params.salt.len(),
        hash = params.hash.name(),
        "pbkdf2 derive (cancellable)"
    );

    // dkLen == hLen, so PBKDF2 is a single block: T1 = U1 ^ U2 ^ … ^ Uc
    let prf = HmacSha256::new_from_slice(passphrase.as_bytes())
        .map_err(|e| CoreError::InvalidParameters(format!("HMAC key: {e}")))?;

    let mut u = zeroed_key();
    let mut out_key = zeroed_key();

    let first = prf
        .clone()
        .chain_update(&params.salt)
        .chain_update(1u32.to_be_bytes())
        .finalize()
        .into_bytes();
    u.expose_secret_mut().copy_from_slice(&first);
    out_key.expose_secret_mut().copy_from_slice(&first);

    for round in 1..params.iterations {
        if round % KDF_CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
            debug!(round, "pbkdf2 derive cancelled");
            return Err(CoreError::Cancelled);
        }
        let next = prf
            .clone()
            .chain_update(u.expose_secret())
            .finalize()
            .into_bytes();
        u.expose_secret_mut().copy_from_slice(&next);
        for (acc, byte) in out_key.expose_secret_mut().iter_mut().zip(next.iter()) {
            *acc ^= byte;
        }
    }

    if cancel.is_cancelled() {
        return Err(CoreError::Cancelled);
    }
    Ok(SymmetricKey::new(out_key, KeyUsages::ENCRYPT_DECRYPT))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material_hex(key: &SymmetricKey) -> String {
        hex::encode(key.material())
    }

    // Published PBKDF2-HMAC-SHA256 vectors for "password" / "salt", dkLen = 32
    const VECTORS: &[(u32, &str)] = &[
        (1, "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"),
        (2, "ae4d0c95af6b46d32d0adff928f06dd02a303f8ef3c251dfd6e2d85a95474c43"),
        (4096, "c5e478d59288c841aa530db6845c4c8d962893a001ce4e11a4963873aa98134a"),
    ];

    #[test]
    fn derive_key_matches_known_vectors() {
        for &(iterations, expected) in VECTORS {
            let params = DerivationParameters::new(b"salt".to_vec(), iterations);
            let key = derive_key("password", &params).unwrap();
            assert_eq!(material_hex(&key), expected, "iterations = {iterations}");
        }
    }

    #[test]
    fn cancellable_path_is_bit_identical() {
        let flag = CancellationFlag::new();
        for &(iterations, expected) in VECTORS {
            let params = DerivationParameters::new(b"salt".to_vec(), iterations);
            let key = derive_key_cancellable("password", &params, &flag).unwrap();
            assert_eq!(material_hex(&key), expected, "iterations = {iterations}");
        }

        let params = DerivationParameters::new(b"abc123".to_vec(), 10_000);
        let a = derive_key("correct-horse", &params).unwrap();
        let b = derive_key_cancellable("correct-horse", &params, &flag).unwrap();
        assert_eq!(material_hex(&a), material_hex(&b));
    }

    #[test]
    fn derivation_is_deterministic_and_salt_sensitive() {
        let params = DerivationParameters::new(b"abc123".to_vec(), 1000);
        let a = derive_key("correct-horse", &params).unwrap();
        let b = derive_key("correct-horse", &params).unwrap();
        assert_eq!(material_hex(&a), material_hex(&b));

        let other = DerivationParameters::new(b"abc124".to_vec(), 1000);
        let c = derive_key("correct-horse", &other).unwrap();
        assert_ne!(material_hex(&a), material_hex(&c));
    }

    #[test]
    fn pre_cancelled_flag_yields_no_key() {
        let flag = CancellationFlag::new();
        flag.cancel();
        let params = DerivationParameters::new(b"salt".to_vec(), 100_000);
        assert!(matches!(
            derive_key_cancellable("pw", &params, &flag),
            Err(CoreError::Cancelled)
        ));
    }
}
