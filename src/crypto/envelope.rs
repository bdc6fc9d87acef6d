// src/crypto/envelope.rs
//! Whole-file encryption in the `IV(16) || ciphertext` envelope format
//!
//! No header, magic number or version field. The file is a single in-memory
//! buffer; there is no chunked streaming.

use tracing::debug;

use crate::crypto::cipher::{decrypt, encrypt, CipherEnvelope};
use crate::error::Result;
use crate::key_ops::SymmetricKey;

/// Encrypt a whole file buffer into an envelope
pub fn encrypt_file(file_bytes: &[u8], key: &SymmetricKey) -> Result<Vec<u8>> {
    let envelope = encrypt(key, file_bytes)?.to_bytes();
    debug!(
        file_len = file_bytes.len(),
        envelope_len = envelope.len(),
        "file encrypted"
    );
    Ok(envelope)
}

/// Decrypt an envelope; anything shorter than the IV header is `MalformedEnvelope`
pub fn decrypt_file(envelope_bytes: &[u8], key: &SymmetricKey) -> Result<Vec<u8>> {
    let envelope = CipherEnvelope::from_bytes(envelope_bytes)?;
    let plaintext = decrypt(key, envelope.iv(), envelope.ciphertext())?;
    debug!(
        envelope_len = envelope_bytes.len(),
        file_len = plaintext.len(),
        "file decrypted"
    );
    Ok(plaintext)
}
