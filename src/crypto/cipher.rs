// src/crypto/cipher.rs
//! AES-256-CBC with PKCS#7 padding and a fresh random IV per encryption
//!
//! CBC chaining is done block by block on top of the `aes` block cipher.
//! Any decryption failure (bad length, bad padding) collapses into
//! [`CoreError::DecryptionFailed`] so callers cannot tell the cases apart.

use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes256Dec, Aes256Enc, Block as AesBlock};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

use crate::aliases::{zeroed_key, ExposeSecret, ExposeSecretMut};
use crate::codec::{base64_to_bytes, bytes_to_base64, bytes_to_hex, bytes_to_text, hex_to_bytes};
use crate::consts::{AES_KEY_LEN, IV_LEN};
use crate::crypto::rng::{fill_random, random_array};
use crate::error::{CoreError, Result};
use crate::key_ops::{KeyUsage, KeyUsages, SymmetricKey};

/// 16-byte CBC initialization vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitializationVector([u8; IV_LEN]);

impl InitializationVector {
    /// Fresh IV from the OS CSPRNG
    pub fn generate() -> Self {
        Self(random_array())
    }

    pub const fn from_bytes(bytes: [u8; IV_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; IV_LEN] = bytes.try_into().map_err(|_| {
            CoreError::InvalidEncoding(format!(
                "IV must be {IV_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self> {
        Self::from_slice(&hex_to_bytes(hex_str)?)
    }

    pub fn as_bytes(&self) -> &[u8; IV_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        bytes_to_hex(&self.0)
    }
}

/// IV plus ciphertext, as produced by [`encrypt`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherEnvelope {
    iv: InitializationVector,
    ciphertext: Vec<u8>,
}

impl CipherEnvelope {
    pub fn new(iv: InitializationVector, ciphertext: Vec<u8>) -> Self {
        Self { iv, ciphertext }
    }

    pub fn iv(&self) -> &InitializationVector {
        &self.iv
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    pub fn into_parts(self) -> (InitializationVector, Vec<u8>) {
        (self.iv, self.ciphertext)
    }

    /// Concatenated `IV || ciphertext` form
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(IV_LEN + self.ciphertext.len());
        out.extend_from_slice(self.iv.as_bytes());
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Split `IV || ciphertext`; anything shorter than the IV is malformed
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < IV_LEN {
            return Err(CoreError::MalformedEnvelope { len: bytes.len() });
        }
        let (iv, ciphertext) = bytes.split_at(IV_LEN);
        Ok(Self {
            iv: InitializationVector::from_slice(iv)?,
            ciphertext: ciphertext.to_vec(),
        })
    }

    /// Text form: IV as hex, ciphertext as base64
    pub fn encode(&self) -> EncodedEnvelope {
        EncodedEnvelope {
            iv_hex: self.iv.to_hex(),
            ciphertext_base64: bytes_to_base64(&self.ciphertext),
        }
    }
}

/// Text form of a [`CipherEnvelope`] for display and copy/paste
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedEnvelope {
    pub iv_hex: String,
    pub ciphertext_base64: String,
}

impl EncodedEnvelope {
    pub fn decode(&self) -> Result<CipherEnvelope> {
        Ok(CipherEnvelope {
            iv: InitializationVector::from_hex(&self.iv_hex)?,
            ciphertext: base64_to_bytes(&self.ciphertext_base64)?,
        })
    }
}

/// Generate a fresh AES-256-CBC key usable for encrypt and decrypt
///
/// Returns the handle plus its raw bytes hex-encoded. That hex string is the
/// only export of the key material that will ever exist.
pub fn generate_key() -> (SymmetricKey, String) {
    let mut material = zeroed_key();
    fill_random(material.expose_secret_mut());
    let hex = bytes_to_hex(material.expose_secret());
    let key = SymmetricKey::new(material, KeyUsages::ENCRYPT_DECRYPT);
    debug!(usages = %key.usages(), "generated AES-256-CBC key");
    (key, hex)
}

/// Import raw key bytes given as hex
pub fn import_key(hex_key: &str, usages: KeyUsages) -> Result<SymmetricKey> {
    let bytes = Zeroizing::new(
        hex_to_bytes(hex_key).map_err(|e| CoreError::InvalidKey(e.to_string()))?,
    );
    if bytes.len() != AES_KEY_LEN {
        return Err(CoreError::InvalidKey(format!(
            "AES-256 key must be {AES_KEY_LEN} bytes, got {}",
            bytes.len()
        )));
    }
    let mut material = zeroed_key();
    material.expose_secret_mut().copy_from_slice(&bytes);
    debug!(%usages, "imported AES-256-CBC key");
    Ok(SymmetricKey::new(material, usages))
}

/// Encrypt under a fresh random IV
pub fn encrypt(key: &SymmetricKey, plaintext: &[u8]) -> Result<CipherEnvelope> {
    key.usages().require(KeyUsage::Encrypt)?;
    let iv = InitializationVector::generate();
    let ciphertext = cbc_encrypt(key.material(), &iv, plaintext);
    debug!(
        plaintext_len = plaintext.len(),
        ciphertext_len = ciphertext.len(),
        "aes-cbc encrypt"
    );
    Ok(CipherEnvelope { iv, ciphertext })
}

/// Decrypt; wrong key, wrong IV and corrupted ciphertext all yield `DecryptionFailed`
pub fn decrypt(
    key: &SymmetricKey,
    iv: &InitializationVector,
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    key.usages().require(KeyUsage::Decrypt)?;
    let plaintext = cbc_decrypt(key.material(), iv, ciphertext)?;
    debug!(
        ciphertext_len = ciphertext.len(),
        plaintext_len = plaintext.len(),
        "aes-cbc decrypt"
    );
    Ok(plaintext)
}

/// Encrypt UTF-8 text, returning the hex IV and base64 ciphertext
pub fn encrypt_text(key: &SymmetricKey, plaintext: &str) -> Result<EncodedEnvelope> {
    Ok(encrypt(key, plaintext.as_bytes())?.encode())
}

/// Inverse of [`encrypt_text`]; the decrypted bytes must be valid UTF-8
pub fn decrypt_text(key: &SymmetricKey, iv_hex: &str, ciphertext_base64: &str) -> Result<String> {
    let iv = InitializationVector::from_hex(iv_hex)?;
    let ciphertext = base64_to_bytes(ciphertext_base64)?;
    bytes_to_text(&decrypt(key, &iv, &ciphertext)?)
}

#[inline(always)]
fn xor_blocks(block_a: &[u8], block_b: &[u8], output: &mut [u8; IV_LEN]) {
    for (i, out) in output.iter_mut().enumerate() {
        *out = block_a[i] ^ block_b[i];
    }
}

pub(crate) fn cbc_encrypt(
    key: &[u8; AES_KEY_LEN],
    iv: &InitializationVector,
    plaintext: &[u8],
) -> Vec<u8> {
    let cipher = Aes256Enc::new(key.into());
    // PKCS#7 always pads: 1..=16 bytes
    let pad = IV_LEN - plaintext.len() % IV_LEN;
    let mut out = Vec::with_capacity(plaintext.len() + pad);
    let mut prev_block = *iv.as_bytes();

    let mut encrypt_block = |plaintext_block: &[u8], out: &mut Vec<u8>| {
        let mut xored = [0u8; IV_LEN];
        xor_blocks(plaintext_block, &prev_block, &mut xored);
        let mut aes_block = AesBlock::from(xored);
        cipher.encrypt_block(&mut aes_block);
        prev_block.copy_from_slice(&aes_block);
        out.extend_from_slice(&aes_block);
    };

    let mut chunks = plaintext.chunks_exact(IV_LEN);
    for chunk in &mut chunks {
        encrypt_block(chunk, &mut out);
    }
    let remainder = chunks.remainder();
    let mut last = [pad as u8; IV_LEN];
    last[..remainder.len()].copy_from_slice(remainder);
    encrypt_block(&last, &mut out);
    last.zeroize();

    out
}

pub(crate) fn cbc_decrypt(
    key: &[u8; AES_KEY_LEN],
    iv: &InitializationVector,
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    if ciphertext.is_empty() || ciphertext.len() % IV_LEN != 0 {
        return Err(CoreError::DecryptionFailed);
    }

    let cipher = Aes256Dec::new(key.into());
    let mut out = Vec::with_capacity(ciphertext.len());
    let mut prev_block = *iv.as_bytes();

    for chunk in ciphertext.chunks_exact(IV_LEN) {
        let mut aes_block = AesBlock::clone_from_slice(chunk);
        cipher.decrypt_block(&mut aes_block);
        let mut plain = [0u8; IV_LEN];
        xor_blocks(&aes_block, &prev_block, &mut plain);
        out.extend_from_slice(&plain);
        plain.zeroize();
        prev_block.copy_from_slice(chunk);
    }

    strip_pkcs7(&mut out)?;
    Ok(out)
}

/// Drop the PKCS#7 padding in place; on failure the whole buffer is wiped
fn strip_pkcs7(buf: &mut Vec<u8>) -> Result<()> {
    match pkcs7_unpadded_len(buf) {
        Ok(len) => {
            buf.truncate(len);
            Ok(())
        }
        Err(err) => {
            buf.zeroize();
            Err(err)
        }
    }
}

/// Length of `buf` without its PKCS#7 padding
///
/// Scans the whole final block regardless of where the padding check fails.
fn pkcs7_unpadded_len(buf: &[u8]) -> Result<usize> {
    let Some(&pad) = buf.last() else {
        return Err(CoreError::DecryptionFailed);
    };
    let pad_len = usize::from(pad);
    let mut bad = u8::from(pad_len == 0 || pad_len > IV_LEN || pad_len > buf.len());

    let tail = &buf[buf.len().saturating_sub(IV_LEN)..];
    for (i, &byte) in tail.iter().rev().enumerate() {
        bad |= u8::from(i < pad_len) & u8::from(byte != pad);
    }

    if bad == 0 {
        Ok(buf.len() - pad_len)
    } else {
        Err(CoreError::DecryptionFailed)
    }
}
