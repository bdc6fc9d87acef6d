// src/file_ops.rs
//! File-level encryption/decryption operations
//!
//! This is the caller-side file collaborator: it reads whole files, hands the
//! buffers to the I/O-free core in `crypto::envelope`, and writes the results.
//! Also owns artifact naming and the KDF sidecar for passphrase keys.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::codec::{bytes_to_hex, hex_to_bytes};
use crate::consts::{DECRYPTED_FILE_PREFIX, ENCRYPTED_FILE_PREFIX, KDF_SIDECAR_EXTENSION};
use crate::crypto::envelope::{decrypt_file, encrypt_file};
use crate::crypto::kdf::{derive_key, DerivationParameters, HashAlgorithm};
use crate::error::{CoreError, Result};
use crate::key_ops::SymmetricKey;

/// Encrypt a file on disk into an `IV || ciphertext` envelope
///
/// Returns the plaintext size in bytes.
pub fn encrypt_file_at<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_path: Q,
    key: &SymmetricKey,
) -> Result<u64> {
    let plaintext = std::fs::read(input_path.as_ref())?;
    let envelope = encrypt_file(&plaintext, key)?;
    std::fs::write(output_path.as_ref(), envelope)?;

    info!(output = %output_path.as_ref().display(), "encrypted");
    Ok(plaintext.len() as u64)
}

/// Decrypt an envelope file on disk
///
/// Returns the plaintext size in bytes. Nothing is written when decryption fails.
pub fn decrypt_file_at<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_path: Q,
    key: &SymmetricKey,
) -> Result<u64> {
    let envelope = std::fs::read(input_path.as_ref())?;
    let plaintext = decrypt_file(&envelope, key)?;
    std::fs::write(output_path.as_ref(), &plaintext)?;

    info!(output = %output_path.as_ref().display(), "decrypted");
    Ok(plaintext.len() as u64)
}

/// `dir/report.pdf` → `dir/encrypted-report.pdf`
pub fn encrypted_file_name<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    prefixed(path.as_ref(), ENCRYPTED_FILE_PREFIX)
}

/// `dir/encrypted-report.pdf` → `dir/decrypted-report.pdf`
pub fn decrypted_file_name<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    let name = file_name(path)?;
    let stem = name.strip_prefix(ENCRYPTED_FILE_PREFIX).unwrap_or(&name);
    Ok(path.with_file_name(format!("{DECRYPTED_FILE_PREFIX}{stem}")))
}

/// `dir/encrypted-report.pdf` → `dir/encrypted-report.pdf.kdf.toml`
pub fn kdf_sidecar_path<P: AsRef<Path>>(artifact: P) -> PathBuf {
    let mut os = artifact.as_ref().as_os_str().to_owned();
    os.push(".");
    os.push(KDF_SIDECAR_EXTENSION);
    PathBuf::from(os)
}

/// On-disk form of [`DerivationParameters`]
#[derive(Debug, Serialize, Deserialize)]
struct KdfSidecar {
    hash: String,
    iterations: u32,
    salt: String,
}

/// Persist the full derivation parameters next to the artifact they were used for
///
/// Salt, iteration count and hash all go in: decrypting needs every one of
/// them to re-derive the same key.
pub fn write_kdf_sidecar<P: AsRef<Path>>(
    artifact: P,
    params: &DerivationParameters,
) -> Result<PathBuf> {
    let path = kdf_sidecar_path(artifact);
    let sidecar = KdfSidecar {
        hash: params.hash.name().to_owned(),
        iterations: params.iterations,
        salt: bytes_to_hex(&params.salt),
    };
    let content = toml::to_string(&sidecar)
        .map_err(|e| CoreError::InvalidParameters(format!("KDF sidecar: {e}")))?;
    std::fs::write(&path, content)?;
    Ok(path)
}

/// Read back the parameters stored by [`write_kdf_sidecar`]
pub fn read_kdf_sidecar<P: AsRef<Path>>(artifact: P) -> Result<DerivationParameters> {
    let path = kdf_sidecar_path(artifact);
    let content = std::fs::read_to_string(&path)?;
    let sidecar: KdfSidecar = toml::from_str(&content)
        .map_err(|e| CoreError::InvalidParameters(format!("{}: {e}", path.display())))?;

    let hash = HashAlgorithm::from_name(&sidecar.hash).ok_or_else(|| {
        CoreError::InvalidParameters(format!("unsupported KDF hash {:?}", sidecar.hash))
    })?;
    let mut params = DerivationParameters::new(hex_to_bytes(&sidecar.salt)?, sidecar.iterations);
    params.hash = hash;
    Ok(params)
}

/// Encrypt with a passphrase-derived key and write the KDF sidecar
///
/// Returns the sidecar path. Nothing is written if derivation fails.
pub fn encrypt_file_with_passphrase<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_path: Q,
    passphrase: &str,
    params: &DerivationParameters,
) -> Result<PathBuf> {
    let key = derive_key(passphrase, params)?;
    encrypt_file_at(&input_path, &output_path, &key)?;
    let sidecar = write_kdf_sidecar(&output_path, params)?;
    info!(
        iterations = params.iterations,
        sidecar = %sidecar.display(),
        "derivation parameters saved"
    );
    Ok(sidecar)
}

/// Decrypt an artifact written by [`encrypt_file_with_passphrase`]
///
/// The parameters come from the artifact's sidecar; `iterations` replaces
/// the stored count when given. Returns the plaintext size in bytes.
pub fn decrypt_file_with_passphrase<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_path: Q,
    passphrase: &str,
    iterations: Option<u32>,
) -> Result<u64> {
    let mut params = read_kdf_sidecar(&input_path)?;
    if let Some(iterations) = iterations {
        params.iterations = iterations;
    }
    let key = derive_key(passphrase, &params)?;
    decrypt_file_at(input_path, output_path, &key)
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            CoreError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} has no file name", path.display()),
            ))
        })
}

fn prefixed(path: &Path, prefix: &str) -> Result<PathBuf> {
    let name = file_name(path)?;
    Ok(path.with_file_name(format!("{prefix}{name}")))
}
