// src/consts.rs
//! Shared constants — algorithm sizes and security parameters

/// AES-256 key length in bytes
pub const AES_KEY_LEN: usize = 32;

/// AES block size, and therefore the CBC initialization vector length
pub const IV_LEN: usize = 16;

/// Iteration count of the full-strength passphrase workflow
// ~10 s or more on typical hardware — treat as the upper reference, not a default
pub const REFERENCE_PBKDF2_ITERATIONS: u32 = 10_000_000;

/// Interactive default for passphrase-derived keys
// 600_000 ≈ 0.5–1 second on typical CPU
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 600_000;

/// Length of freshly generated PBKDF2 salts
pub const SALT_LEN: usize = 16;

/// How many PBKDF2 rounds run between two cancellation checks
pub const KDF_CANCEL_CHECK_INTERVAL: u32 = 4_096;

/// RSA modulus size for signing key pairs
pub const RSA_MODULUS_BITS: usize = 2048;

/// RSA public exponent (F4)
pub const RSA_PUBLIC_EXPONENT: u32 = 65_537;

/// Prefix the file workflow puts in front of encrypted artifacts
pub const ENCRYPTED_FILE_PREFIX: &str = "encrypted-";

/// Prefix the file workflow puts in front of decrypted artifacts
pub const DECRYPTED_FILE_PREFIX: &str = "decrypted-";

/// Extension of the sidecar file holding an artifact's PBKDF2 parameters
pub const KDF_SIDECAR_EXTENSION: &str = "kdf.toml";
