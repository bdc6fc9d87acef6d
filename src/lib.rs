// src/lib.rs
//! crypto-labs — three small cryptographic workflows over in-memory buffers
//!
//! Features:
//! - AES-256-CBC text and file encryption with a fresh random IV per call
//! - PBKDF2-HMAC-SHA256 passphrase keys (non-exportable, cancellable)
//! - RSA-2048 RSASSA-PKCS1-v1_5 / SHA-256 signatures
//! - key material held in `secrecy` boxes, zeroized on drop

pub mod aliases;
pub mod codec;
pub mod config;
pub mod consts;
pub mod crypto;
pub mod error;
pub mod file_ops;
pub mod key_ops;

// Re-export everything users need at the crate root
pub use aliases::{Aes256Key32, Passphrase};
pub use codec::{
    base64_to_bytes, bytes_to_base64, bytes_to_hex, bytes_to_text, hex_to_bytes, text_to_bytes,
};
pub use config::load as load_config;
pub use crypto::{
    decrypt, decrypt_file, decrypt_text, derive_key, derive_key_cancellable, encrypt,
    encrypt_file, encrypt_text, generate_key, generate_key_pair, generate_salt, import_key,
    import_private_key, import_public_key, sign, verify, verify_base64, CancellationFlag,
    CipherEnvelope, DerivationParameters, EncodedEnvelope, GeneratedKeyPair, HashAlgorithm,
    InitializationVector, KeyPair, PrivateKey, PublicKey, Signature,
};
pub use error::{CoreError, Result};
pub use key_ops::{KeyUsage, KeyUsages, SymmetricKey};
