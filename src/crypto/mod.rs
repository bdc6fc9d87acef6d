// src/crypto/mod.rs
//! Pure cryptographic operations — no I/O
//!
//! All functions work exclusively on in-memory buffers.
//! - [`cipher`]: AES-256-CBC key generation/import, encrypt/decrypt
//! - [`kdf`]: PBKDF2-HMAC-SHA256 passphrase keys
//! - [`envelope`]: whole-file `IV || ciphertext` envelopes
//! - [`signature`]: RSASSA-PKCS1-v1_5 / SHA-256 sign and verify
pub mod cipher;
pub mod envelope;
pub mod kdf;
pub mod rng;
pub mod signature;

pub use cipher::{
    decrypt, decrypt_text, encrypt, encrypt_text, generate_key, import_key, CipherEnvelope,
    EncodedEnvelope, InitializationVector,
};
pub use envelope::{decrypt_file, encrypt_file};
pub use kdf::{
    derive_key, derive_key_cancellable, generate_salt, CancellationFlag, DerivationParameters,
    HashAlgorithm,
};
pub use signature::{
    generate_key_pair, import_private_key, import_public_key, sign, verify, verify_base64,
    GeneratedKeyPair, KeyPair, PrivateKey, PublicKey, Signature,
};
