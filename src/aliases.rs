// src/aliases.rs
//! Secret containers
//!
//! These are the canonical secret types used throughout crypto-labs.
//! Both zeroize on drop, redact themselves in `Debug` output and require an
//! explicit `.expose_secret()` to read.

use secrecy::{SecretBox, SecretString};

use crate::consts::AES_KEY_LEN;

pub use secrecy::{ExposeSecret, ExposeSecretMut};

// Fixed-size secrets
pub type Aes256Key32 = SecretBox<[u8; AES_KEY_LEN]>; // raw AES-256-CBC key bytes

// Dynamic secrets
pub type Passphrase = SecretString; // PBKDF2 input, as typed by the user

/// All-zero key buffer on the heap, to be filled in place
pub fn zeroed_key() -> Aes256Key32 {
    SecretBox::new(Box::new([0u8; AES_KEY_LEN]))
}
