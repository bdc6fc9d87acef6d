// src/key_ops.rs
//! Key handles and their usage capabilities
//!
//! A key's usages are fixed when it is generated, imported or derived.
//! [`SymmetricKey::restrict`] can narrow them; nothing can widen them.

use std::fmt;

use crate::aliases::{Aes256Key32, ExposeSecret};
use crate::consts::AES_KEY_LEN;
use crate::error::{CoreError, Result};

/// A single operation a key may be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyUsage {
    Encrypt,
    Decrypt,
    Sign,
    Verify,
}

impl KeyUsage {
    const ALL: [KeyUsage; 4] = [
        KeyUsage::Encrypt,
        KeyUsage::Decrypt,
        KeyUsage::Sign,
        KeyUsage::Verify,
    ];

    const fn bit(self) -> u8 {
        match self {
            KeyUsage::Encrypt => 0b0001,
            KeyUsage::Decrypt => 0b0010,
            KeyUsage::Sign => 0b0100,
            KeyUsage::Verify => 0b1000,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            KeyUsage::Encrypt => "encrypt",
            KeyUsage::Decrypt => "decrypt",
            KeyUsage::Sign => "sign",
            KeyUsage::Verify => "verify",
        }
    }
}

impl fmt::Display for KeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of [`KeyUsage`]s
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyUsages(u8);

impl KeyUsages {
    pub const NONE: KeyUsages = KeyUsages(0);
    pub const ENCRYPT: KeyUsages = KeyUsages(KeyUsage::Encrypt.bit());
    pub const DECRYPT: KeyUsages = KeyUsages(KeyUsage::Decrypt.bit());
    pub const ENCRYPT_DECRYPT: KeyUsages =
        KeyUsages(KeyUsage::Encrypt.bit() | KeyUsage::Decrypt.bit());
    pub const SIGN: KeyUsages = KeyUsages(KeyUsage::Sign.bit());
    pub const VERIFY: KeyUsages = KeyUsages(KeyUsage::Verify.bit());

    pub fn from_usages(usages: &[KeyUsage]) -> Self {
        KeyUsages(usages.iter().fold(0, |acc, u| acc | u.bit()))
    }

    pub const fn contains(self, usage: KeyUsage) -> bool {
        self.0 & usage.bit() != 0
    }

    pub const fn intersection(self, other: KeyUsages) -> KeyUsages {
        KeyUsages(self.0 & other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = KeyUsage> {
        KeyUsage::ALL.into_iter().filter(move |u| self.contains(*u))
    }

    /// `Ok(())` if `usage` is granted, `InvalidKey` otherwise
    pub fn require(self, usage: KeyUsage) -> Result<()> {
        if self.contains(usage) {
            Ok(())
        } else {
            Err(CoreError::InvalidKey(format!(
                "key usages [{self}] do not include {usage}"
            )))
        }
    }
}

impl fmt::Display for KeyUsages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for usage in self.iter() {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(usage.as_str())?;
            first = false;
        }
        Ok(())
    }
}

/// Opaque AES-256-CBC key handle
///
/// Not `Clone`: a handle belongs to one workflow. The raw bytes never leave
/// the crate; the only export path is the hex string handed out once by
/// [`generate_key`](crate::crypto::generate_key). Derived keys are therefore
/// non-exportable by construction.
pub struct SymmetricKey {
    material: Aes256Key32,
    usages: KeyUsages,
}

impl SymmetricKey {
    pub(crate) fn new(material: Aes256Key32, usages: KeyUsages) -> Self {
        Self { material, usages }
    }

    pub(crate) fn material(&self) -> &[u8; AES_KEY_LEN] {
        self.material.expose_secret()
    }

    pub fn usages(&self) -> KeyUsages {
        self.usages
    }

    /// Narrow the usages of this key to those also present in `usages`
    #[must_use]
    pub fn restrict(mut self, usages: KeyUsages) -> Self {
        self.usages = self.usages.intersection(usages);
        self
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("algorithm", &"AES-256-CBC")
            .field("usages", &self.usages.to_string())
            .field("material", &"[REDACTED]")
            .finish()
    }
}
