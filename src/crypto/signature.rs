// src/crypto/signature.rs
//! RSASSA-PKCS1-v1_5 / SHA-256 signing with RSA-2048 keys
//!
//! Private keys travel as base64 PKCS#8 DER, public keys as base64
//! SubjectPublicKeyInfo DER. PKCS#1 v1.5 signing is deterministic.
//! A signature that does not match is a `false`, not an error.

use std::fmt;

use rsa::pkcs1v15::{Signature as RsaSignature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use tracing::debug;

use crate::codec::{base64_to_bytes, bytes_to_base64};
use crate::consts::{RSA_MODULUS_BITS, RSA_PUBLIC_EXPONENT};
use crate::crypto::rng::os_rng;
use crate::error::{CoreError, Result};
use crate::key_ops::{KeyUsage, KeyUsages};

/// RSA private key handle, usable for signing
pub struct PrivateKey {
    key: RsaPrivateKey,
    usages: KeyUsages,
}

/// RSA public key handle, usable for verification
#[derive(Clone)]
pub struct PublicKey {
    key: RsaPublicKey,
    usages: KeyUsages,
}

/// Matching public/private halves
#[derive(Debug)]
pub struct KeyPair {
    pub public_key: PublicKey,
    pub private_key: PrivateKey,
}

/// A freshly generated key pair plus its exported encodings
#[derive(Debug)]
pub struct GeneratedKeyPair {
    pub key_pair: KeyPair,
    pub private_pkcs8_base64: String,
    pub public_spki_base64: String,
}

/// Raw PKCS#1 v1.5 signature bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn from_base64(b64: &str) -> Result<Self> {
        Ok(Self(base64_to_bytes(b64)?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        bytes_to_base64(&self.0)
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PrivateKey {
    pub fn usages(&self) -> KeyUsages {
        self.usages
    }

    #[must_use]
    pub fn restrict(mut self, usages: KeyUsages) -> Self {
        self.usages = self.usages.intersection(usages);
        self
    }

    /// The matching public key, restricted to verification
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            key: self.key.to_public_key(),
            usages: KeyUsages::VERIFY,
        }
    }

    pub fn export_pkcs8_base64(&self) -> Result<String> {
        let der = self
            .key
            .to_pkcs8_der()
            .map_err(|e| CoreError::InvalidKey(format!("PKCS#8 export: {e}")))?;
        Ok(bytes_to_base64(der.as_bytes()))
    }
}

impl PublicKey {
    pub fn usages(&self) -> KeyUsages {
        self.usages
    }

    #[must_use]
    pub fn restrict(mut self, usages: KeyUsages) -> Self {
        self.usages = self.usages.intersection(usages);
        self
    }

    pub fn export_spki_base64(&self) -> Result<String> {
        let der = self
            .key
            .to_public_key_der()
            .map_err(|e| CoreError::InvalidKey(format!("SPKI export: {e}")))?;
        Ok(bytes_to_base64(der.as_bytes()))
    }

    /// Modulus length in bytes, which is also the signature length
    pub fn modulus_len(&self) -> usize {
        use rsa::traits::PublicKeyParts;
        self.key.size()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("algorithm", &"RSASSA-PKCS1-v1_5/SHA-256")
            .field("usages", &self.usages.to_string())
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("algorithm", &"RSASSA-PKCS1-v1_5/SHA-256")
            .field("usages", &self.usages.to_string())
            .field("modulus_len", &self.modulus_len())
            .finish()
    }
}

/// Generate an RSA-2048 (e = 65537) signing key pair and export both halves
pub fn generate_key_pair() -> Result<GeneratedKeyPair> {
    let mut rng = os_rng();
    let exponent = BigUint::from(RSA_PUBLIC_EXPONENT);
    let key = RsaPrivateKey::new_with_exp(&mut rng, RSA_MODULUS_BITS, &exponent)
        .map_err(|e| CoreError::InvalidKey(format!("RSA key generation: {e}")))?;

    let private_key = PrivateKey {
        key,
        usages: KeyUsages::SIGN,
    };
    let public_key = private_key.public_key();
    let private_pkcs8_base64 = private_key.export_pkcs8_base64()?;
    let public_spki_base64 = public_key.export_spki_base64()?;
    debug!(bits = RSA_MODULUS_BITS, "generated RSA signing key pair");

    Ok(GeneratedKeyPair {
        key_pair: KeyPair {
            public_key,
            private_key,
        },
        private_pkcs8_base64,
        public_spki_base64,
    })
}

/// Import a base64 PKCS#8 DER private key with usages `{sign}`
pub fn import_private_key(pkcs8_base64: &str) -> Result<PrivateKey> {
    let der = base64_to_bytes(pkcs8_base64)?;
    let key = RsaPrivateKey::from_pkcs8_der(&der)
        .map_err(|e| CoreError::InvalidKey(format!("PKCS#8 private key: {e}")))?;
    debug!(der_len = der.len(), "imported RSA private key");
    Ok(PrivateKey {
        key,
        usages: KeyUsages::SIGN,
    })
}

/// Import a base64 SubjectPublicKeyInfo DER public key with usages `{verify}`
pub fn import_public_key(spki_base64: &str) -> Result<PublicKey> {
    let der = base64_to_bytes(spki_base64)?;
    let key = RsaPublicKey::from_public_key_der(&der)
        .map_err(|e| CoreError::InvalidKey(format!("SPKI public key: {e}")))?;
    debug!(der_len = der.len(), "imported RSA public key");
    Ok(PublicKey {
        key,
        usages: KeyUsages::VERIFY,
    })
}

/// Sign the exact document bytes
pub fn sign(private_key: &PrivateKey, document: &[u8]) -> Result<Signature> {
    private_key.usages.require(KeyUsage::Sign)?;
    let signing_key = SigningKey::<Sha256>::new(private_key.key.clone());
    let signature = signing_key
        .try_sign(document)
        .map_err(|e| CoreError::InvalidKey(format!("RSA signing: {e}")))?;
    debug!(document_len = document.len(), "document signed");
    Ok(Signature(signature.to_vec()))
}

/// `Ok(false)` for any document/signature/key mismatch
pub fn verify(public_key: &PublicKey, document: &[u8], signature: &Signature) -> Result<bool> {
    public_key.usages.require(KeyUsage::Verify)?;
    let Ok(rsa_signature) = RsaSignature::try_from(signature.as_bytes()) else {
        return Ok(false);
    };
    let verifying_key = VerifyingKey::<Sha256>::new(public_key.key.clone());
    let valid = verifying_key.verify(document, &rsa_signature).is_ok();
    debug!(document_len = document.len(), valid, "signature verified");
    Ok(valid)
}

/// [`verify`] with a base64 signature; only undecodable base64 is an error
pub fn verify_base64(public_key: &PublicKey, document: &[u8], signature_b64: &str) -> Result<bool> {
    verify(public_key, document, &Signature::from_base64(signature_b64)?)
}
