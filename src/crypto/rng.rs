// src/crypto/rng.rs
//! Secure randomness for IVs, keys and salts
//!
//! Every call draws from the operating system CSPRNG. There is no seeding API.

use rand::rngs::OsRng;
use rand::RngCore;

/// Fixed-size array of fresh random bytes
#[inline]
pub fn random_array<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Heap buffer of `len` fresh random bytes
pub fn random_vec(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// The process-wide CSPRNG, for APIs that take an `RngCore + CryptoRng`
#[inline]
pub(crate) fn os_rng() -> OsRng {
    OsRng
}

/// Overwrite `buf` with fresh random bytes, in place
#[inline]
pub fn fill_random(buf: &mut [u8]) {
    OsRng.fill_bytes(buf);
}
