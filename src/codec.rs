// src/codec.rs
//! Byte ⇄ text conversions used at every I/O boundary
//!
//! - hex: lower-case, two digits per byte, no separators
//! - base64: standard alphabet, `=` padded, no line wrapping
//! - text: strict UTF-8 (no replacement characters)

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{CoreError, Result};

/// Encode bytes as lower-case hex
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode a hex string; odd length or non-hex characters are rejected
pub fn hex_to_bytes(hex_str: &str) -> Result<Vec<u8>> {
    hex::decode(hex_str).map_err(|e| CoreError::InvalidEncoding(format!("hex: {e}")))
}

pub fn bytes_to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn base64_to_bytes(b64: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(b64)
        .map_err(|e| CoreError::InvalidEncoding(format!("base64: {e}")))
}

/// Decode UTF-8 text; invalid sequences are an error, never replaced
pub fn bytes_to_text(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| CoreError::InvalidEncoding(format!("utf-8: {e}")))
}

pub fn text_to_bytes(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}
