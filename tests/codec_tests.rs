// tests/codec_tests.rs
use crypto_labs::{
    base64_to_bytes, bytes_to_base64, bytes_to_hex, bytes_to_text, hex_to_bytes, text_to_bytes,
    CoreError,
};
use proptest::prelude::*;

#[test]
fn hex_is_lowercase_and_zero_padded() {
    assert_eq!(bytes_to_hex(&[0x00, 0x0a, 0xff, 0x10]), "000aff10");
    assert_eq!(bytes_to_hex(&[]), "");
}

#[test]
fn hex_decode_accepts_both_cases() {
    assert_eq!(hex_to_bytes("DEADbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
}

#[test]
fn hex_odd_length_is_invalid_encoding() {
    assert!(matches!(hex_to_bytes("abc"), Err(CoreError::InvalidEncoding(_))));
}

#[test]
fn hex_non_hex_chars_are_invalid_encoding() {
    assert!(matches!(hex_to_bytes("zz"), Err(CoreError::InvalidEncoding(_))));
    assert!(matches!(hex_to_bytes("0x00"), Err(CoreError::InvalidEncoding(_))));
}

#[test]
fn base64_uses_standard_padded_alphabet() {
    assert_eq!(bytes_to_base64(&[0xfb, 0xff]), "+/8=");
    assert_eq!(bytes_to_base64(&[0x42; 32]), "QkJCQkJCQkJCQkJCQkJCQkJCQkJCQkJCQkJCQkJCQkI=");
}

#[test]
fn base64_malformed_input_is_invalid_encoding() {
    assert!(matches!(
        base64_to_bytes("not-base64!!"),
        Err(CoreError::InvalidEncoding(_))
    ));
    // URL-safe alphabet is not accepted
    assert!(matches!(base64_to_bytes("-_8="), Err(CoreError::InvalidEncoding(_))));
}

#[test]
fn invalid_utf8_is_rejected_not_replaced() {
    assert!(matches!(
        bytes_to_text(&[0x66, 0x6f, 0xff, 0x6f]),
        Err(CoreError::InvalidEncoding(_))
    ));
}

#[test]
fn utf8_multibyte_roundtrip() {
    let s = "héllo wörld — ✓ 🔐";
    assert_eq!(bytes_to_text(&text_to_bytes(s)).unwrap(), s);
}

proptest! {
    #[test]
    fn hex_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 0..10_000)) {
        prop_assert_eq!(hex_to_bytes(&bytes_to_hex(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn base64_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 0..10_000)) {
        prop_assert_eq!(base64_to_bytes(&bytes_to_base64(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn text_roundtrip(s in any::<String>()) {
        prop_assert_eq!(bytes_to_text(&text_to_bytes(&s)).unwrap(), s);
    }

    #[test]
    fn hex_output_shape(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let hex = bytes_to_hex(&bytes);
        prop_assert_eq!(hex.len(), bytes.len() * 2);
        prop_assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
}
