// tests/signature_tests.rs
mod common;

use common::key_pair;
use crypto_labs::{
    base64_to_bytes, bytes_to_base64, import_private_key, import_public_key, sign, verify,
    verify_base64, CoreError, KeyUsages, Signature,
};

const DOC: &[u8] = b"I, the undersigned, agree to the terms.";

#[test]
fn sign_then_verify_with_matching_pair() {
    common::setup();
    let pair = &key_pair().key_pair;
    let signature = sign(&pair.private_key, DOC).unwrap();
    assert!(verify(&pair.public_key, DOC, &signature).unwrap());
}

#[test]
fn signing_is_deterministic() {
    let pair = &key_pair().key_pair;
    let a = sign(&pair.private_key, DOC).unwrap();
    let b = sign(&pair.private_key, DOC).unwrap();
    assert_eq!(a, b);
}

#[test]
fn any_single_byte_flip_in_document_fails_verification() {
    let pair = &key_pair().key_pair;
    let signature = sign(&pair.private_key, DOC).unwrap();

    for i in 0..DOC.len() {
        let mut tampered = DOC.to_vec();
        tampered[i] ^= 0x01;
        assert!(
            !verify(&pair.public_key, &tampered, &signature).unwrap(),
            "flip at byte {i} still verified"
        );
    }
}

#[test]
fn signature_byte_flips_fail_verification() {
    let pair = &key_pair().key_pair;
    let signature = sign(&pair.private_key, DOC).unwrap();

    for i in [0, 1, 100, signature.as_bytes().len() - 1] {
        let mut bytes = signature.as_bytes().to_vec();
        bytes[i] ^= 0x80;
        assert!(!verify(&pair.public_key, DOC, &Signature::from_bytes(bytes)).unwrap());
    }
}

#[test]
fn truncated_signature_is_false_not_error() {
    let pair = &key_pair().key_pair;
    let signature = sign(&pair.private_key, DOC).unwrap();
    let short = Signature::from_bytes(&signature.as_bytes()[..10]);
    assert!(!verify(&pair.public_key, DOC, &short).unwrap());
    assert!(!verify(&pair.public_key, DOC, &Signature::from_bytes(Vec::new())).unwrap());
}

#[test]
fn unrelated_public_key_fails_verification() {
    let pair = &key_pair().key_pair;
    let other = crypto_labs::generate_key_pair().unwrap();
    let signature = sign(&pair.private_key, DOC).unwrap();
    assert!(!verify(&other.key_pair.public_key, DOC, &signature).unwrap());
}

#[test]
fn exported_keys_reimport_and_interoperate() {
    let generated = key_pair();
    let private_key = import_private_key(&generated.private_pkcs8_base64).unwrap();
    let public_key = import_public_key(&generated.public_spki_base64).unwrap();

    assert_eq!(private_key.usages(), KeyUsages::SIGN);
    assert_eq!(public_key.usages(), KeyUsages::VERIFY);

    let signature = sign(&private_key, DOC).unwrap();
    assert!(verify(&generated.key_pair.public_key, DOC, &signature).unwrap());
    assert!(verify_base64(&public_key, DOC, &signature.to_base64()).unwrap());

    // re-export is byte-identical
    assert_eq!(
        public_key.export_spki_base64().unwrap(),
        generated.public_spki_base64
    );
    assert_eq!(
        private_key.public_key().export_spki_base64().unwrap(),
        generated.public_spki_base64
    );
}

#[test]
fn public_key_with_invalid_der_is_invalid_key() {
    let garbage = bytes_to_base64(b"definitely not a DER SubjectPublicKeyInfo");
    assert!(matches!(
        import_public_key(&garbage),
        Err(CoreError::InvalidKey(_))
    ));
}

#[test]
fn wrong_key_type_is_invalid_key() {
    let generated = key_pair();
    assert!(matches!(
        import_public_key(&generated.private_pkcs8_base64),
        Err(CoreError::InvalidKey(_))
    ));
    assert!(matches!(
        import_private_key(&generated.public_spki_base64),
        Err(CoreError::InvalidKey(_))
    ));
}

#[test]
fn undecodable_base64_is_invalid_encoding() {
    assert!(matches!(
        import_public_key("not-base64!!"),
        Err(CoreError::InvalidEncoding(_))
    ));
    let pair = &key_pair().key_pair;
    assert!(matches!(
        verify_base64(&pair.public_key, DOC, "not-base64!!"),
        Err(CoreError::InvalidEncoding(_))
    ));
}

#[test]
fn restricted_keys_refuse_their_operation() {
    let generated = key_pair();
    let private_key = import_private_key(&generated.private_pkcs8_base64)
        .unwrap()
        .restrict(KeyUsages::VERIFY);
    assert!(matches!(sign(&private_key, DOC), Err(CoreError::InvalidKey(_))));

    let public_key = generated.key_pair.public_key.clone().restrict(KeyUsages::SIGN);
    let signature = sign(&generated.key_pair.private_key, DOC).unwrap();
    assert!(matches!(
        verify(&public_key, DOC, &signature),
        Err(CoreError::InvalidKey(_))
    ));
}

#[test]
fn exported_encodings_are_standard_base64_der() {
    let generated = key_pair();
    let spki = base64_to_bytes(&generated.public_spki_base64).unwrap();
    let pkcs8 = base64_to_bytes(&generated.private_pkcs8_base64).unwrap();
    // DER SEQUENCE
    assert_eq!(spki[0], 0x30);
    assert_eq!(pkcs8[0], 0x30);
    // RSA-2048 SPKI is 294 bytes
    assert_eq!(spki.len(), 294);
}

#[test]
fn parallel_sign_and_verify() {
    let pair = &key_pair().key_pair;
    std::thread::scope(|scope| {
        for i in 0..4u8 {
            scope.spawn(move || {
                let doc = vec![i; 64];
                let sig = sign(&pair.private_key, &doc).unwrap();
                assert!(verify(&pair.public_key, &doc, &sig).unwrap());
            });
        }
    });
}
