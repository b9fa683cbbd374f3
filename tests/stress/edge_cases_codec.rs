//! Edge case tests: truncated and corrupted wire input, unknown types,
//! stray flag bits, malformed text, and nil-identity behavior. Decoding
//! untrusted bytes must fail cleanly, never panic or partially populate.

use mesh_identity::{Identity, IdentityError, IdentityType};

#[test]
fn edge_every_truncation_rejected() {
    for kind in [IdentityType::Legacy, IdentityType::Hybrid] {
        for include_private in [false, true] {
            let id = Identity::generate(kind).unwrap();
            let encoded = id.marshal(include_private);
            for len in 0..encoded.len() {
                assert!(
                    Identity::unmarshal(&encoded[..len]).is_err(),
                    "truncation to {len} of {} accepted",
                    encoded.len()
                );
            }
            assert!(Identity::unmarshal(&encoded).is_ok());
        }
    }
}

#[test]
fn edge_empty_and_tiny_buffers() {
    assert!(Identity::unmarshal(&[]).is_err());
    assert!(Identity::unmarshal(&[0x01]).is_err());
    assert!(Identity::unmarshal(&[0x01, 0x02, 0x03, 0x04, 0x05]).is_err());
}

#[test]
fn edge_unknown_wire_type_rejected() {
    let id = Identity::generate(IdentityType::Legacy).unwrap();
    let mut encoded = id.marshal(false);
    encoded[5] = 0x02; // type 2 does not exist
    match Identity::unmarshal(&encoded) {
        Err(IdentityError::UnknownType(2)) => {}
        other => panic!("expected UnknownType(2), got {other:?}"),
    }
}

#[test]
fn edge_stray_flag_bits_rejected() {
    let id = Identity::generate(IdentityType::Legacy).unwrap();
    let mut encoded = id.marshal(false);
    encoded[5] |= 0x80;
    assert!(Identity::unmarshal(&encoded).is_err());
}

#[test]
fn edge_zero_address_rejected() {
    let id = Identity::generate(IdentityType::Legacy).unwrap();
    let mut encoded = id.marshal(false);
    for b in encoded.iter_mut().take(5) {
        *b = 0;
    }
    assert!(Identity::unmarshal(&encoded).is_err());
}

#[test]
fn edge_secret_flag_without_secret_bytes_rejected() {
    let id = Identity::generate(IdentityType::Legacy).unwrap();
    let mut encoded = id.marshal(false);
    encoded[5] |= 0x10; // claim a secret record that is not there
    assert!(Identity::unmarshal(&encoded).is_err());
}

#[test]
fn edge_corrupted_public_key_fails_validation_not_decoding() {
    let id = Identity::generate(IdentityType::Hybrid).unwrap();
    let mut encoded = id.marshal(false);
    let last = encoded.len() - 1;
    encoded[last] ^= 0x01;
    // Format is still fine, so decoding succeeds...
    let (decoded, _) = Identity::unmarshal(&encoded).unwrap();
    // ...but the address no longer matches the keys
    assert!(!decoded.locally_validate());
}

#[test]
fn edge_malformed_text_rejected() {
    for bad in [
        "",
        ":",
        "justsometext",
        "0123456789",                 // address only
        "0123456789:0",               // missing public key
        "0123456789:0:zzzz",          // bad hex
        "0123456789:0:aabb",          // wrong public key length
        "0123456789:2:aabb",          // unknown type
        "012345678:0:aabb",           // short address
        "0000000000:0:aabb",          // nil address
        "0123456789:0:aabb:cc:dd",    // too many fields
        "0123456789:00:aabb",         // type field must be a single digit
    ] {
        assert!(bad.parse::<Identity>().is_err(), "accepted {bad:?}");
    }
}

#[test]
fn edge_text_with_wrong_private_length_rejected() {
    let id = Identity::generate(IdentityType::Legacy).unwrap();
    let text = id.to_string_with_private(true);
    let truncated = &text[..text.len() - 2];
    assert!(truncated.parse::<Identity>().is_err());
}

#[test]
fn edge_text_corrupted_key_fails_validation() {
    let id = Identity::generate(IdentityType::Hybrid).unwrap();
    let mut text = id.to_string_with_private(false).into_bytes();
    let last = text.len() - 1;
    text[last] = if text[last] == b'0' { b'1' } else { b'0' };
    let text = String::from_utf8(text).unwrap();
    let decoded: Identity = text.parse().unwrap();
    assert!(!decoded.locally_validate());
}

#[test]
fn edge_forged_address_fails_validation() {
    // Re-point a valid identity at a different (valid-looking) address
    let id = Identity::generate(IdentityType::Hybrid).unwrap();
    let mut encoded = id.marshal(false);
    encoded[0] ^= 0x01;
    if encoded[0] == 0xff {
        encoded[0] = 0x7f;
    }
    let (decoded, _) = Identity::unmarshal(&encoded).unwrap();
    assert!(!decoded.locally_validate());
}

#[test]
fn edge_nil_identity_text_and_wire() {
    let nil = Identity::nil();
    assert_eq!(nil.to_string_with_private(true), "");
    assert!(nil.marshal(true).is_empty());
    assert!("".parse::<Identity>().is_err());
}
