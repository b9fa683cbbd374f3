//! End-to-end identity workflow: generation, validation, serialization
//! round-trips, signing, and key agreement across identity types.

use mesh_identity::{Identity, IdentityType};

#[test]
fn legacy_generation_and_validation() {
    let id = Identity::generate(IdentityType::Legacy).expect("generation should succeed");
    assert_eq!(id.identity_type(), IdentityType::Legacy);
    assert!(id.address().is_valid());
    assert!(id.has_private());
    assert!(id.locally_validate());
    assert_eq!(id.fingerprint().address, id.address());
}

#[test]
fn hybrid_generation_and_validation() {
    let id = Identity::generate(IdentityType::Hybrid).expect("generation should succeed");
    assert_eq!(id.identity_type(), IdentityType::Hybrid);
    assert!(id.address().is_valid());
    assert!(id.locally_validate());
}

#[test]
fn binary_roundtrip_with_private() {
    for kind in [IdentityType::Legacy, IdentityType::Hybrid] {
        let id = Identity::generate(kind).unwrap();
        let encoded = id.marshal(true);
        assert!(encoded.len() <= mesh_identity::MARSHAL_SIZE_MAX);

        let (decoded, consumed) = Identity::unmarshal(&encoded).unwrap();
        assert_eq!(consumed, encoded.len());
        assert_eq!(decoded.address(), id.address());
        assert_eq!(decoded.identity_type(), kind);
        assert_eq!(decoded.fingerprint(), id.fingerprint());
        assert!(decoded.has_private());
        assert_eq!(decoded, id);
        // Private material survived: the decoded identity can sign for the original
        let sig = decoded.sign(b"roundtrip").unwrap();
        assert!(id.verify(b"roundtrip", &sig));
        assert_eq!(
            decoded.to_string_with_private(true),
            id.to_string_with_private(true)
        );
    }
}

#[test]
fn binary_roundtrip_without_private() {
    let id = Identity::generate(IdentityType::Hybrid).unwrap();
    let (decoded, _) = Identity::unmarshal(&id.marshal(false)).unwrap();
    assert!(!decoded.has_private());
    assert_eq!(decoded, id);
    assert!(decoded.locally_validate());
    assert!(decoded.sign(b"nope").is_err());
}

#[test]
fn unmarshal_reports_consumed_bytes_with_trailing_data() {
    let id = Identity::generate(IdentityType::Legacy).unwrap();
    let mut buf = id.marshal(false);
    let encoded_len = buf.len();
    buf.extend_from_slice(b"trailing payload");
    let (decoded, consumed) = Identity::unmarshal(&buf).unwrap();
    assert_eq!(consumed, encoded_len);
    assert_eq!(decoded, id);
}

#[test]
fn text_roundtrip_is_byte_identical() {
    for kind in [IdentityType::Legacy, IdentityType::Hybrid] {
        let id = Identity::generate(kind).unwrap();

        let public_text = id.to_string_with_private(false);
        let reparsed: Identity = public_text.parse().unwrap();
        assert_eq!(reparsed.to_string_with_private(false), public_text);
        assert_eq!(reparsed, id);
        assert!(!reparsed.has_private());
        assert!(reparsed.locally_validate());

        let private_text = id.to_string_with_private(true);
        let reparsed: Identity = private_text.parse().unwrap();
        assert_eq!(reparsed.to_string_with_private(true), private_text);
        assert!(reparsed.has_private());
    }
}

#[test]
fn deterministic_legacy_identity_from_fixed_seed() {
    let a = Identity::legacy_from_keys(&[7u8; 32], &[9u8; 32]).unwrap();
    let b = Identity::legacy_from_keys(&[7u8; 32], &[9u8; 32]).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.address(), b.address());
    assert_eq!(
        a.to_string_with_private(false),
        b.to_string_with_private(false)
    );
    assert!(a.locally_validate());

    // Re-decoding the public text form reproduces the exact same text
    let text = a.to_string_with_private(false);
    let decoded: Identity = text.parse().unwrap();
    assert_eq!(decoded.to_string_with_private(false), text);
}

#[test]
fn sign_verify_bit_flips_rejected() {
    let id = Identity::generate(IdentityType::Hybrid).unwrap();
    let data = b"the payload under test".to_vec();
    let sig = id.sign(&data).unwrap();
    assert!(id.verify(&data, &sig));

    for i in 0..data.len() {
        let mut flipped = data.clone();
        flipped[i] ^= 0x01;
        assert!(!id.verify(&flipped, &sig), "flipped data byte {i} verified");
    }
    for i in 0..sig.len() {
        let mut flipped = sig.clone();
        flipped[i] ^= 0x01;
        assert!(!id.verify(&data, &flipped), "flipped sig byte {i} verified");
    }
}

#[test]
fn agreement_matrix() {
    let hybrid_a = Identity::generate(IdentityType::Hybrid).unwrap();
    let hybrid_b = Identity::generate(IdentityType::Hybrid).unwrap();
    let legacy_a = Identity::generate(IdentityType::Legacy).unwrap();
    let legacy_b = Identity::generate(IdentityType::Legacy).unwrap();

    // hybrid/hybrid: combined secret, symmetric
    let hh = hybrid_a.agree(&hybrid_b).unwrap();
    assert_eq!(hh.as_bytes(), hybrid_b.agree(&hybrid_a).unwrap().as_bytes());

    // hybrid/legacy: legacy component only, still symmetric
    let hl = hybrid_a.agree(&legacy_a).unwrap();
    assert_eq!(hl.as_bytes(), legacy_a.agree(&hybrid_a).unwrap().as_bytes());

    // legacy/legacy
    let ll = legacy_a.agree(&legacy_b).unwrap();
    assert_eq!(ll.as_bytes(), legacy_b.agree(&legacy_a).unwrap().as_bytes());

    // Distinct pairs yield distinct secrets
    assert_ne!(hh.as_bytes(), hl.as_bytes());
    assert_ne!(hl.as_bytes(), ll.as_bytes());
}

#[test]
fn cross_type_signatures_never_verify() {
    let hybrid = Identity::generate(IdentityType::Hybrid).unwrap();
    let legacy = Identity::generate(IdentityType::Legacy).unwrap();
    let hybrid_sig = hybrid.sign(b"cross").unwrap();
    let legacy_sig = legacy.sign(b"cross").unwrap();
    assert!(!legacy.verify(b"cross", &hybrid_sig));
    assert!(!hybrid.verify(b"cross", &legacy_sig));
}

#[test]
fn identities_usable_as_map_keys() {
    use std::collections::{BTreeSet, HashMap};

    let a = Identity::generate(IdentityType::Legacy).unwrap();
    let b = Identity::generate(IdentityType::Hybrid).unwrap();

    let mut map = HashMap::new();
    map.insert(a.clone(), "a");
    map.insert(b.clone(), "b");
    let (a_pub, _) = Identity::unmarshal(&a.marshal(false)).unwrap();
    assert_eq!(map.get(&a_pub), Some(&"a"));

    let set: BTreeSet<Identity> = [a, b].into_iter().collect();
    assert_eq!(set.len(), 2);
}
