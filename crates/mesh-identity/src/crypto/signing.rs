//! Signature primitives for both identity cryptosystems.
//!
//! Legacy identities sign with Ed25519 (64-byte signatures). Hybrid
//! identities sign with ECDSA over NIST P-384 (96-byte fixed-width
//! signatures). A signature produced under one cryptosystem never verifies
//! under the other; dispatch happens at the [`crate::Identity`] level.
//!
//! Verification is total: malformed keys, wrong-length signatures, and
//! cryptographic failure all return `false`, never a panic.

use ed25519_dalek::{Signature as Ed25519Signature, Signer, SigningKey, Verifier, VerifyingKey};
use zeroize::Zeroize;

use crate::crypto::keys::{
    LegacySecret, LEGACY_PUBLIC_KEY_SIZE, P384_PUBLIC_KEY_SIZE, P384_SECRET_KEY_SIZE,
};
use crate::error::{IdentityError, Result};

/// Ed25519 signature size.
pub const LEGACY_SIGNATURE_SIZE: usize = 64;
/// Fixed-width ECDSA P-384 signature size (r ‖ s).
pub const P384_SIGNATURE_SIZE: usize = 96;
/// Largest signature any identity type produces.
pub const MAX_SIGNATURE_SIZE: usize = P384_SIGNATURE_SIZE;

/// Sign a message with the Ed25519 half of a legacy secret record.
pub fn legacy_sign(secret: &LegacySecret, message: &[u8]) -> [u8; LEGACY_SIGNATURE_SIZE] {
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&secret.as_bytes()[32..]);
    let signing_key = SigningKey::from_bytes(&seed);
    seed.zeroize();
    signing_key.sign(message).to_bytes()
}

/// Verify an Ed25519 signature against the legacy public record.
pub fn legacy_verify(
    public: &[u8; LEGACY_PUBLIC_KEY_SIZE],
    message: &[u8],
    signature: &[u8],
) -> bool {
    if signature.len() != LEGACY_SIGNATURE_SIZE {
        return false;
    }
    let mut key_bytes = [0u8; 32];
    key_bytes.copy_from_slice(&public[32..]);
    let Ok(verifying_key) = VerifyingKey::from_bytes(&key_bytes) else {
        return false;
    };
    let Ok(sig) = Ed25519Signature::from_slice(signature) else {
        return false;
    };
    verifying_key.verify(message, &sig).is_ok()
}

/// Sign a message with a P-384 secret scalar (deterministic ECDSA).
pub fn p384_sign(
    secret: &[u8; P384_SECRET_KEY_SIZE],
    message: &[u8],
) -> Result<[u8; P384_SIGNATURE_SIZE]> {
    let signing_key = p384::ecdsa::SigningKey::from_bytes(p384::FieldBytes::from_slice(secret))
        .map_err(|_| IdentityError::InvalidKey("invalid P-384 secret scalar".into()))?;
    let signature: p384::ecdsa::Signature = signing_key.sign(message);
    let mut out = [0u8; P384_SIGNATURE_SIZE];
    out.copy_from_slice(&signature.to_bytes());
    Ok(out)
}

/// Verify an ECDSA P-384 signature against a SEC1 compressed public point.
pub fn p384_verify(public: &[u8; P384_PUBLIC_KEY_SIZE], message: &[u8], signature: &[u8]) -> bool {
    if signature.len() != P384_SIGNATURE_SIZE {
        return false;
    }
    let Ok(verifying_key) = p384::ecdsa::VerifyingKey::from_sec1_bytes(public) else {
        return false;
    };
    let Ok(sig) = p384::ecdsa::Signature::from_slice(signature) else {
        return false;
    };
    verifying_key.verify(message, &sig).is_ok()
}
