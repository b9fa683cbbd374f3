//! Key agreement primitives.
//!
//! Every agreement uses the X25519 half of the legacy record; when both
//! peers are hybrid identities, a P-384 ECDH value is computed as well and
//! the two shared values are combined with HKDF-SHA384. Compromise of one
//! curve alone then no longer exposes the session secret.

use hkdf::Hkdf;
use sha2::{Digest, Sha384, Sha512};
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::keys::{
    LegacySecret, LEGACY_PUBLIC_KEY_SIZE, P384_PUBLIC_KEY_SIZE, P384_SECRET_KEY_SIZE,
};
use crate::error::{IdentityError, Result};

/// Size of the final shared secret for both agreement paths.
pub const SHARED_SECRET_SIZE: usize = 48;

/// HKDF info string binding the hybrid combination to this protocol.
const HYBRID_AGREEMENT_CONTEXT: &[u8] = b"mesh-identity/agreement/hybrid";

/// A derived shared secret. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; SHARED_SECRET_SIZE]);

impl SharedSecret {
    /// Expose the secret bytes. Callers must not retain copies beyond the
    /// lifetime of the session they key.
    pub fn as_bytes(&self) -> &[u8; SHARED_SECRET_SIZE] {
        &self.0
    }
}

/// X25519 agreement between our legacy secret and a peer's legacy public
/// record, widened to the protocol secret size with SHA-512.
pub fn legacy_agree(
    secret: &LegacySecret,
    peer_public: &[u8; LEGACY_PUBLIC_KEY_SIZE],
) -> SharedSecret {
    let mut dh_secret = [0u8; 32];
    dh_secret.copy_from_slice(&secret.as_bytes()[..32]);
    let own = StaticSecret::from(dh_secret);
    dh_secret.zeroize();

    let mut peer = [0u8; 32];
    peer.copy_from_slice(&peer_public[..32]);
    let raw = own.diffie_hellman(&X25519PublicKey::from(peer));

    let digest = Sha512::digest(raw.as_bytes());
    let mut out = [0u8; SHARED_SECRET_SIZE];
    out.copy_from_slice(&digest[..SHARED_SECRET_SIZE]);
    SharedSecret(out)
}

/// ECDH over P-384 between our secret scalar and a peer's public point.
pub fn p384_agree(
    secret: &[u8; P384_SECRET_KEY_SIZE],
    peer_public: &[u8; P384_PUBLIC_KEY_SIZE],
) -> Result<[u8; SHARED_SECRET_SIZE]> {
    let own = p384::SecretKey::from_bytes(p384::FieldBytes::from_slice(secret))
        .map_err(|_| IdentityError::AgreementFailed("invalid P-384 secret scalar".into()))?;
    let peer = p384::PublicKey::from_sec1_bytes(peer_public)
        .map_err(|_| IdentityError::AgreementFailed("invalid P-384 public point".into()))?;
    let shared = p384::ecdh::diffie_hellman(own.to_nonzero_scalar(), peer.as_affine());
    let mut out = [0u8; SHARED_SECRET_SIZE];
    out.copy_from_slice(shared.raw_secret_bytes().as_slice());
    Ok(out)
}

/// Combine the legacy and P-384 shared values into the final hybrid secret
/// using HKDF-SHA384.
pub fn combine_hybrid(
    legacy: &SharedSecret,
    p384_shared: &[u8; SHARED_SECRET_SIZE],
) -> Result<SharedSecret> {
    let mut ikm = [0u8; SHARED_SECRET_SIZE * 2];
    ikm[..SHARED_SECRET_SIZE].copy_from_slice(legacy.as_bytes());
    ikm[SHARED_SECRET_SIZE..].copy_from_slice(p384_shared);

    let hk = Hkdf::<Sha384>::new(None, &ikm);
    let mut out = [0u8; SHARED_SECRET_SIZE];
    let expanded = hk.expand(HYBRID_AGREEMENT_CONTEXT, &mut out);
    ikm.zeroize();
    expanded.map_err(|e| IdentityError::AgreementFailed(format!("HKDF expand failed: {e}")))?;
    Ok(SharedSecret(out))
}
