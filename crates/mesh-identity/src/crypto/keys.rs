//! Key material for the two identity cryptosystems.
//!
//! Legacy identities carry a combined Curve25519 record: an X25519 key for
//! key agreement and an Ed25519 key for signatures, packed side by side in
//! fixed-size buffers. Hybrid identities add a NIST P-384 pair used for both
//! ECDSA signatures and ECDH agreement.
//!
//! All secret halves live inside wrapper types that zeroize on drop, so key
//! bytes are wiped on every exit path.

use ed25519_dalek::SigningKey;
use p384::elliptic_curve::sec1::ToEncodedPoint;
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::random::random_bytes;

/// Combined X25519 + Ed25519 public record size.
pub const LEGACY_PUBLIC_KEY_SIZE: usize = 64;
/// Combined X25519 + Ed25519 secret record size.
pub const LEGACY_SECRET_KEY_SIZE: usize = 64;
/// SEC1 compressed P-384 public point size.
pub const P384_PUBLIC_KEY_SIZE: usize = 49;
/// P-384 secret scalar size.
pub const P384_SECRET_KEY_SIZE: usize = 48;

/// Secret half of a legacy key record: X25519 scalar followed by the
/// Ed25519 seed. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct LegacySecret(pub(crate) [u8; LEGACY_SECRET_KEY_SIZE]);

impl LegacySecret {
    pub(crate) fn as_bytes(&self) -> &[u8; LEGACY_SECRET_KEY_SIZE] {
        &self.0
    }
}

/// P-384 secret scalar. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct P384Secret(pub(crate) [u8; P384_SECRET_KEY_SIZE]);

impl P384Secret {
    pub(crate) fn as_bytes(&self) -> &[u8; P384_SECRET_KEY_SIZE] {
        &self.0
    }
}

/// Secret half of a hybrid key record: the legacy secret plus the P-384
/// scalar. Both components zeroize on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct HybridSecret {
    pub(crate) legacy: LegacySecret,
    pub(crate) p384: P384Secret,
}

/// A freshly generated legacy (X25519 + Ed25519) key pair.
pub struct LegacyKeyPair {
    pub public: [u8; LEGACY_PUBLIC_KEY_SIZE],
    pub secret: LegacySecret,
}

impl LegacyKeyPair {
    /// Generate a new random legacy key pair.
    pub fn generate() -> Self {
        let mut dh_secret: [u8; 32] = random_bytes();
        let mut sign_seed: [u8; 32] = random_bytes();
        let pair = Self::from_secret_parts(&dh_secret, &sign_seed);
        // Stack copies of the secret halves; wipe them before returning.
        dh_secret.zeroize();
        sign_seed.zeroize();
        pair
    }

    /// Deterministically rebuild a key pair from its two secret halves.
    pub fn from_secret_parts(x25519_secret: &[u8; 32], ed25519_seed: &[u8; 32]) -> Self {
        let dh_public = X25519PublicKey::from(&StaticSecret::from(*x25519_secret));
        let sign_public = SigningKey::from_bytes(ed25519_seed).verifying_key();

        let mut public = [0u8; LEGACY_PUBLIC_KEY_SIZE];
        public[..32].copy_from_slice(dh_public.as_bytes());
        public[32..].copy_from_slice(sign_public.as_bytes());

        let mut secret = [0u8; LEGACY_SECRET_KEY_SIZE];
        secret[..32].copy_from_slice(x25519_secret);
        secret[32..].copy_from_slice(ed25519_seed);

        Self {
            public,
            secret: LegacySecret(secret),
        }
    }
}

/// A freshly generated NIST P-384 key pair.
pub struct P384KeyPair {
    pub public: [u8; P384_PUBLIC_KEY_SIZE],
    pub secret: P384Secret,
}

impl P384KeyPair {
    /// Generate a new random P-384 key pair.
    pub fn generate() -> Self {
        let secret_key = p384::SecretKey::random(&mut rand::thread_rng());
        let point = secret_key.public_key().to_encoded_point(true);

        let mut public = [0u8; P384_PUBLIC_KEY_SIZE];
        public.copy_from_slice(point.as_bytes());

        let mut secret = [0u8; P384_SECRET_KEY_SIZE];
        secret.copy_from_slice(&secret_key.to_bytes());

        Self {
            public,
            secret: P384Secret(secret),
        }
    }
}

/// Full key record for one identity. The tag is the identity type: every
/// operation in the crate dispatches on it exhaustively, so adding a third
/// cryptosystem generation forces review of each dispatch site.
#[derive(Clone)]
pub(crate) enum KeyMaterial {
    Legacy {
        /// Proof-of-work nonce found during address mining.
        nonce: u8,
        public: [u8; LEGACY_PUBLIC_KEY_SIZE],
        secret: Option<LegacySecret>,
    },
    Hybrid {
        nonce: u8,
        legacy_public: [u8; LEGACY_PUBLIC_KEY_SIZE],
        p384_public: [u8; P384_PUBLIC_KEY_SIZE],
        secret: Option<HybridSecret>,
    },
}

impl KeyMaterial {
    /// Wire-order public record: nonce byte followed by the public key(s).
    pub(crate) fn public_record(&self) -> Vec<u8> {
        match self {
            Self::Legacy { nonce, public, .. } => {
                let mut rec = Vec::with_capacity(1 + LEGACY_PUBLIC_KEY_SIZE);
                rec.push(*nonce);
                rec.extend_from_slice(public);
                rec
            }
            Self::Hybrid {
                nonce,
                legacy_public,
                p384_public,
                ..
            } => {
                let mut rec =
                    Vec::with_capacity(1 + LEGACY_PUBLIC_KEY_SIZE + P384_PUBLIC_KEY_SIZE);
                rec.push(*nonce);
                rec.extend_from_slice(legacy_public);
                rec.extend_from_slice(p384_public);
                rec
            }
        }
    }

    /// Wire-order secret record, if private material is present. The copy
    /// is wrapped in `Zeroizing` so it is wiped when the caller drops it.
    pub(crate) fn secret_record(&self) -> Option<Zeroizing<Vec<u8>>> {
        match self {
            Self::Legacy { secret, .. } => secret
                .as_ref()
                .map(|s| Zeroizing::new(s.as_bytes().to_vec())),
            Self::Hybrid { secret, .. } => secret.as_ref().map(|s| {
                let mut rec = Vec::with_capacity(LEGACY_SECRET_KEY_SIZE + P384_SECRET_KEY_SIZE);
                rec.extend_from_slice(s.legacy.as_bytes());
                rec.extend_from_slice(s.p384.as_bytes());
                Zeroizing::new(rec)
            }),
        }
    }

    pub(crate) fn has_secret(&self) -> bool {
        match self {
            Self::Legacy { secret, .. } => secret.is_some(),
            Self::Hybrid { secret, .. } => secret.is_some(),
        }
    }
}
