//! The network identity type.
//!
//! An [`Identity`] binds a 40-bit address to one or two public key pairs.
//! Legacy identities carry a single Curve25519 record and an address mined
//! through a memory-hard derivation; hybrid identities add a NIST P-384
//! pair and derive their address from one compound hash, making validation
//! cheap. Hybrid identities sign with P-384 and can still agree with
//! legacy peers over the shared Curve25519 component.
//!
//! Identities deserialized from untrusted bytes must pass
//! [`Identity::locally_validate`] once before any trust is extended.

pub mod address;
pub mod codec;
pub mod derivation;
pub mod fingerprint;

use log::debug;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha384};
use zeroize::Zeroize;

use crate::crypto::keys::{HybridSecret, KeyMaterial, LegacyKeyPair, P384KeyPair};
use crate::crypto::{agreement, signing};
use crate::error::{IdentityError, Result};
use address::Address;
use derivation::HYBRID_NONCE;
use fingerprint::{Fingerprint, FINGERPRINT_HASH_SIZE};

pub use crate::crypto::agreement::SharedSecret;

/// Identity type. Wire values are protocol constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum IdentityType {
    /// Single Curve25519 record, mined address.
    Legacy = 0,
    /// Curve25519 record plus NIST P-384 pair, compound-hash address.
    Hybrid = 1,
}

impl IdentityType {
    pub(crate) fn from_wire(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Legacy),
            1 => Some(Self::Hybrid),
            _ => None,
        }
    }

    /// Protocol value used in binary and text encodings.
    pub fn wire_value(self) -> u8 {
        self as u8
    }
}

/// A network identity: address, fingerprint, and key material.
///
/// Equality, ordering, and hashing all derive from the fingerprint, so two
/// identities built through different paths (generation vs deserialization)
/// from the same keys compare equal, and private material never affects
/// comparison.
#[derive(Clone)]
pub struct Identity {
    pub(crate) address: Address,
    pub(crate) fingerprint: Fingerprint,
    pub(crate) keys: KeyMaterial,
}

impl Identity {
    /// Generate a fresh identity of the given type.
    ///
    /// Legacy generation runs the mining loop and is CPU-bound; it can take
    /// seconds on constrained hardware, by design. Hybrid generation is
    /// fast. Run either off any latency-sensitive execution context.
    pub fn generate(kind: IdentityType) -> Result<Self> {
        match kind {
            IdentityType::Legacy => Self::generate_legacy(),
            IdentityType::Hybrid => Self::generate_hybrid(),
        }
    }

    fn generate_legacy() -> Result<Self> {
        loop {
            let pair = LegacyKeyPair::generate();
            if let Some(mined) = derivation::mine_legacy_address(&pair.public)? {
                let hash = derivation::legacy_fingerprint_hash(&pair.public);
                return Ok(Self {
                    address: mined.address,
                    fingerprint: Fingerprint {
                        address: mined.address,
                        hash,
                    },
                    keys: KeyMaterial::Legacy {
                        nonce: mined.nonce,
                        public: pair.public,
                        secret: Some(pair.secret),
                    },
                });
            }
            debug!("nonce space exhausted for candidate key, regenerating");
        }
    }

    fn generate_hybrid() -> Result<Self> {
        let legacy = LegacyKeyPair::generate();
        let (p384, digest, address) = loop {
            let p384 = P384KeyPair::generate();
            let digest =
                derivation::hybrid_compound_digest(HYBRID_NONCE, &legacy.public, &p384.public);
            let address = derivation::address_from_digest(&digest);
            if address.is_valid() {
                break (p384, digest, address);
            }
            debug!("hybrid digest yielded invalid address {address}, regenerating P-384 pair");
        };
        Ok(Self {
            address,
            fingerprint: Fingerprint {
                address,
                hash: digest,
            },
            keys: KeyMaterial::Hybrid {
                nonce: HYBRID_NONCE,
                legacy_public: legacy.public,
                p384_public: p384.public,
                secret: Some(HybridSecret {
                    legacy: legacy.secret,
                    p384: p384.secret,
                }),
            },
        })
    }

    /// Deterministically build a legacy identity from its two secret
    /// halves, re-deriving the public record and re-mining the address.
    pub fn legacy_from_keys(x25519_secret: &[u8; 32], ed25519_seed: &[u8; 32]) -> Result<Self> {
        let pair = LegacyKeyPair::from_secret_parts(x25519_secret, ed25519_seed);
        let mined = derivation::mine_legacy_address(&pair.public)?.ok_or_else(|| {
            IdentityError::DerivationFailed("no valid address for this key".into())
        })?;
        let hash = derivation::legacy_fingerprint_hash(&pair.public);
        Ok(Self {
            address: mined.address,
            fingerprint: Fingerprint {
                address: mined.address,
                hash,
            },
            keys: KeyMaterial::Legacy {
                nonce: mined.nonce,
                public: pair.public,
                secret: Some(pair.secret),
            },
        })
    }

    /// Assemble an identity from decoded parts, computing the fingerprint.
    /// Used by the codec; performs no cryptographic validation.
    pub(crate) fn from_parts(address: Address, keys: KeyMaterial) -> Self {
        let hash = match &keys {
            KeyMaterial::Legacy { public, .. } => derivation::legacy_fingerprint_hash(public),
            KeyMaterial::Hybrid {
                nonce,
                legacy_public,
                p384_public,
                ..
            } => derivation::hybrid_compound_digest(*nonce, legacy_public, p384_public),
        };
        Self {
            address,
            fingerprint: Fingerprint { address, hash },
            keys,
        }
    }

    /// The nil identity: address zero, no usable keys. Fails every
    /// cryptographic operation.
    pub fn nil() -> Self {
        Self::default()
    }

    pub fn is_nil(&self) -> bool {
        self.address.is_nil()
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn identity_type(&self) -> IdentityType {
        match self.keys {
            KeyMaterial::Legacy { .. } => IdentityType::Legacy,
            KeyMaterial::Hybrid { .. } => IdentityType::Hybrid,
        }
    }

    /// True if this identity carries private key material.
    pub fn has_private(&self) -> bool {
        self.keys.has_secret()
    }

    /// Recompute the address from the stored public key material and check
    /// it against the stored address.
    ///
    /// For legacy identities this replays the memory-hard derivation once
    /// (cheap relative to mining, expensive relative to a hash); for hybrid
    /// identities it is a single hash comparison. Call it once when
    /// accepting a previously-unseen identity from an untrusted source.
    pub fn locally_validate(&self) -> bool {
        if !self.address.is_valid() {
            return false;
        }
        match &self.keys {
            KeyMaterial::Legacy { nonce, public, .. } => {
                match derivation::legacy_address_candidate(*nonce, public) {
                    Ok(candidate) => candidate == self.address,
                    Err(_) => false,
                }
            }
            KeyMaterial::Hybrid {
                nonce,
                legacy_public,
                p384_public,
                ..
            } => {
                let digest = derivation::hybrid_compound_digest(*nonce, legacy_public, p384_public);
                derivation::address_from_digest(&digest) == self.address
            }
        }
    }

    /// Sign a message. Legacy identities sign with Ed25519, hybrid
    /// identities with ECDSA P-384.
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        if self.is_nil() {
            return Err(IdentityError::NilIdentity);
        }
        match &self.keys {
            KeyMaterial::Legacy { secret, .. } => {
                let secret = secret.as_ref().ok_or(IdentityError::MissingPrivateKey)?;
                Ok(signing::legacy_sign(secret, data).to_vec())
            }
            KeyMaterial::Hybrid { secret, .. } => {
                let secret = secret.as_ref().ok_or(IdentityError::MissingPrivateKey)?;
                Ok(signing::p384_sign(secret.p384.as_bytes(), data)?.to_vec())
            }
        }
    }

    /// Verify a signature against this identity's declared algorithm.
    /// Returns false on any mismatch or malformed input; never panics.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        if self.is_nil() {
            return false;
        }
        match &self.keys {
            KeyMaterial::Legacy { public, .. } => signing::legacy_verify(public, data, signature),
            KeyMaterial::Hybrid { p384_public, .. } => {
                signing::p384_verify(p384_public, data, signature)
            }
        }
    }

    /// Derive a shared secret with another identity.
    ///
    /// Requires our private material; only needs the peer's public keys.
    /// When both identities are hybrid the secret combines both curves;
    /// otherwise it is the legacy-only value.
    pub fn agree(&self, other: &Identity) -> Result<SharedSecret> {
        if self.is_nil() || other.is_nil() {
            return Err(IdentityError::NilIdentity);
        }
        match &self.keys {
            KeyMaterial::Legacy { secret, .. } => {
                let secret = secret.as_ref().ok_or(IdentityError::MissingPrivateKey)?;
                Ok(agreement::legacy_agree(secret, other.legacy_public()))
            }
            KeyMaterial::Hybrid { secret, .. } => {
                let secret = secret.as_ref().ok_or(IdentityError::MissingPrivateKey)?;
                let legacy_shared = agreement::legacy_agree(&secret.legacy, other.legacy_public());
                match &other.keys {
                    KeyMaterial::Hybrid { p384_public, .. } => {
                        let mut p384_shared =
                            agreement::p384_agree(secret.p384.as_bytes(), p384_public)?;
                        let combined = agreement::combine_hybrid(&legacy_shared, &p384_shared);
                        p384_shared.zeroize();
                        combined
                    }
                    KeyMaterial::Legacy { .. } => Ok(legacy_shared),
                }
            }
        }
    }

    /// SHA-384 over the public and private records together. All zero when
    /// this identity is nil or has no private material.
    pub fn hash_with_private(&self) -> [u8; FINGERPRINT_HASH_SIZE] {
        let mut out = [0u8; FINGERPRINT_HASH_SIZE];
        if self.is_nil() {
            return out;
        }
        let Some(secret_record) = self.keys.secret_record() else {
            return out;
        };
        let mut hasher = Sha384::new();
        hasher.update(self.keys.public_record());
        hasher.update(secret_record.as_slice());
        out.copy_from_slice(&hasher.finalize());
        out
    }

    /// Binary encoding. The nil identity marshals to an empty buffer.
    pub fn marshal(&self, include_private: bool) -> Vec<u8> {
        codec::marshal(self, include_private)
    }

    /// Decode one identity from a buffer, returning it and the number of
    /// bytes consumed. Rejects truncated or malformed input outright.
    pub fn unmarshal(data: &[u8]) -> Result<(Self, usize)> {
        codec::unmarshal(data)
    }

    /// Canonical text form; private material is emitted only when asked
    /// for and present.
    pub fn to_string_with_private(&self, include_private: bool) -> String {
        codec::to_string_with_private(self, include_private)
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            address: Address::default(),
            fingerprint: Fingerprint::default(),
            keys: KeyMaterial::Legacy {
                nonce: 0,
                public: [0u8; crate::crypto::keys::LEGACY_PUBLIC_KEY_SIZE],
                secret: None,
            },
        }
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
    }
}

impl Eq for Identity {}

impl PartialOrd for Identity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.fingerprint.cmp(&other.fingerprint)
    }
}

impl std::hash::Hash for Identity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::hash::Hash::hash(&self.fingerprint, state);
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print secret material
        f.debug_struct("Identity")
            .field("address", &self.address)
            .field("type", &self.identity_type())
            .field("fingerprint", &self.fingerprint)
            .field("has_private", &self.has_private())
            .finish()
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_with_private(false))
    }
}

impl std::str::FromStr for Identity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self> {
        codec::from_string(s)
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        // Canonical public-only string; private halves never serialize
        serializer.serialize_str(&self.to_string_with_private(false))
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Identity {
    pub(crate) fn legacy_public(&self) -> &[u8; crate::crypto::keys::LEGACY_PUBLIC_KEY_SIZE] {
        match &self.keys {
            KeyMaterial::Legacy { public, .. } => public,
            KeyMaterial::Hybrid { legacy_public, .. } => legacy_public,
        }
    }
}
