//! Identity fingerprints.
//!
//! A fingerprint pairs an identity's address with a 384-bit digest of its
//! public key material. It is the canonical comparison key for identities:
//! equality, ordering, and hashing all go through the fingerprint, never
//! through raw key bytes, so comparison cost is independent of key size
//! and raw key material never feeds a comparison.

use crate::identity::address::Address;

/// Size of the fingerprint digest in bytes (384 bits).
pub const FINGERPRINT_HASH_SIZE: usize = 48;

/// Address plus public-key digest for one identity.
///
/// The digest is computed per identity type: legacy identities hash the
/// legacy public key alone, hybrid identities reuse the compound digest
/// that also yields their address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint {
    pub address: Address,
    pub hash: [u8; FINGERPRINT_HASH_SIZE],
}

impl Default for Fingerprint {
    fn default() -> Self {
        Self {
            address: Address::default(),
            hash: [0u8; FINGERPRINT_HASH_SIZE],
        }
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.address, hex::encode(self.hash))
    }
}
