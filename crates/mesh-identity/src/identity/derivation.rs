//! Address derivation and the legacy mining loop.
//!
//! Legacy addresses are computationally bound to their key: each candidate
//! is SHA-512 of `{nonce, public key}` pushed through an Argon2id pass
//! (single lane, memory-touching on purpose), and the first five bytes of
//! the result form the candidate address. Grinding addresses in bulk has to
//! pay that cost per candidate, which rate-limits identity flooding.
//!
//! Hybrid addresses skip the mining loop entirely: a single SHA-384 over
//! both public keys yields the address and the fingerprint digest at once,
//! so validating a hybrid identity is one cheap hash. The two keys are
//! linked through that compound digest; neither can be swapped without
//! changing the address.

use argon2::{Algorithm, Argon2, Params, Version};
use log::{debug, trace};
use sha2::{Digest, Sha384, Sha512};

use crate::crypto::keys::{LEGACY_PUBLIC_KEY_SIZE, P384_PUBLIC_KEY_SIZE};
use crate::error::{IdentityError, Result};
use crate::identity::address::{Address, ADDRESS_SIZE};
use crate::identity::fingerprint::FINGERPRINT_HASH_SIZE;

/// Argon2id parameters for the legacy mixing pass. Single lane keeps the
/// iteration serial; the memory cost is what defeats cheap parallel or
/// hardware grinding.
const MIXING_M_COST: u32 = 16 * 1024; // KiB, 16 MiB
const MIXING_T_COST: u32 = 3;
const MIXING_P_COST: u32 = 1;

/// Domain-separation salt for the mixing pass; a protocol constant.
const MIXING_SALT: &[u8] = b"mesh-identity/address/v0";

/// Nonce value recorded in hybrid public records (no mining is performed).
pub const HYBRID_NONCE: u8 = 0;

/// Outcome of the legacy mining loop.
#[derive(Debug, Clone, Copy)]
pub struct MinedAddress {
    /// The nonce whose candidate address was accepted.
    pub nonce: u8,
    pub address: Address,
    /// Candidate derivations evaluated, for tests and diagnostics.
    pub attempts: u32,
}

/// Compute the candidate address for one `{nonce, public key}` pair.
///
/// Deterministic; replaying it with a stored nonce is how legacy
/// identities are validated.
pub fn legacy_address_candidate(
    nonce: u8,
    public: &[u8; LEGACY_PUBLIC_KEY_SIZE],
) -> Result<Address> {
    let mut hasher = Sha512::new();
    hasher.update([nonce]);
    hasher.update(public);
    let digest = hasher.finalize();

    let params = Params::new(
        MIXING_M_COST,
        MIXING_T_COST,
        MIXING_P_COST,
        Some(FINGERPRINT_HASH_SIZE),
    )
    .map_err(|e| IdentityError::DerivationFailed(format!("Argon2 params: {e}")))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut mixed = [0u8; FINGERPRINT_HASH_SIZE];
    argon2
        .hash_password_into(&digest, MIXING_SALT, &mut mixed)
        .map_err(|e| IdentityError::DerivationFailed(format!("Argon2 mixing: {e}")))?;

    Ok(address_from_digest(&mixed))
}

/// Search the nonce space for an address that passes the validity rules.
///
/// Returns `None` when every nonce is rejected for this key, which is
/// astronomically unlikely; the caller regenerates the key pair and
/// retries. The search is a bounded loop, not an open-ended wait.
pub fn mine_legacy_address(public: &[u8; LEGACY_PUBLIC_KEY_SIZE]) -> Result<Option<MinedAddress>> {
    let mut attempts = 0u32;
    for nonce in 0..=u8::MAX {
        attempts += 1;
        let candidate = legacy_address_candidate(nonce, public)?;
        if candidate.is_valid() {
            debug!("mined legacy address {candidate} (nonce {nonce}, {attempts} attempts)");
            return Ok(Some(MinedAddress {
                nonce,
                address: candidate,
                attempts,
            }));
        }
        trace!("rejected candidate {candidate} at nonce {nonce}");
    }
    Ok(None)
}

/// Compound digest over both public keys of a hybrid identity. Also the
/// hybrid fingerprint digest.
pub fn hybrid_compound_digest(
    nonce: u8,
    legacy_public: &[u8; LEGACY_PUBLIC_KEY_SIZE],
    p384_public: &[u8; P384_PUBLIC_KEY_SIZE],
) -> [u8; FINGERPRINT_HASH_SIZE] {
    let mut hasher = Sha384::new();
    hasher.update([nonce]);
    hasher.update(legacy_public);
    hasher.update(p384_public);
    let mut out = [0u8; FINGERPRINT_HASH_SIZE];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Fingerprint digest for a legacy identity: SHA-384 of the public key
/// alone. Deliberately not the digest used for address computation, which
/// is expensive to replay.
pub fn legacy_fingerprint_hash(
    public: &[u8; LEGACY_PUBLIC_KEY_SIZE],
) -> [u8; FINGERPRINT_HASH_SIZE] {
    let mut out = [0u8; FINGERPRINT_HASH_SIZE];
    out.copy_from_slice(&Sha384::digest(public));
    out
}

/// First `ADDRESS_SIZE` bytes of a derivation digest, as an address.
pub fn address_from_digest(digest: &[u8; FINGERPRINT_HASH_SIZE]) -> Address {
    let mut prefix = [0u8; ADDRESS_SIZE];
    prefix.copy_from_slice(&digest[..ADDRESS_SIZE]);
    Address::from_bytes(&prefix)
}
