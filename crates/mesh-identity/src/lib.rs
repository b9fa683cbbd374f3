//! mesh-identity — the identity primitive of the meshgrid peer-to-peer
//! network.
//!
//! An [`Identity`] binds a 40-bit network [`Address`] to one or two public
//! key pairs through a verifiable, computationally bound derivation, and
//! provides the signing, verification, key-agreement, and serialization
//! operations the higher protocol layers build on.
//!
//! Two identity generations coexist under one address space:
//!
//! - [`IdentityType::Legacy`]: a single Curve25519 record (X25519 +
//!   Ed25519). The address is mined through a memory-hard derivation that
//!   binds it to the key and rate-limits bulk generation.
//! - [`IdentityType::Hybrid`]: the legacy record plus a NIST P-384 pair.
//!   P-384 signs; both curves participate in key agreement between hybrid
//!   peers; the address comes from one compound hash, so validation is a
//!   single digest.
//!
//! ```no_run
//! use mesh_identity::{Identity, IdentityType};
//!
//! let alice = Identity::generate(IdentityType::Hybrid)?;
//! let sig = alice.sign(b"hello")?;
//! assert!(alice.verify(b"hello", &sig));
//!
//! let text = alice.to_string(); // public form, canonical
//! let from_wire: Identity = text.parse()?;
//! assert!(from_wire.locally_validate());
//! assert_eq!(from_wire, alice);
//! # Ok::<(), mesh_identity::IdentityError>(())
//! ```

pub mod crypto;
pub mod error;
pub mod identity;

// Re-export primary types and protocol constants
pub use crypto::agreement::{SharedSecret, SHARED_SECRET_SIZE};
pub use crypto::keys::{
    LEGACY_PUBLIC_KEY_SIZE, LEGACY_SECRET_KEY_SIZE, P384_PUBLIC_KEY_SIZE, P384_SECRET_KEY_SIZE,
};
pub use crypto::signing::{LEGACY_SIGNATURE_SIZE, MAX_SIGNATURE_SIZE, P384_SIGNATURE_SIZE};
pub use error::{IdentityError, Result};
pub use identity::address::{Address, ADDRESS_SIZE, RESERVED_ADDRESS_PREFIX};
pub use identity::codec::MARSHAL_SIZE_MAX;
pub use identity::fingerprint::{Fingerprint, FINGERPRINT_HASH_SIZE};
pub use identity::{Identity, IdentityType};
