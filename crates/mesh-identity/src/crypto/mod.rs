//! Cryptographic primitives for mesh-identity.
//!
//! This module provides:
//! - X25519 key agreement and Ed25519 signatures (legacy cryptosystem)
//! - NIST P-384 ECDSA and ECDH (hybrid cryptosystem)
//! - HKDF-SHA384 combination of dual shared secrets
//! - Zeroize-on-drop key material
//! - Cryptographically secure random number generation

pub mod agreement;
pub mod keys;
pub mod random;
pub mod signing;
