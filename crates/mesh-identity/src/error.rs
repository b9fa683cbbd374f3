//! Error types for mesh-identity.
//!
//! All failures are ordinary return values; nothing in this crate panics on
//! untrusted input. Private key material is never included in error messages.

/// Identity error types covering all operations.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Malformed identity: {0}")]
    MalformedIdentity(String),

    #[error("Unknown identity type: {0}")]
    UnknownType(u8),

    #[error("Operation requires private key material")]
    MissingPrivateKey,

    #[error("Address derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Key agreement failed: {0}")]
    AgreementFailed(String),

    #[error("Nil identity")]
    NilIdentity,
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, IdentityError>;
