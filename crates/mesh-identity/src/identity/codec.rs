//! Binary and text encodings for identities.
//!
//! Binary form, fixed field order:
//! `[address:5][type+flags:1][public record][secret record?]`
//! where the public record is `nonce ‖ legacy key [‖ p384 key]` and the
//! secret record is appended only when the caller asks for private material
//! and the identity has some.
//!
//! Text form: `address:type:public_hex[:secret_hex]`, lowercase hex with a
//! stable field order, so re-encoding a decoded identity is byte-identical
//! for the same include-private choice.
//!
//! Decoding validates format only and never partially populates an
//! identity; `locally_validate` remains the caller's responsibility.

use zeroize::Zeroizing;

use crate::crypto::keys::{
    HybridSecret, KeyMaterial, LegacySecret, P384Secret, LEGACY_PUBLIC_KEY_SIZE,
    LEGACY_SECRET_KEY_SIZE, P384_PUBLIC_KEY_SIZE, P384_SECRET_KEY_SIZE,
};
use crate::error::{IdentityError, Result};
use crate::identity::address::{Address, ADDRESS_SIZE};
use crate::identity::{Identity, IdentityType};

/// Largest possible encoding: hybrid identity with private material.
pub const MARSHAL_SIZE_MAX: usize = ADDRESS_SIZE
    + 1
    + (1 + LEGACY_PUBLIC_KEY_SIZE + P384_PUBLIC_KEY_SIZE)
    + LEGACY_SECRET_KEY_SIZE
    + P384_SECRET_KEY_SIZE;

/// Flag bit: a secret record follows the public record.
const FLAG_HAS_SECRET: u8 = 0x10;
/// Low nibble of the flags byte carries the identity type.
const TYPE_MASK: u8 = 0x0f;

pub(crate) fn marshal(identity: &Identity, include_private: bool) -> Vec<u8> {
    if identity.is_nil() {
        return Vec::new();
    }

    let with_secret = include_private && identity.keys.has_secret();
    let mut out = Vec::with_capacity(MARSHAL_SIZE_MAX);
    out.extend_from_slice(&identity.address.to_bytes());

    let mut flags = identity.identity_type().wire_value() & TYPE_MASK;
    if with_secret {
        flags |= FLAG_HAS_SECRET;
    }
    out.push(flags);

    out.extend_from_slice(&identity.keys.public_record());
    if with_secret {
        if let Some(secret) = identity.keys.secret_record() {
            out.extend_from_slice(&secret);
        }
    }
    out
}

pub(crate) fn unmarshal(data: &[u8]) -> Result<(Identity, usize)> {
    let header_len = ADDRESS_SIZE + 1;
    if data.len() < header_len {
        return Err(IdentityError::MalformedIdentity(
            "truncated identity header".into(),
        ));
    }

    let mut addr_bytes = [0u8; ADDRESS_SIZE];
    addr_bytes.copy_from_slice(&data[..ADDRESS_SIZE]);
    let address = Address::from_bytes(&addr_bytes);
    if address.is_nil() {
        return Err(IdentityError::MalformedIdentity("nil address".into()));
    }

    let flags = data[ADDRESS_SIZE];
    if flags & !(TYPE_MASK | FLAG_HAS_SECRET) != 0 {
        return Err(IdentityError::MalformedIdentity(format!(
            "unknown flag bits in {flags:#04x}"
        )));
    }
    let wire_type = flags & TYPE_MASK;
    let kind =
        IdentityType::from_wire(wire_type).ok_or(IdentityError::UnknownType(wire_type))?;
    let with_secret = flags & FLAG_HAS_SECRET != 0;

    let mut cursor = header_len;
    let keys = match kind {
        IdentityType::Legacy => {
            let nonce = take(data, &mut cursor, 1)?[0];
            let public = take_array::<LEGACY_PUBLIC_KEY_SIZE>(data, &mut cursor)?;
            let secret = if with_secret {
                Some(LegacySecret(take_array::<LEGACY_SECRET_KEY_SIZE>(
                    data,
                    &mut cursor,
                )?))
            } else {
                None
            };
            KeyMaterial::Legacy {
                nonce,
                public,
                secret,
            }
        }
        IdentityType::Hybrid => {
            let nonce = take(data, &mut cursor, 1)?[0];
            let legacy_public = take_array::<LEGACY_PUBLIC_KEY_SIZE>(data, &mut cursor)?;
            let p384_public = take_array::<P384_PUBLIC_KEY_SIZE>(data, &mut cursor)?;
            let secret = if with_secret {
                let legacy = LegacySecret(take_array::<LEGACY_SECRET_KEY_SIZE>(data, &mut cursor)?);
                let p384 = P384Secret(take_array::<P384_SECRET_KEY_SIZE>(data, &mut cursor)?);
                Some(HybridSecret { legacy, p384 })
            } else {
                None
            };
            KeyMaterial::Hybrid {
                nonce,
                legacy_public,
                p384_public,
                secret,
            }
        }
    };

    Ok((Identity::from_parts(address, keys), cursor))
}

pub(crate) fn to_string_with_private(identity: &Identity, include_private: bool) -> String {
    if identity.is_nil() {
        return String::new();
    }
    let mut out = format!(
        "{}:{}:{}",
        identity.address,
        identity.identity_type().wire_value(),
        hex::encode(identity.keys.public_record())
    );
    if include_private {
        if let Some(secret) = identity.keys.secret_record() {
            out.push(':');
            out.push_str(&hex::encode(secret.as_slice()));
        }
    }
    out
}

pub(crate) fn from_string(s: &str) -> Result<Identity> {
    let fields: Vec<&str> = s.split(':').collect();
    if fields.len() != 3 && fields.len() != 4 {
        return Err(IdentityError::MalformedIdentity(format!(
            "expected 3 or 4 fields, got {}",
            fields.len()
        )));
    }

    let address: Address = fields[0].parse()?;
    if address.is_nil() {
        return Err(IdentityError::MalformedIdentity("nil address".into()));
    }

    let kind = match fields[1] {
        "0" => IdentityType::Legacy,
        "1" => IdentityType::Hybrid,
        other => {
            return Err(IdentityError::MalformedIdentity(format!(
                "unknown identity type field {other:?}"
            )))
        }
    };

    let public = decode_hex_field(fields[2], "public key")?;
    let secret = match fields.get(3) {
        Some(field) => Some(Zeroizing::new(decode_hex_field(field, "private key")?)),
        None => None,
    };

    let keys = match kind {
        IdentityType::Legacy => {
            let (nonce, public) = split_public::<LEGACY_PUBLIC_KEY_SIZE>(&public)?;
            let secret = match secret {
                Some(bytes) => Some(LegacySecret(exact_array::<LEGACY_SECRET_KEY_SIZE>(
                    &bytes,
                    "private key",
                )?)),
                None => None,
            };
            KeyMaterial::Legacy {
                nonce,
                public,
                secret,
            }
        }
        IdentityType::Hybrid => {
            if public.len() != 1 + LEGACY_PUBLIC_KEY_SIZE + P384_PUBLIC_KEY_SIZE {
                return Err(IdentityError::MalformedIdentity(
                    "wrong hybrid public key length".into(),
                ));
            }
            let nonce = public[0];
            let mut legacy_public = [0u8; LEGACY_PUBLIC_KEY_SIZE];
            legacy_public.copy_from_slice(&public[1..1 + LEGACY_PUBLIC_KEY_SIZE]);
            let mut p384_public = [0u8; P384_PUBLIC_KEY_SIZE];
            p384_public.copy_from_slice(&public[1 + LEGACY_PUBLIC_KEY_SIZE..]);
            let secret = match secret {
                Some(bytes) => {
                    if bytes.len() != LEGACY_SECRET_KEY_SIZE + P384_SECRET_KEY_SIZE {
                        return Err(IdentityError::MalformedIdentity(
                            "wrong hybrid private key length".into(),
                        ));
                    }
                    let mut legacy = [0u8; LEGACY_SECRET_KEY_SIZE];
                    legacy.copy_from_slice(&bytes[..LEGACY_SECRET_KEY_SIZE]);
                    let mut p384 = [0u8; P384_SECRET_KEY_SIZE];
                    p384.copy_from_slice(&bytes[LEGACY_SECRET_KEY_SIZE..]);
                    Some(HybridSecret {
                        legacy: LegacySecret(legacy),
                        p384: P384Secret(p384),
                    })
                }
                None => None,
            };
            KeyMaterial::Hybrid {
                nonce,
                legacy_public,
                p384_public,
                secret,
            }
        }
    };

    Ok(Identity::from_parts(address, keys))
}

fn take<'a>(data: &'a [u8], cursor: &mut usize, len: usize) -> Result<&'a [u8]> {
    let end = cursor
        .checked_add(len)
        .filter(|&end| end <= data.len())
        .ok_or_else(|| IdentityError::MalformedIdentity("truncated identity".into()))?;
    let slice = &data[*cursor..end];
    *cursor = end;
    Ok(slice)
}

fn take_array<const N: usize>(data: &[u8], cursor: &mut usize) -> Result<[u8; N]> {
    let mut out = [0u8; N];
    out.copy_from_slice(take(data, cursor, N)?);
    Ok(out)
}

fn decode_hex_field(field: &str, what: &str) -> Result<Vec<u8>> {
    hex::decode(field)
        .map_err(|e| IdentityError::MalformedIdentity(format!("bad {what} hex: {e}")))
}

fn exact_array<const N: usize>(bytes: &[u8], what: &str) -> Result<[u8; N]> {
    if bytes.len() != N {
        return Err(IdentityError::MalformedIdentity(format!(
            "wrong {what} length: {} != {N}",
            bytes.len()
        )));
    }
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok(out)
}

fn split_public<const N: usize>(public: &[u8]) -> Result<(u8, [u8; N])> {
    if public.len() != 1 + N {
        return Err(IdentityError::MalformedIdentity(
            "wrong public key length".into(),
        ));
    }
    let mut keys = [0u8; N];
    keys.copy_from_slice(&public[1..]);
    Ok((public[0], keys))
}
