//! 40-bit network addresses.
//!
//! An address is the network-wide primary key for an identity. It is
//! derived from the identity's public key material, never assigned. The
//! all-zero value and any value with the reserved leading byte are invalid
//! and excluded during derivation.

use serde::{Deserialize, Serialize};

use crate::error::{IdentityError, Result};

/// Wire size of an address in bytes.
pub const ADDRESS_SIZE: usize = 5;

/// Reserved leading byte. Addresses starting with this byte are never
/// assigned; the value is a protocol constant, not derived.
pub const RESERVED_ADDRESS_PREFIX: u8 = 0xff;

/// A 40-bit network address.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Address(u64);

impl Address {
    /// Build an address from its 5-byte big-endian wire form.
    pub fn from_bytes(bytes: &[u8; ADDRESS_SIZE]) -> Self {
        Self(
            ((bytes[0] as u64) << 32)
                | ((bytes[1] as u64) << 24)
                | ((bytes[2] as u64) << 16)
                | ((bytes[3] as u64) << 8)
                | (bytes[4] as u64),
        )
    }

    /// 5-byte big-endian wire form.
    pub fn to_bytes(self) -> [u8; ADDRESS_SIZE] {
        [
            (self.0 >> 32) as u8,
            (self.0 >> 24) as u8,
            (self.0 >> 16) as u8,
            (self.0 >> 8) as u8,
            self.0 as u8,
        ]
    }

    /// The address as an integer (upper 24 bits are always zero).
    pub fn to_u64(self) -> u64 {
        self.0
    }

    /// True for the all-zero (nil) address.
    pub fn is_nil(self) -> bool {
        self.0 == 0
    }

    /// True if the leading byte falls in the reserved range.
    pub fn has_reserved_prefix(self) -> bool {
        (self.0 >> 32) as u8 == RESERVED_ADDRESS_PREFIX
    }

    /// True for addresses that may actually be assigned on the network.
    pub fn is_valid(self) -> bool {
        !self.is_nil() && !self.has_reserved_prefix()
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:010x}", self.0)
    }
}

impl std::str::FromStr for Address {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != ADDRESS_SIZE * 2 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(IdentityError::MalformedIdentity(format!(
                "address must be {} hex characters",
                ADDRESS_SIZE * 2
            )));
        }
        let value = u64::from_str_radix(s, 16)
            .map_err(|e| IdentityError::MalformedIdentity(format!("bad address: {e}")))?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_roundtrip_bytes() {
        let bytes = [0x01, 0x23, 0x45, 0x67, 0x89];
        let addr = Address::from_bytes(&bytes);
        assert_eq!(addr.to_bytes(), bytes);
        assert_eq!(addr.to_u64(), 0x0123456789);
    }

    #[test]
    fn test_address_display_parse_roundtrip() {
        let addr = Address::from_bytes(&[0xab, 0x00, 0x12, 0xff, 0x01]);
        let text = addr.to_string();
        assert_eq!(text.len(), 10);
        let parsed: Address = text.parse().unwrap();
        assert_eq!(parsed, addr);
    }

    #[test]
    fn test_address_nil() {
        let addr = Address::from_bytes(&[0; ADDRESS_SIZE]);
        assert!(addr.is_nil());
        assert!(!addr.is_valid());
        assert_eq!(Address::default(), addr);
    }

    #[test]
    fn test_address_reserved_prefix() {
        let addr = Address::from_bytes(&[0xff, 0x01, 0x02, 0x03, 0x04]);
        assert!(addr.has_reserved_prefix());
        assert!(!addr.is_valid());
    }

    #[test]
    fn test_address_valid() {
        let addr = Address::from_bytes(&[0x01, 0x02, 0x03, 0x04, 0x05]);
        assert!(addr.is_valid());
    }

    #[test]
    fn test_address_parse_rejects_bad_input() {
        assert!("".parse::<Address>().is_err());
        assert!("012345678".parse::<Address>().is_err());
        assert!("01234567890".parse::<Address>().is_err());
        assert!("01234567gg".parse::<Address>().is_err());
        assert!("+123456789".parse::<Address>().is_err());
    }
}
