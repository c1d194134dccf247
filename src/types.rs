//! Core value types shared across the protocol.
//!
//! Addresses follow the 20-byte EVM convention and render as 0x-prefixed hex.
//! Peers are stored in their 32-byte left-padded form, matching the wire
//! representation used by cross-chain endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// NFT identifier. Unique per asset registry.
pub type TokenId = u64;

/// A 20-byte account or contract address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The all-zero address. Not a valid mint recipient.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Returns the 32-byte left-padded form used for peer registration
    /// (12 zero bytes followed by the 20 address bytes).
    pub fn to_bytes32(&self) -> Bytes32 {
        let mut out = [0u8; 32];
        out[12..].copy_from_slice(&self.0);
        Bytes32(out)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped)
            .map_err(|e| anyhow::anyhow!("invalid address '{}': {}", s, e))?;
        let arr: [u8; 20] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| anyhow::anyhow!("invalid address '{}': expected 20 bytes", s))?;
        Ok(Address(arr))
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A 32-byte value, used for peer addresses on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bytes32(pub [u8; 32]);

impl Bytes32 {
    pub const ZERO: Bytes32 = Bytes32([0u8; 32]);

    /// Extracts the trailing 20 bytes as an address, requiring the 12 leading
    /// padding bytes to be zero.
    pub fn to_address(&self) -> Option<Address> {
        if self.0[..12].iter().any(|b| *b != 0) {
            return None;
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(&self.0[12..]);
        Some(Address(out))
    }
}

impl fmt::Display for Bytes32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Bytes32 {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped)
            .map_err(|e| anyhow::anyhow!("invalid bytes32 '{}': {}", s, e))?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| anyhow::anyhow!("invalid bytes32 '{}': expected 32 bytes", s))?;
        Ok(Bytes32(arr))
    }
}

impl Serialize for Bytes32 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Bytes32 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl From<Address> for Bytes32 {
    fn from(addr: Address) -> Self {
        addr.to_bytes32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_roundtrip() {
        let addr: Address = "0x0000000000000000000000000000000000000009"
            .parse()
            .unwrap();
        assert_eq!(addr.0[19], 9);
        assert_eq!(addr.to_string(), "0x0000000000000000000000000000000000000009");
    }

    #[test]
    fn test_address_rejects_wrong_length() {
        assert!("0x0102".parse::<Address>().is_err());
        assert!("not hex".parse::<Address>().is_err());
    }

    #[test]
    fn test_bytes32_padding() {
        let addr: Address = "0x00000000000000000000000000000000000000ff"
            .parse()
            .unwrap();
        let padded = addr.to_bytes32();
        assert_eq!(&padded.0[..12], &[0u8; 12]);
        assert_eq!(padded.to_address(), Some(addr));
    }

    #[test]
    fn test_bytes32_nonzero_padding_is_not_an_address() {
        let mut raw = [0u8; 32];
        raw[0] = 1;
        assert_eq!(Bytes32(raw).to_address(), None);
    }
}
