//! Addresses, transaction hashes and hex helpers.

use {
    crate::error::{ClientError, Result},
    serde::{de, Deserialize, Deserializer, Serialize, Serializer},
    std::{fmt, str::FromStr},
};

/// A 20-byte EVM account or contract address.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Reject the zero address, which contracts return for unset slots.
    pub fn non_zero(self) -> Result<Self> {
        if self.is_zero() {
            Err(ClientError::InvalidAddress(self.to_string()))
        } else {
            Ok(self)
        }
    }
}

impl FromStr for Address {
    type Err = ClientError;

    /// Accepts `0x`-prefixed, 40-hex-digit strings in any letter case.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ClientError::InvalidAddress(s.to_string());
        let digits = strip_hex_prefix(s).ok_or_else(invalid)?;
        if digits.len() != 40 {
            return Err(invalid());
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| invalid())?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// A 32-byte transaction hash.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TxHash([u8; 32]);

impl TxHash {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for TxHash {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ClientError::Decode(format!("invalid transaction hash '{s}'"));
        let digits = strip_hex_prefix(s).ok_or_else(invalid)?;
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| invalid())?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for TxHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TxHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

fn strip_hex_prefix(s: &str) -> Option<&str> {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
}

/// `0x`-prefixed lowercase hex of arbitrary bytes.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode `0x`-prefixed hex data. `"0x"` is the empty byte string.
pub fn from_hex(s: &str) -> Result<Vec<u8>> {
    let digits = strip_hex_prefix(s).ok_or_else(|| ClientError::Decode(format!("missing 0x prefix in '{s}'")))?;
    hex::decode(digits).map_err(|err| ClientError::Decode(format!("invalid hex '{s}': {err}")))
}

/// JSON-RPC quantity (`"0x1a"`) as an integer.
pub fn parse_quantity(s: &str) -> Result<u128> {
    let digits = strip_hex_prefix(s).ok_or_else(|| ClientError::Decode(format!("missing 0x prefix in '{s}'")))?;
    if digits.is_empty() {
        return Err(ClientError::Decode("empty quantity".to_string()));
    }
    u128::from_str_radix(digits, 16).map_err(|err| ClientError::Decode(format!("invalid quantity '{s}': {err}")))
}

/// Integer as a JSON-RPC quantity (no leading zeros).
pub fn to_quantity(value: u128) -> String {
    format!("{value:#x}")
}
