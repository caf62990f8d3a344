//! Lowercase hex helpers and serde adapters for byte fields.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum HexError {
    #[error("invalid hex: {0}")]
    Invalid(#[from] hex::FromHexError),
    #[error("expected {expected} bytes, got {got}")]
    Length { expected: usize, got: usize },
}

/// Encode bytes as lowercase hex, two characters per byte, no separators.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode a hex string (either case) back into bytes.
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, HexError> {
    Ok(hex::decode(s)?)
}

/// Decode exactly `N` bytes of hex.
pub fn hex_to_array<const N: usize>(s: &str) -> Result<[u8; N], HexError> {
    let v = hex_to_bytes(s)?;
    if v.len() != N {
        return Err(HexError::Length { expected: N, got: v.len() });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&v);
    Ok(out)
}

/// `#[serde(with = "hex_vec")]` for `Vec<u8>` fields.
pub mod hex_vec {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::bytes_to_hex(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        super::hex_to_bytes(&s).map_err(D::Error::custom)
    }
}

/// `#[serde(with = "hex_array")]` for fixed-size ids, hashes and tags.
pub mod hex_array {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer, const N: usize>(bytes: &[u8; N], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::bytes_to_hex(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(d: D) -> Result<[u8; N], D::Error> {
        let s = String::deserialize(d)?;
        super::hex_to_array::<N>(&s).map_err(D::Error::custom)
    }
}
