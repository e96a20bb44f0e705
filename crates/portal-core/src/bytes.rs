//! Big-integer and hashing helpers.
//!
//! `blob_hash` and `blob_id` are 256-bit integers on-chain. We avoid floating
//! point and native integer overflow entirely by carrying them as 32 raw
//! bytes and only ever comparing base64 encodings of that byte form, per the
//! design note in spec.md §9 ("Big integers for hash comparison").

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::{Error as DeError, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// A 256-bit unsigned integer, stored as 32 big-endian bytes.
///
/// On-chain (BCS/Move) `u256` values are serialized little-endian; decoding
/// reverses the wire bytes so that `as_be_bytes` always yields the
/// conventional big-endian form used for display, hex, and hash comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct U256([u8; 32]);

impl U256 {
    pub const ZERO: U256 = U256([0u8; 32]);

    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        U256(bytes)
    }

    pub fn as_be_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Base64 (standard alphabet) of the big-endian byte form, used to
    /// compare against `sha256_base64` of fetched bytes without ever
    /// allocating a bignum type.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// BCS stores Move's `u256` as 32 little-endian bytes; we store big-endian
/// internally, so decoding reverses byte order once, at the boundary.
impl<'de> Deserialize<'de> for U256 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LeBytesVisitor;

        impl<'de> Visitor<'de> for LeBytesVisitor {
            type Value = U256;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("32 little-endian bytes representing a u256")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<U256, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut le = [0u8; 32];
                for (i, slot) in le.iter_mut().enumerate() {
                    *slot = seq
                        .next_element()?
                        .ok_or_else(|| DeError::invalid_length(i, &self))?;
                }
                le.reverse();
                Ok(U256(le))
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<U256, E>
            where
                E: DeError,
            {
                if v.len() != 32 {
                    return Err(DeError::invalid_length(v.len(), &self));
                }
                let mut le = [0u8; 32];
                le.copy_from_slice(v);
                le.reverse();
                Ok(U256(le))
            }
        }

        deserializer.deserialize_tuple(32, LeBytesVisitor)
    }
}

impl Serialize for U256 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut le = self.0;
        le.reverse();
        le.serialize(serializer)
    }
}

/// SHA-256 of `bytes`, base64-encoded (standard alphabet), for comparison
/// against [`U256::to_base64`].
pub fn sha256_base64(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    STANDARD.encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn be_bytes_round_trip_through_bcs() {
        let mut be = [0u8; 32];
        be[31] = 0x01;
        be[0] = 0xff;
        let original = U256::from_be_bytes(be);

        let bytes = bcs::to_bytes(&original).unwrap();
        let decoded: U256 = bcs::from_bytes(&bytes).unwrap();

        assert_eq!(original, decoded);
        assert_eq!(decoded.as_be_bytes(), &be);
    }

    #[test]
    fn zero_is_zero() {
        assert!(U256::ZERO.is_zero());
        assert!(!U256::from_be_bytes([1; 32]).is_zero());
    }

    #[test]
    fn hash_matches_known_vector() {
        let digest_hex = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
        let expected = STANDARD.encode(hex::decode(digest_hex).unwrap());
        assert_eq!(sha256_base64(b""), expected);
    }
}
