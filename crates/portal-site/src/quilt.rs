//! Quilt Patch ID Codec (spec.md §4.6): derives the public aggregator-facing
//! identifier for a resource packed inside a composite "quilt" blob.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;

const PREFIX_LEN: usize = 32;
const INTERNAL_ID_LEN: usize = 5;
const MAX_PATCH_ID_LEN: usize = 50;

/// The 5-byte internal id transported via the `x-wal-quilt-patch-internal-id`
/// header: `{version, start_index, end_index}`, the latter two little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuiltInternalId {
    pub version: u8,
    pub start_index: u16,
    pub end_index: u16,
}

impl QuiltInternalId {
    pub fn from_bytes(bytes: &[u8; INTERNAL_ID_LEN]) -> Self {
        Self {
            version: bytes[0],
            start_index: u16::from_le_bytes([bytes[1], bytes[2]]),
            end_index: u16::from_le_bytes([bytes[3], bytes[4]]),
        }
    }

    pub fn to_bytes(self) -> [u8; INTERNAL_ID_LEN] {
        let start = self.start_index.to_le_bytes();
        let end = self.end_index.to_le_bytes();
        [self.version, start[0], start[1], end[0], end[1]]
    }

    pub fn from_hex(hex_id: &str) -> Option<Self> {
        let bytes = hex::decode(hex_id).ok()?;
        let bytes: [u8; INTERNAL_ID_LEN] = bytes.try_into().ok()?;
        Some(Self::from_bytes(&bytes))
    }
}

/// Derives the public quilt-patch id the aggregator understands, from the
/// base blob id (standard base64) and the internal patch coordinates.
///
/// Steps (spec.md §4.6): decode the base blob id into a 32-byte buffer,
/// right-padding with zeroes if the decoded form is shorter; append the
/// 5 internal-id bytes; re-encode the 37-byte result as URL-safe base64
/// without padding, truncated to 50 characters.
pub fn derive_patch_id(base_blob_id_base64url: &str, internal_id: QuiltInternalId) -> String {
    let mut decoded = STANDARD
        .decode(base_blob_id_base64url)
        .unwrap_or_default();
    decoded.resize(PREFIX_LEN, 0);

    let mut buffer = decoded;
    buffer.extend_from_slice(&internal_id.to_bytes());

    let encoded = URL_SAFE_NO_PAD.encode(&buffer);
    encoded.chars().take(MAX_PATCH_ID_LEN).collect()
}

/// Decodes a previously-derived patch id back into its base prefix and
/// internal coordinates, for round-trip verification. Truncation to 50
/// characters means this only succeeds when the un-truncated encoding was
/// already <= 50 characters (37 raw bytes base64-encode to exactly 50 chars
/// with no padding, so this always holds for ids produced by this codec).
pub fn decode_patch_id(patch_id: &str) -> Option<(Vec<u8>, QuiltInternalId)> {
    let bytes = URL_SAFE_NO_PAD.decode(patch_id).ok()?;
    if bytes.len() != PREFIX_LEN + INTERNAL_ID_LEN {
        return None;
    }
    let prefix = bytes[..PREFIX_LEN].to_vec();
    let internal: [u8; INTERNAL_ID_LEN] = bytes[PREFIX_LEN..].try_into().ok()?;
    Some((prefix, QuiltInternalId::from_bytes(&internal)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_the_codec() {
        let base_id = STANDARD.encode([7u8; 32]);
        let internal = QuiltInternalId {
            version: 1,
            start_index: 3,
            end_index: 9,
        };
        let patch_id = derive_patch_id(&base_id, internal);
        assert_eq!(patch_id.len(), 50);

        let (prefix, decoded_internal) = decode_patch_id(&patch_id).unwrap();
        assert_eq!(prefix, vec![7u8; 32]);
        assert_eq!(decoded_internal, internal);
    }

    #[test]
    fn short_base_id_is_zero_padded() {
        let base_id = STANDARD.encode([9u8; 10]);
        let internal = QuiltInternalId {
            version: 0,
            start_index: 0,
            end_index: 0,
        };
        let patch_id = derive_patch_id(&base_id, internal);
        let (prefix, _) = decode_patch_id(&patch_id).unwrap();
        assert_eq!(&prefix[..10], &[9u8; 10]);
        assert_eq!(&prefix[10..], &[0u8; 22]);
    }

    #[test]
    fn internal_id_round_trips_through_hex() {
        let internal = QuiltInternalId {
            version: 2,
            start_index: 256,
            end_index: 512,
        };
        let hex_id = hex::encode(internal.to_bytes());
        assert_eq!(QuiltInternalId::from_hex(&hex_id), Some(internal));
    }
}
