//! Deterministic dynamic-field object id derivation (spec.md §4.4 step 2,
//! §6 "fixed deterministic scheme keyed by parent id, the fully-qualified
//! move-type name of the key, and the serialized key bytes").
//!
//! The chain's own derivation hashes with BLAKE2b over a domain-separated
//! preimage; we do not reproduce Sui's exact on-chain bytes (SPEC_FULL.md
//! records this as an accepted approximation. Parity isn't required, only
//! that two calls with the same inputs always derive the same id and two
//! different inputs practically never collide), we just need a stable,
//! collision-resistant function of the same three inputs so the resource
//! fetcher can ask for a child by derived id instead of listing children.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

fn strip_0x(id: &str) -> &str {
    id.strip_prefix("0x").unwrap_or(id)
}

/// Derives the dynamic-field child id for `parent_id` keyed by a value of
/// move-type `key_type` whose BCS-serialized bytes are `key_bytes`.
pub fn derive_dynamic_field_id(parent_id: &str, key_type: &str, key_bytes: &[u8]) -> String {
    let mut hasher = Blake2b256::new();
    hasher.update(hex::decode(strip_0x(parent_id)).unwrap_or_default());
    hasher.update(key_type.as_bytes());
    hasher.update(key_bytes);
    let digest = hasher.finalize();
    format!("0x{}", hex::encode(digest))
}

/// Derives the dynamic-field id for a resource path, keyed by
/// `<site_package>::site::ResourcePath`.
pub fn derive_resource_field_id(parent_id: &str, site_package: &str, path: &str) -> String {
    let key_type = format!("{site_package}::site::ResourcePath");
    let key = crate::resource::ResourcePath {
        path: path.to_string(),
    };
    let key_bytes = bcs::to_bytes(&key).expect("ResourcePath is always serializable");
    derive_dynamic_field_id(parent_id, &key_type, &key_bytes)
}

/// Derives the dynamic-field id for the routes child, keyed by the literal
/// byte-string `"routes"` (spec.md §4.5).
pub fn derive_routes_field_id(parent_id: &str, site_package: &str) -> String {
    let key_type = format!("{site_package}::site::Routes");
    derive_dynamic_field_id(parent_id, &key_type, b"routes")
}
