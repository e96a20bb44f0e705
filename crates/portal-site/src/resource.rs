//! On-chain wire types for a resource record (spec.md §6 "On-chain binary
//! encoding") and the range-header invariant (spec.md §3 invariant 5).

use indexmap::IndexMap;
use portal_core::U256;
use serde::{Deserialize, Serialize};

/// The BCS key used to derive the dynamic-field id for a resource path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePath {
    pub path: String,
}

/// A decoded resource record. `headers` preserves on-wire insertion order
/// (spec.md §3: "preserves insertion order; duplicate keys forbidden") via
/// an `IndexMap`, which BCS decodes as an ordered sequence of pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub path: String,
    pub headers: IndexMap<String, String>,
    pub blob_id: U256,
    pub blob_hash: U256,
    pub range: Option<Range>,
}

impl Resource {
    /// Invariant 1: a resource record is valid only if `blob_id` is present
    /// and non-zero. `blob_id` is never optional on the wire, so "present"
    /// collapses to "non-zero".
    pub fn is_valid(&self) -> bool {
        !self.blob_id.is_zero()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Range {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

impl Range {
    /// Invariant 5: well-formed iff at least one endpoint is set and,
    /// when both are set, `start <= end`. `u64` already rules out negatives.
    pub fn is_well_formed(&self) -> bool {
        match (self.start, self.end) {
            (None, None) => false,
            (Some(s), Some(e)) => s <= e,
            _ => true,
        }
    }

    /// Renders the `Range: bytes=<start?>-<end?>` header value, or `None`
    /// if the range isn't well-formed.
    pub fn to_header_value(&self) -> Option<String> {
        if !self.is_well_formed() {
            return None;
        }
        let start = self.start.map(|v| v.to_string()).unwrap_or_default();
        let end = self.end.map(|v| v.to_string()).unwrap_or_default();
        Some(format!("bytes={start}-{end}"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Routes {
    pub routes_list: IndexMap<String, String>,
}
