//! Response assembly (spec.md §6 "Response headers"): on-chain headers are
//! emitted first in insertion order, then the three core-added headers.

use indexmap::IndexMap;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: IndexMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Builds a success response: on-chain headers first (insertion order
    /// preserved), then `x-resource-sui-object-version`,
    /// `x-resource-sui-object-id`, `x-unix-time-cached`.
    pub fn success(
        status: u16,
        on_chain_headers: &IndexMap<String, String>,
        object_version: &str,
        object_id: &str,
        body: Vec<u8>,
    ) -> Self {
        let mut headers = on_chain_headers.clone();
        headers.insert(
            "x-resource-sui-object-version".to_string(),
            object_version.to_string(),
        );
        headers.insert("x-resource-sui-object-id".to_string(), object_id.to_string());
        headers.insert("x-unix-time-cached".to_string(), unix_time_millis().to_string());
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn error(status: u16, body: String) -> Self {
        Self {
            status,
            headers: IndexMap::new(),
            body: body.into_bytes(),
        }
    }
}

fn unix_time_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the unix epoch")
        .as_millis()
}
