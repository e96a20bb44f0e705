//! JSON-RPC wire format consumed from the chain-RPC endpoint (spec.md §6).

use serde::Deserialize;
use std::collections::HashMap;

/// The `result` of `sui_getObject` / `suix_getDynamicFieldObject`, or one
/// element of `sui_multiGetObject`'s result array.
///
/// An object lacking both `data` and `error` is treated as a valid (empty)
/// response by the RPC selector (spec.md §4.2). Validity is judged by the
/// caller, not this type.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ObjectResponse {
    pub data: Option<ObjectData>,
    pub error: Option<serde_json::Value>,
}

impl ObjectResponse {
    pub fn is_empty(&self) -> bool {
        self.data.is_none() && self.error.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectData {
    #[serde(rename = "objectId")]
    pub object_id: Option<String>,
    pub version: Option<String>,
    pub display: Option<DisplayData>,
    pub bcs: Option<BcsData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayData {
    pub data: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BcsData {
    #[serde(rename = "bcsBytes")]
    pub bcs_bytes: String,
}

/// The result of `suix_resolveNameServiceNames` (or an equivalent).
#[derive(Debug, Clone, Deserialize)]
pub struct NameRecord {
    #[serde(rename = "targetAddress")]
    pub target_address: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct JsonRpcRequest<'a, P> {
    pub jsonrpc: &'a str,
    pub id: u64,
    pub method: &'a str,
    pub params: P,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse<R> {
    pub result: Option<R>,
    pub error: Option<serde_json::Value>,
}
