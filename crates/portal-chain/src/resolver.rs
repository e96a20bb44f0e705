//! Name Resolver (spec.md §4.3): turns the subdomain label the request
//! arrived on into a Sui object id, trying in order a static table, a
//! base36-encoded object id, and finally the on-chain naming service.

use crate::base36::base36_to_hex;
use crate::rpc::RpcSelector;
use portal_executor::AggregateError;
use std::collections::HashMap;

/// The resolver couldn't reach the chain at all; distinct from a confirmed
/// "no site maps to this name" so callers can tell a 503 apart from a 404.
#[derive(Debug)]
pub struct ResolutionUnavailable(pub AggregateError<crate::rpc::RpcCallError>);

impl std::fmt::Display for ResolutionUnavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "name resolution unavailable: {}", self.0)
    }
}

impl std::error::Error for ResolutionUnavailable {}

/// Resolves a subdomain label to a Sui object id, or `None` if no site is
/// registered under that name.
pub struct NameResolver {
    static_table: HashMap<String, String>,
    b36_domain_resolution: bool,
}

impl NameResolver {
    pub fn new(static_table: HashMap<String, String>, b36_domain_resolution: bool) -> Self {
        Self {
            static_table,
            b36_domain_resolution,
        }
    }

    /// Resolves `label` (the leftmost subdomain component, lower-cased,
    /// already stripped of the portal's own domain suffix).
    pub async fn resolve(
        &self,
        label: &str,
        rpc: &RpcSelector,
    ) -> Result<Option<String>, ResolutionUnavailable> {
        if let Some(object_id) = self.static_table.get(label) {
            return Ok(Some(object_id.clone()));
        }

        // base36 decoding only applies to single-component labels: a label
        // containing dots is a dotted SuiNS name, never a base36 id.
        if self.b36_domain_resolution && !label.contains('.') {
            if let Some(object_id) = base36_to_hex(label) {
                return Ok(Some(object_id));
            }
        }

        // spec.md §4.3 step 3 looks up `<label>.sui`, not the bare label.
        let suins_name = format!("{label}.sui");
        match rpc.get_name_record(&suins_name).await {
            Ok(record) => Ok(record.and_then(|r| r.target_address)),
            Err(e) => Err(ResolutionUnavailable(e)),
        }
    }
}
