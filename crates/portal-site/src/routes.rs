//! Router (spec.md §4.5): loads an optional routing table and matches a
//! request path against it by longest-pattern-wins, first-occurrence tie
//! break.

use crate::dynamic_field::derive_routes_field_id;
use crate::resource::Routes;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use indexmap::IndexMap;
use portal_chain::RpcSelector;
use portal_core::PortalError;
use regex::Regex;
use serde_json::json;

/// A compiled routing table: each pattern is kept alongside its `*`→`.*`
/// anchored regex so matching never recompiles.
pub struct RoutingTable {
    patterns: Vec<(String, Regex, String)>,
}

impl RoutingTable {
    pub fn from_routes(routes: &Routes) -> Self {
        Self::from_pattern_map(&routes.routes_list)
    }

    fn from_pattern_map(routes_list: &IndexMap<String, String>) -> Self {
        let patterns = routes_list
            .iter()
            .filter_map(|(pattern, target)| {
                let regex_source = format!("^{}$", regex::escape(pattern).replace("\\*", ".*"));
                Regex::new(&regex_source)
                    .ok()
                    .map(|regex| (pattern.clone(), regex, target.clone()))
            })
            .collect();
        Self { patterns }
    }

    /// Among all patterns matching `path`, returns the target of the one
    /// whose pattern string is longest; ties keep the first occurrence
    /// (spec.md §3 invariant 4).
    pub fn match_path(&self, path: &str) -> Option<&str> {
        // `Iterator::max_by_key` keeps the *last* maximum on ties; we need the
        // first, so fold manually and only replace on a strictly longer match.
        let mut best: Option<&(String, Regex, String)> = None;
        for entry in self.patterns.iter().filter(|(_, regex, _)| regex.is_match(path)) {
            match best {
                Some((pattern, _, _)) if pattern.len() >= entry.0.len() => {}
                _ => best = Some(entry),
            }
        }
        best.map(|(_, _, target)| target.as_str())
    }
}

/// Fetches the optional `"routes"` dynamic-field child of `site_id` and
/// decodes it into a [`RoutingTable`] (spec.md §4.5). Returns `Ok(None)`
/// when no routes child is attached; an RPC failure surfaces as
/// [`PortalError::FullNodeFail`] rather than being conflated with "absent".
pub async fn get_routes(
    rpc: &RpcSelector,
    site_package: &str,
    site_id: &str,
) -> Result<Option<RoutingTable>, PortalError> {
    let derived_id = derive_routes_field_id(site_id, site_package);
    let response = rpc
        .get_dynamic_field_object(site_id, json!({ "derivedId": derived_id }))
        .await
        .map_err(|_| PortalError::FullNodeFail)?;

    let Some(encoded) = response.data.as_ref().and_then(|d| d.bcs.as_ref()) else {
        return Ok(None);
    };

    let raw = STANDARD
        .decode(&encoded.bcs_bytes)
        .map_err(|_| PortalError::FullNodeFail)?;
    let routes: Routes = bcs::from_bytes(&raw).map_err(|_| PortalError::FullNodeFail)?;
    Ok(Some(RoutingTable::from_routes(&routes)))
}
