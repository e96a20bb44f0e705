//! Resource Fetcher (spec.md §4.4): locates the on-chain resource record for
//! a path, following cross-site redirects with cycle detection.

use crate::dynamic_field::derive_resource_field_id;
use crate::resource::Resource;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use portal_chain::RpcSelector;
use portal_core::PortalError;
use serde_json::json;
use std::collections::HashSet;

const WALRUS_SITE_ADDRESS_KEY: &str = "walrus site address";

/// Per-request state threaded through recursive redirect following.
/// Dropped at the end of the request (spec.md §3 "Lifecycle"). `max_depth`
/// carries the configured `max_redirect_depth` (spec.md §6) so the bound is
/// set by the caller's configuration rather than fixed in this module.
#[derive(Debug)]
pub struct RedirectState {
    pub visited: HashSet<String>,
    pub depth: u32,
    pub max_depth: u32,
}

impl RedirectState {
    pub fn new(max_depth: u32) -> Self {
        Self {
            visited: HashSet::new(),
            depth: 0,
            max_depth,
        }
    }
}

/// A decoded resource record together with the chain-side object metadata
/// (its dynamic-field object id and version) needed for the
/// `x-resource-sui-object-*` response headers (spec.md §6).
#[derive(Debug, Clone)]
pub struct ResolvedResource {
    pub resource: Resource,
    pub object_id: String,
    pub object_version: String,
}

/// Resolves `path` against `site_id`, following any site-level `display`
/// redirects, and returns the decoded resource record.
pub async fn fetch_resource(
    rpc: &RpcSelector,
    site_package: &str,
    site_id: &str,
    path: &str,
    state: &mut RedirectState,
) -> Result<ResolvedResource, PortalError> {
    if state.visited.contains(site_id) {
        return Err(PortalError::LoopDetected);
    }
    if state.depth >= state.max_depth {
        return Err(PortalError::TooManyRedirects);
    }

    let derived_id = derive_resource_field_id(site_id, site_package, path);

    let responses = rpc
        .multi_get_object(
            &[site_id.to_string(), derived_id.clone()],
            json!({ "showDisplay": true, "showBcs": true }),
        )
        .await
        .map_err(|_| PortalError::FullNodeFail)?;

    state.visited.insert(site_id.to_string());

    let [site_response, resource_response] = match <[_; 2]>::try_from(responses) {
        Ok(pair) => pair,
        Err(_) => return Err(PortalError::ResourceNotFound),
    };

    let redirect_target = site_response
        .data
        .as_ref()
        .and_then(|d| d.display.as_ref())
        .and_then(|d| d.data.as_ref())
        .and_then(|fields| fields.get(WALRUS_SITE_ADDRESS_KEY));

    if let Some(target) = redirect_target {
        state.depth += 1;
        return Box::pin(fetch_resource(rpc, site_package, target, path, state)).await;
    }

    let resource = decode_resource(&resource_response)?;
    let object_version = resource_response
        .data
        .as_ref()
        .and_then(|d| d.version.clone())
        .unwrap_or_default();

    Ok(ResolvedResource {
        resource,
        object_id: derived_id,
        object_version,
    })
}

fn decode_resource(response: &portal_chain::ObjectResponse) -> Result<Resource, PortalError> {
    let bcs_bytes = response
        .data
        .as_ref()
        .and_then(|d| d.bcs.as_ref())
        .map(|bcs| &bcs.bcs_bytes);

    let Some(encoded) = bcs_bytes else {
        return Err(PortalError::ResourceNotFound);
    };

    let raw = STANDARD.decode(encoded).map_err(|_| PortalError::ResourceNotFound)?;
    let resource: Resource = bcs::from_bytes(&raw).map_err(|_| PortalError::ResourceNotFound)?;

    if !resource.is_valid() {
        return Err(PortalError::ResourceNotFound);
    }

    Ok(resource)
}
