//! URL Fetcher (spec.md §4.7): composes the name resolver, resource fetcher,
//! router, and quilt codec with the aggregator priority executor to produce
//! a response, verifying SHA-256 along the way.

use crate::aggregator::{AggregatorClient, AggregatorSuccess};
use crate::decompress::{decompress, DecompressError, DEFAULT_CHUNK_SIZE};
use crate::outcome::FetchOutcome;
use crate::response::HttpResponse;
use portal_chain::{NameResolver, RpcSelector};
use portal_core::{sha256_base64, PortalError};
use portal_site::{derive_patch_id, fetch_resource, get_routes, QuiltInternalId, RedirectState, ResolvedResource};

const QUILT_HEADER: &str = "x-wal-quilt-patch-internal-id";
const FALLBACK_PATH: &str = "/404.html";

/// Injected so the orchestrator never hard-codes a blocklist policy; the
/// blocklist itself is a collaborator out of the core's scope (spec.md §1).
pub trait Blocklist: Send + Sync {
    fn is_blocked(&self, site_id: &str) -> bool;
}

pub struct NeverBlocked;

impl Blocklist for NeverBlocked {
    fn is_blocked(&self, _site_id: &str) -> bool {
        false
    }
}

pub struct UrlFetcher<B: Blocklist = NeverBlocked> {
    pub rpc: RpcSelector,
    pub aggregator: AggregatorClient,
    pub resolver: NameResolver,
    pub site_package: String,
    pub blocklist: B,
    /// Cap passed to §4.8's bounded decompression; `chunk_size` is a fixed
    /// constant, not configurable (spec.md §4.8).
    pub max_decompression_bytes: u64,
    /// Bound on cross-site redirect recursion (spec.md §3 invariant 3, §6).
    pub max_redirect_depth: u32,
}

/// `fetch_url`'s tagged outcome plus the resolved resource record, kept
/// alongside it only so the orchestrator can build response headers without
/// widening [`FetchOutcome`] itself beyond the shape spec.md §3 names.
struct FetchResult {
    outcome: FetchOutcome,
    resolved: Option<ResolvedResource>,
}

impl<B: Blocklist> UrlFetcher<B> {
    /// Top-level orchestrator entry point (spec.md §4.7 steps 1-7).
    pub async fn resolve_and_fetch(
        &self,
        label: &str,
        path: &str,
        preresolved_id: Option<String>,
    ) -> HttpResponse {
        let site_id = match preresolved_id {
            Some(id) => id,
            None => match self.resolver.resolve(label, &self.rpc).await {
                Ok(Some(id)) => id,
                Ok(None) => {
                    return error_response(PortalError::NoObjectId);
                }
                Err(_) => {
                    return error_response(PortalError::FullNodeFail);
                }
            },
        };

        if self.blocklist.is_blocked(&site_id) {
            return error_response(PortalError::SiteNotFound);
        }

        let (routes_result, initial) = tokio::join!(
            get_routes(&self.rpc, &self.site_package, &site_id),
            self.fetch_url(&site_id, path),
        );

        if !initial.outcome.is_resource_not_found() {
            return self.render(initial, path);
        }

        if let Ok(Some(table)) = routes_result {
            if let Some(target) = table.match_path(path) {
                let target = target.to_string();
                let routed = self.fetch_url(&site_id, &target).await;
                if !routed.outcome.is_resource_not_found() {
                    return self.render(routed, &target);
                }
            }
        }

        if path != FALLBACK_PATH {
            let fallback = self.fetch_url(&site_id, FALLBACK_PATH).await;
            match fallback.outcome {
                FetchOutcome::Ok { .. } => {
                    return self.render(fallback, FALLBACK_PATH);
                }
                FetchOutcome::AggregatorFail => return error_response(PortalError::AggregatorFail),
                FetchOutcome::HashMismatch => return error_response(PortalError::HashMismatch),
                FetchOutcome::ResourceNotFound | FetchOutcome::BlobUnavailable { .. } => {
                    return error_response(PortalError::ResourceNotFound);
                }
            }
        }

        error_response(PortalError::ResourceNotFound)
    }

    fn render(&self, result: FetchResult, path: &str) -> HttpResponse {
        match result.outcome {
            FetchOutcome::Ok { bytes, .. } => {
                let status = if path == FALLBACK_PATH { 404 } else { 200 };
                let resolved = result
                    .resolved
                    .expect("FetchOutcome::Ok is only produced alongside a resolved resource");

                let encoding = content_encoding(&resolved.resource.headers);
                let bytes = match decompress(&bytes, encoding, self.max_decompression_bytes, DEFAULT_CHUNK_SIZE) {
                    Ok(inflated) => inflated,
                    Err(DecompressError::BombSuspected(_)) => {
                        return error_response(PortalError::DecompressionBomb)
                    }
                    Err(DecompressError::Stream(_)) => return error_response(PortalError::AggregatorFail),
                };

                HttpResponse::success(
                    status,
                    &resolved.resource.headers,
                    &resolved.object_version,
                    &resolved.object_id,
                    bytes,
                )
            }
            FetchOutcome::ResourceNotFound => error_response(PortalError::ResourceNotFound),
            FetchOutcome::BlobUnavailable { blob_id } => {
                error_response(PortalError::BlobUnavailable { blob_id })
            }
            FetchOutcome::AggregatorFail => error_response(PortalError::AggregatorFail),
            FetchOutcome::HashMismatch => error_response(PortalError::HashMismatch),
        }
    }

    /// `fetch_url(site_id, path) -> FetchOutcome` (spec.md §4.7.a-g).
    async fn fetch_url(&self, site_id: &str, path: &str) -> FetchResult {
        let mut state = RedirectState::new(self.max_redirect_depth);
        let resolved = match fetch_resource(&self.rpc, &self.site_package, site_id, path, &mut state).await {
            Ok(resolved) => resolved,
            // All resource-fetch failure modes (absent record, redirect loop,
            // too-many-redirects) collapse into ResourceNotFound at this
            // boundary: spec.md §4.7.a reads "if not a resource -> ResourceNotFound".
            Err(_) => {
                return FetchResult {
                    outcome: FetchOutcome::ResourceNotFound,
                    resolved: None,
                }
            }
        };

        let endpoint = self.build_endpoint(&resolved.resource);
        let range_header = resolved.resource.range.as_ref().and_then(|r| r.to_header_value());

        let outcome = match self.aggregator.fetch(&endpoint, range_header.as_deref()).await {
            Err(_) => FetchOutcome::AggregatorFail,
            Ok(AggregatorSuccess::BlobUnavailable) => FetchOutcome::BlobUnavailable {
                blob_id: resolved.resource.blob_id.to_hex(),
            },
            Ok(AggregatorSuccess::Body { bytes, elapsed_ms }) => {
                let computed = sha256_base64(&bytes);
                let expected = resolved.resource.blob_hash.to_base64();
                if computed != expected {
                    FetchOutcome::HashMismatch
                } else {
                    FetchOutcome::Ok { bytes, elapsed_ms }
                }
            }
        };

        let keep_resolved = matches!(outcome, FetchOutcome::Ok { .. });
        FetchResult {
            outcome,
            resolved: keep_resolved.then_some(resolved),
        }
    }

    fn build_endpoint(&self, resource: &portal_site::Resource) -> String {
        let quilt_internal = resource
            .headers
            .get(QUILT_HEADER)
            .and_then(|hex_id| QuiltInternalId::from_hex(hex_id));

        match quilt_internal {
            Some(internal) => {
                let patch_id = derive_patch_id(&resource.blob_id.to_base64(), internal);
                format!("/v1/blobs/by-quilt-patch-id/{}", percent_encode(&patch_id))
            }
            None => format!("/v1/blobs/{}", percent_encode(&resource.blob_id.to_base64())),
        }
    }
}

/// Finds the on-chain `content-encoding` header (case-insensitive, as the
/// site publisher's headers map has no normalization guarantee) driving
/// §4.8's decompression step. Absent → passed through as `decompress`'s
/// unsupported-encoding case.
fn content_encoding(headers: &indexmap::IndexMap<String, String>) -> &str {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-encoding"))
        .map(|(_, v)| v.as_str())
        .unwrap_or("")
}

fn error_response(error: PortalError) -> HttpResponse {
    HttpResponse::error(error.http_status(), error.portal_body())
}

/// Percent-encodes the handful of characters standard/URL-safe base64 can
/// contain that aren't safe in a URL path segment.
fn percent_encode(segment: &str) -> String {
    segment
        .chars()
        .map(|c| match c {
            '/' => "%2F".to_string(),
            '+' => "%2B".to_string(),
            '=' => "%3D".to_string(),
            other => other.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_encode_escapes_base64_specials() {
        assert_eq!(percent_encode("a+b/c="), "a%2Bb%2Fc%3D");
    }
}
