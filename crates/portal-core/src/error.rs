//! Unified error taxonomy and HTTP response mapping (spec.md §7).
//!
//! Modeled on `tower_resilience_core::ResilienceError<E>`: one enum every
//! pipeline stage converges to, so callers pattern-match instead of the core
//! throwing across component boundaries for expected failure modes.

use std::fmt;

/// Every terminal outcome the pipeline can produce, and the HTTP status it
/// maps to. None of these are retryable by the caller: by the time one of
/// these is constructed, the failover executors have already exhausted
/// their own retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalError {
    /// §4.3 exhausted all resolution strategies for the subdomain label.
    NoObjectId,
    /// Blocklisted site, or nothing exists at the resolved object id.
    SiteNotFound,
    /// RPC exhausted across all endpoints and all retries.
    FullNodeFail,
    /// No dynamic-field entry; no matching route; no `/404.html` either.
    ResourceNotFound,
    /// Aggregator responded 404: the blob expired, or the quilt patch id
    /// does not exist. `blob_id` is carried so the fallback page can name it.
    BlobUnavailable { blob_id: String },
    /// Aggregator exhausted across all endpoints, or returned an
    /// unexpected status that isn't one of the classified cases.
    AggregatorFail,
    /// Computed SHA-256 did not match the on-chain `blob_hash`.
    HashMismatch,
    /// A redirect chain revisited a site it had already visited.
    LoopDetected,
    /// A redirect chain exceeded `max_redirect_depth`.
    TooManyRedirects,
    /// Decompressing an aggregator response would exceed the configured cap.
    DecompressionBomb,
}

impl PortalError {
    /// The HTTP status this error renders as (spec.md §7 table).
    pub fn http_status(&self) -> u16 {
        match self {
            PortalError::NoObjectId
            | PortalError::SiteNotFound
            | PortalError::ResourceNotFound
            | PortalError::BlobUnavailable { .. }
            | PortalError::LoopDetected
            | PortalError::TooManyRedirects => 404,
            PortalError::FullNodeFail | PortalError::AggregatorFail => 503,
            PortalError::HashMismatch | PortalError::DecompressionBomb => 422,
        }
    }

    /// A short, stable, non-sensitive body suitable for the portal's own
    /// fallback error pages. The HTTP frontend collaborator may render a
    /// richer page around this; the core only guarantees this much text.
    pub fn portal_body(&self) -> String {
        match self {
            PortalError::NoObjectId => "no object id".to_string(),
            PortalError::SiteNotFound => "site not found".to_string(),
            PortalError::FullNodeFail => "full node unavailable".to_string(),
            PortalError::ResourceNotFound => "resource not found".to_string(),
            PortalError::BlobUnavailable { blob_id } => {
                format!("blob {blob_id} has expired or no longer exists")
            }
            PortalError::AggregatorFail => "aggregator fail".to_string(),
            PortalError::HashMismatch => "hash error".to_string(),
            PortalError::LoopDetected => "redirect loop detected".to_string(),
            PortalError::TooManyRedirects => "too many redirects".to_string(),
            PortalError::DecompressionBomb => "decompressed response too large".to_string(),
        }
    }
}

impl fmt::Display for PortalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.portal_body(), self.http_status())
    }
}

impl std::error::Error for PortalError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_matches_spec_table() {
        assert_eq!(PortalError::NoObjectId.http_status(), 404);
        assert_eq!(PortalError::FullNodeFail.http_status(), 503);
        assert_eq!(PortalError::HashMismatch.http_status(), 422);
        assert_eq!(
            PortalError::BlobUnavailable {
                blob_id: "0xabc".into()
            }
            .http_status(),
            404
        );
    }
}
