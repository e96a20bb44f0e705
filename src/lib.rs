//! `walrus-portal`: the resolve -> route -> fetch -> verify pipeline for a
//! gateway portal that serves blockchain-registered, content-addressed
//! static sites (spec.md §1-§2).
//!
//! This crate wires together [`portal_chain`] (RPC selector, name
//! resolver), [`portal_site`] (resource fetcher, router, quilt codec), and
//! [`portal_fetch`] (aggregator client, orchestrator) behind a single
//! [`Portal`] entry point, loading its [`PortalConfig`] from YAML the way
//! the rest of the stack expects configuration to arrive.

use portal_chain::{NameResolver, RpcSelector};
use portal_core::PortalConfig;
use portal_fetch::{AggregatorClient, Blocklist, HttpResponse, NeverBlocked, UrlFetcher};
use std::collections::HashMap;
use std::time::Duration;

/// Loads and validates a [`PortalConfig`] from a YAML file.
pub fn load_config(path: &str) -> Result<PortalConfig, ConfigLoadError> {
    let raw = std::fs::read_to_string(path)?;
    let config: PortalConfig = serde_yaml::from_str(&raw)?;
    config.validate()?;
    Ok(config)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("config validation failed: {0}")]
    Invalid(#[from] portal_core::ConfigError),
}

/// Installs a `tracing` subscriber reading its filter from `RUST_LOG`,
/// defaulting to `info` when unset. Mirrors the teacher crate's own
/// `tracing-subscriber` bootstrap; call once at process startup.
#[cfg(feature = "tracing")]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// The assembled gateway pipeline: one [`Portal`] is constructed per
/// process and lives for its lifetime (spec.md §5 "constructed once per
/// process").
pub struct Portal<B: Blocklist = NeverBlocked> {
    fetcher: UrlFetcher<B>,
}

impl Portal<NeverBlocked> {
    pub fn new(config: &PortalConfig, static_names: HashMap<String, String>) -> Self {
        Self::with_blocklist(config, static_names, NeverBlocked)
    }
}

impl<B: Blocklist> Portal<B> {
    pub fn with_blocklist(config: &PortalConfig, static_names: HashMap<String, String>, blocklist: B) -> Self {
        let retry_delay = Duration::from_millis(config.retry_delay_ms);
        let rpc_timeout = Duration::from_millis(config.rpc_request_timeout_ms);

        let rpc = RpcSelector::new(config.rpc_urls.clone(), retry_delay, rpc_timeout);
        let aggregator = AggregatorClient::new(config.aggregator_urls.clone(), retry_delay, rpc_timeout);
        let resolver = NameResolver::new(static_names, config.b36_domain_resolution);

        Self {
            fetcher: UrlFetcher {
                rpc,
                aggregator,
                resolver,
                site_package: config.site_package.clone(),
                blocklist,
                max_decompression_bytes: config.max_decompression_bytes,
                max_redirect_depth: config.max_redirect_depth,
            },
        }
    }

    /// Serves one request: `{subdomain, path}` in, `{status, headers, body}`
    /// out (spec.md §6 "HTTP ingress"). `path` defaulting to `/index.html`
    /// for `/` or empty is the frontend collaborator's job, not the core's.
    pub async fn handle(&self, subdomain: &str, path: &str, preresolved_id: Option<String>) -> HttpResponse {
        self.fetcher.resolve_and_fetch(subdomain, path, preresolved_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_load_surfaces_missing_file() {
        let result = load_config("/nonexistent/walrus-portal.yaml");
        assert!(matches!(result, Err(ConfigLoadError::Io(_))));
    }
}
