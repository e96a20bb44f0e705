//! Configuration validation (spec.md §6 configuration table).
//!
//! Loading is an integration concern (out of scope per spec.md §1); this
//! crate only owns the validated shape and the rules a loader must satisfy,
//! the way `tower_resilience_retry::RetryConfigBuilder` validates its own
//! fields independent of where the caller got the numbers from.

use crate::priority::PriorityUrl;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("rpc_urls must not be empty")]
    EmptyRpcUrls,
    #[error("aggregator_urls must not be empty")]
    EmptyAggregatorUrls,
    #[error("site_package must be a 32-byte hex id prefixed with 0x, got {0:?}")]
    InvalidSitePackage(String),
    #[error("max_decompression_bytes must be >= chunk size ({chunk_size}), got {configured}")]
    DecompressionCapTooSmall { configured: u64, chunk_size: u64 },
    #[error("retry_delay_ms must be within 500..=1000, got {0}")]
    RetryDelayOutOfRange(u64),
}

/// Validated gateway configuration (spec.md §6).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub rpc_urls: Vec<PriorityUrl>,
    pub aggregator_urls: Vec<PriorityUrl>,
    pub site_package: String,
    pub b36_domain_resolution: bool,
    pub max_redirect_depth: u32,
    pub rpc_request_timeout_ms: u64,
    pub retry_delay_ms: u64,
    pub max_decompression_bytes: u64,
}

const DECOMPRESSION_CHUNK_SIZE: u64 = 64 * 1024;

impl PortalConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc_urls.is_empty() {
            return Err(ConfigError::EmptyRpcUrls);
        }
        if self.aggregator_urls.is_empty() {
            return Err(ConfigError::EmptyAggregatorUrls);
        }
        if !is_valid_package_id(&self.site_package) {
            return Err(ConfigError::InvalidSitePackage(self.site_package.clone()));
        }
        if self.max_decompression_bytes < DECOMPRESSION_CHUNK_SIZE {
            return Err(ConfigError::DecompressionCapTooSmall {
                configured: self.max_decompression_bytes,
                chunk_size: DECOMPRESSION_CHUNK_SIZE,
            });
        }
        if !(500..=1000).contains(&self.retry_delay_ms) {
            return Err(ConfigError::RetryDelayOutOfRange(self.retry_delay_ms));
        }
        Ok(())
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            rpc_urls: Vec::new(),
            aggregator_urls: Vec::new(),
            site_package: String::new(),
            b36_domain_resolution: false,
            max_redirect_depth: 3,
            rpc_request_timeout_ms: 7_000,
            retry_delay_ms: 750,
            max_decompression_bytes: 50 * 1024 * 1024,
        }
    }
}

fn is_valid_package_id(s: &str) -> bool {
    s.strip_prefix("0x")
        .map(|hex_part| hex_part.len() == 64 && hex_part.bytes().all(|b| b.is_ascii_hexdigit()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> PortalConfig {
        PortalConfig {
            rpc_urls: vec![PriorityUrl::new("https://rpc", 2, 100)],
            aggregator_urls: vec![PriorityUrl::new("https://agg", 2, 100)],
            site_package: format!("0x{}", "a".repeat(64)),
            ..PortalConfig::default()
        }
    }

    #[test]
    fn accepts_a_well_formed_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn rejects_empty_rpc_urls() {
        let mut config = valid_config();
        config.rpc_urls.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyRpcUrls));
    }

    #[test]
    fn rejects_malformed_package_id() {
        let mut config = valid_config();
        config.site_package = "not-hex".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSitePackage(_))
        ));
    }

    #[test]
    fn rejects_decompression_cap_below_chunk_size() {
        let mut config = valid_config();
        config.max_decompression_bytes = 1024;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DecompressionCapTooSmall { .. })
        ));
    }

    #[test]
    fn rejects_retry_delay_out_of_range() {
        let mut config = valid_config();
        config.retry_delay_ms = 50;
        assert_eq!(
            config.validate(),
            Err(ConfigError::RetryDelayOutOfRange(50))
        );
    }
}
