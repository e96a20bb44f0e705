//! Shared primitives for the walrus-portal gateway core.
//!
//! This crate carries the pieces every other `portal-*` crate needs and that
//! don't belong to any single pipeline stage: the unified [`PortalError`]
//! taxonomy (§7 of the design spec), the frozen [`PriorityUrl`] list shared by
//! both the chain-RPC and aggregator failover executors (§3 invariant 6), and
//! the big-integer / SHA-256 helpers used for on-chain hash verification.

mod bytes;
mod config;
mod error;
mod priority;

pub use bytes::{sha256_base64, U256};
pub use config::{ConfigError, PortalConfig};
pub use error::PortalError;
pub use priority::{FrozenPriorityList, PriorityUrl};
