//! Priority failover executor: the single primitive both the chain-RPC layer
//! and the aggregator layer drive their retries through (spec.md §4.1, §9
//! "Priority executor as a standalone primitive").
//!
//! ```
//! use portal_executor::{Outcome, PriorityExecutor};
//! use portal_core::PriorityUrl;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let executor = PriorityExecutor::new(
//!     vec![PriorityUrl::new("https://a", 1, 100), PriorityUrl::new("https://b", 1, 200)],
//!     Duration::from_millis(750),
//! );
//!
//! let result: Result<&str, portal_executor::AggregateError<&str>> = executor
//!     .invoke(|_url| async { Outcome::Success("bytes") })
//!     .await;
//! assert_eq!(result.unwrap(), "bytes");
//! # }
//! ```

mod error;
mod executor;
mod outcome;

pub use error::{AggregateError, Attempt, StopReason};
pub use executor::PriorityExecutor;
pub use outcome::Outcome;
