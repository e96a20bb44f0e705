//! The frozen, priority-ordered endpoint list shared by the chain-RPC and
//! aggregator failover executors.

use serde::Deserialize;

/// One endpoint in a priority-ordered failover list.
///
/// Smaller `metric` means higher priority. `retries` is the number of
/// *additional* attempts against this URL after the first, so a URL with
/// `retries = 0` is tried exactly once before the executor moves on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PriorityUrl {
    pub url: String,
    pub retries: u32,
    pub metric: i32,
}

impl PriorityUrl {
    pub fn new(url: impl Into<String>, retries: u32, metric: i32) -> Self {
        Self {
            url: url.into(),
            retries,
            metric,
        }
    }
}

/// A non-empty, priority-sorted, immutable list of endpoints.
///
/// Construction is the only place ordering happens (spec.md §3 invariant 6:
/// "the priority URL list is non-empty and frozen for the executor's
/// lifetime"); everything downstream iterates it in the order fixed here.
#[derive(Debug, Clone)]
pub struct FrozenPriorityList(Vec<PriorityUrl>);

impl FrozenPriorityList {
    /// Sorts `urls` ascending by `metric` and freezes the result.
    ///
    /// Returns `None` if `urls` is empty. An empty failover list is a
    /// construction-time configuration error, not a runtime one.
    pub fn new(mut urls: Vec<PriorityUrl>) -> Option<Self> {
        if urls.is_empty() {
            return None;
        }
        urls.sort_by_key(|u| u.metric);
        Some(Self(urls))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriorityUrl> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false // invariant: never empty once constructed
    }
}
