//! The per-attempt outcome contract (spec.md §4.1).

/// What a per-attempt handler reports back to the [`crate::PriorityExecutor`].
///
/// The executor itself is policy-free beyond ordering, retrying, and
/// delaying; callers decide which of these four buckets a given response
/// falls into. This collapses the three common failover policies (retry the
/// same endpoint, skip to the next endpoint, or abort outright) into one
/// primitive shared by both the chain-RPC layer and the aggregator layer.
#[derive(Debug)]
pub enum Outcome<T, E> {
    /// The attempt succeeded; return `v` to the caller immediately.
    Success(T),
    /// A transient, endpoint-local failure. Retry the same URL if attempts
    /// remain, otherwise advance to the next URL.
    RetrySame(E),
    /// A failure specific to this endpoint that retrying won't fix (e.g. a
    /// size limit). Advance to the next URL immediately without exhausting
    /// this URL's retry budget.
    RetryNext(E),
    /// A client-side invariant was violated. Fail immediately; no other
    /// endpoint can help.
    Stop(E),
}
