//! Aggregate failure reporting (spec.md §4.1 "Failure semantics").

use std::fmt;

/// One recorded attempt against one URL.
#[derive(Debug, Clone)]
pub struct Attempt<E> {
    pub url: String,
    pub attempt: u32,
    pub cause: E,
}

/// All recorded errors across every URL and attempt the executor made before
/// giving up. No silent retries: every attempt that didn't succeed shows up
/// here.
#[derive(Debug, Clone)]
pub struct AggregateError<E> {
    pub attempts: Vec<Attempt<E>>,
    /// Why the executor stopped: either a `Stop` outcome fired, or every
    /// URL's retries were exhausted.
    pub reason: StopReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A per-attempt handler returned `Outcome::Stop`.
    ClientStop,
    /// Every URL in the priority list exhausted its retries.
    AllUrlsExhausted,
}

impl<E: fmt::Display> fmt::Display for AggregateError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.reason {
            StopReason::ClientStop => "client-side invariant violated",
            StopReason::AllUrlsExhausted => "all URLs exhausted",
        };
        write!(f, "{reason} after {} attempt(s): ", self.attempts.len())?;
        for (i, a) in self.attempts.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{} (attempt {}): {}", a.url, a.attempt, a.cause)?;
        }
        Ok(())
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for AggregateError<E> {}
