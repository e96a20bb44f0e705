//! Priority Failover Executor (spec.md §4.1).

use crate::error::{AggregateError, Attempt, StopReason};
use crate::outcome::Outcome;
use portal_core::{FrozenPriorityList, PriorityUrl};
use std::future::Future;
use std::time::Duration;

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

/// Drives an operation across a priority-sorted endpoint list with
/// per-endpoint retry counts and a bounded, fixed inter-retry delay.
///
/// Constructed once with a non-empty, frozen URL list (spec.md §3 invariant
/// 6); `invoke` is the sole operation, called independently per request.
pub struct PriorityExecutor {
    urls: FrozenPriorityList,
    retry_delay: Duration,
}

impl PriorityExecutor {
    /// Sorts `urls` ascending by `metric` and freezes the result via
    /// [`portal_core::FrozenPriorityList`]. Callers hand in `urls` in
    /// whatever order their configuration listed them.
    ///
    /// # Panics
    ///
    /// Panics if `urls` is empty.
    pub fn new(urls: Vec<PriorityUrl>, retry_delay: Duration) -> Self {
        let urls = FrozenPriorityList::new(urls)
            .expect("priority executor requires a non-empty URL list");
        Self { urls, retry_delay }
    }

    /// Calls `op(url)` across the priority list per spec.md §4.1 semantics,
    /// returning the first `Success`, or an [`AggregateError`] carrying
    /// every attempt made.
    pub async fn invoke<F, Fut, T, E>(&self, mut op: F) -> Result<T, AggregateError<E>>
    where
        F: FnMut(&str) -> Fut,
        Fut: Future<Output = Outcome<T, E>>,
    {
        let mut attempts = Vec::new();

        for endpoint in self.urls.iter() {
            for attempt in 0..=endpoint.retries {
                if attempt > 0 {
                    tokio::time::sleep(self.retry_delay).await;
                }

                match op(&endpoint.url).await {
                    Outcome::Success(value) => {
                        #[cfg(feature = "tracing")]
                        debug!(url = %endpoint.url, attempt, "priority executor succeeded");
                        #[cfg(feature = "metrics")]
                        metrics::counter!("priority_executor_calls_total", "result" => "success")
                            .increment(1);
                        return Ok(value);
                    }
                    Outcome::RetrySame(cause) => {
                        attempts.push(Attempt {
                            url: endpoint.url.clone(),
                            attempt,
                            cause,
                        });
                        if attempt == endpoint.retries {
                            #[cfg(feature = "tracing")]
                            warn!(url = %endpoint.url, "retries exhausted on endpoint, advancing");
                            break;
                        }
                    }
                    Outcome::RetryNext(cause) => {
                        attempts.push(Attempt {
                            url: endpoint.url.clone(),
                            attempt,
                            cause,
                        });
                        break;
                    }
                    Outcome::Stop(cause) => {
                        attempts.push(Attempt {
                            url: endpoint.url.clone(),
                            attempt,
                            cause,
                        });
                        #[cfg(feature = "metrics")]
                        metrics::counter!("priority_executor_calls_total", "result" => "stop")
                            .increment(1);
                        return Err(AggregateError {
                            attempts,
                            reason: StopReason::ClientStop,
                        });
                    }
                }
            }
        }

        #[cfg(feature = "metrics")]
        metrics::counter!("priority_executor_calls_total", "result" => "exhausted").increment(1);

        Err(AggregateError {
            attempts,
            reason: StopReason::AllUrlsExhausted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn succeeds_on_first_url_first_attempt() {
        let executor = PriorityExecutor::new(
            vec![PriorityUrl::new("a", 0, 100), PriorityUrl::new("b", 0, 200)],
            Duration::from_millis(1),
        );
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);

        let result: Result<&str, AggregateError<&str>> = executor
            .invoke(|url| {
                c.fetch_add(1, Ordering::SeqCst);
                assert_eq!(url, "a");
                async { Outcome::Success("ok") }
            })
            .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_same_exhausts_then_advances() {
        let executor = PriorityExecutor::new(
            vec![PriorityUrl::new("a", 2, 100), PriorityUrl::new("b", 0, 200)],
            Duration::from_millis(500),
        );
        let calls: Arc<std::sync::Mutex<Vec<String>>> = Arc::default();
        let c = Arc::clone(&calls);

        let result: Result<&str, AggregateError<&str>> = executor
            .invoke(|url| {
                c.lock().unwrap().push(url.to_string());
                let is_a = url == "a";
                async move {
                    if is_a {
                        Outcome::RetrySame("a down")
                    } else {
                        Outcome::Success("b ok")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "b ok");
        let log = calls.lock().unwrap();
        assert_eq!(log.as_slice(), ["a", "a", "a", "b"]);
    }

    #[tokio::test]
    async fn retry_next_skips_remaining_retries() {
        let executor = PriorityExecutor::new(
            vec![PriorityUrl::new("a", 5, 100), PriorityUrl::new("b", 0, 200)],
            Duration::from_millis(1),
        );
        let calls: Arc<std::sync::Mutex<Vec<String>>> = Arc::default();
        let c = Arc::clone(&calls);

        let result: Result<&str, AggregateError<&str>> = executor
            .invoke(|url| {
                c.lock().unwrap().push(url.to_string());
                let is_a = url == "a";
                async move {
                    if is_a {
                        Outcome::RetryNext("size limit")
                    } else {
                        Outcome::Success("b ok")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "b ok");
        assert_eq!(calls.lock().unwrap().as_slice(), ["a", "b"]);
    }

    #[tokio::test]
    async fn stop_fails_immediately_without_trying_next_url() {
        let executor = PriorityExecutor::new(
            vec![PriorityUrl::new("a", 3, 100), PriorityUrl::new("b", 3, 200)],
            Duration::from_millis(1),
        );

        let result: Result<&str, AggregateError<&str>> = executor
            .invoke(|_url| async { Outcome::Stop("bad request") })
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.reason, StopReason::ClientStop);
        assert_eq!(err.attempts.len(), 1);
    }

    #[tokio::test]
    async fn all_urls_exhausted_aggregates_every_attempt() {
        let executor = PriorityExecutor::new(
            vec![PriorityUrl::new("a", 2, 100), PriorityUrl::new("b", 2, 200)],
            Duration::from_millis(1),
        );

        let result: Result<&str, AggregateError<&str>> = executor
            .invoke(|_url| async { Outcome::RetrySame("down") })
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.reason, StopReason::AllUrlsExhausted);
        // 2 URLs * (1 + 2 retries) = 6 total attempts.
        assert_eq!(err.attempts.len(), 6);
    }
}
