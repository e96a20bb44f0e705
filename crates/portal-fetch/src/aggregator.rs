//! Aggregator HTTP client (spec.md §4.7.b-e): builds the blob endpoint,
//! forwards the optional `Range` header, and classifies each response into
//! the priority executor's `Outcome` per the per-attempt handler table.

use portal_core::PriorityUrl;
use portal_executor::{AggregateError, Outcome, PriorityExecutor};
use std::time::{Duration, Instant};
use thiserror::Error;

#[cfg(feature = "tracing")]
use tracing::warn;

#[derive(Debug, Clone, Error)]
pub enum AggregatorCallError {
    #[error("aggregator returned HTTP {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
}

/// The non-error result of one successful aggregator round trip. A 404 is
/// still a "success" in the executor's sense (spec.md §4.7.d: "this is a
/// semantic result ... further aggregators cannot help"), so it's modeled
/// as a variant here rather than an error the executor would retry past.
#[derive(Debug)]
pub enum AggregatorSuccess {
    Body { bytes: Vec<u8>, elapsed_ms: u64 },
    BlobUnavailable,
}

pub struct AggregatorClient {
    executor: PriorityExecutor,
    client: reqwest::Client,
    call_timeout: Duration,
}

impl AggregatorClient {
    pub fn new(urls: Vec<PriorityUrl>, retry_delay: Duration, call_timeout: Duration) -> Self {
        Self {
            executor: PriorityExecutor::new(urls, retry_delay),
            client: reqwest::Client::new(),
            call_timeout,
        }
    }

    /// Fetches `path_segment` (either `/v1/blobs/<id>` or
    /// `/v1/blobs/by-quilt-patch-id/<id>`, caller-built and already
    /// URL-encoded) from the priority-ordered aggregator list.
    pub async fn fetch(
        &self,
        path_segment: &str,
        range_header: Option<&str>,
    ) -> Result<AggregatorSuccess, AggregateError<AggregatorCallError>> {
        self.executor
            .invoke(|base_url| {
                let client = self.client.clone();
                let timeout = self.call_timeout;
                let endpoint = join_endpoint(base_url, path_segment);
                let range_header = range_header.map(str::to_string);
                async move {
                    let mut request = client.get(&endpoint);
                    if let Some(range) = &range_header {
                        request = request.header("Range", range.clone());
                    }
                    let started = Instant::now();
                    match tokio::time::timeout(timeout, request.send()).await {
                        Err(_) => Outcome::RetryNext(AggregatorCallError::Transport(
                            "timed out".to_string(),
                        )),
                        Ok(Err(e)) => {
                            Outcome::RetryNext(AggregatorCallError::Transport(e.to_string()))
                        }
                        Ok(Ok(response)) => classify(response, started).await,
                    }
                }
            })
            .await
    }
}

async fn classify(
    response: reqwest::Response,
    started: Instant,
) -> Outcome<AggregatorSuccess, AggregatorCallError> {
    let status = response.status().as_u16();
    match status {
        200..=299 => match response.bytes().await {
            Ok(bytes) => Outcome::Success(AggregatorSuccess::Body {
                bytes: bytes.to_vec(),
                elapsed_ms: started.elapsed().as_millis() as u64,
            }),
            Err(e) => Outcome::RetrySame(AggregatorCallError::Transport(e.to_string())),
        },
        404 => Outcome::Success(AggregatorSuccess::BlobUnavailable),
        403 => {
            #[cfg(feature = "tracing")]
            warn!(status, "aggregator size-limit, trying next");
            Outcome::RetryNext(AggregatorCallError::Status(status))
        }
        502 => Outcome::RetryNext(AggregatorCallError::Status(status)),
        500..=599 => Outcome::RetrySame(AggregatorCallError::Status(status)),
        400..=499 => Outcome::Stop(AggregatorCallError::Status(status)),
        _ => Outcome::RetrySame(AggregatorCallError::Status(status)),
    }
}

fn join_endpoint(base_url: &str, path_segment: &str) -> String {
    if base_url.ends_with('/') {
        format!("{}{}", base_url.trim_end_matches('/'), path_segment)
    } else {
        format!("{base_url}{path_segment}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn join_endpoint_handles_trailing_slash_either_way() {
        assert_eq!(
            join_endpoint("https://agg.example/", "/v1/blobs/abc"),
            "https://agg.example/v1/blobs/abc"
        );
        assert_eq!(
            join_endpoint("https://agg.example", "/v1/blobs/abc"),
            "https://agg.example/v1/blobs/abc"
        );
    }

    #[tokio::test]
    async fn success_reads_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/blobs/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"hello".to_vec()))
            .mount(&server)
            .await;

        let client = AggregatorClient::new(
            vec![PriorityUrl::new(server.uri(), 0, 100)],
            Duration::from_millis(1),
            Duration::from_secs(1),
        );
        let result = client.fetch("/v1/blobs/abc", None).await.unwrap();
        match result {
            AggregatorSuccess::Body { bytes, .. } => assert_eq!(bytes, b"hello"),
            other => panic!("expected body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn not_found_is_a_semantic_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = AggregatorClient::new(
            vec![PriorityUrl::new(server.uri(), 0, 100)],
            Duration::from_millis(1),
            Duration::from_secs(1),
        );
        let result = client.fetch("/v1/blobs/missing", None).await.unwrap();
        assert!(matches!(result, AggregatorSuccess::BlobUnavailable));
    }

    #[tokio::test]
    async fn failover_from_502_to_healthy_peer() {
        let failing = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&failing)
            .await;
        let healthy = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
            .mount(&healthy)
            .await;

        let client = AggregatorClient::new(
            vec![
                PriorityUrl::new(failing.uri(), 0, 100),
                PriorityUrl::new(healthy.uri(), 0, 200),
            ],
            Duration::from_millis(1),
            Duration::from_secs(1),
        );
        let result = client.fetch("/v1/blobs/abc", None).await.unwrap();
        match result {
            AggregatorSuccess::Body { bytes, .. } => assert_eq!(bytes, b"ok"),
            other => panic!("expected body, got {other:?}"),
        }
    }
}
