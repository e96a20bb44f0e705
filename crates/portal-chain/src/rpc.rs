//! RPC Selector (spec.md §4.2): a thin adapter exposing the four chain calls
//! the core needs over the priority failover executor, each racing a
//! per-call timeout.

use crate::wire::{JsonRpcRequest, JsonRpcResponse, NameRecord, ObjectResponse};
use portal_core::PriorityUrl;
use portal_executor::{AggregateError, Outcome, PriorityExecutor};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[cfg(feature = "tracing")]
use tracing::warn;

#[derive(Debug, Clone, Error)]
pub enum RpcCallError {
    #[error("rpc call timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("rpc returned a structured error: {0}")]
    RpcError(String),
}

pub type RpcResult<T> = Result<T, AggregateError<RpcCallError>>;

/// Wraps a [`PriorityExecutor`] over the configured `rpc_urls` with the
/// four chain operations the rest of the core needs.
pub struct RpcSelector {
    executor: PriorityExecutor,
    client: reqwest::Client,
    call_timeout: Duration,
}

impl RpcSelector {
    pub fn new(urls: Vec<PriorityUrl>, retry_delay: Duration, call_timeout: Duration) -> Self {
        Self {
            executor: PriorityExecutor::new(urls, retry_delay),
            client: reqwest::Client::new(),
            call_timeout,
        }
    }

    async fn call<P, R>(&self, method: &str, params: P) -> RpcResult<R>
    where
        P: Serialize + Clone,
        R: serde::de::DeserializeOwned + Default,
    {
        self.executor
            .invoke(|url| {
                let client = self.client.clone();
                let params = params.clone();
                let timeout = self.call_timeout;
                let method = method.to_string();
                let url = url.to_string();
                async move {
                    let body = JsonRpcRequest {
                        jsonrpc: "2.0",
                        id: 1,
                        method: &method,
                        params,
                    };
                    let send = client.post(&url).json(&body).send();
                    match tokio::time::timeout(timeout, send).await {
                        Err(_) => Outcome::RetrySame(RpcCallError::Timeout(timeout)),
                        Ok(Err(e)) => Outcome::RetrySame(RpcCallError::Transport(e.to_string())),
                        Ok(Ok(response)) => match response.json::<JsonRpcResponse<R>>().await {
                            Err(e) => Outcome::RetrySame(RpcCallError::Transport(e.to_string())),
                            // A present `error` field always fails the call. Absent
                            // `error` succeeds even when `result` is null or missing
                            // (e.g. a naming-service miss), the reply is well-formed,
                            // it just carries no value, so we fall back to `R::default()`.
                            Ok(parsed) => match parsed.error {
                                Some(err) => {
                                    #[cfg(feature = "tracing")]
                                    warn!(%err, "rpc returned structured error");
                                    Outcome::RetrySame(RpcCallError::RpcError(err.to_string()))
                                }
                                None => Outcome::Success(parsed.result.unwrap_or_default()),
                            },
                        },
                    }
                }
            })
            .await
    }

    pub async fn get_object(&self, id: &str, options: Value) -> RpcResult<ObjectResponse> {
        self.call("sui_getObject", (id.to_string(), options)).await
    }

    /// Preserves input ordering: spec.md §4.2 requires results mirror the
    /// order of the input ids, which `sui_multiGetObject` already guarantees
    /// on the wire, so we pass the ids through untouched.
    pub async fn multi_get_object(
        &self,
        ids: &[String],
        options: Value,
    ) -> RpcResult<Vec<ObjectResponse>> {
        self.call("sui_multiGetObject", (ids.to_vec(), options))
            .await
    }

    pub async fn get_dynamic_field_object(
        &self,
        parent_id: &str,
        key: Value,
    ) -> RpcResult<ObjectResponse> {
        self.call(
            "suix_getDynamicFieldObject",
            (parent_id.to_string(), key),
        )
        .await
    }

    pub async fn get_name_record(&self, name: &str) -> RpcResult<Option<NameRecord>> {
        self.call("suix_resolveNameServiceNames", vec![name.to_string()])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn get_object_returns_parsed_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": { "data": { "objectId": "0xabc" } }
            })))
            .mount(&server)
            .await;

        let selector = RpcSelector::new(
            vec![PriorityUrl::new(server.uri(), 0, 100)],
            Duration::from_millis(1),
            Duration::from_secs(1),
        );

        let response = selector.get_object("0xabc", json!({})).await.unwrap();
        assert_eq!(response.data.unwrap().object_id.as_deref(), Some("0xabc"));
    }

    #[tokio::test]
    async fn failing_endpoint_retries_then_exhausts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let selector = RpcSelector::new(
            vec![PriorityUrl::new(server.uri(), 1, 100)],
            Duration::from_millis(1),
            Duration::from_secs(1),
        );

        let result = selector.get_object("0xabc", json!({})).await;
        assert!(result.is_err());
    }
}
