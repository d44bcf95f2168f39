//! `reqwest` implementation of [`GraphqlTransport`].

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;

use super::{GraphqlTransport, TransportError};

/// Longest response body kept in a [`TransportError::Status`] message.
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Map<String, Value>,
}

/// HTTP client for the orchestrator's GraphQL endpoint.
#[derive(Clone, Debug)]
pub struct GraphqlClient {
    endpoint: String,
    timeout: Duration,
    http: reqwest::Client,
}

impl GraphqlClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to build HTTP client, using defaults");
                reqwest::Client::new()
            });
        Self::with_client(http, endpoint, timeout)
    }

    /// Use an existing client. The timeout is applied to every request, so it
    /// holds whatever the client itself was built with.
    pub fn with_client(http: reqwest::Client, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
            http,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout.as_secs())
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

#[async_trait]
impl GraphqlTransport for GraphqlClient {
    async fn send(&self, document: &str, variables: Map<String, Value>) -> Result<Value, TransportError> {
        let payload = GraphqlRequest {
            query: document,
            variables,
        };

        // `.json()` sets Content-Type: application/json
        let res = self
            .http
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            tracing::warn!(endpoint = %self.endpoint, status = status.as_u16(), "GraphQL endpoint returned an error status");
            let mut body = body;
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}
