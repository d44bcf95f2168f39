//! Transport-only GraphQL client adapter.
//!
//! The adapter posts a document and its variables to a single endpoint and
//! hands back the parsed JSON body. It knows nothing about the orchestrator's
//! schema; interpreting the response is the caller's job.

mod client;

pub use client::GraphqlClient;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Failures talking to the GraphQL endpoint.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Request exceeded the configured timeout
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Could not establish a connection
    #[error("connection failed: {0}")]
    Connect(String),

    /// Endpoint answered with a non-2xx status
    #[error("endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Any other failure while sending the request or reading the body
    #[error("request failed: {0}")]
    Request(String),

    /// 2xx response whose body is not JSON
    #[error("response body is not valid JSON: {0}")]
    Decode(String),
}

/// Sends a GraphQL document and returns the raw JSON response.
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn send(&self, document: &str, variables: Map<String, Value>) -> Result<Value, TransportError>;
}
