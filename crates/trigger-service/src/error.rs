//! Error types for the trigger service.
//!
//! Every failure of a trigger call ends up as a [`TriggerError`] wrapped in a
//! [`TriggerFailure`], which renders the stable external error body
//! `{"status": "error", "message": ..., "job_name": ...}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::auth::AuthError;
use crate::graphql::TransportError;
use crate::launch::NormalizedOutcome;

#[derive(Error, Debug)]
pub enum TriggerError {
    /// Malformed request (empty job name, bad body)
    #[error("{0}")]
    InvalidInput(String),

    /// Missing or invalid credential
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Top-level GraphQL `errors`, all messages in order
    #[error("{}", .0.join("; "))]
    GraphqlProtocol(Vec<String>),

    /// Orchestrator rejected the run config
    #[error("run config validation failed: {}", .0.join("; "))]
    ValidationInvalid(Vec<String>),

    /// Network failure, timeout or non-2xx status
    #[error("failed to communicate with orchestrator: {0}")]
    Transport(#[from] TransportError),

    /// Orchestrator-side failure (`PythonError`)
    #[error("orchestrator error: {0}")]
    Internal(String),

    /// Unrecognized variant or malformed response
    #[error("unexpected orchestrator response: {0}")]
    UnexpectedResponseShape(String),
}

impl TriggerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TriggerError::InvalidInput(_)
            | TriggerError::GraphqlProtocol(_)
            | TriggerError::ValidationInvalid(_) => StatusCode::BAD_REQUEST,
            TriggerError::Auth(_) => StatusCode::UNAUTHORIZED,
            TriggerError::Transport(_)
            | TriggerError::Internal(_)
            | TriggerError::UnexpectedResponseShape(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A failed trigger call, tied to the job it was for.
#[derive(Debug)]
pub struct TriggerFailure {
    pub job_name: String,
    pub error: TriggerError,
}

impl TriggerFailure {
    pub fn new(job_name: impl Into<String>, error: impl Into<TriggerError>) -> Self {
        Self {
            job_name: job_name.into(),
            error: error.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.error.status_code()
    }

    pub fn outcome(&self) -> NormalizedOutcome {
        NormalizedOutcome::Error {
            message: self.error.to_string(),
            job_name: self.job_name.clone(),
        }
    }
}

impl std::fmt::Display for TriggerFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "job {}: {}", self.job_name, self.error)
    }
}

impl std::error::Error for TriggerFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl IntoResponse for TriggerFailure {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(job_name = %self.job_name, error = %self.error, "Trigger failed");
        } else {
            tracing::warn!(job_name = %self.job_name, status = status.as_u16(), error = %self.error, "Trigger rejected");
        }

        (status, Json(self.outcome())).into_response()
    }
}
