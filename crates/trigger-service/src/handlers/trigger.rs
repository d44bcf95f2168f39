//! Trigger endpoint.

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::Uri,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{TriggerError, TriggerFailure};
use crate::launch::{NormalizedOutcome, TriggerRequest};
use crate::state::AppState;

/// Optional JSON body of `POST /trigger/{job_name}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TriggerBody {
    pub run_config: Option<Value>,
    pub tags: Option<BTreeMap<String, String>>,
}

impl TriggerBody {
    /// An empty body means "no run config, no tags".
    pub fn parse(bytes: &[u8]) -> Result<Self, String> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes).map_err(|e| format!("invalid request body: {e}"))
    }
}

/// Last path segment as sent, for error bodies when the path does not decode.
pub(crate) fn raw_job_segment(uri: &Uri) -> &str {
    uri.path().rsplit('/').next().unwrap_or_default()
}

/// `POST /trigger/{job_name}`
///
/// Authentication runs before this handler as route middleware.
pub async fn trigger_job(
    State(state): State<AppState>,
    uri: Uri,
    path: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<Json<NormalizedOutcome>, TriggerFailure> {
    let Path(job_name) = path.map_err(|e| {
        TriggerFailure::new(
            raw_job_segment(&uri),
            TriggerError::InvalidInput(format!("invalid job name: {}", e.body_text())),
        )
    })?;

    let body = TriggerBody::parse(&body)
        .map_err(|e| TriggerFailure::new(job_name.trim(), TriggerError::InvalidInput(e)))?;

    let request = TriggerRequest {
        job_name,
        run_config: body.run_config,
        tags: body.tags,
    };

    let run = state.trigger.trigger(request).await?;
    Ok(Json(run.into()))
}
