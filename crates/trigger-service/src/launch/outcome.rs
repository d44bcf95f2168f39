//! Normalized results handed back to HTTP callers.

use serde::{Deserialize, Serialize};

/// A run the orchestrator accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchedRun {
    pub run_id: String,
    pub job_name: String,
}

/// External result contract: `{"status": "success" | "error", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum NormalizedOutcome {
    Success { run_id: String, job_name: String },
    Error { message: String, job_name: String },
}

impl From<LaunchedRun> for NormalizedOutcome {
    fn from(run: LaunchedRun) -> Self {
        NormalizedOutcome::Success {
            run_id: run.run_id,
            job_name: run.job_name,
        }
    }
}
