//! The `launchRun` mutation and its variables.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Mutation sent for every trigger.
///
/// `runConfigData` is always declared and always sent. The `Error` interface
/// fragment pulls a message out of result types that are not matched
/// explicitly (e.g. `PipelineNotFoundError`).
pub const LAUNCH_RUN_MUTATION: &str = r#"mutation LaunchRunMutation(
  $repositoryLocationName: String!
  $repositoryName: String!
  $jobName: String!
  $runConfigData: RunConfigData
  $executionMetadata: ExecutionMetadata
) {
  launchRun(
    executionParams: {
      selector: {
        repositoryLocationName: $repositoryLocationName
        repositoryName: $repositoryName
        jobName: $jobName
      }
      runConfigData: $runConfigData
      executionMetadata: $executionMetadata
    }
  ) {
    __typename
    ... on LaunchRunSuccess {
      run {
        runId
      }
    }
    ... on RunConfigValidationInvalid {
      errors {
        message
        reason
      }
    }
    ... on PythonError {
      message
    }
    ... on Error {
      message
    }
  }
}"#;

/// Tag added to every run to mark where it came from.
pub const TRIGGERED_BY_TAG: &str = "triggered_by";
pub const TRIGGERED_BY_VALUE: &str = "external_api";
/// Tag carrying the UTC time the trigger was received.
pub const TRIGGER_TIME_TAG: &str = "trigger_time";

/// The (location, name) pair that identifies the code location a job lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySelector {
    pub repository_location: String,
    pub repository_name: String,
}

/// Caller tags merged with the default service tags. Defaults win on conflict.
pub fn run_tags(user_tags: Option<&BTreeMap<String, String>>, now: DateTime<Utc>) -> BTreeMap<String, String> {
    let mut tags = user_tags.cloned().unwrap_or_default();
    tags.insert(TRIGGERED_BY_TAG.to_string(), TRIGGERED_BY_VALUE.to_string());
    tags.insert(
        TRIGGER_TIME_TAG.to_string(),
        now.to_rfc3339_opts(SecondsFormat::Millis, true),
    );
    tags
}

/// Variables for [`LAUNCH_RUN_MUTATION`].
///
/// `job_name` must already be trimmed. A missing run config is sent as `{}`.
pub fn launch_variables(
    selector: &RepositorySelector,
    job_name: &str,
    run_config: Option<&Value>,
    tags: &BTreeMap<String, String>,
) -> Map<String, Value> {
    let tags: Vec<Value> = tags
        .iter()
        .map(|(key, value)| json!({ "key": key, "value": value }))
        .collect();

    let mut variables = Map::new();
    variables.insert(
        "repositoryLocationName".to_string(),
        Value::String(selector.repository_location.clone()),
    );
    variables.insert(
        "repositoryName".to_string(),
        Value::String(selector.repository_name.clone()),
    );
    variables.insert("jobName".to_string(), Value::String(job_name.to_string()));
    variables.insert(
        "runConfigData".to_string(),
        run_config.cloned().unwrap_or_else(|| Value::Object(Map::new())),
    );
    variables.insert("executionMetadata".to_string(), json!({ "tags": tags }));
    variables
}
