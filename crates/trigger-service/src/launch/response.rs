//! Interpretation of the `launchRun` result union.
//!
//! The variant is always chosen from `__typename`. GraphQL returns fields of
//! non-matching fragments as absent or null, so field presence says nothing
//! about which variant was returned.

use serde::Deserialize;
use serde_json::Value;

use crate::error::TriggerError;

pub const LAUNCH_RUN_SUCCESS: &str = "LaunchRunSuccess";
pub const RUN_CONFIG_VALIDATION_INVALID: &str = "RunConfigValidationInvalid";
pub const PYTHON_ERROR: &str = "PythonError";

/// One entry of `RunConfigValidationInvalid.errors`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfigError {
    pub message: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// The `launchRun` result, one variant per `__typename`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchResult {
    Success { run_id: String },
    ValidationInvalid { errors: Vec<RunConfigError> },
    InternalError { message: String },
    /// Any typename not listed above
    Other { typename: String, message: Option<String> },
}

#[derive(Debug, Deserialize)]
struct GraphqlEnvelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<Value>>,
}

fn shape(message: impl Into<String>) -> TriggerError {
    TriggerError::UnexpectedResponseShape(message.into())
}

fn error_message(error: &Value) -> String {
    error
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string())
}

/// Interpret a raw GraphQL response.
///
/// Top-level `errors` win over `data` and surface as
/// [`TriggerError::GraphqlProtocol`] with every message in order. Missing
/// keys or wrong types surface as [`TriggerError::UnexpectedResponseShape`].
pub fn interpret(response: Value) -> Result<LaunchResult, TriggerError> {
    let envelope: GraphqlEnvelope = serde_json::from_value(response)
        .map_err(|e| shape(format!("response is not a GraphQL envelope: {e}")))?;

    if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
        return Err(TriggerError::GraphqlProtocol(
            errors.iter().map(error_message).collect(),
        ));
    }

    let launch = envelope
        .data
        .as_ref()
        .and_then(|data| data.get("launchRun"))
        .filter(|launch| launch.is_object())
        .ok_or_else(|| shape("missing data.launchRun"))?;

    let typename = launch
        .get("__typename")
        .and_then(Value::as_str)
        .ok_or_else(|| shape("launchRun has no __typename"))?;

    match typename {
        LAUNCH_RUN_SUCCESS => {
            let run_id = launch
                .get("run")
                .and_then(|run| run.get("runId"))
                .and_then(Value::as_str)
                .ok_or_else(|| shape("LaunchRunSuccess without run.runId"))?;
            Ok(LaunchResult::Success {
                run_id: run_id.to_string(),
            })
        }
        RUN_CONFIG_VALIDATION_INVALID => {
            let errors = launch
                .get("errors")
                .cloned()
                .ok_or_else(|| shape("RunConfigValidationInvalid without errors"))?;
            let errors: Vec<RunConfigError> = serde_json::from_value(errors)
                .map_err(|e| shape(format!("malformed validation errors: {e}")))?;
            Ok(LaunchResult::ValidationInvalid { errors })
        }
        PYTHON_ERROR => {
            let message = launch
                .get("message")
                .and_then(Value::as_str)
                .ok_or_else(|| shape("PythonError without message"))?;
            Ok(LaunchResult::InternalError {
                message: message.to_string(),
            })
        }
        other => Ok(LaunchResult::Other {
            typename: other.to_string(),
            message: launch
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success() {
        let response = json!({
            "data": { "launchRun": { "__typename": "LaunchRunSuccess", "run": { "runId": "abc123" } } }
        });
        assert_eq!(
            interpret(response).unwrap(),
            LaunchResult::Success { run_id: "abc123".to_string() }
        );
    }

    #[test]
    fn test_validation_invalid_keeps_order() {
        let response = json!({
            "data": { "launchRun": {
                "__typename": "RunConfigValidationInvalid",
                "errors": [
                    { "message": "bad field", "reason": "FIELD_NOT_DEFINED" },
                    { "message": "missing field", "reason": "MISSING_REQUIRED_FIELD" }
                ]
            } }
        });
        match interpret(response).unwrap() {
            LaunchResult::ValidationInvalid { errors } => {
                let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
                assert_eq!(messages, vec!["bad field", "missing field"]);
                assert_eq!(errors[0].reason.as_deref(), Some("FIELD_NOT_DEFINED"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_python_error() {
        let response = json!({
            "data": { "launchRun": { "__typename": "PythonError", "message": "boom", "run": null } }
        });
        assert_eq!(
            interpret(response).unwrap(),
            LaunchResult::InternalError { message: "boom".to_string() }
        );
    }

    #[test]
    fn test_discriminator_beats_field_presence() {
        // A run object is present but the typename says otherwise
        let response = json!({
            "data": { "launchRun": {
                "__typename": "PipelineNotFoundError",
                "message": "Could not find job countries_job",
                "run": { "runId": "should-not-be-used" }
            } }
        });
        assert_eq!(
            interpret(response).unwrap(),
            LaunchResult::Other {
                typename: "PipelineNotFoundError".to_string(),
                message: Some("Could not find job countries_job".to_string()),
            }
        );
    }

    #[test]
    fn test_top_level_errors_all_messages() {
        let response = json!({
            "data": null,
            "errors": [{ "message": "Unknown job" }, { "message": "Variable $jobName invalid" }]
        });
        match interpret(response).unwrap_err() {
            TriggerError::GraphqlProtocol(messages) => {
                assert_eq!(messages, vec!["Unknown job", "Variable $jobName invalid"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_errors_array_is_ignored() {
        let response = json!({
            "errors": [],
            "data": { "launchRun": { "__typename": "LaunchRunSuccess", "run": { "runId": "r1" } } }
        });
        assert!(matches!(interpret(response).unwrap(), LaunchResult::Success { .. }));
    }

    #[test]
    fn test_malformed_shapes() {
        let cases = vec![
            json!("not an object"),
            json!({ "data": {} }),
            json!({ "data": { "launchRun": null } }),
            json!({ "data": { "launchRun": { "run": { "runId": "x" } } } }),
            json!({ "data": { "launchRun": { "__typename": "LaunchRunSuccess", "run": null } } }),
            json!({ "data": { "launchRun": { "__typename": "LaunchRunSuccess", "run": { "runId": 7 } } } }),
            json!({ "data": { "launchRun": { "__typename": "RunConfigValidationInvalid", "errors": "oops" } } }),
            json!({ "data": { "launchRun": { "__typename": "PythonError" } } }),
        ];
        for response in cases {
            let err = interpret(response.clone()).unwrap_err();
            assert!(
                matches!(err, TriggerError::UnexpectedResponseShape(_)),
                "expected shape error for {response}"
            );
        }
    }
}
