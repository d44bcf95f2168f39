//! Job-trigger translator.
//!
//! Turns a [`TriggerRequest`] into a `launchRun` mutation, submits it through a
//! [`GraphqlTransport`], and folds the result union plus transport failures
//! into either a [`LaunchedRun`] or a [`TriggerFailure`]. Each call makes at
//! most one outbound request; nothing is retried, cached or deduplicated,
//! since launching a run is not idempotent.

mod document;
mod outcome;
mod response;

pub use document::{
    launch_variables, run_tags, RepositorySelector, LAUNCH_RUN_MUTATION, TRIGGERED_BY_TAG, TRIGGERED_BY_VALUE,
    TRIGGER_TIME_TAG,
};
pub use outcome::{LaunchedRun, NormalizedOutcome};
pub use response::{interpret, LaunchResult, RunConfigError};

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{JobCatalog, Settings};
use crate::error::{TriggerError, TriggerFailure};
use crate::graphql::{GraphqlClient, GraphqlTransport};

/// Inbound request to launch a job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriggerRequest {
    pub job_name: String,
    pub run_config: Option<Value>,
    pub tags: Option<BTreeMap<String, String>>,
}

impl TriggerRequest {
    pub fn new(job_name: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
            ..Default::default()
        }
    }

    pub fn with_run_config(mut self, run_config: Value) -> Self {
        self.run_config = Some(run_config);
        self
    }

    pub fn with_tags(mut self, tags: BTreeMap<String, String>) -> Self {
        self.tags = Some(tags);
        self
    }
}

pub struct JobTrigger {
    transport: Arc<dyn GraphqlTransport>,
    default_selector: RepositorySelector,
    catalog: JobCatalog,
}

impl JobTrigger {
    pub fn new(transport: Arc<dyn GraphqlTransport>, default_selector: RepositorySelector) -> Self {
        Self {
            transport,
            default_selector,
            catalog: JobCatalog::default(),
        }
    }

    pub fn with_catalog(mut self, catalog: JobCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Translator wired to the orchestrator described by `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        let client = GraphqlClient::new(
            settings.endpoint_url(),
            Duration::from_secs(settings.timeout_seconds()),
        );
        Self::new(Arc::new(client), settings.orchestrator.default_selector())
            .with_catalog(settings.jobs.clone())
    }

    /// Launch one run of `request.job_name`.
    pub async fn trigger(&self, request: TriggerRequest) -> Result<LaunchedRun, TriggerFailure> {
        let job_name = request.job_name.trim().to_string();
        match self.launch(&job_name, &request).await {
            Ok(run_id) => {
                tracing::info!(job_name = %job_name, run_id = %run_id, "Job launched");
                Ok(LaunchedRun { run_id, job_name })
            }
            Err(error) => Err(TriggerFailure::new(job_name, error)),
        }
    }

    async fn launch(&self, job_name: &str, request: &TriggerRequest) -> Result<String, TriggerError> {
        if job_name.is_empty() {
            return Err(TriggerError::InvalidInput("job name must not be empty".to_string()));
        }

        let run_config = match &request.run_config {
            None | Some(Value::Null) => None,
            Some(config @ Value::Object(_)) => Some(config),
            Some(_) => {
                return Err(TriggerError::InvalidInput(
                    "run_config must be a JSON object".to_string(),
                ))
            }
        };

        let selector = self.catalog.selector_for(job_name, &self.default_selector);
        let description = self
            .catalog
            .get(job_name)
            .and_then(|job| job.description.as_deref())
            .unwrap_or("");
        tracing::info!(
            job_name = %job_name,
            repository_location = %selector.repository_location,
            repository_name = %selector.repository_name,
            description,
            "Triggering job"
        );

        let tags = run_tags(request.tags.as_ref(), chrono::Utc::now());
        let variables = launch_variables(&selector, job_name, run_config, &tags);

        let response = self.transport.send(LAUNCH_RUN_MUTATION, variables).await?;
        tracing::debug!(job_name = %job_name, response = %response, "launchRun response");

        match interpret(response)? {
            LaunchResult::Success { run_id } => Ok(run_id),
            LaunchResult::ValidationInvalid { errors } => Err(TriggerError::ValidationInvalid(
                errors.into_iter().map(|e| e.message).collect(),
            )),
            LaunchResult::InternalError { message } => Err(TriggerError::Internal(message)),
            LaunchResult::Other { typename, message } => {
                Err(TriggerError::UnexpectedResponseShape(match message {
                    Some(message) => format!("launchRun returned {typename}: {message}"),
                    None => format!("launchRun returned {typename}"),
                }))
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording stub transport shared by the translator and handler tests.

    use async_trait::async_trait;
    use serde_json::{Map, Value};
    use std::sync::Mutex;

    use crate::graphql::{GraphqlTransport, TransportError};

    type Responder = Box<dyn Fn(usize) -> Result<Value, TransportError> + Send + Sync>;

    pub struct StubTransport {
        responder: Responder,
        calls: Mutex<Vec<(String, Map<String, Value>)>>,
    }

    impl StubTransport {
        /// `responder` receives the zero-based call index.
        pub fn new(responder: impl Fn(usize) -> Result<Value, TransportError> + Send + Sync + 'static) -> Self {
            Self {
                responder: Box::new(responder),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn replying(response: Value) -> Self {
            Self::new(move |_| Ok(response.clone()))
        }

        pub fn calls(&self) -> Vec<(String, Map<String, Value>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GraphqlTransport for StubTransport {
        async fn send(&self, document: &str, variables: Map<String, Value>) -> Result<Value, TransportError> {
            let index = {
                let mut calls = self.calls.lock().unwrap();
                calls.push((document.to_string(), variables));
                calls.len() - 1
            };
            (self.responder)(index)
        }
    }

    pub fn success(run_id: &str) -> Value {
        serde_json::json!({
            "data": { "launchRun": { "__typename": "LaunchRunSuccess", "run": { "runId": run_id } } }
        })
    }
}
