//! Shared application state.

use std::sync::Arc;

use crate::auth::ApiKeyAuth;
use crate::config::{ConfigError, Settings};
use crate::launch::JobTrigger;

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub trigger: Arc<JobTrigger>,
    pub auth: Arc<ApiKeyAuth>,
}

impl AppState {
    pub fn new(trigger: JobTrigger, auth: ApiKeyAuth) -> Self {
        Self {
            trigger: Arc::new(trigger),
            auth: Arc::new(auth),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let auth = ApiKeyAuth::from_config(&settings.security)?;
        Ok(Self::new(JobTrigger::from_settings(settings), auth))
    }
}
