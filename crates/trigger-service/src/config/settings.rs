//! Process-wide settings resolved from the environment.

use serde::Deserialize;

use super::{ConfigError, JobCatalog};
use crate::launch::RepositorySelector;

/// Orchestrator connection settings.
///
/// Environment variables are prefixed with `DAGSTER_`:
/// - `DAGSTER_HOST`: Orchestrator host (default: "localhost")
/// - `DAGSTER_PORT`: Orchestrator port (default: 3000)
/// - `DAGSTER_GRAPHQL_URL`: Full GraphQL endpoint, overrides host and port
/// - `DAGSTER_TIMEOUT_SECONDS`: Outbound request timeout (default: 30)
/// - `DAGSTER_REPOSITORY_LOCATION`: Default code location (default: "dlt_pipelines")
/// - `DAGSTER_REPOSITORY_NAME`: Default repository (default: "__repository__")
#[derive(Debug, Clone, Deserialize)]
pub struct OrchestratorConfig {
    #[serde(default = "default_orchestrator_host")]
    pub host: String,

    #[serde(default = "default_orchestrator_port")]
    pub port: u16,

    #[serde(default)]
    pub graphql_url: Option<String>,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    #[serde(default = "default_repository_location")]
    pub repository_location: String,

    #[serde(default = "default_repository_name")]
    pub repository_name: String,
}

/// API key settings (unprefixed `API_KEY` and `API_KEY_NAME`).
///
/// An unset or blank `API_KEY` disables authentication entirely.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_api_key_name")]
    pub api_key_name: String,
}

/// HTTP server settings, prefixed with `TRIGGER_`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Comma-separated list of allowed CORS origins. Any origin when unset.
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    /// Path of the job catalog file
    #[serde(default)]
    pub jobs_file: Option<String>,
}

fn default_orchestrator_host() -> String {
    "localhost".to_string()
}

fn default_orchestrator_port() -> u16 {
    3000
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_repository_location() -> String {
    "dlt_pipelines".to_string()
}

fn default_repository_name() -> String {
    "__repository__".to_string()
}

fn default_api_key_name() -> String {
    "X-API-Key".to_string()
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8000
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            host: default_orchestrator_host(),
            port: default_orchestrator_port(),
            graphql_url: None,
            timeout_seconds: default_timeout_seconds(),
            repository_location: default_repository_location(),
            repository_name: default_repository_name(),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_name: default_api_key_name(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cors_allowed_origins: None,
            jobs_file: None,
        }
    }
}

impl OrchestratorConfig {
    /// GraphQL endpoint of the orchestrator.
    pub fn endpoint_url(&self) -> String {
        match self.graphql_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!("http://{}:{}/graphql", self.host, self.port),
        }
    }

    /// Selector used for jobs without a catalog override.
    pub fn default_selector(&self) -> RepositorySelector {
        RepositorySelector {
            repository_location: self.repository_location.clone(),
            repository_name: self.repository_name.clone(),
        }
    }
}

impl SecurityConfig {
    /// The configured key, verbatim. Blank values mean "not configured".
    pub fn effective_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }
}

impl ServerConfig {
    /// Address suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parsed CORS origins; `None` means any origin is allowed.
    pub fn cors_origins(&self) -> Option<Vec<String>> {
        let raw = self.cors_allowed_origins.as_deref()?;
        let origins: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if origins.is_empty() {
            None
        } else {
            Some(origins)
        }
    }
}

/// Immutable settings for the whole process.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub server: ServerConfig,
    pub orchestrator: OrchestratorConfig,
    pub security: SecurityConfig,
    pub jobs: JobCatalog,
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Resolve settings from an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();

        let server: ServerConfig = envy::prefixed("TRIGGER_").from_iter(vars.clone())?;
        let orchestrator: OrchestratorConfig = envy::prefixed("DAGSTER_").from_iter(vars.clone())?;
        let security: SecurityConfig = envy::from_iter(vars)?;

        let jobs = match server.jobs_file.as_deref() {
            Some(path) if !path.trim().is_empty() => JobCatalog::from_file(path.trim())?,
            _ => JobCatalog::default(),
        };

        Ok(Self {
            server,
            orchestrator,
            security,
            jobs,
        })
    }

    pub fn endpoint_url(&self) -> String {
        self.orchestrator.endpoint_url()
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.orchestrator.timeout_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::from_vars(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(settings.endpoint_url(), "http://localhost:3000/graphql");
        assert_eq!(settings.timeout_seconds(), 30);
        assert_eq!(settings.orchestrator.repository_location, "dlt_pipelines");
        assert_eq!(settings.orchestrator.repository_name, "__repository__");
        assert_eq!(settings.security.api_key_name, "X-API-Key");
        assert!(settings.security.effective_api_key().is_none());
        assert_eq!(settings.server.bind_address(), "0.0.0.0:8000");
        assert!(settings.jobs.is_empty());
    }

    #[test]
    fn test_endpoint_from_host_and_port() {
        let settings = Settings::from_vars(vars(&[
            ("DAGSTER_HOST", "dagster-webserver"),
            ("DAGSTER_PORT", "3070"),
            ("DAGSTER_TIMEOUT_SECONDS", "5"),
        ]))
        .unwrap();
        assert_eq!(settings.endpoint_url(), "http://dagster-webserver:3070/graphql");
        assert_eq!(settings.timeout_seconds(), 5);
    }

    #[test]
    fn test_graphql_url_override() {
        let settings = Settings::from_vars(vars(&[
            ("DAGSTER_HOST", "ignored"),
            ("DAGSTER_GRAPHQL_URL", "https://dagster.internal/graphql"),
        ]))
        .unwrap();
        assert_eq!(settings.endpoint_url(), "https://dagster.internal/graphql");
    }

    #[test]
    fn test_invalid_port_fails() {
        let err = Settings::from_vars(vars(&[("DAGSTER_PORT", "not-a-port")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env(_)));
    }

    #[test]
    fn test_blank_api_key_disables_auth() {
        let settings = Settings::from_vars(vars(&[("API_KEY", "   ")])).unwrap();
        assert!(settings.security.effective_api_key().is_none());

        let settings = Settings::from_vars(vars(&[
            ("API_KEY", "s3cret"),
            ("API_KEY_NAME", "X-Trigger-Key"),
        ]))
        .unwrap();
        assert_eq!(settings.security.effective_api_key(), Some("s3cret"));
        assert_eq!(settings.security.api_key_name, "X-Trigger-Key");

        let settings = Settings::from_vars(vars(&[("API_KEY", " s3cret ")])).unwrap();
        assert_eq!(settings.security.effective_api_key(), Some(" s3cret "));
    }

    #[test]
    fn test_cors_origins() {
        let mut server = ServerConfig::default();
        assert!(server.cors_origins().is_none());

        server.cors_allowed_origins = Some("http://a.test, http://b.test,".to_string());
        assert_eq!(
            server.cors_origins().unwrap(),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn test_missing_jobs_file_fails() {
        let err = Settings::from_vars(vars(&[("TRIGGER_JOBS_FILE", "/nonexistent/jobs.toml")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
