//! Job catalog loaded from a config file.
//!
//! The catalog lists known jobs with an optional description and optional
//! repository selector overrides. It is not an allow-list: jobs missing from
//! the catalog are launched with the default selector.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::ConfigError;
use crate::launch::RepositorySelector;

/// Per-job definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobDefinition {
    /// Human readable description
    pub description: Option<String>,
    /// Code location override
    pub repository_location: Option<String>,
    /// Repository name override
    pub repository_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobCatalog {
    pub jobs: BTreeMap<String, JobDefinition>,
}

impl JobCatalog {
    /// Load a catalog from a file (supports TOML, JSON, YAML)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::parse(&content, extension).map_err(|message| ConfigError::Parse {
            path: display,
            message,
        })
    }

    /// Parse catalog content, picking the format from the file extension
    /// and sniffing the content when the extension is unknown.
    pub fn parse(content: &str, extension: &str) -> Result<Self, String> {
        match extension {
            "toml" => toml::from_str(content).map_err(|e| e.to_string()),
            "json" => serde_json::from_str(content).map_err(|e| e.to_string()),
            "yaml" | "yml" => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            _ => {
                if content.trim().starts_with('{') {
                    serde_json::from_str(content).map_err(|e| e.to_string())
                } else if content.contains("---") || content.contains(": ") {
                    serde_yaml::from_str(content).map_err(|e| e.to_string())
                } else {
                    toml::from_str(content).map_err(|e| e.to_string())
                }
            }
        }
    }

    pub fn get(&self, job_name: &str) -> Option<&JobDefinition> {
        self.jobs.get(job_name)
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Selector for `job_name`, falling back to `default` field by field.
    pub fn selector_for(&self, job_name: &str, default: &RepositorySelector) -> RepositorySelector {
        let Some(job) = self.get(job_name) else {
            return default.clone();
        };
        RepositorySelector {
            repository_location: job
                .repository_location
                .clone()
                .unwrap_or_else(|| default.repository_location.clone()),
            repository_name: job
                .repository_name
                .clone()
                .unwrap_or_else(|| default.repository_name.clone()),
        }
    }
}
