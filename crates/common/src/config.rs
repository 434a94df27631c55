//! Integration configuration

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifier of the built-in S3 artifact store
pub const DEFAULT_ARTIFACT_MANAGER: &str = "S3";

/// Default location of tavern suites, relative to the project base directory
pub const DEFAULT_TAVERN_TEST_DIR: &str = "src/integrationtest/tavern";

/// Default location of cypress suites, relative to the project base directory
pub const DEFAULT_CYPRESS_TEST_DIR: &str = "src/integrationtest/cypress";

/// Integration configuration, usually read from `testship.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    /// Logical deployment environment (`ci`, `dev`, `prod`...)
    pub environment: Option<String>,

    /// Object-store bucket holding promoted artifacts
    pub integration_artifact_bucket: Option<String>,

    /// Application group override
    pub application_group: Option<String>,

    /// Application name override
    pub application: Option<String>,

    /// Role override
    pub role: Option<String>,

    /// Remote store implementation key
    pub artifact_manager: String,

    /// Push working artifacts once both verification passes succeed
    pub promote_artifact: bool,

    /// URL the suites run against
    pub integration_target_url: Option<String>,

    /// Override for the directory verified in the local pass
    pub working_test_dir: Option<PathBuf>,

    pub tavern_test_dir: PathBuf,

    pub cypress_test_dir: PathBuf,

    pub tavern_additional_args: Vec<String>,

    pub cypress_additional_args: Vec<String>,

    /// Variables overlaid onto runner processes, keyed by environment
    pub environment_variables: BTreeMap<String, BTreeMap<String, String>>,

    /// Root zip entries at the literal `None` when no role is configured
    pub legacy_role_placeholder: bool,

    pub verbose: bool,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            environment: None,
            integration_artifact_bucket: None,
            application_group: None,
            application: None,
            role: None,
            artifact_manager: DEFAULT_ARTIFACT_MANAGER.to_string(),
            promote_artifact: true,
            integration_target_url: None,
            working_test_dir: None,
            tavern_test_dir: PathBuf::from(DEFAULT_TAVERN_TEST_DIR),
            cypress_test_dir: PathBuf::from(DEFAULT_CYPRESS_TEST_DIR),
            tavern_additional_args: Vec::new(),
            cypress_additional_args: Vec::new(),
            environment_variables: BTreeMap::new(),
            legacy_role_placeholder: false,
            verbose: false,
        }
    }
}

impl IntegrationConfig {
    /// Load configuration from file, falling back to defaults when it is absent
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn environment(&self) -> Result<&str> {
        mandatory(self.environment.as_deref(), "environment")
    }

    pub fn bucket(&self) -> Result<&str> {
        mandatory(
            self.integration_artifact_bucket.as_deref(),
            "integration_artifact_bucket",
        )
    }

    pub fn target_url(&self) -> Result<&str> {
        mandatory(
            self.integration_target_url.as_deref(),
            "integration_target_url",
        )
    }

    /// Variables to overlay for the configured environment
    pub fn environment_overlay(&self) -> BTreeMap<String, String> {
        self.environment
            .as_deref()
            .and_then(|env| self.environment_variables.get(env))
            .cloned()
            .unwrap_or_default()
    }
}

fn mandatory<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::MissingProperty(name)),
    }
}
