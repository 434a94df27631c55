//! Project settings: `testship.toml` overlaid with command-line flags

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use testship_common::project::resolve_version;
use testship_common::{IntegrationConfig, Project};

const CONFIG_FILE: &str = "testship.toml";

#[derive(Args, Debug, Default)]
pub struct ProjectArgs {
    /// Project base directory
    #[arg(long, default_value = ".", global = true)]
    pub project_dir: PathBuf,

    /// Configuration file (defaults to <project-dir>/testship.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Project name (defaults to the project directory name)
    #[arg(long, env = "TESTSHIP_PROJECT_NAME", global = true)]
    pub name: Option<String>,

    /// Build number used as the project version
    #[arg(long, env = "BUILD_NUMBER", global = true)]
    pub build_number: Option<String>,

    /// Deployment environment
    #[arg(long, env = "TESTSHIP_ENVIRONMENT", global = true)]
    pub environment: Option<String>,

    /// Bucket holding promoted artifacts
    #[arg(long, env = "TESTSHIP_ARTIFACT_BUCKET", global = true)]
    pub bucket: Option<String>,

    /// URL the suites run against
    #[arg(long, env = "TESTSHIP_TARGET_URL", global = true)]
    pub target_url: Option<String>,

    /// Remote store implementation
    #[arg(long, global = true)]
    pub artifact_manager: Option<String>,

    #[arg(long, global = true)]
    pub application_group: Option<String>,

    #[arg(long, global = true)]
    pub application: Option<String>,

    #[arg(long, global = true)]
    pub role: Option<String>,

    /// Directory verified in the local pass
    #[arg(long, global = true)]
    pub working_test_dir: Option<PathBuf>,

    /// Skip promotion after verification
    #[arg(long, global = true)]
    pub no_promote: bool,
}

impl ProjectArgs {
    pub fn into_project(self, verbose: bool) -> Result<Project> {
        let basedir = std::path::absolute(&self.project_dir)
            .with_context(|| format!("Failed to resolve {}", self.project_dir.display()))?;
        let config_path = self
            .config
            .clone()
            .unwrap_or_else(|| basedir.join(CONFIG_FILE));
        let mut config = IntegrationConfig::load(&config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?;
        self.apply(&mut config);
        config.verbose |= verbose;

        let name = match self.name {
            Some(name) => name,
            None => directory_name(&basedir)?,
        };
        let version = resolve_version(self.build_number.as_deref());
        Ok(Project::new(name, version, basedir, config))
    }

    fn apply(&self, config: &mut IntegrationConfig) {
        overlay(&mut config.environment, &self.environment);
        overlay(&mut config.integration_artifact_bucket, &self.bucket);
        overlay(&mut config.integration_target_url, &self.target_url);
        overlay(&mut config.application_group, &self.application_group);
        overlay(&mut config.application, &self.application);
        overlay(&mut config.role, &self.role);
        overlay(&mut config.working_test_dir, &self.working_test_dir);
        if let Some(manager) = &self.artifact_manager {
            config.artifact_manager = manager.clone();
        }
        if self.no_promote {
            config.promote_artifact = false;
        }
    }
}

fn overlay<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
    if value.is_some() {
        target.clone_from(value);
    }
}

fn directory_name(basedir: &Path) -> Result<String> {
    basedir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .context("Cannot derive a project name from the project directory, pass --name")
}
