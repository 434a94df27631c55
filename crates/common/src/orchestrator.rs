//! Environment verification workflow
//!
//! ```text
//! local verification  ->  parity verification  ->  promotion (optional)
//!   working suites          LATEST suites             package + upload
//! ```
//!
//! Each phase gates the next and the first failure aborts the run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::layout;
use crate::packager::{self, PackagedArtifact};
use crate::project::Project;
use crate::runner::{require_success, RunnerSet};
use crate::store::{ArtifactStore, StoreRegistry};
use crate::tool::ToolKind;

const LOCAL_PHASE: &str = "local verification";
const PARITY_PHASE: &str = "parity verification";
const PROMOTION_PHASE: &str = "promotion";

/// What a verification run did
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerificationReport {
    pub local_dir: PathBuf,
    pub latest_dir: PathBuf,
    pub local: Vec<ToolKind>,
    pub parity: Vec<ToolKind>,
    pub promoted: Vec<ToolKind>,
}

/// Drives suites, packaging and the remote store for one project
pub struct Workflow<'a> {
    project: &'a Project,
    registry: &'a StoreRegistry,
    runners: &'a RunnerSet,
}

impl<'a> Workflow<'a> {
    pub fn new(project: &'a Project, registry: &'a StoreRegistry, runners: &'a RunnerSet) -> Self {
        Self {
            project,
            registry,
            runners,
        }
    }

    /// Store selected for this project, with its destinations validated.
    fn store(&self) -> Result<Arc<dyn ArtifactStore>> {
        let store = self.registry.resolve(self.project)?;
        store.latest_destination(self.project)?;
        store.versioned_destination(self.project)?;
        Ok(store)
    }

    /// Properties every suite run needs, checked before anything touches disk
    fn require_run_properties(&self) -> Result<()> {
        self.project.config.target_url()?;
        Ok(())
    }

    fn role(&self) -> Option<&str> {
        self.project.config.role.as_deref()
    }

    fn source_dir(&self, tool: ToolKind) -> PathBuf {
        let config = &self.project.config;
        let dir = match tool {
            ToolKind::Tavern => &config.tavern_test_dir,
            ToolKind::Cypress => &config.cypress_test_dir,
        };
        self.project.expand_path(dir)
    }

    /// Run one tool's suite from its source directory and package it on success.
    ///
    /// Returns `None` when the project has no suite for the tool.
    pub async fn verify_tool(&self, tool: ToolKind) -> Result<Option<PackagedArtifact>> {
        let source = self.source_dir(tool);
        if !source.is_dir() {
            info!("Skipping {} run: no tests", tool);
            return Ok(None);
        }
        self.require_run_properties()?;

        self.run_suite(tool, &source).await?;
        packager::package_artifacts(self.project, &source, tool, self.role()).map(Some)
    }

    async fn run_suite(&self, tool: ToolKind, suite_dir: &Path) -> Result<()> {
        let runner = self
            .runners
            .get(tool)
            .ok_or_else(|| Error::Config(format!("No runner registered for {}", tool)))?;

        let files = std::fs::read_dir(suite_dir)?.count();
        info!("Found {} files in {} test directory", files, tool);
        let outcome = runner.run(self.project, suite_dir).await?;
        require_success(tool, outcome)?;
        Ok(())
    }

    /// Run every tool whose subdirectory exists under `dir`, stopping at the first failure.
    pub async fn run_tests_in_directory(&self, dir: &Path) -> Result<Vec<ToolKind>> {
        let mut ran = Vec::new();
        for tool in ToolKind::ALL {
            if let Some(suite_dir) = tool.suite_dir(dir) {
                info!("Found {} tests - starting run", tool);
                self.run_suite(tool, &suite_dir).await?;
                ran.push(tool);
            }
        }
        Ok(ran)
    }

    /// Upload every packaged archive present in the dist directory
    pub async fn push_artifacts(&self) -> Result<Vec<ToolKind>> {
        let store = self.store()?;
        info!("Starting upload of integration artifacts to {}", store.friendly_name());

        let mut pushed = Vec::new();
        for tool in ToolKind::ALL {
            let archive = layout::local_zip_artifact(self.project, tool)?;
            if archive.is_file() {
                store.upload(&archive, self.project).await?;
                pushed.push(tool);
            }
        }
        Ok(pushed)
    }

    /// Package and upload each tool present under `local_dir`
    async fn promote(&self, store: &dyn ArtifactStore, local_dir: &Path) -> Result<Vec<ToolKind>> {
        let mut promoted = Vec::new();
        for tool in ToolKind::ALL {
            let Some(suite_dir) = tool.suite_dir(local_dir) else {
                continue;
            };
            let packaged = packager::package_artifacts(self.project, &suite_dir, tool, self.role())?;
            info!("Promoting {} artifacts to {}", tool, store.friendly_name());
            store.upload(&packaged.archive, self.project).await?;
            promoted.push(tool);
        }
        Ok(promoted)
    }

    /// Verify the working suites, re-verify the promoted ones, then promote.
    pub async fn verify_environment(&self) -> Result<VerificationReport> {
        let store = self.store()?;
        self.require_run_properties()?;

        let local_dir = match &self.project.config.working_test_dir {
            Some(dir) => self.project.expand_path(dir),
            None => layout::working_dist_dir(self.project)?,
        };
        info!("Preparing to run tests found in: {}", local_dir.display());
        let local = self
            .run_tests_in_directory(&local_dir)
            .await
            .map_err(|e| e.in_phase(LOCAL_PHASE))?;

        let latest_dir = store
            .download_latest(self.project)
            .await
            .map_err(|e| e.in_phase(PARITY_PHASE))?;
        info!("Preparing to run tests found in: {}", latest_dir.display());
        let parity = self
            .run_tests_in_directory(&latest_dir)
            .await
            .map_err(|e| e.in_phase(PARITY_PHASE))?;

        let promoted = if self.project.config.promote_artifact {
            self.promote(store.as_ref(), &local_dir)
                .await
                .map_err(|e| e.in_phase(PROMOTION_PHASE))?
        } else {
            info!("Artifact promotion disabled");
            Vec::new()
        };

        Ok(VerificationReport {
            local_dir,
            latest_dir,
            local,
            parity,
            promoted,
        })
    }

    /// Write `report` as JSON next to the suite reports
    pub fn write_report(&self, report: &VerificationReport) -> Result<PathBuf> {
        let path = layout::reports_dir(self.project)?.join("verification-results.json");
        std::fs::write(&path, serde_json::to_string_pretty(report)?)?;
        info!("Results written to: {}", path.display());
        Ok(path)
    }
}
