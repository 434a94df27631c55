//! Test-runner seam
//!
//! The workflow only needs to know whether a suite passed. Concrete runners
//! live in `testship-runners`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::layout;
use crate::project::Project;
use crate::tool::ToolKind;

/// Result of one suite execution
#[derive(Debug, Clone)]
pub struct SuiteOutcome {
    pub success: bool,
    /// Machine-readable report written by the runner
    pub report: PathBuf,
}

#[async_trait]
pub trait SuiteRunner: Send + Sync {
    fn tool(&self) -> ToolKind;

    /// Execute the suite in `suite_dir` against the configured target
    async fn run(&self, project: &Project, suite_dir: &Path) -> Result<SuiteOutcome>;
}

/// Runners available to this invocation
#[derive(Default, Clone)]
pub struct RunnerSet {
    runners: BTreeMap<ToolKind, Arc<dyn SuiteRunner>>,
}

impl RunnerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, runner: Arc<dyn SuiteRunner>) -> Self {
        self.runners.insert(runner.tool(), runner);
        self
    }

    pub fn get(&self, tool: ToolKind) -> Option<&Arc<dyn SuiteRunner>> {
        self.runners.get(&tool)
    }
}

/// Report path for a suite: `{reports}/integration/{tool}-{run}.out.xml`,
/// where `run` is the name of the suite directory's parent.
pub fn report_file(project: &Project, tool: ToolKind, suite_dir: &Path) -> Result<PathBuf> {
    let resolved = suite_dir.canonicalize().unwrap_or_else(|_| suite_dir.to_path_buf());
    let run_name = resolved
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| tool.name().to_string());
    Ok(layout::reports_dir(project)?.join(format!("{}-{}.out.xml", tool.name(), run_name)))
}

/// Turn a failed outcome into [`Error::TestFailure`]
pub fn require_success(tool: ToolKind, outcome: SuiteOutcome) -> Result<SuiteOutcome> {
    if outcome.success {
        Ok(outcome)
    } else {
        Err(Error::TestFailure {
            tool: tool.name().to_string(),
            report: outcome.report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IntegrationConfig;

    #[test]
    fn test_report_file_uses_parent_name() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project = Project::new("p", "1", temp_dir.path(), IntegrationConfig::default());
        let suite = temp_dir.path().join("src/integrationtest/tavern");
        std::fs::create_dir_all(&suite).unwrap();

        let report = report_file(&project, ToolKind::Tavern, &suite).unwrap();
        assert_eq!(
            report,
            layout::reports_dir(&project).unwrap().join("tavern-integrationtest.out.xml")
        );
    }

    #[test]
    fn test_require_success() {
        let failed = SuiteOutcome {
            success: false,
            report: PathBuf::from("/r/cypress-x.out.xml"),
        };
        let err = require_success(ToolKind::Cypress, failed).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cypress tests failed, see complete output here - /r/cypress-x.out.xml"
        );
    }
}
