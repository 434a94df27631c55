//! Cypress UI suites

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use testship_common::exec::{self, CommandExecutor, CommandSpec};
use testship_common::runner::report_file;
use testship_common::{layout, Project, Result, SuiteOutcome, SuiteRunner, ToolKind};

const LOG_NAME: &str = "cypress_run.log";

/// Cypress executable installed under the project's `node_modules`
const CYPRESS_BIN: &str = "node_modules/cypress/bin/cypress";

pub struct CypressRunner {
    executor: Arc<dyn CommandExecutor>,
}

impl CypressRunner {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    fn executable(project: &Project) -> PathBuf {
        project.basedir.join(CYPRESS_BIN)
    }

    fn command(&self, project: &Project, suite_dir: &Path, report: &Path) -> Result<CommandSpec> {
        let config = &project.config;
        let target_url = config.target_url()?;
        let environment = config.environment()?;

        let mut command = CommandSpec::new(Self::executable(project).display().to_string())
            .args(["run", "--env"])
            .arg(format!("host={}", target_url))
            .args(["--reporter", "junit", "--reporter-options"])
            .arg(format!("mochaFile={}", report.display()))
            .current_dir(suite_dir)
            .envs(config.environment_overlay());

        // per-environment config lives next to the suite
        let config_file = format!("{}-config.json", environment);
        if suite_dir.join(&config_file).is_file() {
            command = command.arg("--config-file").arg(config_file);
        }
        Ok(command.args(config.cypress_additional_args.iter().cloned()))
    }
}

#[async_trait]
impl SuiteRunner for CypressRunner {
    fn tool(&self) -> ToolKind {
        ToolKind::Cypress
    }

    async fn run(&self, project: &Project, suite_dir: &Path) -> Result<SuiteOutcome> {
        let report = report_file(project, ToolKind::Cypress, suite_dir)?;
        let command = self.command(project, suite_dir, &report)?;

        let probe = CommandSpec::new(command.program.clone()).arg("--version");
        exec::verify_can_execute(self.executor.as_ref(), &probe, "cypress", "cypress").await?;

        info!("Running cypress on host: {}", project.config.target_url()?);
        let log_file = layout::logs_dir(project)?.join(LOG_NAME);
        let output = self.executor.execute(&command, &log_file).await?;
        Ok(SuiteOutcome {
            success: output.success(),
            report,
        })
    }
}
