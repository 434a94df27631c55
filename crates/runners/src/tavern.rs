//! Tavern API suites, run through pytest

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use testship_common::exec::{self, CommandExecutor, CommandSpec};
use testship_common::runner::report_file;
use testship_common::{layout, Project, Result, SuiteOutcome, SuiteRunner, ToolKind};

const LOG_NAME: &str = "tavern_run.log";

pub struct TavernRunner {
    executor: Arc<dyn CommandExecutor>,
}

impl TavernRunner {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    fn command(&self, project: &Project, suite_dir: &Path, report: &Path) -> Result<CommandSpec> {
        let config = &project.config;
        let mut command = CommandSpec::new("pytest")
            .arg("--junit-xml")
            .arg(report.display().to_string())
            .arg(suite_dir.display().to_string())
            .args(config.tavern_additional_args.iter().cloned())
            .envs(config.environment_overlay())
            .envs([("TARGET".to_string(), config.target_url()?.to_string())]);
        if config.verbose {
            command = command.args(["-s", "-v"]);
        }
        Ok(command)
    }
}

#[async_trait]
impl SuiteRunner for TavernRunner {
    fn tool(&self) -> ToolKind {
        ToolKind::Tavern
    }

    async fn run(&self, project: &Project, suite_dir: &Path) -> Result<SuiteOutcome> {
        info!("Running tavern tests: {}", suite_dir.display());
        let report = report_file(project, ToolKind::Tavern, suite_dir)?;
        let command = self.command(project, suite_dir, &report)?;

        let probe = CommandSpec::new("pytest").arg("--version");
        exec::verify_can_execute(self.executor.as_ref(), &probe, "pytest", "tavern").await?;

        let log_file = layout::logs_dir(project)?.join(LOG_NAME);
        let output = self.executor.execute(&command, &log_file).await?;
        Ok(SuiteOutcome {
            success: output.success(),
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingExecutor;
    use testship_common::{Error, IntegrationConfig};

    fn project(base: &Path) -> Project {
        let mut config = IntegrationConfig::default();
        config.environment = Some("dev".to_string());
        config.integration_target_url = Some("http://target".to_string());
        config.tavern_additional_args = vec!["-k".to_string(), "smoke".to_string()];
        config
            .environment_variables
            .insert("dev".to_string(), [("API_KEY".to_string(), "abc".to_string())].into());
        Project::new("p", "1", base, config)
    }

    #[tokio::test]
    async fn test_tavern_invocation() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project = project(temp_dir.path());
        let suite = temp_dir.path().join("src/integrationtest/tavern");
        std::fs::create_dir_all(&suite).unwrap();
        let executor = Arc::new(RecordingExecutor::default());

        let outcome = TavernRunner::new(executor.clone()).run(&project, &suite).await.unwrap();

        assert!(outcome.success);
        let calls = executor.calls.lock().unwrap();
        let (command, log_file) = &calls[0];
        assert_eq!(command.program, "pytest");
        assert_eq!(
            command.args,
            vec![
                "--junit-xml".to_string(),
                outcome.report.display().to_string(),
                suite.display().to_string(),
                "-k".to_string(),
                "smoke".to_string(),
            ]
        );
        assert_eq!(command.env.get("TARGET").map(String::as_str), Some("http://target"));
        assert_eq!(command.env.get("API_KEY").map(String::as_str), Some("abc"));
        assert!(log_file.ends_with("integration/tavern_run.log"));
    }

    #[tokio::test]
    async fn test_tavern_failure_is_reported() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project = project(temp_dir.path());
        let executor = Arc::new(RecordingExecutor {
            exit_status: 1,
            ..Default::default()
        });

        let outcome = TavernRunner::new(executor).run(&project, temp_dir.path()).await.unwrap();
        assert!(!outcome.success);
    }

    #[tokio::test]
    async fn test_tavern_requires_target_url() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut project = project(temp_dir.path());
        project.config.integration_target_url = None;

        let err = TavernRunner::new(Arc::new(RecordingExecutor::default()))
            .run(&project, temp_dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingProperty("integration_target_url")));
    }

    #[tokio::test]
    async fn test_missing_pytest() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project = project(temp_dir.path());
        let executor = Arc::new(RecordingExecutor {
            missing: true,
            ..Default::default()
        });

        let err = TavernRunner::new(executor.clone())
            .run(&project, temp_dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PrerequisiteMissing { .. }));
        assert!(executor.calls.lock().unwrap().is_empty());
    }
}
