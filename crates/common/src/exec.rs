//! External process execution
//!
//! Runners and remote stores shell out to third-party binaries (`aws`,
//! `pytest`, `cypress`). They go through [`CommandExecutor`] so the workflow
//! can be exercised without those binaries installed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// A command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            env: BTreeMap::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn envs(mut self, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        self.env.extend(vars);
        self
    }

    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Outcome of a finished command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: i32,
    pub stdout_log: PathBuf,
    pub stderr_log: PathBuf,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `command`, writing stdout to `log_file` and stderr to `{log_file}.err`.
    async fn execute(&self, command: &CommandSpec, log_file: &Path) -> Result<CommandOutput>;

    /// Check that `command` can run at all
    async fn can_execute(&self, command: &CommandSpec) -> bool;
}

/// Fail with [`Error::PrerequisiteMissing`] unless `command` runs successfully.
pub async fn verify_can_execute(
    executor: &dyn CommandExecutor,
    command: &CommandSpec,
    prerequisite: &str,
    caller: &str,
) -> Result<()> {
    if executor.can_execute(command).await {
        Ok(())
    } else {
        Err(Error::PrerequisiteMissing {
            prerequisite: prerequisite.to_string(),
            caller: caller.to_string(),
        })
    }
}

/// Run `command` and turn a non-zero exit into [`Error::CommandFailed`].
pub async fn exec_command(
    executor: &dyn CommandExecutor,
    command: &CommandSpec,
    log_dir: &Path,
    log_name: &str,
) -> Result<CommandOutput> {
    let log_file = log_dir.join(log_name);
    info!("Executing {}", command.display());
    let output = executor.execute(command, &log_file).await?;
    if !output.success() {
        return Err(Error::CommandFailed {
            command: command.program.clone(),
            log_file: output.stdout_log,
            status: output.status,
        });
    }
    Ok(output)
}

/// Runs commands as real child processes
#[derive(Debug, Default, Clone)]
pub struct SystemExecutor;

#[async_trait]
impl CommandExecutor for SystemExecutor {
    async fn execute(&self, command: &CommandSpec, log_file: &Path) -> Result<CommandOutput> {
        if let Some(parent) = log_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let stderr_log = err_log_path(log_file);
        let stdout = std::fs::File::create(log_file)?;
        let stderr = std::fs::File::create(&stderr_log)?;

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .envs(&command.env)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr));
        if let Some(dir) = &command.working_dir {
            cmd.current_dir(dir);
        }

        let status = cmd.status().await?;
        debug!("{} exited with {}", command.program, status);

        Ok(CommandOutput {
            // signal-terminated children have no code
            status: status.code().unwrap_or(-1),
            stdout_log: log_file.to_path_buf(),
            stderr_log,
        })
    }

    async fn can_execute(&self, command: &CommandSpec) -> bool {
        let status = Command::new(&command.program)
            .args(&command.args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        matches!(status, Ok(status) if status.success())
    }
}

fn err_log_path(log_file: &Path) -> PathBuf {
    let mut name = log_file.as_os_str().to_owned();
    name.push(".err");
    PathBuf::from(name)
}
