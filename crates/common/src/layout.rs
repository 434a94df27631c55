//! Canonical on-disk locations for integration artifacts
//!
//! ```text
//! {dist}/integration/
//!   working/{tool}/...          pre-upload mirror
//!   LATEST/{tool}/...           downloaded parity snapshot
//!   LATEST/zipped/              raw downloads before unpack
//!   {tool}-{project}.zip        packaged archive per tool
//! {logs}/integration/
//! {reports}/integration/
//! ```
//!
//! Every accessor creates its directory on demand.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;
use crate::project::Project;
use crate::tool::ToolKind;

const INTEGRATION_DIR: &str = "integration";
const WORKING_DIR: &str = "working";
const LATEST_DIR: &str = "LATEST";
const ZIPPED_DIR: &str = "zipped";

pub fn logs_dir(project: &Project) -> Result<PathBuf> {
    ensure_dir(project.dir_logs.join(INTEGRATION_DIR))
}

pub fn reports_dir(project: &Project) -> Result<PathBuf> {
    ensure_dir(project.dir_reports.join(INTEGRATION_DIR))
}

pub fn dist_dir(project: &Project) -> Result<PathBuf> {
    ensure_dir(project.dir_dist.join(INTEGRATION_DIR))
}

pub fn working_dist_dir(project: &Project) -> Result<PathBuf> {
    ensure_dir(dist_dir(project)?.join(WORKING_DIR))
}

pub fn latest_dist_dir(project: &Project) -> Result<PathBuf> {
    ensure_dir(dist_dir(project)?.join(LATEST_DIR))
}

pub fn latest_zipped_dist_dir(project: &Project) -> Result<PathBuf> {
    ensure_dir(latest_dist_dir(project)?.join(ZIPPED_DIR))
}

/// Path of the packaged archive for `tool`. The file itself is not created.
pub fn local_zip_artifact(project: &Project, tool: ToolKind) -> Result<PathBuf> {
    Ok(dist_dir(project)?.join(format!("{}-{}.zip", tool.name(), project.name)))
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf> {
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

/// Snapshot of every canonical directory, created as a side effect
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub logs: PathBuf,
    pub reports: PathBuf,
    pub dist: PathBuf,
    pub working: PathBuf,
    pub latest: PathBuf,
    pub latest_zipped: PathBuf,
}

impl Layout {
    pub fn prepare(project: &Project) -> Result<Self> {
        Ok(Self {
            logs: logs_dir(project)?,
            reports: reports_dir(project)?,
            dist: dist_dir(project)?,
            working: working_dist_dir(project)?,
            latest: latest_dist_dir(project)?,
            latest_zipped: latest_zipped_dist_dir(project)?,
        })
    }

    pub fn entries(&self) -> [(&'static str, &Path); 6] {
        [
            ("logs", self.logs.as_path()),
            ("reports", self.reports.as_path()),
            ("dist", self.dist.as_path()),
            ("working", self.working.as_path()),
            ("latest", self.latest.as_path()),
            ("latest zipped", self.latest_zipped.as_path()),
        ]
    }
}
