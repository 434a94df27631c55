//! Remote artifact stores
//!
//! Promoted artifacts live under two keys per application:
//!
//! ```text
//! {bucket}/{group}-{name}/LATEST-{environment}/   floating latest
//! {bucket}/{group}-{name}/{role}/{version}/       versioned
//! ```
//!
//! Stores are looked up by the `artifact_manager` key through a
//! [`StoreRegistry`] built once per invocation.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::DEFAULT_ARTIFACT_MANAGER;
use crate::error::{Error, Result};
use crate::exec::{self, CommandExecutor, CommandSpec};
use crate::identity::resolve_identity;
use crate::layout;
use crate::project::Project;
use crate::tool::ToolKind;

const TRANSFER_LOG: &str = "s3-artifact-transfer";

/// `{bucket}/{group}-{name}/LATEST-{environment}/`
pub fn latest_artifact_key(project: &Project) -> Result<String> {
    let bucket = project.config.bucket()?;
    let environment = project.config.environment()?;
    let identity = resolve_identity(project);
    Ok(format!(
        "{}/{}/LATEST-{}/",
        bucket,
        identity.application_key(),
        environment
    ))
}

/// `{bucket}/{group}-{name}/{role}/{version}/`
pub fn versioned_artifact_key(project: &Project) -> Result<String> {
    let bucket = project.config.bucket()?;
    let identity = resolve_identity(project);
    Ok(format!(
        "{}/{}/{}/{}/",
        bucket,
        identity.application_key(),
        identity.role,
        project.version
    ))
}

/// A place promoted artifacts are pushed to and fetched from
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Key this store is registered under
    fn identifier(&self) -> &str;

    fn friendly_name(&self) -> &str;

    /// Floating-latest destination URI for `project`
    fn latest_destination(&self, project: &Project) -> Result<String>;

    /// Version-qualified destination URI for `project`
    fn versioned_destination(&self, project: &Project) -> Result<String>;

    /// Push `local` to the latest destination, then the versioned one.
    ///
    /// The two writes are independent: if the second fails the first stays.
    async fn upload(&self, local: &Path, project: &Project) -> Result<()>;

    /// Fetch the latest artifacts and unpack them into the LATEST tree.
    /// Returns the LATEST directory.
    async fn download_latest(&self, project: &Project) -> Result<PathBuf>;
}

/// Store backed by S3 through the `aws` CLI
pub struct S3ArtifactStore {
    executor: Arc<dyn CommandExecutor>,
}

impl S3ArtifactStore {
    pub const IDENTIFIER: &'static str = DEFAULT_ARTIFACT_MANAGER;

    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    async fn transfer(&self, source: &str, destination: &str, recursive: bool, project: &Project) -> Result<()> {
        info!("Proceeding to transfer {} to {}", source, destination);
        let probe = CommandSpec::new("aws").arg("--version");
        exec::verify_can_execute(self.executor.as_ref(), &probe, "aws cli", "integration_tests").await?;

        let mut command = CommandSpec::new("aws").args(["s3", "cp", source, destination]);
        if recursive {
            command = command.arg("--recursive");
        }

        let log_dir = layout::logs_dir(project)?;
        exec::exec_command(self.executor.as_ref(), &command, &log_dir, TRANSFER_LOG)
            .await
            .map(|_| ())
            .map_err(|e| match e {
                prerequisite @ Error::PrerequisiteMissing { .. } => prerequisite,
                other => Error::Transfer {
                    destination: destination.to_string(),
                    reason: other.to_string(),
                },
            })
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    fn identifier(&self) -> &str {
        Self::IDENTIFIER
    }

    fn friendly_name(&self) -> &str {
        "AWS S3 Artifact Manager"
    }

    fn latest_destination(&self, project: &Project) -> Result<String> {
        Ok(format!("s3://{}", latest_artifact_key(project)?))
    }

    fn versioned_destination(&self, project: &Project) -> Result<String> {
        Ok(format!("s3://{}", versioned_artifact_key(project)?))
    }

    async fn upload(&self, local: &Path, project: &Project) -> Result<()> {
        let latest = self.latest_destination(project)?;
        let versioned = self.versioned_destination(project)?;
        let source = local.display().to_string();
        let recursive = local.is_dir();

        self.transfer(&source, &latest, recursive, project).await?;
        self.transfer(&source, &versioned, recursive, project).await
    }

    async fn download_latest(&self, project: &Project) -> Result<PathBuf> {
        let remote = self.latest_destination(project)?;
        let zipped = layout::latest_zipped_dist_dir(project)?;
        self.transfer(&remote, &zipped.display().to_string(), true, project)
            .await?;
        unzip_downloaded_artifacts(&zipped, &layout::latest_dist_dir(project)?)
    }
}

/// Unpack each `{tool}-*.zip` in `zipped` into `{destination}/{tool}/`.
///
/// Files matching no known tool are skipped with a warning.
pub fn unzip_downloaded_artifacts(zipped: &Path, destination: &Path) -> Result<PathBuf> {
    let mut entries: Vec<_> = std::fs::read_dir(zipped)?.collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let Some(tool) = ToolKind::from_archive_name(&file_name) else {
            warn!("Unexpected file name in downloaded artifacts {}", file_name);
            continue;
        };

        let target = destination.join(tool.name());
        if target.exists() {
            std::fs::remove_dir_all(&target)?;
        }
        std::fs::create_dir_all(&target)?;

        let mut archive = zip::ZipArchive::new(File::open(entry.path())?)?;
        archive.extract(&target)?;
        info!("Unpacked {} into {}", file_name, target.display());
    }

    Ok(destination.to_path_buf())
}

/// Artifact stores available to this invocation, keyed by identifier
#[derive(Default)]
pub struct StoreRegistry {
    stores: BTreeMap<String, Arc<dyn ArtifactStore>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in stores
    pub fn with_defaults(executor: Arc<dyn CommandExecutor>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(S3ArtifactStore::new(executor)));
        registry
    }

    pub fn register(&mut self, store: Arc<dyn ArtifactStore>) {
        self.stores.insert(store.identifier().to_string(), store);
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.stores.keys().map(String::as_str)
    }

    /// Store selected by the project's `artifact_manager` setting
    pub fn resolve(&self, project: &Project) -> Result<Arc<dyn ArtifactStore>> {
        let key = project.config.artifact_manager.as_str();
        self.stores.get(key).cloned().ok_or_else(|| {
            Error::Config(format!(
                "Failed to find appropriate artifact manager for {}",
                key
            ))
        })
    }
}
