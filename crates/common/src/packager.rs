//! Packaging of tool suites for promotion
//!
//! A successful suite is mirrored into `{working}/{tool}` for environment
//! validation and zipped into `{dist}/{tool}-{project}.zip` for upload.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::layout;
use crate::project::Project;
use crate::tool::ToolKind;

/// Root segment legacy archives carry when no role was configured
pub const LEGACY_ROLE_PLACEHOLDER: &str = "None";

/// What packaging produced
#[derive(Debug, Clone)]
pub struct PackagedArtifact {
    pub tool: ToolKind,
    pub working_dir: PathBuf,
    pub archive: PathBuf,
}

/// Mirror `source_dir` into the working tree and zip it.
///
/// Archive entries sit under `role/` when a role is given. Repackaging the
/// same tool replaces the previous archive.
pub fn package_artifacts(
    project: &Project,
    source_dir: &Path,
    tool: ToolKind,
    role: Option<&str>,
) -> Result<PackagedArtifact> {
    let working_dir = layout::working_dist_dir(project)?.join(tool.name());
    if same_dir(source_dir, &working_dir) {
        debug!("{} already lives in the working tree", source_dir.display());
    } else {
        copy_dir_merge(source_dir, &working_dir)?;
    }

    let archive = layout::local_zip_artifact(project, tool)?;
    let root = archive_root(project, role);
    write_zip(source_dir, &archive, root.as_deref())?;

    info!("Packaged {} artifacts into {}", tool, archive.display());
    Ok(PackagedArtifact {
        tool,
        working_dir,
        archive,
    })
}

fn archive_root(project: &Project, role: Option<&str>) -> Option<String> {
    match role.filter(|r| !r.is_empty()) {
        Some(role) => Some(role.to_string()),
        None if project.config.legacy_role_placeholder => Some(LEGACY_ROLE_PLACEHOLDER.to_string()),
        None => None,
    }
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Recursive copy that overwrites existing files and keeps everything else
pub fn copy_dir_merge(source: &Path, destination: &Path) -> Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

fn write_zip(source: &Path, archive: &Path, root: Option<&str>) -> Result<()> {
    let partial = archive.with_extension("zip.partial");
    let file = File::create(&partial)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    if let Some(root) = root {
        writer.add_directory(format!("{}/", root), options)?;
    }

    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let mut name = entry_name(root, relative);

        if entry.file_type().is_dir() {
            name.push('/');
            writer.add_directory(name, options)?;
        } else {
            writer.start_file(name, options)?;
            let mut input = File::open(entry.path())?;
            io::copy(&mut input, &mut writer)?;
        }
    }

    writer.finish()?;
    std::fs::rename(&partial, archive)?;
    Ok(())
}

fn entry_name(root: Option<&str>, relative: &Path) -> String {
    let parts = root
        .into_iter()
        .map(str::to_string)
        .chain(relative.components().map(|c| c.as_os_str().to_string_lossy().into_owned()));
    parts.collect::<Vec<_>>().join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IntegrationConfig;

    fn zip_entries(path: &Path) -> Vec<String> {
        let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        archive.file_names().map(str::to_string).collect::<Vec<_>>()
    }

    fn suite(base: &Path, tool: &str, file: &str, body: &str) -> PathBuf {
        let dir = base.join("src/integrationtest").join(tool);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(file), body).unwrap();
        dir
    }

    #[test]
    fn test_package_with_role() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project = Project::new("apples-oranges-bananas", "1", temp_dir.path(), IntegrationConfig::default());
        let source = suite(temp_dir.path(), "tavern", "test.tavern.yaml", "a");

        let packaged = package_artifacts(&project, &source, ToolKind::Tavern, Some("foo")).unwrap();

        assert!(packaged.working_dir.join("test.tavern.yaml").exists());
        let mut entries = zip_entries(&packaged.archive);
        entries.sort();
        assert_eq!(entries, vec!["foo/", "foo/test.tavern.yaml"]);
    }

    #[test]
    fn test_package_without_role() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project = Project::new("p", "1", temp_dir.path(), IntegrationConfig::default());
        let source = suite(temp_dir.path(), "cypress", "test.json", "{}");

        let packaged = package_artifacts(&project, &source, ToolKind::Cypress, None).unwrap();
        assert_eq!(zip_entries(&packaged.archive), vec!["test.json"]);
    }

    #[test]
    fn test_package_legacy_placeholder_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config = IntegrationConfig::default();
        config.legacy_role_placeholder = true;
        let project = Project::new("p", "1", temp_dir.path(), config);
        let source = suite(temp_dir.path(), "cypress", "test.json", "{}");

        let packaged = package_artifacts(&project, &source, ToolKind::Cypress, None).unwrap();
        let mut entries = zip_entries(&packaged.archive);
        entries.sort();
        assert_eq!(entries, vec!["None/", "None/test.json"]);
    }

    #[test]
    fn test_repackaging_replaces_archive() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project = Project::new("p", "1", temp_dir.path(), IntegrationConfig::default());
        let source = suite(temp_dir.path(), "tavern", "first.tavern.yaml", "1");

        package_artifacts(&project, &source, ToolKind::Tavern, Some("foo")).unwrap();
        std::fs::remove_file(source.join("first.tavern.yaml")).unwrap();
        std::fs::write(source.join("second.tavern.yaml"), "2").unwrap();
        let packaged = package_artifacts(&project, &source, ToolKind::Tavern, Some("foo")).unwrap();

        let mut entries = zip_entries(&packaged.archive);
        entries.sort();
        assert_eq!(entries, vec!["foo/", "foo/second.tavern.yaml"]);

        let zips: Vec<_> = std::fs::read_dir(layout::dist_dir(&project).unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".zip"))
            .collect();
        assert_eq!(zips.len(), 1);
        // merge semantics keep earlier working files
        assert!(packaged.working_dir.join("first.tavern.yaml").exists());
    }

    #[test]
    fn test_package_from_working_tree() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project = Project::new("p", "1", temp_dir.path(), IntegrationConfig::default());
        let working = layout::working_dist_dir(&project).unwrap().join("tavern");
        std::fs::create_dir_all(&working).unwrap();
        std::fs::write(working.join("t.tavern.yaml"), "x").unwrap();

        let packaged = package_artifacts(&project, &working, ToolKind::Tavern, None).unwrap();
        assert_eq!(zip_entries(&packaged.archive), vec!["t.tavern.yaml"]);
    }
}
