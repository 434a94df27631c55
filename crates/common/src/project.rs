//! Project context shared by every component of a build invocation

use std::path::{Path, PathBuf};

use crate::config::IntegrationConfig;

/// Version used when no build number is available
pub const FALLBACK_VERSION: &str = "0.0.999";

/// Environment variables consulted, in order, for a build number
const BUILD_NUMBER_VARS: [&str; 2] = ["GITHUB_RUN_NUMBER", "TRAVIS_BUILD_NUMBER"];

/// The project being built
#[derive(Debug, Clone)]
pub struct Project {
    pub name: String,
    pub version: String,
    pub basedir: PathBuf,
    pub dir_logs: PathBuf,
    pub dir_reports: PathBuf,
    pub dir_dist: PathBuf,
    pub config: IntegrationConfig,
}

impl Project {
    /// Create a project with the conventional `target/` output tree under `basedir`
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        basedir: impl Into<PathBuf>,
        config: IntegrationConfig,
    ) -> Self {
        let name = name.into();
        let version = version.into();
        let basedir = basedir.into();
        let target = basedir.join("target");

        Self {
            dir_logs: target.join("logs"),
            dir_reports: target.join("reports"),
            dir_dist: target.join("dist").join(format!("{}-{}", name, version)),
            name,
            version,
            basedir,
            config,
        }
    }

    /// Resolve a possibly relative path against the project base directory
    pub fn expand_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.basedir.join(path)
        }
    }
}

/// Pick the build version: explicit build number, CI build number, or the fallback
pub fn resolve_version(build_number: Option<&str>) -> String {
    version_from(build_number, |var| std::env::var(var).ok())
}

fn version_from(build_number: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> String {
    build_number
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| {
            BUILD_NUMBER_VARS
                .iter()
                .filter_map(|var| lookup(var))
                .find(|v| !v.is_empty())
        })
        .unwrap_or_else(|| FALLBACK_VERSION.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_tree() {
        let project = Project::new("apples-oranges-bananas", "42", "/work", IntegrationConfig::default());
        assert_eq!(project.dir_logs, PathBuf::from("/work/target/logs"));
        assert_eq!(project.dir_reports, PathBuf::from("/work/target/reports"));
        assert_eq!(
            project.dir_dist,
            PathBuf::from("/work/target/dist/apples-oranges-bananas-42")
        );
    }

    #[test]
    fn test_expand_path() {
        let project = Project::new("p", "1", "/work", IntegrationConfig::default());
        assert_eq!(project.expand_path(Path::new("src/x")), PathBuf::from("/work/src/x"));
        assert_eq!(project.expand_path(Path::new("/abs")), PathBuf::from("/abs"));
    }

    #[test]
    fn test_explicit_build_number_wins() {
        assert_eq!(resolve_version(Some("17")), "17");
    }

    #[test]
    fn test_empty_build_number_falls_back_to_ci() {
        let ci = |var: &str| (var == "TRAVIS_BUILD_NUMBER").then(|| "88".to_string());
        assert_eq!(version_from(Some(""), ci), "88");
        assert_eq!(version_from(None, ci), "88");
        assert_eq!(version_from(Some("17"), ci), "17");
    }

    #[test]
    fn test_empty_ci_numbers_use_fallback() {
        assert_eq!(version_from(Some(""), |_| Some(String::new())), FALLBACK_VERSION);
        assert_eq!(version_from(None, |_| None), FALLBACK_VERSION);
    }
}
