//! Test-runner tools known to the workflow

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// An integration-test runner style. Each owns a conventionally named
/// subdirectory of test definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// Request/response assertion runner
    Tavern,
    /// Browser-driven UI runner
    Cypress,
}

/// Archive-name prefix to tool. Adding a tool is one row here.
const MARKERS: &[(&str, ToolKind)] = &[("tavern", ToolKind::Tavern), ("cypress", ToolKind::Cypress)];

impl ToolKind {
    /// Every tool, in dispatch order
    pub const ALL: [ToolKind; 2] = [ToolKind::Cypress, ToolKind::Tavern];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Tavern => "tavern",
            ToolKind::Cypress => "cypress",
        }
    }

    /// Identify the tool a downloaded archive belongs to from its
    /// `{tool}-{project}.zip` file name. Only the leading segment counts,
    /// so a project name containing another tool's name is not misrouted.
    pub fn from_archive_name(file_name: &str) -> Option<ToolKind> {
        MARKERS
            .iter()
            .find(|(marker, _)| {
                file_name
                    .strip_prefix(marker)
                    .is_some_and(|rest| rest.starts_with('-'))
            })
            .map(|(_, tool)| *tool)
    }

    /// The tool's suite directory under `root`, if present
    pub fn suite_dir(self, root: &Path) -> Option<std::path::PathBuf> {
        let dir = root.join(self.name());
        dir.is_dir().then_some(dir)
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
