//! Application identity resolution
//!
//! Remote artifact keys are namespaced by `(group, application, role)`. The
//! triple comes from explicit configuration when available, otherwise from the
//! `<group>-<application>-<role>` project naming convention. Resolution never
//! fails: anything it cannot parse becomes `Unknown`.

use serde::Serialize;
use tracing::info;

use crate::project::Project;

pub const UNKNOWN: &str = "Unknown";

/// `(group, application, role)` derived from the project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub group: String,
    pub name: String,
    pub role: String,
}

impl Identity {
    pub fn new(group: impl Into<String>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            role: role.into(),
        }
    }

    /// `{group}-{name}`, the per-application key prefix
    pub fn application_key(&self) -> String {
        format!("{}-{}", self.group, self.name)
    }
}

/// Derive the identity for `project`. Computed fresh on every call.
pub fn resolve_identity(project: &Project) -> Identity {
    let config = &project.config;
    let mut group = non_empty(config.application_group.as_deref());
    let mut name = non_empty(config.application.as_deref());
    let mut role = non_empty(config.role.as_deref());

    if role.is_none() {
        let segments: Vec<&str> = project.name.splitn(3, '-').collect();
        if let [g, n, r] = segments[..] {
            group = Some(g.to_string());
            name = Some(n.to_string());
            role = Some(r.to_string());
        } else {
            info!(
                "Unexpected naming format expected <Application Group>-<Application>-<Role> got {}",
                project.name
            );
            name = Some(project.name.clone());
            role = Some(UNKNOWN.to_string());
        }
    }

    let mut name = name.unwrap_or_else(|| project.name.clone());
    let group = match group {
        Some(group) => group,
        None => match name.split_once('-') {
            Some((g, n)) => {
                let g = g.to_string();
                name = n.to_string();
                g
            }
            None => UNKNOWN.to_string(),
        },
    };

    Identity {
        group,
        name,
        role: role.unwrap_or_else(|| UNKNOWN.to_string()),
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IntegrationConfig;
    use test_case::test_case;

    fn project_named(name: &str) -> Project {
        Project::new(name, "42", "/work", IntegrationConfig::default())
    }

    #[test_case("apples-oranges-bananas", "apples", "oranges", "bananas" ; "three segments")]
    #[test_case("apples-oranges-bananas-blarney", "apples", "oranges", "bananas-blarney" ; "role absorbs extra segments")]
    #[test_case("oranges", "Unknown", "oranges", "Unknown" ; "single segment")]
    #[test_case("apples-oranges", "apples", "oranges", "Unknown" ; "two segments")]
    fn test_name_convention(project_name: &str, group: &str, name: &str, role: &str) {
        let identity = resolve_identity(&project_named(project_name));
        assert_eq!(identity, Identity::new(group, name, role));
    }

    #[test]
    fn test_application_property_split_once() {
        let mut project = project_named("oranges");
        project.config.application = Some("apples2-oranges2".to_string());
        project.config.role = Some("bananas2".to_string());

        assert_eq!(
            resolve_identity(&project),
            Identity::new("apples2", "oranges2", "bananas2")
        );
    }

    #[test]
    fn test_explicit_properties_take_precedence() {
        let mut project = project_named("x-y-z");
        project.config.application_group = Some("apples3".to_string());
        project.config.application = Some("oranges3".to_string());
        project.config.role = Some("bananas3".to_string());

        assert_eq!(
            resolve_identity(&project),
            Identity::new("apples3", "oranges3", "bananas3")
        );
    }

    #[test]
    fn test_role_without_application_falls_back_to_project_name() {
        let mut project = project_named("legacy");
        project.config.role = Some("api".to_string());
        assert_eq!(resolve_identity(&project), Identity::new("Unknown", "legacy", "api"));
    }

    #[test]
    fn test_application_key() {
        assert_eq!(
            Identity::new("apples", "oranges", "bananas").application_key(),
            "apples-oranges"
        );
    }
}
