//! CLI Commands

pub mod info;
pub mod push;
pub mod verify;

use std::sync::Arc;

use testship_common::exec::{CommandExecutor, SystemExecutor};
use testship_common::{Project, RunnerSet, StoreRegistry};

/// Collaborators wired up once per invocation
pub struct Context {
    pub project: Project,
    pub registry: StoreRegistry,
    pub runners: RunnerSet,
}

impl Context {
    pub fn new(project: Project) -> Self {
        let executor: Arc<dyn CommandExecutor> = Arc::new(SystemExecutor);
        Self {
            project,
            registry: StoreRegistry::with_defaults(executor.clone()),
            runners: testship_runners::default_runners(executor),
        }
    }

    pub fn workflow(&self) -> testship_common::Workflow<'_> {
        testship_common::Workflow::new(&self.project, &self.registry, &self.runners)
    }
}
