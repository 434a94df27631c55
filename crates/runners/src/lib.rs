//! Testship suite runners
//!
//! Thin process wrappers that execute a tool's suite through the
//! [`CommandExecutor`](testship_common::exec::CommandExecutor) seam and report
//! pass/fail plus the junit report location.

pub mod cypress;
pub mod tavern;

use std::sync::Arc;

use testship_common::exec::CommandExecutor;
use testship_common::RunnerSet;

pub use cypress::CypressRunner;
pub use tavern::TavernRunner;

/// Runner set with every built-in runner sharing `executor`
pub fn default_runners(executor: Arc<dyn CommandExecutor>) -> RunnerSet {
    RunnerSet::new()
        .with(Arc::new(TavernRunner::new(executor.clone())))
        .with(Arc::new(CypressRunner::new(executor)))
}
