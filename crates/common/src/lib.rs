//! Testship Common Library
//!
//! Layout, identity, packaging, remote stores and the verification workflow
//! used to promote integration-test artifacts between environments.

pub mod config;
pub mod error;
pub mod exec;
pub mod identity;
pub mod layout;
pub mod orchestrator;
pub mod packager;
pub mod project;
pub mod runner;
pub mod store;
pub mod tool;

// Re-export commonly used types
pub use config::IntegrationConfig;
pub use error::{Error, Result};
pub use identity::{resolve_identity, Identity};
pub use orchestrator::{VerificationReport, Workflow};
pub use project::Project;
pub use runner::{RunnerSet, SuiteOutcome, SuiteRunner};
pub use store::{ArtifactStore, S3ArtifactStore, StoreRegistry};
pub use tool::ToolKind;

/// Testship version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
