//! Error types for Testship

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using Testship Error
pub type Result<T> = std::result::Result<T, Error>;

/// Testship error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Configuration parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Missing required property: {0}")]
    MissingProperty(&'static str),

    #[error("Prerequisite {prerequisite} required by {caller} is not available")]
    PrerequisiteMissing { prerequisite: String, caller: String },

    #[error("{tool} tests failed, see complete output here - {}", .report.display())]
    TestFailure { tool: String, report: PathBuf },

    #[error("Failed to transfer integration artifacts to {destination}: {reason}")]
    Transfer { destination: String, reason: String },

    #[error("{command} exited with {status}, see {}", .log_file.display())]
    CommandFailed {
        command: String,
        log_file: PathBuf,
        status: i32,
    },

    #[error("{phase} failed: {source}")]
    Phase {
        phase: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Tag an error with the workflow phase it surfaced in.
    pub fn in_phase(self, phase: &'static str) -> Self {
        match self {
            already @ Error::Phase { .. } => already,
            other => Error::Phase {
                phase,
                source: Box::new(other),
            },
        }
    }

    /// Configuration and prerequisite problems are raised before any work starts.
    pub fn is_eager(&self) -> bool {
        match self {
            Error::Config(_) | Error::MissingProperty(_) | Error::PrerequisiteMissing { .. } => {
                true
            }
            Error::Phase { source, .. } => source.is_eager(),
            _ => false,
        }
    }
}
