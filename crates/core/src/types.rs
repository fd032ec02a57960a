use std::path::PathBuf;

use thiserror::Error;

/// The main error type for pipeline operations
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Step '{step}' reads '{artifact}' before any earlier step produces it")]
    Chain { step: String, artifact: PathBuf },

    #[error("Step '{title}' failed: {failure}")]
    Step {
        /// Zero-based position of the failing step in the plan
        index: usize,
        title: String,
        command: String,
        #[source]
        failure: StepFailure,
    },
}

/// Why a single step did not complete
#[derive(Debug, Error)]
pub enum StepFailure {
    #[error("Could not find executable: {} - Have you installed all the requirements?", .0.display())]
    MissingExecutable(PathBuf),

    #[error("Could not run command: {source}")]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("exited with code {0}")]
    ExitCode(i32),

    #[error("working directory '{}' does not exist", .0.display())]
    MissingWorkingDirectory(PathBuf),

    #[error("could not remove '{}': {source}", .path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
