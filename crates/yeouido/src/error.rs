//! Error types for pipeline runs.

use thiserror::Error;
use yeouido_data::DataError;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Configuration problems detected before any filing is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required credential is not set
    #[error("Missing credential: set {0}")]
    MissingCredential(&'static str),

    /// A setting has an unusable value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors surfaced to the caller of the pipeline.
///
/// Per-filing failures never surface here. They are logged and counted in
/// the run summary while the batch continues.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration error (fatal)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Store or upstream error outside the per-filing loop
    #[error(transparent)]
    Data(#[from] DataError),
}

impl PipelineError {
    /// Whether the error comes from configuration.
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
