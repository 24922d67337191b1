//! Engine error types.

use thiserror::Error;

/// Errors raised while bringing up the Python runtime.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The configured interpreter binary could not be found.
    #[error("python interpreter not found: {0}")]
    InterpreterNotFound(String),

    /// The interpreter could not be started or exited abnormally.
    #[error("failed to start python: {0}")]
    Spawn(String),

    /// A preload package failed to import.
    #[error("package {package} could not be loaded: {message}")]
    MissingPackage { package: String, message: String },

    /// A preload package name is not a valid module path.
    #[error("invalid package name: {0}")]
    InvalidPackage(String),

    /// Start-up did not finish in time.
    #[error("python start-up timed out after {0}s")]
    Timeout(u64),
}
