//! Error types for the CtB image generator.
//!
//! This module defines a unified error enum that covers the ambient error
//! categories of the workspace: configuration, I/O, inference, credentials,
//! prompt catalog and serialization errors.

use thiserror::Error;

/// Unified error type for the CtB image generator.
///
/// Library functions return `Result<T, AppError>`. Request-level failures
/// are converted into tagged generation errors by the generator crate.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Inference service errors (transport, HTTP status, backend failure)
    #[error("Inference error: {0}")]
    Inference(String),

    /// The inference credential is not available
    #[error("Missing credential: {0}")]
    CredentialMissing(String),

    /// Prompt catalog errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = AppError::Inference("503 Service Unavailable".to_string());
        assert_eq!(err.to_string(), "Inference error: 503 Service Unavailable");

        let err = AppError::CredentialMissing("HF_CTB_TOKEN".to_string());
        assert_eq!(err.to_string(), "Missing credential: HF_CTB_TOKEN");
    }

    #[test]
    fn test_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<Vec<String>>("key: [unclosed").unwrap_err();
        let err: AppError = yaml_err.into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
