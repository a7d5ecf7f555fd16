//! Request-level failure taxonomy.
//!
//! Every failure of a generation request ends up as one of these variants.
//! None of them is fatal: the front-end turns them into a status message.

use thiserror::Error;

/// Why a generation request failed.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The prompt or model alias matched no catalog entry
    #[error("ERROR: Invalid prompt or model selected.")]
    CatalogLookup { alias: String },

    /// No inference token was available
    #[error("ERROR: Hugging Face token ({token_env}) is missing. Please set it as an environment variable.")]
    CredentialMissing { token_env: String },

    /// The inference service call failed
    #[error("ERROR: Failed to generate image. Details: {0}")]
    ServiceInvocation(String),

    /// The image could not be written to disk
    #[error("ERROR: Failed to save image. Details: {0}")]
    Persistence(String),
}

/// Failure category, for callers that branch on the kind of error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationErrorKind {
    CatalogLookup,
    CredentialMissing,
    ServiceInvocation,
    Persistence,
}

impl GenerationError {
    pub fn kind(&self) -> GenerationErrorKind {
        match self {
            Self::CatalogLookup { .. } => GenerationErrorKind::CatalogLookup,
            Self::CredentialMissing { .. } => GenerationErrorKind::CredentialMissing,
            Self::ServiceInvocation(_) => GenerationErrorKind::ServiceInvocation,
            Self::Persistence(_) => GenerationErrorKind::Persistence,
        }
    }
}

impl GenerationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CatalogLookup => "catalog_lookup",
            Self::CredentialMissing => "credential_missing",
            Self::ServiceInvocation => "service_invocation",
            Self::Persistence => "persistence",
        }
    }
}

/// Message shown when a request succeeds.
pub const SUCCESS_MESSAGE: &str = "Image generated successfully!";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_distinct() {
        let errors = [
            GenerationError::CatalogLookup {
                alias: "Nope".to_string(),
            },
            GenerationError::CredentialMissing {
                token_env: "HF_CTB_TOKEN".to_string(),
            },
            GenerationError::ServiceInvocation("503".to_string()),
            GenerationError::Persistence("read-only".to_string()),
        ];

        let messages: std::collections::HashSet<String> =
            errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(messages.len(), 4);
        assert!(messages.iter().all(|m| m.starts_with("ERROR: ")));
    }

    #[test]
    fn test_catalog_lookup_message() {
        let err = GenerationError::CatalogLookup {
            alias: "Dragon Attack".to_string(),
        };
        assert_eq!(err.to_string(), "ERROR: Invalid prompt or model selected.");
        assert_eq!(err.kind(), GenerationErrorKind::CatalogLookup);
    }
}
