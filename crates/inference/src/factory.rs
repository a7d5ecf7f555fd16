//! Inference provider factory.
//!
//! Creates an image client from the configured provider name, endpoint,
//! token and timeout.

use crate::client::ImageClient;
use crate::providers::{HuggingFaceClient, MockImageClient};
use crate::types::ProviderType;
use ctb_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Create an image client based on the provider name.
///
/// A missing token is accepted here: the Hugging Face client reports it
/// when a request is made, so the application can still start and list
/// its catalog.
///
/// # Arguments
/// * `provider` - Provider identifier ("huggingface", "hf", "mock")
/// * `endpoint` - Optional custom base URL
/// * `token` - Optional bearer token
/// * `timeout_secs` - Optional request timeout
///
/// # Errors
/// Returns error if the provider is unknown or the HTTP client cannot be built.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    token: Option<&str>,
    timeout_secs: Option<u64>,
) -> AppResult<Arc<dyn ImageClient>> {
    let provider_type = ProviderType::parse(provider)
        .ok_or_else(|| AppError::Config(format!("Unknown provider: {}", provider)))?;

    tracing::debug!("Creating {} image client", provider_type.as_str());

    match provider_type {
        ProviderType::HuggingFace => {
            let client = HuggingFaceClient::with_options(
                endpoint.unwrap_or(ctb_core::config::DEFAULT_ENDPOINT),
                token.map(String::from),
                timeout_secs.map(Duration::from_secs),
            )?;
            Ok(Arc::new(client))
        }
        ProviderType::Mock => Ok(Arc::new(MockImageClient::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_huggingface_client() {
        let client = create_client("huggingface", None, Some("hf_test"), None).unwrap();
        assert_eq!(client.provider_name(), "huggingface");
    }

    #[test]
    fn test_create_without_token() {
        let client = create_client("hf", Some("http://localhost:8080"), None, Some(30));
        assert!(client.is_ok());
    }

    #[test]
    fn test_create_mock_client() {
        let client = create_client("mock", None, None, None).unwrap();
        assert_eq!(client.provider_name(), "mock");
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("dall-e", None, None, None) {
            Err(err) => assert!(err.to_string().contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
