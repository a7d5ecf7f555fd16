//! Hugging Face inference provider implementation.
//!
//! Talks to the serverless text-to-image task API:
//! `POST {base_url}/{model}` with a JSON body, answered with raw image bytes.

use crate::client::{ImageClient, ImageRequest};
use ctb_core::config::{DEFAULT_ENDPOINT, DEFAULT_TOKEN_ENV};
use ctb_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Text-to-image request body.
#[derive(Debug, Serialize)]
struct HfRequest {
    inputs: String,
    parameters: HfParameters,
}

#[derive(Debug, Serialize)]
struct HfParameters {
    guidance_scale: f32,
    num_inference_steps: u32,
    width: u32,
    height: u32,
    seed: i64,
}

/// Error body returned by the service on failure.
#[derive(Debug, Deserialize)]
struct HfErrorResponse {
    error: String,
}

/// Hugging Face image client.
pub struct HuggingFaceClient {
    /// Base URL; the model id is appended per request
    base_url: String,

    /// Bearer token
    token: Option<String>,

    /// HTTP client
    client: reqwest::Client,
}

impl HuggingFaceClient {
    /// Create a client against the default endpoint.
    pub fn new(token: Option<String>) -> Self {
        Self {
            base_url: DEFAULT_ENDPOINT.to_string(),
            token,
            client: reqwest::Client::new(),
        }
    }

    /// Create a client with a custom endpoint and optional request timeout.
    pub fn with_options(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Option<Duration>,
    ) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| AppError::Inference(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into(),
            token,
            client,
        })
    }

    /// URL of the model's inference route.
    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), model)
    }

    /// Convert an ImageRequest to the service's body format.
    fn to_hf_request(&self, request: &ImageRequest) -> HfRequest {
        HfRequest {
            inputs: request.prompt.clone(),
            parameters: HfParameters {
                guidance_scale: request.guidance_scale,
                num_inference_steps: request.steps,
                width: request.width,
                height: request.height,
                seed: request.seed,
            },
        }
    }

    /// Pull a readable message out of an error body.
    fn error_message(body: &str) -> String {
        serde_json::from_str::<HfErrorResponse>(body)
            .map(|e| e.error)
            .unwrap_or_else(|_| body.trim().to_string())
    }
}

#[async_trait::async_trait]
impl ImageClient for HuggingFaceClient {
    fn provider_name(&self) -> &str {
        "huggingface"
    }

    async fn generate_image(&self, request: &ImageRequest) -> AppResult<Vec<u8>> {
        let token = self.token.as_deref().ok_or_else(|| {
            AppError::CredentialMissing(format!(
                "Hugging Face token ({}) is not set",
                DEFAULT_TOKEN_ENV
            ))
        })?;

        let url = self.model_url(&request.model);
        tracing::info!("Sending text-to-image request to {}", url);
        tracing::debug!(
            "Parameters: {}x{}, steps={}, guidance={}, seed={}",
            request.width,
            request.height,
            request.steps,
            request.guidance_scale,
            request.seed
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "image/png")
            .json(&self.to_hf_request(request))
            .send()
            .await
            .map_err(|e| AppError::Inference(format!("Failed to reach inference service: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Inference(format!(
                "Inference API error ({}): {}",
                status,
                Self::error_message(&body)
            )));
        }

        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Inference(format!("Failed to read image bytes: {}", e)))?;

        if is_json {
            let body = String::from_utf8_lossy(&bytes);
            return Err(AppError::Inference(format!(
                "Inference API returned no image: {}",
                Self::error_message(&body)
            )));
        }

        if bytes.is_empty() {
            return Err(AppError::Inference(
                "Inference API returned an empty image".to_string(),
            ));
        }

        tracing::info!("Received {} bytes of image data", bytes.len());

        Ok(bytes.to_vec())
    }
}
