//! Image inference client abstraction and request types.
//!
//! This module defines the boundary to the external text-to-image service.

use ctb_core::AppResult;
use serde::{Deserialize, Serialize};

/// Text-to-image generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRequest {
    /// The composed prompt text
    pub prompt: String,

    /// Model identifier understood by the service
    pub model: String,

    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Number of denoising steps
    pub steps: u32,

    /// Classifier-free guidance scale
    pub guidance_scale: f32,

    /// Resolved seed (never the random sentinel)
    pub seed: i64,
}

impl ImageRequest {
    /// Create a request with the default 640x360, 20 steps, guidance 2.0 parameters.
    pub fn new(prompt: impl Into<String>, model: impl Into<String>, seed: i64) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            width: 640,
            height: 360,
            steps: 20,
            guidance_scale: 2.0,
            seed,
        }
    }

    /// Set the output dimensions.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the number of inference steps.
    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    /// Set the guidance scale.
    pub fn with_guidance_scale(mut self, guidance_scale: f32) -> Self {
        self.guidance_scale = guidance_scale;
        self
    }
}

/// Trait for image inference providers.
///
/// Implementations return the raw encoded image bytes. Missing credentials
/// are reported as `AppError::CredentialMissing`, everything else as
/// `AppError::Inference`.
#[async_trait::async_trait]
pub trait ImageClient: Send + Sync {
    /// Get the provider name (e.g., "huggingface", "mock").
    fn provider_name(&self) -> &str;

    /// Generate one image for the request.
    async fn generate_image(&self, request: &ImageRequest) -> AppResult<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = ImageRequest::new("a siege", "black-forest-labs/FLUX.1-dev", 42)
            .with_size(1024, 576)
            .with_steps(28)
            .with_guidance_scale(3.5);

        assert_eq!(request.width, 1024);
        assert_eq!(request.height, 576);
        assert_eq!(request.steps, 28);
        assert_eq!(request.guidance_scale, 3.5);
        assert_eq!(request.seed, 42);
    }

    #[test]
    fn test_request_defaults() {
        let request = ImageRequest::new("a siege", "model", 7);
        assert_eq!((request.width, request.height), (640, 360));
        assert_eq!(request.steps, 20);
        assert_eq!(request.guidance_scale, 2.0);
    }
}
