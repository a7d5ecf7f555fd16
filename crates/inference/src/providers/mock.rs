//! Mock image provider for offline runs and tests.

use crate::client::{ImageClient, ImageRequest};
use ctb_core::{AppError, AppResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A 1x1 transparent PNG.
pub const PLACEHOLDER_PNG: [u8; 67] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// What the mock answers with.
#[derive(Debug, Clone)]
enum MockBehavior {
    Image(Vec<u8>),
    ServiceError(String),
    MissingCredential,
}

/// Mock provider that never touches the network.
///
/// Records every request it receives so tests can assert whether, and
/// with what, the service was invoked.
#[derive(Debug)]
pub struct MockImageClient {
    behavior: MockBehavior,
    calls: AtomicUsize,
    last_request: Mutex<Option<ImageRequest>>,
}

impl MockImageClient {
    /// Mock answering every request with the placeholder PNG.
    pub fn new() -> Self {
        Self::with_image(PLACEHOLDER_PNG.to_vec())
    }

    /// Mock answering every request with the given bytes.
    pub fn with_image(bytes: Vec<u8>) -> Self {
        Self::with_behavior(MockBehavior::Image(bytes))
    }

    /// Mock failing every request with a service error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(MockBehavior::ServiceError(message.into()))
    }

    /// Mock failing every request as if no token were configured.
    pub fn without_credentials() -> Self {
        Self::with_behavior(MockBehavior::MissingCredential)
    }

    fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Number of generate calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<ImageRequest> {
        self.last_request
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

impl Default for MockImageClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ImageClient for MockImageClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn generate_image(&self, request: &ImageRequest) -> AppResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        tracing::debug!("Mock generating image for model {}", request.model);

        match &self.behavior {
            MockBehavior::Image(bytes) => Ok(bytes.clone()),
            MockBehavior::ServiceError(message) => Err(AppError::Inference(message.clone())),
            MockBehavior::MissingCredential => Err(AppError::CredentialMissing(
                "mock client has no token".to_string(),
            )),
        }
    }
}
