//! Inference provider implementations.

pub mod huggingface;
pub mod mock;

pub use huggingface::HuggingFaceClient;
pub use mock::MockImageClient;
