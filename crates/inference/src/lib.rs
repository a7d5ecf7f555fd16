//! Image inference integration for the CtB image generator.
//!
//! This crate provides a provider-agnostic abstraction over text-to-image
//! services behind the `ImageClient` trait.
//!
//! # Providers
//! - **Hugging Face**: serverless inference API (default)
//! - **Mock**: offline placeholder images for dry runs and tests
//!
//! # Example
//! ```no_run
//! use ctb_inference::{HuggingFaceClient, ImageClient, ImageRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HuggingFaceClient::new(std::env::var("HF_CTB_TOKEN").ok());
//! let request = ImageRequest::new("A castle at dawn", "black-forest-labs/FLUX.1-dev", 42);
//! let png = client.generate_image(&request).await?;
//! std::fs::write("castle.png", png)?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{ImageClient, ImageRequest};
pub use factory::create_client;
pub use providers::{HuggingFaceClient, MockImageClient};
pub use types::ProviderType;
