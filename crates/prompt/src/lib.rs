//! Prompt system for the CtB image generator.
//!
//! This crate provides:
//! - The prompt and model catalog with alias lookup
//! - YAML loading of user-defined templates
//! - Prompt composition with team-color substitution

pub mod builder;
pub mod catalog;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use catalog::Catalog;
pub use loader::{list_prompt_files, load_catalog, load_prompt_file};
pub use types::{BuiltPrompt, BuiltPromptMetadata, ModelEntry, PromptTemplate, Team};
