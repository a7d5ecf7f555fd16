//! Command handlers for the CtB image generator CLI.

pub mod generate;
pub mod models;
pub mod prompts;

pub use generate::GenerateCommand;
pub use models::ModelsCommand;
pub use prompts::PromptsCommand;
