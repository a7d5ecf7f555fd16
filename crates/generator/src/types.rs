//! Generation request and result types.

use crate::error::GenerationError;
use ctb_core::GenerationDefaults;
use ctb_prompt::Team;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Seed value asking for a random seed.
pub const RANDOM_SEED: i64 = -1;

/// One user action: which prompt, team and model, plus generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(rename = "promptAlias")]
    pub prompt_alias: String,

    pub team: Team,

    #[serde(rename = "modelAlias")]
    pub model_alias: String,

    /// Free-form text appended to the prompt
    #[serde(rename = "customPrompt", skip_serializing_if = "Option::is_none")]
    pub custom_prompt: Option<String>,

    pub height: u32,
    pub width: u32,
    pub steps: u32,

    #[serde(rename = "guidanceScale")]
    pub guidance_scale: f32,

    /// `RANDOM_SEED` draws a fresh seed per request
    pub seed: i64,
}

impl GenerationRequest {
    /// Create a request with the default parameters and a random seed.
    pub fn new(prompt_alias: impl Into<String>, team: Team, model_alias: impl Into<String>) -> Self {
        let defaults = GenerationDefaults::default();
        Self {
            prompt_alias: prompt_alias.into(),
            team,
            model_alias: model_alias.into(),
            custom_prompt: None,
            height: defaults.height,
            width: defaults.width,
            steps: defaults.steps,
            guidance_scale: defaults.guidance_scale,
            seed: RANDOM_SEED,
        }
    }

    /// Apply configured default parameters.
    pub fn with_defaults(mut self, defaults: &GenerationDefaults) -> Self {
        self.height = defaults.height;
        self.width = defaults.width;
        self.steps = defaults.steps;
        self.guidance_scale = defaults.guidance_scale;
        self
    }

    pub fn with_custom_prompt(mut self, custom_prompt: impl Into<String>) -> Self {
        self.custom_prompt = Some(custom_prompt.into());
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = seed;
        self
    }
}

/// A successfully generated and saved image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Where the image was written
    pub path: PathBuf,

    /// Seed actually sent to the service
    pub seed: i64,

    /// Final prompt text sent to the service
    pub prompt: String,

    /// Service identifier of the model used
    pub model: String,
}

/// Outcome of one generation request.
pub type GenerationResult = Result<GeneratedImage, GenerationError>;
