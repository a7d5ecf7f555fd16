//! Configuration management for the CtB image generator.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Defaults
//! - Config file (.ctb/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources take precedence over earlier ones.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default Hugging Face serverless inference endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://router.huggingface.co/hf-inference/models";

/// Environment variable holding the inference token.
pub const DEFAULT_TOKEN_ENV: &str = "HF_CTB_TOKEN";

/// Providers the inference factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 4] = ["huggingface", "hf", "hf-inference", "mock"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .ctb/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Inference provider ("huggingface" or "mock")
    pub provider: String,

    /// Base URL of the inference service; the model id is appended
    pub endpoint: String,

    /// Name of the environment variable holding the token
    pub token_env: String,

    /// Inference token, if one was found
    #[serde(skip_serializing)]
    pub api_token: Option<String>,

    /// Client-side request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Directory generated images are written to
    pub output_dir: PathBuf,

    /// Default generation parameters
    pub generation: GenerationDefaults,

    /// Additional models declared in the config file
    pub models: Vec<ModelConfig>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Emit logs as JSON lines
    pub log_json: bool,
}

/// Default numeric parameters for a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationDefaults {
    pub height: u32,
    pub width: u32,
    pub steps: u32,
    #[serde(rename = "guidanceScale")]
    pub guidance_scale: f32,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            height: 360,
            width: 640,
            steps: 20,
            guidance_scale: 2.0,
        }
    }
}

/// A model entry declared in config.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub alias: String,
    pub name: String,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    inference: Option<InferenceSection>,
    generation: Option<GenerationSection>,
    output: Option<OutputSection>,
    logging: Option<LoggingSection>,
    #[serde(default)]
    models: Vec<ModelConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct InferenceSection {
    provider: Option<String>,
    endpoint: Option<String>,
    #[serde(rename = "tokenEnv")]
    token_env: Option<String>,
    timeout: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GenerationSection {
    height: Option<u32>,
    width: Option<u32>,
    steps: Option<u32>,
    #[serde(rename = "guidanceScale")]
    guidance_scale: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OutputSection {
    dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
    json: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "huggingface".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            api_token: None,
            timeout_secs: None,
            output_dir: PathBuf::from("."),
            generation: GenerationDefaults::default(),
            models: Vec::new(),
            log_level: None,
            verbose: false,
            no_color: false,
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file, environment variables and defaults.
    ///
    /// Environment variables:
    /// - `CTB_WORKSPACE`: Override workspace path
    /// - `CTB_CONFIG`: Path to config file
    /// - `CTB_PROVIDER`: Inference provider
    /// - `CTB_ENDPOINT`: Inference endpoint base URL
    /// - `CTB_OUTPUT_DIR`: Output directory for images
    /// - `HF_CTB_TOKEN`: Inference token (name configurable via `tokenEnv`)
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// A missing token is not an error here; requests fail later instead.
    ///
    /// `workspace` and `config_file` come from the command line. Both take
    /// precedence over `CTB_WORKSPACE` and `CTB_CONFIG` and are resolved
    /// before the YAML file is read, so the file they point at is the one
    /// merged.
    pub fn load_from(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        let workspace =
            workspace.or_else(|| std::env::var("CTB_WORKSPACE").ok().map(PathBuf::from));
        if let Some(workspace) = workspace {
            config.workspace = workspace;
        }

        config.config_file =
            config_file.or_else(|| std::env::var("CTB_CONFIG").ok().map(PathBuf::from));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.ctb_dir().join("config.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("CTB_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(endpoint) = std::env::var("CTB_ENDPOINT") {
            config.endpoint = endpoint;
        }

        if let Ok(output_dir) = std::env::var("CTB_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(output_dir);
        }

        config.api_token = std::env::var(&config.token_env)
            .ok()
            .filter(|token| !token.trim().is_empty());

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(inference) = config_file.inference {
            if let Some(provider) = inference.provider {
                result.provider = provider;
            }
            if let Some(endpoint) = inference.endpoint {
                result.endpoint = endpoint;
            }
            if let Some(token_env) = inference.token_env {
                result.token_env = token_env;
            }
            if inference.timeout.is_some() {
                result.timeout_secs = inference.timeout;
            }
        }

        if let Some(generation) = config_file.generation {
            let defaults = &mut result.generation;
            defaults.height = generation.height.unwrap_or(defaults.height);
            defaults.width = generation.width.unwrap_or(defaults.width);
            defaults.steps = generation.steps.unwrap_or(defaults.steps);
            defaults.guidance_scale = generation
                .guidance_scale
                .unwrap_or(defaults.guidance_scale);
        }

        if let Some(dir) = config_file.output.and_then(|o| o.dir) {
            result.output_dir = PathBuf::from(dir);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(json) = logging.json {
                result.log_json = json;
            }
        }

        result.models.extend(config_file.models);

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and
    /// the config file.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        endpoint: Option<String>,
        output_dir: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }

        if let Some(output_dir) = output_dir {
            self.output_dir = output_dir;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .ctb directory.
    pub fn ctb_dir(&self) -> PathBuf {
        self.workspace.join(".ctb")
    }

    /// Directory holding user-defined prompt templates.
    pub fn prompts_dir(&self) -> PathBuf {
        self.ctb_dir().join("prompts")
    }

    /// Whether an inference token was found.
    pub fn has_token(&self) -> bool {
        self.api_token.is_some()
    }

    /// Whether the active provider sends the token; the mock provider does not.
    pub fn requires_token(&self) -> bool {
        !self.provider.trim().eq_ignore_ascii_case("mock")
    }

    /// Report whether the inference token is available.
    ///
    /// A missing token is logged, never fatal.
    pub fn log_credential_status(&self) {
        if self.has_token() {
            tracing::info!("Hugging Face token loaded successfully.");
        } else if self.requires_token() {
            tracing::error!(
                "Hugging Face token ({}) is missing. Please set it as an environment variable.",
                self.token_env
            );
        }
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.to_lowercase();
        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if self.endpoint.trim().is_empty() {
            return Err(AppError::Config("Inference endpoint cannot be empty".to_string()));
        }

        let defaults = &self.generation;
        if defaults.height == 0 || defaults.width == 0 {
            return Err(AppError::Config(format!(
                "Image dimensions must be positive, got {}x{}",
                defaults.width, defaults.height
            )));
        }

        if defaults.steps == 0 {
            return Err(AppError::Config(
                "Number of inference steps must be positive".to_string(),
            ));
        }

        if let Some(model) = self
            .models
            .iter()
            .find(|m| m.alias.trim().is_empty() || m.name.trim().is_empty())
        {
            return Err(AppError::Config(format!(
                "Model entries need both alias and name: {:?}",
                model
            )));
        }

        Ok(())
    }
}
