//! Generate command handler.
//!
//! Turns the selected prompt, team and model into one image on disk.

use clap::Args;
use ctb_core::{config::AppConfig, AppError, AppResult};
use ctb_generator::{into_status, GenerationRequest, GenerationResult, Generator};
use ctb_inference::create_client;
use ctb_prompt::{Catalog, Team};
use std::sync::Arc;

/// Longest free-form text accepted by `--custom`.
pub const MAX_CUSTOM_PROMPT_CHARS: usize = 200;

/// Generate a battle image
#[derive(Args, Debug, Default)]
pub struct GenerateCommand {
    /// Prompt alias (default: first catalog prompt)
    #[arg(long)]
    pub prompt: Option<String>,

    /// Winning team (red or blue)
    #[arg(long, default_value = "red")]
    pub team: String,

    /// Model alias (default: first catalog model)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Extra text appended to the prompt
    #[arg(long)]
    pub custom: Option<String>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Number of inference steps
    #[arg(long)]
    pub steps: Option<u32>,

    /// Guidance scale
    #[arg(long)]
    pub guidance_scale: Option<f32>,

    /// Seed (-1 for random)
    #[arg(long, allow_hyphen_values = true)]
    pub seed: Option<i64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl GenerateCommand {
    /// Execute the generate command.
    ///
    /// Returns `Ok(false)` when the request failed after its status was printed.
    pub async fn execute(&self, config: &AppConfig, catalog: Arc<Catalog>) -> AppResult<bool> {
        tracing::info!("Executing generate command");
        tracing::debug!("Generate options: {:?}", self);

        let request = self.build_request(config, &catalog)?;

        let client = create_client(
            &config.provider,
            Some(&config.endpoint),
            config.api_token.as_deref(),
            config.timeout_secs,
        )?;

        let generator = Generator::new(catalog, client, &config.output_dir)
            .with_token_env(&config.token_env);

        let result = generator.generate(&request).await;
        self.print_status(&request, &result)?;

        Ok(result.is_ok())
    }

    /// Resolve the command-line selections into a generation request.
    fn build_request(&self, config: &AppConfig, catalog: &Catalog) -> AppResult<GenerationRequest> {
        let team: Team = self.team.parse()?;

        let prompt_alias = match &self.prompt {
            Some(alias) => alias.clone(),
            None => catalog
                .default_prompt()
                .map(|p| p.alias.clone())
                .ok_or_else(|| AppError::Prompt("The prompt catalog is empty".to_string()))?,
        };

        let model_alias = match &self.model {
            Some(alias) => alias.clone(),
            None => catalog
                .default_model()
                .map(|m| m.alias.clone())
                .ok_or_else(|| AppError::Prompt("The model catalog is empty".to_string()))?,
        };

        let mut request =
            GenerationRequest::new(prompt_alias, team, model_alias).with_defaults(&config.generation);

        if let Some(custom) = &self.custom {
            let length = custom.chars().count();
            if length > MAX_CUSTOM_PROMPT_CHARS {
                return Err(AppError::Prompt(format!(
                    "Custom prompt is {} characters long; the limit is {}",
                    length, MAX_CUSTOM_PROMPT_CHARS
                )));
            }
            request = request.with_custom_prompt(custom.clone());
        }

        if let Some(height) = self.height {
            request.height = height;
        }
        if let Some(width) = self.width {
            request.width = width;
        }
        if let Some(steps) = self.steps {
            request.steps = steps;
        }
        if let Some(guidance_scale) = self.guidance_scale {
            request.guidance_scale = guidance_scale;
        }
        if let Some(seed) = self.seed {
            request = request.with_seed(seed);
        }

        Ok(request)
    }

    fn print_status(&self, request: &GenerationRequest, result: &GenerationResult) -> AppResult<()> {
        let (path, message) = into_status(result);

        if self.json {
            let output = serde_json::json!({
                "path": path,
                "message": message,
                "error": result.as_ref().err().map(|e| e.kind().as_str()),
                "seed": result.as_ref().ok().map(|image| image.seed),
                "model": result.as_ref().ok().map(|image| image.model.as_str()),
                "request": request,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            if let Some(path) = path {
                println!("{}", path.display());
            }
            println!("{}", message);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn mock_config(dir: &TempDir) -> AppConfig {
        AppConfig {
            workspace: dir.path().to_path_buf(),
            provider: "mock".to_string(),
            output_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_defaults_pick_first_entries() {
        let dir = TempDir::new().unwrap();
        let cmd = GenerateCommand {
            team: "red".to_string(),
            ..Default::default()
        };

        let request = cmd.build_request(&mock_config(&dir), &Catalog::builtin()).unwrap();
        assert_eq!(request.prompt_alias, "Castle Siege");
        assert_eq!(request.model_alias, "FLUX.1-dev");
        assert_eq!(request.team, Team::Red);
        assert_eq!((request.width, request.height), (640, 360));
        assert_eq!(request.seed, -1);
    }

    #[test]
    fn test_flags_override_defaults() {
        let dir = TempDir::new().unwrap();
        let cmd = GenerateCommand {
            prompt: Some("Snowy Battlefield".to_string()),
            team: "Blue".to_string(),
            model: Some("Midjourney".to_string()),
            width: Some(1024),
            height: Some(768),
            steps: Some(30),
            guidance_scale: Some(3.5),
            seed: Some(7),
            ..Default::default()
        };

        let request = cmd.build_request(&mock_config(&dir), &Catalog::builtin()).unwrap();
        assert_eq!(request.team, Team::Blue);
        assert_eq!((request.width, request.height, request.steps), (1024, 768, 30));
        assert_eq!(request.guidance_scale, 3.5);
        assert_eq!(request.seed, 7);
    }

    #[test]
    fn test_long_custom_prompt_is_rejected() {
        let dir = TempDir::new().unwrap();
        let config = mock_config(&dir);
        let catalog = Catalog::builtin();

        let at_limit = GenerateCommand {
            team: "red".to_string(),
            custom: Some("x".repeat(MAX_CUSTOM_PROMPT_CHARS)),
            ..Default::default()
        };
        assert!(at_limit.build_request(&config, &catalog).is_ok());

        let too_long = GenerateCommand {
            team: "red".to_string(),
            custom: Some("x".repeat(MAX_CUSTOM_PROMPT_CHARS + 1)),
            ..Default::default()
        };
        assert!(too_long.build_request(&config, &catalog).is_err());
    }

    #[test]
    fn test_invalid_team_is_rejected() {
        let dir = TempDir::new().unwrap();
        let cmd = GenerateCommand {
            team: "green".to_string(),
            ..Default::default()
        };
        assert!(cmd.build_request(&mock_config(&dir), &Catalog::builtin()).is_err());
    }

    #[tokio::test]
    async fn test_generate_with_mock_provider() {
        let dir = TempDir::new().unwrap();
        let cmd = GenerateCommand {
            team: "blue".to_string(),
            seed: Some(42),
            ..Default::default()
        };

        let ok = cmd
            .execute(&mock_config(&dir), Arc::new(Catalog::builtin()))
            .await
            .unwrap();
        assert!(ok);

        let written: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(written.len(), 1);
        assert!(written[0].ends_with("_flux.1-dev_castle_siege_blue.png"));
    }

    #[tokio::test]
    async fn test_unknown_prompt_reports_failure() {
        let dir = TempDir::new().unwrap();
        let cmd = GenerateCommand {
            prompt: Some("Dragon Attack".to_string()),
            team: "red".to_string(),
            ..Default::default()
        };

        let ok = cmd
            .execute(&mock_config(&dir), Arc::new(Catalog::builtin()))
            .await
            .unwrap();
        assert!(!ok);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
