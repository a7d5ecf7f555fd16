//! Request composer for the CtB image generator.
//!
//! Turns a user's selections into a composed prompt, calls the inference
//! service once, and writes the returned image under a deterministic name.
//! Every failure is reported as a tagged [`GenerationError`]; nothing here
//! panics or aborts the process.

pub mod error;
pub mod output;
pub mod seed;
pub mod types;

pub use error::{GenerationError, GenerationErrorKind, SUCCESS_MESSAGE};
pub use output::{output_filename, save_image};
pub use seed::resolve_seed;
pub use types::{GeneratedImage, GenerationRequest, GenerationResult, RANDOM_SEED};

use chrono::{Local, NaiveDateTime};
use ctb_core::config::DEFAULT_TOKEN_ENV;
use ctb_core::AppError;
use ctb_inference::{ImageClient, ImageRequest};
use ctb_prompt::{build_prompt, Catalog};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Composes prompts and drives the inference service for single requests.
pub struct Generator {
    catalog: Arc<Catalog>,
    client: Arc<dyn ImageClient>,
    output_dir: PathBuf,
    token_env: String,
}

impl Generator {
    /// Create a generator writing images into `output_dir`.
    pub fn new(
        catalog: Arc<Catalog>,
        client: Arc<dyn ImageClient>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            catalog,
            client,
            output_dir: output_dir.into(),
            token_env: DEFAULT_TOKEN_ENV.to_string(),
        }
    }

    /// Name the token variable in credential error messages.
    pub fn with_token_env(mut self, token_env: impl Into<String>) -> Self {
        self.token_env = token_env.into();
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Generate one image, timestamping the output with the local time.
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        self.generate_at(request, Local::now().naive_local()).await
    }

    /// Generate one image, naming the output after `timestamp`.
    pub async fn generate_at(
        &self,
        request: &GenerationRequest,
        timestamp: NaiveDateTime,
    ) -> GenerationResult {
        let start = Instant::now();

        tracing::info!(
            "Generating image: prompt='{}', team={}, model='{}'",
            request.prompt_alias,
            request.team,
            request.model_alias
        );

        let template = self.catalog.find_prompt(&request.prompt_alias).map_err(|e| {
            tracing::warn!("{}", e);
            GenerationError::CatalogLookup {
                alias: request.prompt_alias.clone(),
            }
        })?;

        let model = self
            .catalog
            .find_model_by_alias(&request.model_alias)
            .map_err(|e| {
                tracing::warn!("{}", e);
                GenerationError::CatalogLookup {
                    alias: request.model_alias.clone(),
                }
            })?;

        let built = build_prompt(template, request.team, request.custom_prompt.as_deref());

        let seed = resolve_seed(request.seed);
        tracing::info!("Using seed: {}", seed);

        let image_request = ImageRequest::new(built.text.clone(), model, seed)
            .with_size(request.width, request.height)
            .with_steps(request.steps)
            .with_guidance_scale(request.guidance_scale);

        let bytes = self
            .client
            .generate_image(&image_request)
            .await
            .map_err(|e| self.service_error(e))?;

        let filename = output_filename(
            &timestamp,
            &request.model_alias,
            &request.prompt_alias,
            request.team,
        );

        let path = save_image(&self.output_dir, &filename, &bytes).map_err(|e| {
            tracing::error!("Failed to save {}: {}", filename, e);
            GenerationError::Persistence(e.to_string())
        })?;

        tracing::info!(
            "Image saved to {} in {}ms",
            path.display(),
            start.elapsed().as_millis()
        );

        Ok(GeneratedImage {
            path,
            seed,
            prompt: built.text,
            model: model.to_string(),
        })
    }

    fn service_error(&self, err: AppError) -> GenerationError {
        tracing::error!("Inference via {} failed: {}", self.client.provider_name(), err);

        match err {
            AppError::CredentialMissing(_) => GenerationError::CredentialMissing {
                token_env: self.token_env.clone(),
            },
            other => GenerationError::ServiceInvocation(other.to_string()),
        }
    }
}

/// Convert a generation outcome into an `(output path, status message)` pair.
pub fn into_status(result: &GenerationResult) -> (Option<PathBuf>, String) {
    match result {
        Ok(image) => (Some(image.path.clone()), SUCCESS_MESSAGE.to_string()),
        Err(err) => (None, err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ctb_inference::MockImageClient;
    use ctb_prompt::Team;
    use tempfile::TempDir;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn generator(client: Arc<MockImageClient>, dir: &TempDir) -> Generator {
        Generator::new(Arc::new(Catalog::builtin()), client, dir.path())
    }

    #[tokio::test]
    async fn test_successful_generation() {
        let dir = TempDir::new().unwrap();
        let client = Arc::new(MockImageClient::with_image(b"png".to_vec()));
        let generator = generator(client.clone(), &dir);

        let request = GenerationRequest::new("Castle Siege", Team::Red, "FLUX.1-dev")
            .with_custom_prompt("  extra detail  ")
            .with_seed(42);

        let result = generator.generate_at(&request, timestamp()).await;
        let image = result.as_ref().unwrap();

        assert_eq!(
            image.path,
            dir.path().join("20240101_120000_flux.1-dev_castle_siege_red.png")
        );
        assert_eq!(std::fs::read(&image.path).unwrap(), b"png");
        assert_eq!(image.seed, 42);
        assert_eq!(image.model, "black-forest-labs/FLUX.1-dev");
        assert!(image.prompt.ends_with("red armor and banners. extra detail"));

        let sent = client.last_request().unwrap();
        assert_eq!(sent.prompt, image.prompt);
        assert_eq!(sent.model, "black-forest-labs/FLUX.1-dev");
        assert_eq!((sent.width, sent.height, sent.steps), (640, 360, 20));
        assert_eq!(sent.guidance_scale, 2.0);
        assert_eq!(sent.seed, 42);

        assert_eq!(
            into_status(&result),
            (Some(image.path.clone()), "Image generated successfully!".to_string())
        );
    }

    #[tokio::test]
    async fn test_blue_team_prompt() {
        let dir = TempDir::new().unwrap();
        let client = Arc::new(MockImageClient::new());
        let generator = generator(client.clone(), &dir);

        let request = GenerationRequest::new("Night Battle", Team::Blue, "Midjourney");
        let image = generator.generate_at(&request, timestamp()).await.unwrap();

        assert!(image.prompt.contains("dressed in red armor"));
        assert!(image
            .prompt
            .ends_with("The winning army is dressed in blue armor and banners."));
        assert!(image
            .path
            .ends_with("20240101_120000_midjourney_night_battle_blue.png"));
    }

    #[tokio::test]
    async fn test_random_seed_is_resolved() {
        let dir = TempDir::new().unwrap();
        let client = Arc::new(MockImageClient::new());
        let generator = generator(client.clone(), &dir);

        let request = GenerationRequest::new("Knight Duel", Team::Red, "FLUX.1-dev");
        let image = generator.generate_at(&request, timestamp()).await.unwrap();

        assert!((0..=1_000_000).contains(&image.seed));
        assert_eq!(client.last_request().unwrap().seed, image.seed);
    }

    #[tokio::test]
    async fn test_unknown_prompt_skips_service() {
        let dir = TempDir::new().unwrap();
        let client = Arc::new(MockImageClient::new());
        let generator = generator(client.clone(), &dir);

        let request = GenerationRequest::new("Dragon Attack", Team::Red, "FLUX.1-dev");
        let result = generator.generate_at(&request, timestamp()).await;

        assert_eq!(client.calls(), 0);
        assert_eq!(
            result.as_ref().unwrap_err().kind(),
            GenerationErrorKind::CatalogLookup
        );
        assert_eq!(
            into_status(&result),
            (None, "ERROR: Invalid prompt or model selected.".to_string())
        );
    }

    #[tokio::test]
    async fn test_unknown_model_skips_service() {
        let dir = TempDir::new().unwrap();
        let client = Arc::new(MockImageClient::new());
        let generator = generator(client.clone(), &dir);

        let request = GenerationRequest::new("Castle Siege", Team::Blue, "DALL-E 3");
        let err = generator.generate_at(&request, timestamp()).await.unwrap_err();

        assert_eq!(client.calls(), 0);
        assert!(matches!(err, GenerationError::CatalogLookup { ref alias } if alias == "DALL-E 3"));
    }

    #[tokio::test]
    async fn test_service_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let client = Arc::new(MockImageClient::failing("Model is overloaded"));
        let generator = generator(client.clone(), &dir);

        let request = GenerationRequest::new("Castle Siege", Team::Red, "FLUX.1-dev");
        let result = generator.generate_at(&request, timestamp()).await;

        assert_eq!(client.calls(), 1);
        let (path, message) = into_status(&result);
        assert!(path.is_none());
        assert!(message.starts_with("ERROR: Failed to generate image. Details: "));
        assert!(message.contains("Model is overloaded"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_credential_is_reported() {
        let dir = TempDir::new().unwrap();
        let client = Arc::new(MockImageClient::without_credentials());
        let generator = generator(client, &dir).with_token_env("MY_HF_TOKEN");

        let request = GenerationRequest::new("Castle Siege", Team::Red, "FLUX.1-dev");
        let err = generator.generate_at(&request, timestamp()).await.unwrap_err();

        assert_eq!(err.kind(), GenerationErrorKind::CredentialMissing);
        assert!(err.to_string().contains("MY_HF_TOKEN"));
    }

    #[tokio::test]
    async fn test_save_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let client = Arc::new(MockImageClient::new());
        let generator = Generator::new(
            Arc::new(Catalog::builtin()),
            client,
            dir.path().join("missing"),
        );

        let request = GenerationRequest::new("Castle Siege", Team::Red, "FLUX.1-dev");
        let err = generator.generate_at(&request, timestamp()).await.unwrap_err();

        assert_eq!(err.kind(), GenerationErrorKind::Persistence);
        assert!(err.to_string().starts_with("ERROR: Failed to save image. Details: "));
    }
}
