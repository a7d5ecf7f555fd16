//! Catalog loader for user-defined prompt templates and models.

use crate::catalog::{validate_template, Catalog};
use crate::types::{ModelEntry, PromptTemplate};
use ctb_core::{AppError, AppResult, ModelConfig};
use std::path::{Path, PathBuf};

/// Build the catalog used for a session.
///
/// Starts from the built-in catalog, then applies every template found in
/// `prompts_dir` and every model declared in the config file. Entries
/// whose alias already exists replace the earlier entry.
///
/// # Example
/// ```no_run
/// use ctb_prompt::load_catalog;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let catalog = load_catalog(Path::new(".ctb/prompts"), &[])?;
/// println!("{} prompts available", catalog.prompts().len());
/// # Ok(())
/// # }
/// ```
pub fn load_catalog(prompts_dir: &Path, extra_models: &[ModelConfig]) -> AppResult<Catalog> {
    let mut catalog = Catalog::builtin();

    for path in list_prompt_files(prompts_dir)? {
        let template = load_prompt_file(&path)?;
        catalog = catalog.with_prompt(template)?;
    }

    for model in extra_models {
        catalog = catalog.with_model(ModelEntry::new(&model.alias, &model.name))?;
    }

    tracing::debug!(
        "Catalog ready: {} prompts, {} models",
        catalog.prompts().len(),
        catalog.models().len()
    );

    Ok(catalog)
}

/// Load a single prompt template from a YAML file.
pub fn load_prompt_file(path: &Path) -> AppResult<PromptTemplate> {
    tracing::debug!("Loading prompt from: {:?}", path);

    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::Prompt(format!("Failed to read prompt file {:?}: {}", path, e))
    })?;

    let template: PromptTemplate = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!("Failed to parse prompt YAML {:?}: {}", path, e))
    })?;

    validate_template(&template)?;

    tracing::info!("Loaded prompt: {}", template.alias);

    Ok(template)
}

/// List the prompt template files in `prompts_dir`, sorted by path.
pub fn list_prompt_files(prompts_dir: &Path) -> AppResult<Vec<PathBuf>> {
    if !prompts_dir.exists() {
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(prompts_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.is_file()
                && matches!(
                    path.extension().and_then(|s| s.to_str()),
                    Some("yml") | Some("yaml")
                )
        })
        .collect();

    files.sort();
    Ok(files)
}
