//! CtB Image Generator CLI
//!
//! Main entry point for the ctb command-line tool.
//! Generates medieval battle images for Capture the Banner teams.

mod commands;

use clap::{Parser, Subcommand};
use commands::{GenerateCommand, ModelsCommand, PromptsCommand};
use ctb_core::{config::AppConfig, logging, AppResult};
use ctb_prompt::load_catalog;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// CtB Image Generator - battle images for Capture the Banner teams
#[derive(Parser, Debug)]
#[command(name = "ctb")]
#[command(about = "Generate medieval battle images for Capture the Banner", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "CTB_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "CTB_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Inference provider (huggingface, mock)
    #[arg(short, long, global = true, env = "CTB_PROVIDER")]
    provider: Option<String>,

    /// Inference endpoint base URL
    #[arg(long, global = true, env = "CTB_ENDPOINT")]
    endpoint: Option<String>,

    /// Directory generated images are written to
    #[arg(short, long, global = true, env = "CTB_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a battle image
    Generate(GenerateCommand),

    /// List available battle prompts
    Prompts(PromptsCommand),

    /// List available image models
    Models(ModelsCommand),
}

#[tokio::main]
async fn main() -> AppResult<ExitCode> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Workspace and config file must be known before the YAML merge
    let config = AppConfig::load_from(cli.workspace, cli.config)?.with_overrides(
        cli.provider,
        cli.endpoint,
        cli.output_dir,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color, config.log_json)?;

    tracing::info!("CtB Image Generator starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);

    config.validate()?;
    config.log_credential_status();

    let catalog = Arc::new(load_catalog(&config.prompts_dir(), &config.models)?);
    tracing::debug!(
        "Prompt options: {:?}",
        catalog.prompts().iter().map(|p| p.alias.as_str()).collect::<Vec<_>>()
    );
    tracing::debug!(
        "Model options: {:?}",
        catalog.models().iter().map(|m| m.alias.as_str()).collect::<Vec<_>>()
    );

    let command_name = match &cli.command {
        Commands::Generate(_) => "generate",
        Commands::Prompts(_) => "prompts",
        Commands::Models(_) => "models",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Generate(cmd) => cmd.execute(&config, catalog).await,
        Commands::Prompts(cmd) => cmd.execute(&catalog).await.map(|_| true),
        Commands::Models(cmd) => cmd.execute(&catalog).await.map(|_| true),
    };

    match &result {
        Ok(true) => tracing::info!("Command completed successfully"),
        Ok(false) => tracing::warn!("Command finished with a failed request"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result.map(|ok| if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
