//! Models command handler.

use clap::Args;
use ctb_core::AppResult;
use ctb_prompt::Catalog;

/// List available image models
#[derive(Args, Debug, Default)]
pub struct ModelsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ModelsCommand {
    pub async fn execute(&self, catalog: &Catalog) -> AppResult<()> {
        tracing::info!("Executing models command");
        println!("{}", self.render(catalog)?);
        Ok(())
    }

    fn render(&self, catalog: &Catalog) -> AppResult<String> {
        if self.json {
            return Ok(serde_json::to_string_pretty(catalog.models())?);
        }

        let lines: Vec<String> = catalog
            .models()
            .iter()
            .map(|m| format!("{}  ({})", m.alias, m.name))
            .collect();

        Ok(lines.join("\n"))
    }
}
