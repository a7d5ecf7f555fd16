//! Prompts command handler.
//!
//! Lists the prompt aliases a user can pick from.

use clap::Args;
use ctb_core::AppResult;
use ctb_prompt::Catalog;

/// List available battle prompts
#[derive(Args, Debug, Default)]
pub struct PromptsCommand {
    /// Print the full template text under each alias
    #[arg(long)]
    pub full: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl PromptsCommand {
    pub async fn execute(&self, catalog: &Catalog) -> AppResult<()> {
        tracing::info!("Executing prompts command");
        println!("{}", self.render(catalog)?);
        Ok(())
    }

    fn render(&self, catalog: &Catalog) -> AppResult<String> {
        if self.json {
            return Ok(serde_json::to_string_pretty(catalog.prompts())?);
        }

        let lines: Vec<String> = catalog
            .prompts()
            .iter()
            .map(|p| {
                if self.full {
                    format!("{}\n  {}", p.alias, p.text)
                } else {
                    p.alias.clone()
                }
            })
            .collect();

        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_aliases_in_order() {
        let output = PromptsCommand::default().render(&Catalog::builtin()).unwrap();
        let aliases: Vec<&str> = output.lines().collect();

        assert_eq!(aliases.len(), 10);
        assert_eq!(aliases[0], "Castle Siege");
        assert_eq!(aliases[9], "Snowy Battlefield");
    }

    #[test]
    fn test_json_output() {
        let cmd = PromptsCommand {
            json: true,
            ..Default::default()
        };
        let output = cmd.render(&Catalog::builtin()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value.as_array().unwrap().len(), 10);
        assert_eq!(value[0]["alias"], "Castle Siege");
    }
}
