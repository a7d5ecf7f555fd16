//! Prompt types for the CtB image generator.
//!
//! This module defines the domain entities of the prompt catalog and the
//! composed prompt handed to the inference service.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use ctb_core::AppError;

/// Placeholder replaced by the opposing team's armor color.
pub const ENEMY_COLOR_PLACEHOLDER: &str = "{enemy_color}";

/// Placeholder replaced by the selected team's color.
pub const TEAM_COLOR_PLACEHOLDER: &str = "{team_color}";

/// A themed prompt template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Unique human-readable key shown to the user
    pub alias: String,

    /// Template text containing `{enemy_color}` and optionally `{team_color}`
    pub text: String,
}

impl PromptTemplate {
    pub fn new(alias: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            text: text.into(),
        }
    }

    /// Whether the template references the selected team's color.
    pub fn uses_team_color(&self) -> bool {
        self.text.contains(TEAM_COLOR_PLACEHOLDER)
    }
}

/// A text-to-image model offered to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Unique human-readable key shown to the user
    pub alias: String,

    /// Identifier passed to the inference service
    pub name: String,
}

impl ModelEntry {
    pub fn new(alias: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            name: name.into(),
        }
    }
}

/// The team a user fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    /// Parse a team case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "red" => Some(Self::Red),
            "blue" => Some(Self::Blue),
            _ => None,
        }
    }

    /// Lower-case color name, as used in prompts and filenames.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
        }
    }

    /// Display label, as offered in selection lists.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Blue => "Blue",
        }
    }

    /// The opposing team.
    pub fn opponent(&self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    /// Sentence naming the winning army's armor and banners.
    pub fn victory_sentence(&self) -> &'static str {
        match self {
            Self::Red => "The winning army is dressed in red armor and banners.",
            Self::Blue => "The winning army is dressed in blue armor and banners.",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Team {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            AppError::Prompt(format!("Invalid team: {}. Choose 'Red' or 'Blue'.", s))
        })
    }
}

/// A fully composed prompt ready for the inference service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// Final prompt text
    pub text: String,

    /// Metadata about how the prompt was composed
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Source template alias
    #[serde(rename = "promptAlias")]
    pub prompt_alias: String,

    /// Selected team
    pub team: Team,

    /// Color substituted for `{enemy_color}`
    #[serde(rename = "enemyColor")]
    pub enemy_color: String,

    /// Whether free-form user text was appended
    #[serde(rename = "customPromptIncluded")]
    pub custom_prompt_included: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_parsing() {
        assert_eq!(Team::parse("Red"), Some(Team::Red));
        assert_eq!(Team::parse("RED"), Some(Team::Red));
        assert_eq!(Team::parse(" blue "), Some(Team::Blue));
        assert_eq!(Team::parse("green"), None);
        assert!("purple".parse::<Team>().is_err());
        assert_eq!("Blue".parse::<Team>().unwrap(), Team::Blue);
    }

    #[test]
    fn test_team_opponent() {
        assert_eq!(Team::Red.opponent(), Team::Blue);
        assert_eq!(Team::Blue.opponent(), Team::Red);
    }

    #[test]
    fn test_team_labels() {
        assert_eq!(Team::Red.as_str(), "red");
        assert_eq!(Team::Blue.label(), "Blue");
        assert_eq!(Team::Red.to_string(), "Red");
    }

    #[test]
    fn test_template_deserialization() {
        let yaml = r#"
alias: Harbor Raid
text: "Longships burn in the harbor while raiders in {enemy_color} armor storm the docks."
"#;

        let template: PromptTemplate = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(template.alias, "Harbor Raid");
        assert!(template.text.contains(ENEMY_COLOR_PLACEHOLDER));
        assert!(!template.uses_team_color());
    }
}
