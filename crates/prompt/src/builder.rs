//! Prompt builder: fills team colors into a template and appends the
//! victory sentence and any free-form user text.

use crate::types::{
    BuiltPrompt, BuiltPromptMetadata, PromptTemplate, Team, ENEMY_COLOR_PLACEHOLDER,
    TEAM_COLOR_PLACEHOLDER,
};

/// Compose the final prompt for a template and team.
///
/// This function:
/// 1. Substitutes `{enemy_color}` with the opposing team's color
/// 2. Substitutes `{team_color}` with the selected team's color, if present
/// 3. Appends the winning-army sentence for the selected team
/// 4. Appends the trimmed custom text, if any is left after trimming
///
/// Placeholders a template does not use are ignored, so composition cannot fail.
///
/// # Example
/// ```
/// use ctb_prompt::{build_prompt, PromptTemplate, Team};
///
/// let template = PromptTemplate::new("Duel", "A knight faces a rival in {enemy_color} armor.");
/// let built = build_prompt(&template, Team::Red, Some("  at dusk  "));
/// assert!(built.text.contains("blue armor"));
/// assert!(built.text.ends_with(" at dusk"));
/// ```
pub fn build_prompt(
    template: &PromptTemplate,
    team: Team,
    custom_prompt: Option<&str>,
) -> BuiltPrompt {
    tracing::debug!("Building prompt: {}", template.alias);

    let enemy_color = team.opponent().as_str();
    let mut text = fill_placeholders(&template.text, team);

    text.push(' ');
    text.push_str(team.victory_sentence());

    let custom = custom_prompt.map(str::trim).filter(|c| !c.is_empty());
    if let Some(custom) = custom {
        text.push(' ');
        text.push_str(custom);
    }

    tracing::debug!("Formatted prompt: {}", text);

    BuiltPrompt {
        text,
        metadata: BuiltPromptMetadata {
            prompt_alias: template.alias.clone(),
            team,
            enemy_color: enemy_color.to_string(),
            custom_prompt_included: custom.is_some(),
        },
    }
}

/// Replace the color placeholders that occur in `text`.
fn fill_placeholders(text: &str, team: Team) -> String {
    let filled = text.replace(ENEMY_COLOR_PLACEHOLDER, team.opponent().as_str());

    if filled.contains(TEAM_COLOR_PLACEHOLDER) {
        filled.replace(TEAM_COLOR_PLACEHOLDER, team.as_str())
    } else {
        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn castle_siege() -> PromptTemplate {
        Catalog::builtin()
            .find_prompt("Castle Siege")
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_red_team_fights_blue_enemy() {
        let built = build_prompt(&castle_siege(), Team::Red, None);

        assert!(built.text.contains("dressed in blue armor, is fiercely attacking"));
        assert!(built
            .text
            .ends_with("The winning army is dressed in red armor and banners."));
        assert!(!built.text.contains("{enemy_color}"));
        assert_eq!(built.metadata.enemy_color, "blue");
    }

    #[test]
    fn test_blue_team_fights_red_enemy() {
        let built = build_prompt(&castle_siege(), Team::Blue, None);

        assert!(built.text.contains("dressed in red armor, is fiercely attacking"));
        assert!(built
            .text
            .ends_with("The winning army is dressed in blue armor and banners."));
        assert_eq!(built.metadata.enemy_color, "red");
    }

    #[test]
    fn test_custom_prompt_is_trimmed() {
        let built = build_prompt(&castle_siege(), Team::Red, Some("  extra detail  "));

        assert!(built
            .text
            .ends_with("red armor and banners. extra detail"));
        assert!(!built.text.contains("  extra"));
        assert!(built.metadata.custom_prompt_included);
    }

    #[test]
    fn test_blank_custom_prompt_is_ignored() {
        let plain = build_prompt(&castle_siege(), Team::Red, None);
        let blank = build_prompt(&castle_siege(), Team::Red, Some("   "));

        assert_eq!(plain.text, blank.text);
        assert!(!blank.metadata.custom_prompt_included);
    }

    #[test]
    fn test_team_color_placeholder() {
        let template = PromptTemplate::new(
            "Banner Clash",
            "Soldiers in {team_color} tabards hold the line against {enemy_color} pikemen.",
        );

        let built = build_prompt(&template, Team::Blue, None);
        assert!(built
            .text
            .starts_with("Soldiers in blue tabards hold the line against red pikemen."));
    }

    #[test]
    fn test_unknown_braces_are_left_alone() {
        let template = PromptTemplate::new("Odd", "A {weather} sky over {enemy_color} tents.");
        let built = build_prompt(&template, Team::Red, None);
        assert!(built.text.starts_with("A {weather} sky over blue tents."));
    }
}
