//! Prompt and model catalog.
//!
//! The catalog is an immutable value built once at startup and passed to
//! whoever needs to resolve aliases. Lookups are exact, case-sensitive
//! alias matches.

use crate::types::{ModelEntry, PromptTemplate, ENEMY_COLOR_PLACEHOLDER};
use ctb_core::{AppError, AppResult};
use std::collections::HashSet;

const RENDER_STYLE: &str = "Unreal Engine render style, photorealistic, realistic fantasy style.";

const BUILTIN_PROMPTS: [(&str, &str); 10] = [
    (
        "Castle Siege",
        "A medieval castle under siege, with archers firing arrows from the walls, knights charging on horses, and catapults launching fireballs. The enemy army, dressed in {enemy_color} armor, is fiercely attacking the castle, with soldiers scaling ladders and clashing swords with the defenders. Arrows fly through the air, explosions light up the battlefield, and injured knights lie on the ground. Fire engulfs parts of the castle, and the air is thick with smoke and chaos.",
    ),
    (
        "Forest Battle",
        "A fierce battle between two armies in a dense forest, with knights wielding swords and axes, horses rearing, and the ground covered in mud and blood. The enemy army, dressed in {enemy_color} armor, is locked in brutal combat, with soldiers fighting hand-to-hand amidst the trees. Arrows whiz past, and the sounds of clashing steel echo through the forest. Injured soldiers scream in pain, and the forest is littered with broken weapons and shields.",
    ),
    (
        "Boiling Oil Defense",
        "A dramatic moment in a medieval siege, with a knight leading a charge against a castle gate, while defenders pour boiling oil from the walls. The enemy army, dressed in {enemy_color} armor, is relentlessly attacking, with soldiers screaming as they are hit by the oil. Knights clash swords at the gate, and arrows rain down from above. The ground is littered with the bodies of fallen soldiers, and the air is filled with the smell of burning flesh.",
    ),
    (
        "Burning Castle Battle",
        "A chaotic battlefield with knights on horseback clashing with infantry, archers firing volleys of arrows, and a castle burning in the background. The enemy army, dressed in {enemy_color} armor, is fighting fiercely, with soldiers engaging in brutal melee combat. Flames light up the scene as knights charge through the chaos. Injured soldiers crawl on the ground, and the air is filled with the sounds of clashing steel and screams of pain.",
    ),
    (
        "Heroic Last Stand",
        "A heroic last stand of a small group of knights defending a bridge against a massive army, with arrows flying and swords clashing. The enemy army, dressed in {enemy_color} armor, is overwhelming the defenders, but the knights fight bravely, cutting down enemy soldiers as they advance. The bridge is littered with bodies and broken weapons. Blood stains the ground, and the air is thick with the sounds of battle.",
    ),
    (
        "Siege Tower Attack",
        "A medieval siege tower approaching a castle wall, with knights scaling ladders and defenders throwing rocks and shooting arrows. The enemy army, dressed in {enemy_color} armor, is fighting desperately to breach the walls, with soldiers clashing swords on the battlements. Arrows fly in all directions, and the siege tower is engulfed in flames. Injured soldiers fall from the ladders, and the ground is littered with the bodies of the fallen.",
    ),
    (
        "Knight Duel",
        "A dramatic duel between two knights in the middle of a battlefield, with their armies watching and the castle in the background. The enemy army, dressed in {enemy_color} armor, is engaged in fierce combat all around, with soldiers clashing swords and firing arrows. The duelists fight with skill and determination, their blades flashing in the sunlight. Injured soldiers lie on the ground, and the air is filled with the sounds of battle.",
    ),
    (
        "Night Battle",
        "A night battle during a medieval siege, with torches lighting the scene, knights fighting in the shadows, and the castle walls looming in the background. The enemy army, dressed in {enemy_color} armor, is locked in brutal combat, with soldiers clashing swords and firing arrows in the dim light. Flames from burning siege equipment illuminate the chaos. Injured soldiers scream in pain, and the ground is littered with the bodies of the fallen.",
    ),
    (
        "Marching Army",
        "A massive army of knights and infantry marching towards a distant castle, with banners flying and the sun setting behind them. The enemy army, dressed in {enemy_color} armor, is engaging in skirmishes along the way, with soldiers clashing swords and firing arrows. The battlefield is alive with the sounds of combat and the clash of steel. Injured soldiers lie on the ground, and the air is thick with the smell of blood and smoke.",
    ),
    (
        "Snowy Battlefield",
        "A medieval battle in a snowy landscape, with knights in heavy armor fighting on a frozen lake, and the castle visible in the distance. The enemy army, dressed in {enemy_color} armor, is locked in fierce combat, with soldiers slipping on the ice as they clash swords. Arrows fly through the air, and the snow is stained red with blood. Injured soldiers crawl on the ground, and the air is filled with the sounds of battle.",
    ),
];

const BUILTIN_MODELS: [(&str, &str); 2] = [
    ("FLUX.1-dev", "black-forest-labs/FLUX.1-dev"),
    ("Midjourney", "strangerzonehf/Flux-Midjourney-Mix2-LoRA"),
];

/// Immutable set of prompt templates and models, in presentation order.
#[derive(Debug, Clone)]
pub struct Catalog {
    prompts: Vec<PromptTemplate>,
    models: Vec<ModelEntry>,
}

impl Catalog {
    /// Build a catalog, rejecting invalid or duplicate entries.
    pub fn new(prompts: Vec<PromptTemplate>, models: Vec<ModelEntry>) -> AppResult<Self> {
        for template in &prompts {
            validate_template(template)?;
        }
        for model in &models {
            validate_model(model)?;
        }

        ensure_unique(prompts.iter().map(|p| p.alias.as_str()), "prompt")?;
        ensure_unique(models.iter().map(|m| m.alias.as_str()), "model")?;

        Ok(Self { prompts, models })
    }

    /// The catalog shipped with the application.
    pub fn builtin() -> Self {
        let prompts = BUILTIN_PROMPTS
            .iter()
            .map(|(alias, text)| PromptTemplate::new(*alias, format!("{} {}", text, RENDER_STYLE)))
            .collect();

        let models = BUILTIN_MODELS
            .iter()
            .map(|(alias, name)| ModelEntry::new(*alias, *name))
            .collect();

        Self { prompts, models }
    }

    /// Find a prompt template by alias.
    pub fn find_prompt(&self, alias: &str) -> AppResult<&PromptTemplate> {
        self.prompts
            .iter()
            .find(|p| p.alias == alias)
            .ok_or_else(|| AppError::Prompt(format!("Unknown prompt alias: {}", alias)))
    }

    /// Find a prompt template's text by alias.
    pub fn find_prompt_by_alias(&self, alias: &str) -> AppResult<&str> {
        self.find_prompt(alias).map(|p| p.text.as_str())
    }

    /// Find a model's service identifier by alias.
    pub fn find_model_by_alias(&self, alias: &str) -> AppResult<&str> {
        self.models
            .iter()
            .find(|m| m.alias == alias)
            .map(|m| m.name.as_str())
            .ok_or_else(|| AppError::Prompt(format!("Unknown model alias: {}", alias)))
    }

    pub fn prompts(&self) -> &[PromptTemplate] {
        &self.prompts
    }

    pub fn models(&self) -> &[ModelEntry] {
        &self.models
    }

    /// The template selected when the user makes no choice.
    pub fn default_prompt(&self) -> Option<&PromptTemplate> {
        self.prompts.first()
    }

    /// The model selected when the user makes no choice.
    pub fn default_model(&self) -> Option<&ModelEntry> {
        self.models.first()
    }

    /// Add a template, replacing any existing template with the same alias.
    pub fn with_prompt(mut self, template: PromptTemplate) -> AppResult<Self> {
        validate_template(&template)?;

        match self.prompts.iter_mut().find(|p| p.alias == template.alias) {
            Some(existing) => {
                tracing::warn!("Prompt '{}' overrides an existing template", template.alias);
                *existing = template;
            }
            None => self.prompts.push(template),
        }

        Ok(self)
    }

    /// Add a model, replacing any existing model with the same alias.
    pub fn with_model(mut self, model: ModelEntry) -> AppResult<Self> {
        validate_model(&model)?;

        match self.models.iter_mut().find(|m| m.alias == model.alias) {
            Some(existing) => {
                tracing::warn!("Model '{}' overrides an existing entry", model.alias);
                *existing = model;
            }
            None => self.models.push(model),
        }

        Ok(self)
    }
}

/// Validate a prompt template.
pub(crate) fn validate_template(template: &PromptTemplate) -> AppResult<()> {
    if template.alias.trim().is_empty() {
        return Err(AppError::Prompt("Prompt alias cannot be empty".to_string()));
    }

    if template.text.trim().is_empty() {
        return Err(AppError::Prompt(format!(
            "Prompt '{}' has an empty template",
            template.alias
        )));
    }

    if !template.text.contains(ENEMY_COLOR_PLACEHOLDER) {
        return Err(AppError::Prompt(format!(
            "Prompt '{}' must contain the {} placeholder",
            template.alias, ENEMY_COLOR_PLACEHOLDER
        )));
    }

    Ok(())
}

fn validate_model(model: &ModelEntry) -> AppResult<()> {
    if model.alias.trim().is_empty() || model.name.trim().is_empty() {
        return Err(AppError::Prompt(format!(
            "Model entries need both alias and name, got '{}' -> '{}'",
            model.alias, model.name
        )));
    }
    Ok(())
}

fn ensure_unique<'a>(aliases: impl Iterator<Item = &'a str>, kind: &str) -> AppResult<()> {
    let mut seen = HashSet::new();
    for alias in aliases {
        if !seen.insert(alias) {
            return Err(AppError::Prompt(format!(
                "Duplicate {} alias: {}",
                kind, alias
            )));
        }
    }
    Ok(())
}
