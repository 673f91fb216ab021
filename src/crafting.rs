use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{CraftingConfig, RecipeProfile};
use crate::items::{Item, ItemKind};
use crate::player::{Player, Requirements};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub result: ItemKind,
    pub requirements: Requirements,
    /// Recorded for the crafting menu only; crafting never checks it.
    pub tool_required: Option<ItemKind>,
}

impl Recipe {
    fn from_profile(result: ItemKind, profile: &RecipeProfile) -> Self {
        Self {
            result,
            requirements: profile.requirements.clone(),
            tool_required: profile.tool_required,
        }
    }
}

pub struct CraftingSystem {
    recipes: BTreeMap<ItemKind, Recipe>,
    config: CraftingConfig,
}

impl CraftingSystem {
    pub fn new(config: &CraftingConfig) -> Self {
        Self {
            recipes: config
                .iter()
                .map(|(kind, profile)| (kind, Recipe::from_profile(kind, profile)))
                .collect(),
            config: config.clone(),
        }
    }

    pub fn recipe(&self, kind: ItemKind) -> Option<&Recipe> {
        self.recipes.get(&kind)
    }

    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    pub fn can_craft(&self, player: &Player, recipe: &Recipe) -> bool {
        player.has_resources(&recipe.requirements)
    }

    /// Consumes the whole requirement set and hands back the new item, or
    /// leaves the player untouched when anything is short.
    pub fn craft_item(&self, player: &mut Player, recipe: &Recipe) -> Option<Item> {
        if !self.can_craft(player, recipe) {
            return None;
        }
        player.consume_resources(&recipe.requirements);
        Some(player.new_item(recipe.result, &self.config))
    }
}

impl Default for CraftingSystem {
    fn default() -> Self {
        Self::new(&CraftingConfig::default())
    }
}
