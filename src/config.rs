//! Simulation configuration.
//!
//! Every balance number the simulation uses lives here, keyed by enum
//! through fixed-shape tables. Each section deserializes with defaults, so a
//! scenario file only needs to list what it overrides.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::enemy::EnemyKind;
use crate::environment::{Season, Weather};
use crate::error::ConfigError;
use crate::items::{ItemKind, ResourceKind};
use crate::objects::ObjectKind;
use crate::player::{CharClass, Requirements};
use crate::terrain::{Biome, BiomeTable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub name: String,
    pub seed: u64,
    pub world: WorldGenConfig,
    pub placement: PlacementConfig,
    pub objects: ObjectTable,
    pub buildings: BuildingConfig,
    pub player: PlayerConfig,
    pub food: FoodConfig,
    pub survival: SurvivalConfig,
    pub clock: ClockConfig,
    pub classes: ClassTable,
    pub enemies: EnemyTable,
    pub spawning: SpawnConfig,
    pub events: EventConfig,
    pub combat: CombatConfig,
    pub crafting: CraftingConfig,
    pub snapshot: SnapshotConfig,
    pub logging: LoggingConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            name: "wildmere".to_string(),
            seed: 42,
            world: WorldGenConfig::default(),
            placement: PlacementConfig::default(),
            objects: ObjectTable::default(),
            buildings: BuildingConfig::default(),
            player: PlayerConfig::default(),
            food: FoodConfig::default(),
            survival: SurvivalConfig::default(),
            clock: ClockConfig::default(),
            classes: ClassTable::default(),
            enemies: EnemyTable::default(),
            spawning: SpawnConfig::default(),
            events: EventConfig::default(),
            combat: CombatConfig::default(),
            crafting: CraftingConfig::default(),
            snapshot: SnapshotConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: SimConfig =
            serde_yaml::from_str(text).context("failed to parse simulation config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("failed to serialize simulation config")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.width < 8 || self.world.height < 8 {
            return Err(ConfigError::Validation(format!(
                "world must be at least 8x8 tiles, got {}x{}",
                self.world.width, self.world.height
            )));
        }
        if self.world.lake_radius_min > self.world.lake_radius_max {
            return Err(ConfigError::Validation(
                "lake_radius_min exceeds lake_radius_max".into(),
            ));
        }
        if self.placement.stride == 0 {
            return Err(ConfigError::Validation(
                "placement stride must be at least 1".into(),
            ));
        }
        for (label, period) in [
            ("day_length", self.clock.day_length),
            ("night_length", self.clock.night_length),
            ("weather_period", self.clock.weather_period),
            ("season_period", self.clock.season_period),
            ("spawn interval", self.spawning.interval),
        ] {
            if period <= 0.0 {
                return Err(ConfigError::Validation(format!(
                    "{label} must be positive, got {period}"
                )));
            }
        }
        for (biome, rules) in self.placement.biome_rules.iter() {
            if let Some(rule) = rules.iter().find(|r| !(0.0..=1.0).contains(&r.chance)) {
                return Err(ConfigError::Validation(format!(
                    "{} placement chance for {:?} is {}, expected 0..=1",
                    biome.name(),
                    rule.kind,
                    rule.chance
                )));
            }
        }
        for (biome, table) in self.spawning.biome_enemies.iter() {
            if table.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "{} has an empty enemy spawn table",
                    biome.name()
                )));
            }
        }
        for season in Season::ALL {
            if self.clock.weather_weights.get(season).total() <= 0.0 {
                return Err(ConfigError::Validation(format!(
                    "weather weights for {season:?} sum to zero"
                )));
            }
        }
        if self.events.chance_per_second < 0.0 {
            return Err(ConfigError::Validation(
                "event chance must not be negative".into(),
            ));
        }
        for (kind, recipe) in self.crafting.iter() {
            if recipe.requirements.values().all(|&amount| amount == 0) {
                return Err(ConfigError::Validation(format!(
                    "recipe for {} has no requirements",
                    kind.name()
                )));
            }
            if recipe.durability == Some(0) {
                return Err(ConfigError::Validation(format!(
                    "{} would be crafted already broken",
                    kind.name()
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// Fraction of the map width.
    pub x: f32,
    /// Fraction of the map height.
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldGenConfig {
    pub width: u32,
    pub height: u32,
    pub biome_anchors: BiomeTable<Anchor>,
    /// Maximum absolute jitter added to every tile-to-anchor distance.
    pub biome_noise: f32,
    pub swamp_water_chance: f32,
    pub lava_chance: f32,
    pub lake_count: u32,
    pub lake_radius_min: u32,
    pub lake_radius_max: u32,
    pub lake_margin: u32,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            biome_anchors: BiomeTable {
                grassland: Anchor { x: 0.5, y: 0.5 },
                forest: Anchor { x: 0.22, y: 0.3 },
                desert: Anchor { x: 0.8, y: 0.25 },
                swamp: Anchor { x: 0.25, y: 0.78 },
                tundra: Anchor { x: 0.5, y: 0.06 },
                volcanic: Anchor { x: 0.8, y: 0.8 },
            },
            biome_noise: 8.0,
            swamp_water_chance: 0.3,
            lava_chance: 0.1,
            lake_count: 5,
            lake_radius_min: 5,
            lake_radius_max: 10,
            lake_margin: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRule {
    pub kind: ObjectKind,
    pub chance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountRule {
    pub kind: ObjectKind,
    pub count: u32,
}

fn rules(entries: &[(ObjectKind, f32)]) -> Vec<SpawnRule> {
    entries
        .iter()
        .map(|(kind, chance)| SpawnRule {
            kind: *kind,
            chance: *chance,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Sampling step of the biome scatter pass.
    pub stride: u32,
    /// Rules are tried in order; the first success places the tile's object.
    pub biome_rules: BiomeTable<Vec<SpawnRule>>,
    pub deposits: Vec<CountRule>,
    pub starter_ring: Vec<CountRule>,
    pub starter_inner_radius: f32,
    pub starter_outer_radius: f32,
    pub ruin_clusters: u32,
    pub ruins_per_cluster_min: u32,
    pub ruins_per_cluster_max: u32,
    pub ruin_spread: i32,
    pub cave_count: u32,
    pub cave_biomes: Vec<Biome>,
    /// Retry budget for every "random tile satisfying a condition" draw.
    pub max_attempts: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        use ObjectKind::*;
        Self {
            stride: 2,
            biome_rules: BiomeTable {
                grassland: rules(&[(Tree, 0.04), (Bush, 0.05), (Rock, 0.02)]),
                forest: rules(&[(Tree, 0.25), (Bush, 0.05), (MushroomPatch, 0.03), (Rock, 0.02)]),
                desert: rules(&[(CactusPlant, 0.05), (Rock, 0.03)]),
                swamp: rules(&[(MushroomPatch, 0.08), (Tree, 0.05)]),
                tundra: rules(&[(IceDeposit, 0.04), (Rock, 0.04), (Tree, 0.02)]),
                volcanic: rules(&[(Rock, 0.08)]),
            },
            deposits: vec![
                CountRule { kind: IronDeposit, count: 25 },
                CountRule { kind: GoldDeposit, count: 12 },
                CountRule { kind: GemDeposit, count: 6 },
            ],
            starter_ring: vec![
                CountRule { kind: Tree, count: 4 },
                CountRule { kind: Rock, count: 3 },
                CountRule { kind: Bush, count: 3 },
            ],
            starter_inner_radius: 3.0,
            starter_outer_radius: 6.0,
            ruin_clusters: 4,
            ruins_per_cluster_min: 3,
            ruins_per_cluster_max: 5,
            ruin_spread: 2,
            cave_count: 3,
            cave_biomes: vec![Biome::Forest, Biome::Volcanic],
            max_attempts: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectProfile {
    pub max_health: i32,
    pub harvestable: bool,
    pub resource: Option<ResourceKind>,
    pub yield_min: u32,
    pub yield_max: u32,
    /// Regrowing objects survive a full harvest and restore their yield after
    /// this many seconds.
    pub regrow_seconds: Option<f32>,
    /// Tool that harvests at full speed. `None` means bare hands suffice.
    pub tool: Option<ItemKind>,
}

impl ObjectProfile {
    fn new(max_health: i32, resource: ResourceKind, yield_range: (u32, u32)) -> Self {
        Self {
            max_health,
            harvestable: true,
            resource: Some(resource),
            yield_min: yield_range.0,
            yield_max: yield_range.1,
            regrow_seconds: None,
            tool: None,
        }
    }

    fn with_tool(mut self, tool: ItemKind) -> Self {
        self.tool = Some(tool);
        self
    }

    fn regrowing(mut self, seconds: f32) -> Self {
        self.regrow_seconds = Some(seconds);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectTable {
    pub tree: ObjectProfile,
    pub rock: ObjectProfile,
    pub bush: ObjectProfile,
    pub mushroom_patch: ObjectProfile,
    pub cactus_plant: ObjectProfile,
    pub ice_deposit: ObjectProfile,
    pub iron_deposit: ObjectProfile,
    pub gold_deposit: ObjectProfile,
    pub gem_deposit: ObjectProfile,
    pub ancient_ruin: ObjectProfile,
    pub cave_entrance: ObjectProfile,
}

impl ObjectTable {
    pub fn get(&self, kind: ObjectKind) -> &ObjectProfile {
        match kind {
            ObjectKind::Tree => &self.tree,
            ObjectKind::Rock => &self.rock,
            ObjectKind::Bush => &self.bush,
            ObjectKind::MushroomPatch => &self.mushroom_patch,
            ObjectKind::CactusPlant => &self.cactus_plant,
            ObjectKind::IceDeposit => &self.ice_deposit,
            ObjectKind::IronDeposit => &self.iron_deposit,
            ObjectKind::GoldDeposit => &self.gold_deposit,
            ObjectKind::GemDeposit => &self.gem_deposit,
            ObjectKind::AncientRuin => &self.ancient_ruin,
            ObjectKind::CaveEntrance => &self.cave_entrance,
        }
    }
}

impl Default for ObjectTable {
    fn default() -> Self {
        use ResourceKind::*;
        Self {
            tree: ObjectProfile::new(50, Wood, (3, 6)).with_tool(ItemKind::Axe),
            rock: ObjectProfile::new(60, Stone, (2, 4)).with_tool(ItemKind::Pickaxe),
            bush: ObjectProfile::new(20, Berries, (1, 3)).regrowing(120.0),
            mushroom_patch: ObjectProfile::new(15, Mushrooms, (1, 3)).regrowing(180.0),
            cactus_plant: ObjectProfile::new(30, CactusFlesh, (1, 2)).regrowing(240.0),
            ice_deposit: ObjectProfile::new(40, Ice, (2, 4)).with_tool(ItemKind::Pickaxe),
            iron_deposit: ObjectProfile::new(80, Iron, (1, 3)).with_tool(ItemKind::Pickaxe),
            gold_deposit: ObjectProfile::new(100, Gold, (1, 2)).with_tool(ItemKind::Pickaxe),
            gem_deposit: ObjectProfile::new(120, Gems, (1, 1)).with_tool(ItemKind::Pickaxe),
            ancient_ruin: ObjectProfile::new(150, Relics, (1, 2)).with_tool(ItemKind::Pickaxe),
            cave_entrance: ObjectProfile {
                max_health: 1000,
                harvestable: false,
                resource: None,
                yield_min: 0,
                yield_max: 0,
                regrow_seconds: None,
                tool: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingConfig {
    pub campfire_health: i32,
    pub campfire_fuel: f32,
    pub campfire_burn_rate: f32,
    pub campfire_light_radius: f32,
    pub fuel_per_wood: f32,
    pub wall_health: i32,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        Self {
            campfire_health: 50,
            campfire_fuel: 100.0,
            campfire_burn_rate: 2.0,
            campfire_light_radius: 5.0,
            fuel_per_wood: 25.0,
            wall_health: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_hunger: f32,
    pub max_sanity: f32,
    pub max_temperature: f32,
    pub start_temperature: f32,
    pub sprint_multiplier: f32,
    pub inventory_slots: usize,
    /// Side of the player's collision box, in tiles.
    pub body_size: f32,
    /// Side of an obstacle's collision box, in tiles.
    pub obstacle_size: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_hunger: 100.0,
            max_sanity: 100.0,
            max_temperature: 100.0,
            start_temperature: 50.0,
            sprint_multiplier: 1.5,
            inventory_slots: 20,
            body_size: 0.6,
            obstacle_size: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodConfig {
    pub berries_hunger: f32,
    pub cooked_meat_hunger: f32,
    pub cooked_meat_health: f32,
    pub mushroom_hunger: f32,
    pub mushroom_sanity: f32,
    pub cactus_hunger: f32,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            berries_hunger: 15.0,
            cooked_meat_hunger: 40.0,
            cooked_meat_health: 10.0,
            mushroom_hunger: 10.0,
            mushroom_sanity: -5.0,
            cactus_hunger: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurvivalConfig {
    pub hunger_decay: f32,
    pub comfort_min: f32,
    pub comfort_max: f32,
    pub discomfort_hunger_multiplier: f32,
    pub winter_base: f32,
    pub summer_base: f32,
    pub mild_base: f32,
    pub biome_offsets: BiomeTable<f32>,
    pub night_offset: f32,
    pub wet_weather_offset: f32,
    pub wetness_duration: f32,
    pub relax_rate: f32,
    pub light_warmth: f32,
    pub wet_chill: f32,
    pub extreme_cold: f32,
    pub extreme_heat: f32,
    pub extreme_health_drain: f32,
    pub extreme_hunger_drain: f32,
    pub extreme_sanity_drain: f32,
    pub sanity_night_decay: f32,
    pub darkness_multiplier: f32,
    pub storm_multiplier: f32,
    pub sanity_day_regen: f32,
    pub clear_multiplier: f32,
    pub starvation_health_drain: f32,
    pub insanity_threshold: f32,
    pub insanity_health_drain: f32,
    pub sprint_hunger_drain: f32,
    pub hit_sanity_loss: f32,
}

impl Default for SurvivalConfig {
    fn default() -> Self {
        Self {
            hunger_decay: 0.02,
            comfort_min: 20.0,
            comfort_max: 80.0,
            discomfort_hunger_multiplier: 1.5,
            winter_base: 20.0,
            summer_base: 70.0,
            mild_base: 50.0,
            biome_offsets: BiomeTable {
                grassland: 0.0,
                forest: 0.0,
                desert: 20.0,
                swamp: 0.0,
                tundra: -30.0,
                volcanic: 35.0,
            },
            night_offset: -15.0,
            wet_weather_offset: -10.0,
            wetness_duration: 300.0,
            relax_rate: 0.1,
            light_warmth: 20.0,
            wet_chill: 5.0,
            extreme_cold: 10.0,
            extreme_heat: 90.0,
            extreme_health_drain: 0.5,
            extreme_hunger_drain: 0.1,
            extreme_sanity_drain: 0.2,
            sanity_night_decay: 0.05,
            darkness_multiplier: 2.0,
            storm_multiplier: 1.5,
            sanity_day_regen: 0.01,
            clear_multiplier: 1.5,
            starvation_health_drain: 0.15,
            insanity_threshold: 10.0,
            insanity_health_drain: 0.1,
            sprint_hunger_drain: 0.05,
            hit_sanity_loss: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherWeights {
    pub clear: f32,
    pub rain: f32,
    pub snow: f32,
    pub storm: f32,
}

impl Default for WeatherWeights {
    fn default() -> Self {
        Self {
            clear: 1.0,
            rain: 0.0,
            snow: 0.0,
            storm: 0.0,
        }
    }
}

impl WeatherWeights {
    pub fn total(&self) -> f32 {
        self.clear + self.rain + self.snow + self.storm
    }

    pub fn entries(&self) -> [(Weather, f32); 4] {
        [
            (Weather::Clear, self.clear.max(0.0)),
            (Weather::Rain, self.rain.max(0.0)),
            (Weather::Snow, self.snow.max(0.0)),
            (Weather::Storm, self.storm.max(0.0)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonWeather {
    pub spring: WeatherWeights,
    pub summer: WeatherWeights,
    pub autumn: WeatherWeights,
    pub winter: WeatherWeights,
}

impl SeasonWeather {
    pub fn get(&self, season: Season) -> &WeatherWeights {
        match season {
            Season::Spring => &self.spring,
            Season::Summer => &self.summer,
            Season::Autumn => &self.autumn,
            Season::Winter => &self.winter,
        }
    }
}

impl Default for SeasonWeather {
    fn default() -> Self {
        let mixed = WeatherWeights {
            clear: 0.5,
            rain: 0.35,
            snow: 0.0,
            storm: 0.15,
        };
        Self {
            spring: mixed,
            summer: WeatherWeights {
                clear: 0.8,
                rain: 0.1,
                snow: 0.0,
                storm: 0.1,
            },
            autumn: mixed,
            winter: WeatherWeights {
                clear: 0.3,
                rain: 0.0,
                snow: 0.5,
                storm: 0.2,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub day_length: f32,
    pub night_length: f32,
    pub weather_period: f32,
    pub season_period: f32,
    pub weather_weights: SeasonWeather,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            day_length: 480.0,
            night_length: 360.0,
            weather_period: 300.0,
            season_period: 2400.0,
            weather_weights: SeasonWeather::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassProfile {
    pub max_health: f32,
    pub speed: f32,
    pub ability_cooldown: f32,
    pub ability_range: f32,
    pub ability_damage: i32,
    /// `None` hits every enemy in range.
    pub ability_max_targets: Option<usize>,
    pub ability_heal: f32,
    /// Length of the timed effect window, zero for instant abilities.
    pub ability_duration: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassTable {
    pub warrior: ClassProfile,
    pub mage: ClassProfile,
    pub archer: ClassProfile,
    pub paladin: ClassProfile,
}

impl ClassTable {
    pub fn get(&self, class: CharClass) -> &ClassProfile {
        match class {
            CharClass::Warrior => &self.warrior,
            CharClass::Mage => &self.mage,
            CharClass::Archer => &self.archer,
            CharClass::Paladin => &self.paladin,
        }
    }
}

impl Default for ClassTable {
    fn default() -> Self {
        Self {
            warrior: ClassProfile {
                max_health: 120.0,
                speed: 7.5,
                ability_cooldown: 8.0,
                ability_range: 3.0,
                ability_damage: 30,
                ability_max_targets: None,
                ability_heal: 0.0,
                ability_duration: 0.0,
            },
            mage: ClassProfile {
                max_health: 90.0,
                speed: 8.0,
                ability_cooldown: 6.0,
                ability_range: 8.0,
                ability_damage: 50,
                ability_max_targets: Some(1),
                ability_heal: 0.0,
                ability_duration: 0.0,
            },
            archer: ClassProfile {
                max_health: 100.0,
                speed: 9.0,
                ability_cooldown: 7.0,
                ability_range: 10.0,
                ability_damage: 25,
                ability_max_targets: Some(3),
                ability_heal: 0.0,
                ability_duration: 0.0,
            },
            paladin: ClassProfile {
                max_health: 110.0,
                speed: 7.0,
                ability_cooldown: 15.0,
                ability_range: 0.0,
                ability_damage: 0,
                ability_max_targets: None,
                ability_heal: 50.0,
                ability_duration: 3.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub resource: ResourceKind,
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyProfile {
    pub max_health: i32,
    pub speed: f32,
    pub damage: i32,
    pub detection_range: f32,
    pub attack_range: f32,
    /// Attacks per second.
    pub attack_speed: f32,
    pub loot: Vec<LootEntry>,
}

fn loot(resource: ResourceKind, min: u32, max: u32) -> LootEntry {
    LootEntry { resource, min, max }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTable {
    pub goblin: EnemyProfile,
    pub wolf: EnemyProfile,
    pub scorpion: EnemyProfile,
    pub swamp_lurker: EnemyProfile,
    pub frost_wraith: EnemyProfile,
    pub fire_imp: EnemyProfile,
    pub wizard_boss: EnemyProfile,
}

impl EnemyTable {
    pub fn get(&self, kind: EnemyKind) -> &EnemyProfile {
        match kind {
            EnemyKind::Goblin => &self.goblin,
            EnemyKind::Wolf => &self.wolf,
            EnemyKind::Scorpion => &self.scorpion,
            EnemyKind::SwampLurker => &self.swamp_lurker,
            EnemyKind::FrostWraith => &self.frost_wraith,
            EnemyKind::FireImp => &self.fire_imp,
            EnemyKind::WizardBoss => &self.wizard_boss,
        }
    }
}

impl Default for EnemyTable {
    fn default() -> Self {
        use ResourceKind::*;
        Self {
            goblin: EnemyProfile {
                max_health: 30,
                speed: 1.5,
                damage: 5,
                detection_range: 8.0,
                attack_range: 1.0,
                attack_speed: 1.0,
                loot: vec![loot(Meat, 1, 2)],
            },
            wolf: EnemyProfile {
                max_health: 40,
                speed: 2.5,
                damage: 8,
                detection_range: 10.0,
                attack_range: 1.0,
                attack_speed: 1.0,
                loot: vec![loot(Meat, 2, 4)],
            },
            scorpion: EnemyProfile {
                max_health: 35,
                speed: 2.0,
                damage: 7,
                detection_range: 8.0,
                attack_range: 1.0,
                attack_speed: 1.2,
                loot: vec![loot(Meat, 1, 2)],
            },
            swamp_lurker: EnemyProfile {
                max_health: 50,
                speed: 1.2,
                damage: 9,
                detection_range: 7.0,
                attack_range: 1.2,
                attack_speed: 0.8,
                loot: vec![loot(Mushrooms, 1, 3), loot(Meat, 1, 1)],
            },
            frost_wraith: EnemyProfile {
                max_health: 45,
                speed: 2.0,
                damage: 10,
                detection_range: 12.0,
                attack_range: 1.5,
                attack_speed: 0.8,
                loot: vec![loot(Ice, 2, 3)],
            },
            fire_imp: EnemyProfile {
                max_health: 30,
                speed: 2.8,
                damage: 8,
                detection_range: 9.0,
                attack_range: 3.0,
                attack_speed: 1.0,
                loot: vec![loot(Stone, 1, 3), loot(Gems, 0, 1)],
            },
            wizard_boss: EnemyProfile {
                max_health: 150,
                speed: 1.0,
                damage: 15,
                detection_range: 15.0,
                attack_range: 5.0,
                attack_speed: 1.0,
                loot: vec![loot(Meat, 5, 5), loot(Stone, 10, 10), loot(Wood, 10, 10)],
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Seconds of night between spawns.
    pub interval: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub edge_margin: f32,
    /// The first entry of each table is the only one used on day one.
    pub biome_enemies: BiomeTable<Vec<EnemyKind>>,
    pub boss: EnemyKind,
    pub boss_day: u32,
    pub boss_chance: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        use EnemyKind::*;
        Self {
            interval: 30.0,
            min_distance: 10.0,
            max_distance: 20.0,
            edge_margin: 5.0,
            biome_enemies: BiomeTable {
                grassland: vec![Goblin, Wolf],
                forest: vec![Goblin, Wolf],
                desert: vec![Scorpion, Goblin],
                swamp: vec![SwampLurker, Goblin],
                tundra: vec![FrostWraith, Wolf],
                volcanic: vec![FireImp],
            },
            boss: WizardBoss,
            boss_day: 5,
            boss_chance: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    pub chance_per_second: f32,
    pub windfall_weight: f32,
    pub research_weight: f32,
    pub rare_enemy_weight: f32,
    pub windfall_resources: Vec<ResourceKind>,
    pub windfall_min: u32,
    pub windfall_max: u32,
    pub research_min: u32,
    pub research_max: u32,
    pub rare_enemy: EnemyKind,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            chance_per_second: 0.002,
            windfall_weight: 0.45,
            research_weight: 0.35,
            rare_enemy_weight: 0.2,
            windfall_resources: vec![ResourceKind::Wood, ResourceKind::Stone, ResourceKind::Berries],
            windfall_min: 3,
            windfall_max: 8,
            research_min: 5,
            research_max: 15,
            rare_enemy: EnemyKind::WizardBoss,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub melee_range: f32,
    pub base_damage: i32,
    pub sword_damage: i32,
    pub armor_defense: i32,
    pub gather_range: f32,
    pub tool_gather_damage: i32,
    pub bare_gather_damage: i32,
    pub plant_gather_damage: i32,
    pub interact_range: f32,
    pub placement_range: f32,
    pub feedback_seconds: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            melee_range: 2.0,
            base_damage: 10,
            sword_damage: 20,
            armor_defense: 3,
            gather_range: 2.0,
            tool_gather_damage: 20,
            bare_gather_damage: 5,
            plant_gather_damage: 20,
            interact_range: 2.0,
            placement_range: 5.0,
            feedback_seconds: 1.0,
        }
    }
}

/// One craftable item: what it costs, the tool the menu lists for it and the
/// durability it is crafted with (`None` never wears out).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeProfile {
    pub requirements: Requirements,
    #[serde(default)]
    pub tool_required: Option<ItemKind>,
    #[serde(default)]
    pub durability: Option<u32>,
}

impl RecipeProfile {
    fn new(requirements: &[(ResourceKind, u32)]) -> Self {
        Self {
            requirements: requirements.iter().copied().collect(),
            tool_required: None,
            durability: None,
        }
    }

    fn lasting(mut self, durability: u32) -> Self {
        self.durability = Some(durability);
        self
    }

    fn requiring(mut self, tool: ItemKind) -> Self {
        self.tool_required = Some(tool);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CraftingConfig {
    pub axe: RecipeProfile,
    pub pickaxe: RecipeProfile,
    pub sword: RecipeProfile,
    pub torch: RecipeProfile,
    pub campfire: RecipeProfile,
    pub wooden_wall: RecipeProfile,
    pub iron_armor: RecipeProfile,
}

impl CraftingConfig {
    pub fn get(&self, kind: ItemKind) -> Option<&RecipeProfile> {
        match kind {
            ItemKind::Axe => Some(&self.axe),
            ItemKind::Pickaxe => Some(&self.pickaxe),
            ItemKind::Sword => Some(&self.sword),
            ItemKind::Torch => Some(&self.torch),
            ItemKind::Campfire => Some(&self.campfire),
            ItemKind::WoodenWall => Some(&self.wooden_wall),
            ItemKind::IronArmor => Some(&self.iron_armor),
            ItemKind::Berries | ItemKind::CookedMeat => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemKind, &RecipeProfile)> {
        [
            ItemKind::Axe,
            ItemKind::Pickaxe,
            ItemKind::Sword,
            ItemKind::Torch,
            ItemKind::Campfire,
            ItemKind::WoodenWall,
            ItemKind::IronArmor,
        ]
        .into_iter()
        .filter_map(move |kind| self.get(kind).map(|recipe| (kind, recipe)))
    }

    /// Starting durability for a new item of `kind`.
    pub fn durability(&self, kind: ItemKind) -> Option<u32> {
        self.get(kind).and_then(|recipe| recipe.durability)
    }
}

impl Default for CraftingConfig {
    fn default() -> Self {
        use ResourceKind::*;
        Self {
            axe: RecipeProfile::new(&[(Wood, 3), (Stone, 2)]).lasting(100),
            pickaxe: RecipeProfile::new(&[(Wood, 2), (Stone, 3)]).lasting(100),
            sword: RecipeProfile::new(&[(Wood, 2), (Stone, 4)]).lasting(150),
            torch: RecipeProfile::new(&[(Wood, 2)]).lasting(60),
            campfire: RecipeProfile::new(&[(Wood, 5), (Stone, 3)]),
            wooden_wall: RecipeProfile::new(&[(Wood, 4)]),
            iron_armor: RecipeProfile::new(&[(Iron, 5), (Wood, 2)])
                .lasting(200)
                .requiring(ItemKind::Pickaxe),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub interval_ticks: u64,
    pub output_dir: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            interval_ticks: 0,
            output_dir: "snapshots".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<SimConfig> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        SimConfig::from_yaml_str(&data).with_context(|| format!("Failed to load {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "name: tiny\nseed: 9\nworld:\n  width: 40\n  height: 30\n";
        let config = SimConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.name, "tiny");
        assert_eq!(config.seed, 9);
        assert_eq!(config.world.width, 40);
        assert_eq!(config.world.lake_count, 5);
        assert_eq!(config.enemies.wolf.max_health, 40);
    }

    #[test]
    fn yaml_round_trip_preserves_tables() {
        let config = SimConfig::default();
        let text = config.to_yaml().unwrap();
        let loaded = SimConfig::from_yaml_str(&text).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn rejects_bad_probability() {
        let mut config = SimConfig::default();
        config.placement.biome_rules.forest[0].chance = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_recipe_without_requirements() {
        let mut config = SimConfig::default();
        config.crafting.torch.requirements.clear();
        assert!(config.validate().is_err());
        let mut config = SimConfig::default();
        config.crafting.axe.durability = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_spawn_table() {
        let mut config = SimConfig::default();
        config.spawning.biome_enemies.desert.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_period() {
        let mut config = SimConfig::default();
        config.clock.season_period = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn loader_reads_bundled_scenario() {
        let loader = ConfigLoader::new(env!("CARGO_MANIFEST_DIR"));
        let config = loader.load("scenarios/meadow.yaml").unwrap();
        assert_eq!(config.name, "meadow");
    }
}
