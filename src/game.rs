//! The command and query surface a presentation layer drives.
//!
//! Commands run between ticks and return structured outcomes; anything they
//! cause that the tick report should carry (kills, broken tools) is queued
//! and leads the next report.

use anyhow::Result;
use tracing::debug;

use crate::building::{Building, BuildingId, BuildingKind};
use crate::combat::{self, AbilityEffect, AbilityReport, Hit};
use crate::config::SimConfig;
use crate::crafting::CraftingSystem;
use crate::enemy::Enemy;
use crate::engine::{Engine, EngineBuilder, SimEvent, TickInput, TickReport};
use crate::error::ActionError;
use crate::feedback::FeedbackKind;
use crate::items::{ItemId, ItemKind, ResourceKind};
use crate::objects::{HarvestState, ObjectId, WorldObject, Yield};
use crate::player::{CharClass, HotbarUse, Player, Requirements};
use crate::rng::RngManager;
use crate::snapshot::SnapshotWriter;
use crate::terrain::{Biome, TileKind};
use crate::world::{Kill, World};

#[derive(Debug, Clone, PartialEq)]
pub struct GatherOutcome {
    pub object: ObjectId,
    pub damage: i32,
    pub granted: Option<Yield>,
    pub destroyed: bool,
    pub broke: Option<ItemKind>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttackOutcome {
    pub hit: Hit,
    pub broke: Option<ItemKind>,
    pub kills: Vec<Kill>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AbilityOutcome {
    pub report: AbilityReport,
    pub kills: Vec<Kill>,
}

pub struct Game {
    config: SimConfig,
    class: CharClass,
    world: World,
    engine: Engine,
    crafting: CraftingSystem,
    input: TickInput,
    pending: Vec<SimEvent>,
}

impl Game {
    pub fn new(config: SimConfig, class: CharClass) -> Result<Self> {
        Self::with_snapshots(config, class, None)
    }

    pub fn with_snapshots(config: SimConfig, class: CharClass, snapshots: Option<SnapshotWriter>) -> Result<Self> {
        config.validate()?;
        let mut rng = RngManager::new(config.seed);
        let world = World::generate(&config, class, rng.logic())?;
        let mut builder = EngineBuilder::new(config.clone(), rng).with_standard_systems();
        if let Some(writer) = snapshots {
            builder = builder.with_snapshots(writer);
        }
        let crafting = CraftingSystem::new(&config.crafting);
        Ok(Self {
            config,
            class,
            world,
            engine: builder.build(),
            crafting,
            input: TickInput::default(),
            pending: Vec::new(),
        })
    }

    /// Wraps an existing world, e.g. a hand-built test arena.
    pub fn from_world(config: SimConfig, world: World) -> Self {
        let rng = RngManager::new(config.seed);
        let engine = EngineBuilder::new(config.clone(), rng)
            .with_standard_systems()
            .build();
        let crafting = CraftingSystem::new(&config.crafting);
        Self {
            class: world.player.class,
            config,
            world,
            engine,
            crafting,
            input: TickInput::default(),
            pending: Vec::new(),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn player(&self) -> &Player {
        &self.world.player
    }

    pub fn objects(&self) -> &[WorldObject] {
        &self.world.objects
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.world.enemies
    }

    pub fn buildings(&self) -> &[Building] {
        &self.world.buildings
    }

    pub fn crafting(&self) -> &CraftingSystem {
        &self.crafting
    }

    pub fn tick_count(&self) -> u64 {
        self.engine.tick()
    }

    pub fn get_tile(&self, x: i32, y: i32) -> TileKind {
        self.world.get_tile(x, y)
    }

    pub fn get_biome_at(&self, x: i32, y: i32) -> Biome {
        self.world.get_biome_at(x, y)
    }

    /// Movement intent applied on every following tick until changed.
    pub fn set_input(&mut self, input: TickInput) {
        self.input = input;
    }

    pub fn update(&mut self, dt: f32) -> Result<TickReport> {
        let carried = std::mem::take(&mut self.pending);
        self.engine.step(&mut self.world, &self.input, dt, carried)
    }

    fn ensure_alive(&self) -> Result<(), ActionError> {
        if self.world.player.is_alive() {
            Ok(())
        } else {
            Err(ActionError::PlayerDead)
        }
    }

    /// Direct displacement outside the tick pipeline. Returns whether the
    /// player actually moved.
    pub fn move_player(&mut self, dx: f32, dy: f32) -> Result<bool, ActionError> {
        self.ensure_alive()?;
        let obstacles: Vec<(f32, f32)> = self.world.obstacles().collect();
        let size = self.world.size();
        Ok(self
            .world
            .player
            .try_move(dx, dy, size, obstacles, &self.config.player))
    }

    pub fn gather(&mut self, id: ObjectId) -> Result<GatherOutcome, ActionError> {
        self.ensure_alive()?;
        let combat = &self.config.combat;
        let player = &self.world.player;
        let object = self.world.object(id).ok_or(ActionError::NotFound)?;
        let distance = object.distance_to(player.x, player.y);
        if distance > combat.gather_range {
            return Err(ActionError::OutOfRange {
                distance,
                limit: combat.gather_range,
            });
        }
        if !object.is_harvestable() {
            return Err(ActionError::NotHarvestable);
        }

        let (damage, uses_tool) = match object.tool {
            None => (combat.plant_gather_damage, false),
            Some(tool) if player.equipped_tool_kind() == Some(tool) => (combat.tool_gather_damage, true),
            Some(_) => (combat.bare_gather_damage, false),
        };
        let broke = if uses_tool {
            self.world.player.wear_tool()
        } else {
            None
        };

        let object = self.world.object_mut(id).ok_or(ActionError::NotFound)?;
        let (ox, oy) = (object.x as f32, object.y as f32);
        let (granted, destroyed) = match object.harvest_hit(damage) {
            HarvestState::Damaged => (None, false),
            HarvestState::Stripped(granted) => (granted, false),
            HarvestState::Destroyed(granted) => {
                self.world.remove_object(id);
                (granted, true)
            }
        };
        if let Some(gain) = granted {
            self.world.player.add_resource(gain.resource, gain.amount);
        }
        if let Some(kind) = broke {
            self.pending.push(SimEvent::ItemBroke(kind));
        }

        let (kind, value) = match granted {
            Some(gain) => (FeedbackKind::Harvest, gain.amount as f32),
            None => (FeedbackKind::DamageDealt, damage as f32),
        };
        let seconds = self.config.combat.feedback_seconds;
        self.world
            .push_feedback(kind, value, ox, oy, seconds, self.engine.rng_mut().cosmetic());
        debug!(object = id.raw(), damage, ?granted, destroyed, "gathered");

        Ok(GatherOutcome {
            object: id,
            damage,
            granted,
            destroyed,
            broke,
        })
    }

    /// Gathers from the closest harvestable object within reach.
    pub fn gather_nearest(&mut self) -> Result<GatherOutcome, ActionError> {
        self.ensure_alive()?;
        let (px, py) = (self.world.player.x, self.world.player.y);
        let range = self.config.combat.gather_range;
        let mut nearest: Option<(ObjectId, f32)> = None;
        for object in self.world.objects.iter().filter(|o| o.is_harvestable()) {
            let dist = object.distance_to(px, py);
            if dist <= range && nearest.map_or(true, |(_, best)| dist < best) {
                nearest = Some((object.id, dist));
            }
        }
        let (id, _) = nearest.ok_or(ActionError::NoTarget)?;
        self.gather(id)
    }

    pub fn attack_nearest_enemy(&mut self) -> Result<AttackOutcome, ActionError> {
        self.ensure_alive()?;
        let outcome = combat::melee_attack(&mut self.world.player, &mut self.world.enemies, &self.config.combat)?;
        let seconds = self.config.combat.feedback_seconds;
        let hit = outcome.hit;
        self.world.push_feedback(
            FeedbackKind::DamageDealt,
            hit.damage as f32,
            hit.x,
            hit.y,
            seconds,
            self.engine.rng_mut().cosmetic(),
        );
        if let Some(kind) = outcome.broke {
            self.pending.push(SimEvent::ItemBroke(kind));
        }
        let kills = self.reap();
        Ok(AttackOutcome {
            hit,
            broke: outcome.broke,
            kills,
        })
    }

    pub fn use_ability(&mut self) -> Result<AbilityOutcome, ActionError> {
        self.ensure_alive()?;
        let profile = self.config.classes.get(self.world.player.class);
        let report = combat::use_ability(&mut self.world.player, &mut self.world.enemies, profile)?;
        let seconds = self.config.combat.feedback_seconds;
        let rng = self.engine.rng_mut().cosmetic();
        match &report.effect {
            AbilityEffect::Struck(hits) => {
                for hit in hits {
                    self.world
                        .push_feedback(FeedbackKind::DamageDealt, hit.damage as f32, hit.x, hit.y, seconds, rng);
                }
            }
            AbilityEffect::Shielded { healed, .. } => {
                let (px, py) = (self.world.player.x, self.world.player.y);
                self.world
                    .push_feedback(FeedbackKind::Heal, *healed, px, py, seconds, rng);
            }
        }
        debug!(class = ?report.class, "ability used");
        let kills = self.reap();
        Ok(AbilityOutcome { report, kills })
    }

    /// Removes anything a command just killed so loot lands immediately.
    fn reap(&mut self) -> Vec<Kill> {
        let kills = self
            .world
            .remove_dead_enemies(&self.config.enemies, self.engine.rng_mut().logic());
        self.pending
            .extend(kills.iter().cloned().map(SimEvent::EnemyKilled));
        kills
    }

    pub fn craft(&mut self, kind: ItemKind) -> Result<ItemId, ActionError> {
        self.ensure_alive()?;
        let recipe = self.crafting.recipe(kind).ok_or(ActionError::NotFound)?;
        if let Some(shortfall) = self.world.player.first_shortfall(&recipe.requirements) {
            return Err(shortfall);
        }
        if !self.world.player.can_store(kind) {
            return Err(ActionError::InventoryFull);
        }
        let Some(item) = self.crafting.craft_item(&mut self.world.player, recipe) else {
            return Err(ActionError::NotFound);
        };
        debug!(item = item.name(), "crafted");
        self.world.player.store_item(item)
    }

    /// Places a held Campfire or WoodenWall item on a tile within reach.
    pub fn place_building(&mut self, x: i32, y: i32, kind: BuildingKind) -> Result<BuildingId, ActionError> {
        self.ensure_alive()?;
        let item_kind = match kind {
            BuildingKind::Campfire => ItemKind::Campfire,
            BuildingKind::WoodenWall => ItemKind::WoodenWall,
        };
        let item = self
            .world
            .player
            .items()
            .find(|item| item.kind == item_kind)
            .map(|item| item.id)
            .ok_or(ActionError::NotFound)?;
        let distance = self.world.player.distance_to(x as f32, y as f32);
        let limit = self.config.combat.placement_range;
        if distance > limit {
            return Err(ActionError::OutOfRange { distance, limit });
        }
        let id = self
            .world
            .place_building(kind, x, y, &self.config.buildings)?;
        self.world.player.remove_item(item);
        self.world.player.prune_equipment();
        debug!(?kind, x, y, "building placed");
        Ok(id)
    }

    fn nearest_campfire(&self) -> Option<(BuildingId, f32)> {
        let (px, py) = (self.world.player.x, self.world.player.y);
        self.world
            .buildings
            .iter()
            .filter(|b| b.kind == BuildingKind::Campfire)
            .map(|b| (b.id, b.distance_to(px, py)))
            .filter(|(_, dist)| *dist <= self.config.combat.interact_range)
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Cooks one Meat into a CookedMeat item at a burning campfire in reach.
    pub fn interact(&mut self) -> Result<ItemId, ActionError> {
        self.ensure_alive()?;
        let (fire, _) = self.nearest_campfire().ok_or(ActionError::NoTarget)?;
        if !self.world.building(fire).map_or(false, Building::is_lit) {
            return Err(ActionError::NoFuel);
        }
        if self.world.player.resource(ResourceKind::Meat) == 0 {
            return Err(ActionError::NothingToCook);
        }
        if !self.world.player.can_store(ItemKind::CookedMeat) {
            return Err(ActionError::InventoryFull);
        }
        let meat: Requirements = [(ResourceKind::Meat, 1)].into_iter().collect();
        self.world.player.consume_resources(&meat);
        let cooked = self
            .world
            .player
            .new_item(ItemKind::CookedMeat, &self.config.crafting);
        self.world.player.store_item(cooked)
    }

    /// Feeds one Wood to the nearest campfire in reach and returns its fuel.
    pub fn refuel_campfire(&mut self) -> Result<f32, ActionError> {
        self.ensure_alive()?;
        let (fire, _) = self.nearest_campfire().ok_or(ActionError::NoTarget)?;
        let wood: Requirements = [(ResourceKind::Wood, 1)].into_iter().collect();
        if let Some(shortfall) = self.world.player.first_shortfall(&wood) {
            return Err(shortfall);
        }
        self.world.player.consume_resources(&wood);
        let amount = self.config.buildings.fuel_per_wood;
        let building = self.world.building_mut(fire).ok_or(ActionError::NotFound)?;
        building.refuel(amount);
        Ok(building.fuel)
    }

    pub fn eat(&mut self, resource: ResourceKind) -> Result<(), ActionError> {
        self.ensure_alive()?;
        self.world.player.eat_resource(resource, &self.config.food)
    }

    pub fn equip(&mut self, item: ItemId) -> Result<ItemKind, ActionError> {
        self.ensure_alive()?;
        self.world.player.equip(item)
    }

    pub fn assign_hotbar(&mut self, item: ItemId, slot: usize) -> Result<(), ActionError> {
        self.world.player.assign_hotbar(item, slot)
    }

    pub fn use_hotbar(&mut self, slot: usize) -> Result<HotbarUse, ActionError> {
        self.ensure_alive()?;
        self.world.player.use_hotbar_item(slot, &self.config.food)
    }

    /// Starts over on a freshly generated map with the same class. The
    /// logic stream carries on, so the new map differs from the old one.
    pub fn restart(&mut self) -> Result<()> {
        self.world = World::generate(&self.config, self.class, self.engine.rng_mut().logic())?;
        self.pending.clear();
        self.input = TickInput::default();
        Ok(())
    }
}
