use anyhow::Result;
use rand::{distributions::WeightedIndex, prelude::Distribution, seq::SliceRandom, Rng};
use tracing::info;

use crate::{
    engine::{SimEvent, SimulationContext, System},
    rng::RngExt,
    world::World,
};

use super::spawning::spawn_near_player;

/// Rare random world events: a resource windfall, a burst of research, or a
/// strong enemy showing up.
pub struct WorldEventSystem;

impl WorldEventSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WorldEventSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for WorldEventSystem {
    fn name(&self) -> &str {
        "world_events"
    }

    fn run(&mut self, ctx: &mut SimulationContext<'_>, world: &mut World) -> Result<()> {
        let config = ctx.config;
        let events = &config.events;
        if !world.player.is_alive() || !ctx.rng.logic().chance(events.chance_per_second * ctx.dt) {
            return Ok(());
        }
        let weights = [events.windfall_weight, events.research_weight, events.rare_enemy_weight];
        let Ok(dist) = WeightedIndex::new(weights.iter().map(|w| w.max(0.0))) else {
            return Ok(());
        };

        let rng = ctx.rng.logic();
        let event = match dist.sample(rng) {
            0 => {
                let Some(resource) = events.windfall_resources.choose(rng).copied() else {
                    return Ok(());
                };
                let amount = rng.gen_range(events.windfall_min..=events.windfall_max.max(events.windfall_min));
                world.player.add_resource(resource, amount);
                info!(tick = ctx.tick, ?resource, amount, "windfall");
                SimEvent::Windfall { resource, amount }
            }
            1 => {
                let points = rng.gen_range(events.research_min..=events.research_max.max(events.research_min));
                world.player.research_points += points;
                info!(tick = ctx.tick, points, "research breakthrough");
                SimEvent::Research { points }
            }
            _ => {
                let kind = events.rare_enemy;
                let (id, _, _) = spawn_near_player(world, kind, &config.spawning, &config.enemies, rng);
                info!(tick = ctx.tick, ?kind, "rare enemy appeared");
                SimEvent::RareEnemy { id, kind }
            }
        };
        ctx.emit(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::engine::{EngineBuilder, TickInput};
    use crate::player::CharClass;
    use crate::rng::RngManager;
    use crate::terrain::{Biome, TerrainGrid, TileKind};

    fn run_with(config: SimConfig) -> (World, Vec<SimEvent>) {
        let terrain = TerrainGrid::filled(40, 40, TileKind::Grass, Biome::Grassland);
        let mut world = World::from_terrain(terrain, &config, CharClass::Mage).unwrap();
        let mut engine = EngineBuilder::new(config, RngManager::new(11))
            .with_system(WorldEventSystem::new())
            .build();
        let report = engine
            .step(&mut world, &TickInput::default(), 1.0, Vec::new())
            .unwrap();
        (world, report.events)
    }

    #[test]
    fn research_event_adds_points() {
        let mut config = SimConfig::default();
        config.events.chance_per_second = 1.0;
        config.events.windfall_weight = 0.0;
        config.events.rare_enemy_weight = 0.0;
        let (world, events) = run_with(config);
        assert!((5..=15).contains(&world.player.research_points));
        assert_eq!(
            events,
            vec![SimEvent::Research {
                points: world.player.research_points
            }]
        );
    }

    #[test]
    fn rare_enemy_event_spawns_boss() {
        let mut config = SimConfig::default();
        config.events.chance_per_second = 1.0;
        config.events.windfall_weight = 0.0;
        config.events.research_weight = 0.0;
        let (world, events) = run_with(config);
        assert_eq!(world.enemies.len(), 1);
        assert!(matches!(events[0], SimEvent::RareEnemy { .. }));
    }

    #[test]
    fn zero_chance_never_fires() {
        let mut config = SimConfig::default();
        config.events.chance_per_second = 0.0;
        let (_, events) = run_with(config);
        assert!(events.is_empty());
    }
}
