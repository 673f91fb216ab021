use anyhow::Result;
use rand::{seq::SliceRandom, Rng};
use tracing::debug;

use crate::{
    config::{EnemyTable, SpawnConfig},
    enemy::{EnemyId, EnemyKind},
    engine::{SimEvent, SimulationContext, System},
    rng::RngExt,
    terrain::Biome,
    world::World,
};

/// Night-time enemy spawns around the player.
pub struct SpawnSystem;

impl SpawnSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SpawnSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for SpawnSystem {
    fn name(&self) -> &str {
        "spawning"
    }

    fn run(&mut self, ctx: &mut SimulationContext<'_>, world: &mut World) -> Result<()> {
        let config = ctx.config;
        let spawning = &config.spawning;
        if !world.environment.is_night(&config.clock) {
            world.environment.spawn_timer = 0.0;
            return Ok(());
        }
        world.environment.spawn_timer += ctx.dt;
        if world.environment.spawn_timer < spawning.interval || !world.player.is_alive() {
            return Ok(());
        }
        world.environment.spawn_timer = 0.0;

        let kind = pick_enemy_kind(
            world.environment.day_count,
            world.player_biome(),
            spawning,
            ctx.rng.logic(),
        );
        let (id, x, y) = spawn_near_player(world, kind, spawning, &config.enemies, ctx.rng.logic());
        debug!(tick = ctx.tick, ?kind, x, y, "enemy spawned");
        ctx.emit(SimEvent::EnemySpawned { id, kind, x, y });
        Ok(())
    }
}

/// Day one only fields the first entry of the biome's table; later days pick
/// uniformly, and from the boss day on the boss can preempt the table.
pub fn pick_enemy_kind<R: Rng>(day: u32, biome: Biome, spawning: &SpawnConfig, rng: &mut R) -> EnemyKind {
    if day >= spawning.boss_day && rng.chance(spawning.boss_chance) {
        return spawning.boss;
    }
    let table = spawning.biome_enemies.get(biome);
    let fallback = EnemyKind::Goblin;
    if day <= 1 {
        return table.first().copied().unwrap_or(fallback);
    }
    table.choose(rng).copied().unwrap_or(fallback)
}

/// Places an enemy at a random bearing and distance from the player,
/// clamped away from the map edge.
pub(crate) fn spawn_near_player<R: Rng>(
    world: &mut World,
    kind: EnemyKind,
    spawning: &SpawnConfig,
    table: &EnemyTable,
    rng: &mut R,
) -> (EnemyId, f32, f32) {
    let angle = rng.random_f32(0.0, std::f32::consts::TAU);
    let distance = rng.random_f32(spawning.min_distance, spawning.max_distance);
    let (width, height) = world.size();
    let margin = spawning.edge_margin;
    let x = (world.player.x + angle.cos() * distance).clamp(margin, (width - margin).max(margin));
    let y = (world.player.y + angle.sin() * distance).clamp(margin, (height - margin).max(margin));
    let id = world.spawn_enemy(kind, x, y, table);
    (id, x, y)
}
