use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::{
    building::BuildingId,
    config::SimConfig,
    enemy::{EnemyId, EnemyKind},
    environment::{ClockEvent, Season, Weather},
    items::{ItemKind, ResourceKind},
    objects::ObjectId,
    rng::RngManager,
    snapshot::SnapshotWriter,
    systems,
    world::{Kill, World},
};

/// Movement intent for one tick. Discrete actions go through the `Game`
/// command surface between ticks instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_x: f32,
    pub move_y: f32,
    pub sprint: bool,
}

impl TickInput {
    pub fn toward(move_x: f32, move_y: f32) -> Self {
        Self {
            move_x,
            move_y,
            sprint: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    NightFell { day: u32 },
    DayBroke { day: u32 },
    SeasonChanged(Season),
    WeatherChanged(Weather),
    PlayerHit { enemy: EnemyId, kind: EnemyKind, damage: f32 },
    PlayerDied,
    ItemBroke(ItemKind),
    EnemyKilled(Kill),
    EnemySpawned { id: EnemyId, kind: EnemyKind, x: f32, y: f32 },
    CampfireOut(BuildingId),
    ObjectRegrown(ObjectId),
    Windfall { resource: ResourceKind, amount: u32 },
    Research { points: u32 },
    RareEnemy { id: EnemyId, kind: EnemyKind },
}

impl From<ClockEvent> for SimEvent {
    fn from(event: ClockEvent) -> Self {
        match event {
            ClockEvent::NightFell { day } => SimEvent::NightFell { day },
            ClockEvent::DayBroke { day } => SimEvent::DayBroke { day },
            ClockEvent::SeasonChanged(season) => SimEvent::SeasonChanged(season),
            ClockEvent::WeatherChanged(weather) => SimEvent::WeatherChanged(weather),
        }
    }
}

/// Everything that happened during one tick, in pipeline order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub dt: f32,
    pub events: Vec<SimEvent>,
}

impl TickReport {
    pub fn kills(&self) -> impl Iterator<Item = &Kill> {
        self.events.iter().filter_map(|event| match event {
            SimEvent::EnemyKilled(kill) => Some(kill),
            _ => None,
        })
    }
}

pub struct SimulationContext<'a> {
    pub tick: u64,
    pub dt: f32,
    pub config: &'a SimConfig,
    pub input: &'a TickInput,
    pub rng: &'a mut RngManager,
    events: &'a mut Vec<SimEvent>,
}

impl SimulationContext<'_> {
    pub fn emit(&mut self, event: impl Into<SimEvent>) {
        self.events.push(event.into());
    }
}

pub trait System {
    fn name(&self) -> &str;
    fn run(&mut self, ctx: &mut SimulationContext<'_>, world: &mut World) -> Result<()>;
}

pub struct EngineBuilder {
    config: SimConfig,
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    snapshot_writer: Option<SnapshotWriter>,
}

impl EngineBuilder {
    /// `rng` is usually the manager that already generated the world, so
    /// the logic stream continues where generation left off.
    pub fn new(config: SimConfig, rng: RngManager) -> Self {
        Self {
            config,
            rng,
            systems: Vec::new(),
            snapshot_writer: None,
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn push_system(&mut self, system: impl System + 'static) {
        self.systems.push(Box::new(system));
    }

    /// The full survival pipeline in its required order.
    pub fn with_standard_systems(self) -> Self {
        self.with_system(systems::MovementSystem::new())
            .with_system(systems::ClockSystem::new())
            .with_system(systems::SurvivalSystem::new())
            .with_system(systems::AbilitySystem::new())
            .with_system(systems::EnemySystem::new())
            .with_system(systems::BuildingSystem::new())
            .with_system(systems::RegrowthSystem::new())
            .with_system(systems::SpawnSystem::new())
            .with_system(systems::WorldEventSystem::new())
            .with_system(systems::FeedbackSystem::new())
    }

    pub fn with_snapshots(mut self, writer: SnapshotWriter) -> Self {
        self.snapshot_writer = Some(writer);
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            config: self.config,
            rng: self.rng,
            systems: self.systems,
            snapshot_writer: self.snapshot_writer,
            tick: 0,
        }
    }
}

pub struct Engine {
    config: SimConfig,
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    snapshot_writer: Option<SnapshotWriter>,
    tick: u64,
}

impl Engine {
    /// Runs every system once. `carried` holds events produced by commands
    /// since the previous tick; they lead the report.
    pub fn step(&mut self, world: &mut World, input: &TickInput, dt: f32, carried: Vec<SimEvent>) -> Result<TickReport> {
        self.tick += 1;
        let mut events = carried;
        for system in &mut self.systems {
            let mut ctx = SimulationContext {
                tick: self.tick,
                dt,
                config: &self.config,
                input,
                rng: &mut self.rng,
                events: &mut events,
            };
            system.run(&mut ctx, world)?;
        }
        if let Some(writer) = &self.snapshot_writer {
            writer.maybe_write(self.tick, &self.config.name, world)?;
        }
        Ok(TickReport {
            tick: self.tick,
            dt,
            events,
        })
    }

    /// Steps `ticks` times with a constant input.
    pub fn run(&mut self, world: &mut World, ticks: u64, dt: f32, input: &TickInput) -> Result<Vec<TickReport>> {
        (0..ticks)
            .map(|_| self.step(world, input, dt, Vec::new()))
            .collect()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn rng_mut(&mut self) -> &mut RngManager {
        &mut self.rng
    }

    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|system| system.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::CharClass;
    use crate::terrain::{Biome, TerrainGrid, TileKind};

    struct Counter {
        runs: u32,
    }

    impl System for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        fn run(&mut self, ctx: &mut SimulationContext<'_>, _world: &mut World) -> Result<()> {
            self.runs += 1;
            ctx.emit(SimEvent::Research { points: self.runs });
            Ok(())
        }
    }

    fn flat_world(config: &SimConfig) -> World {
        let terrain = TerrainGrid::filled(20, 20, TileKind::Grass, Biome::Grassland);
        World::from_terrain(terrain, config, CharClass::Warrior).unwrap()
    }

    #[test]
    fn custom_system_runs_once_per_tick() {
        let config = SimConfig::default();
        let mut world = flat_world(&config);
        let mut engine = EngineBuilder::new(config, RngManager::new(1))
            .with_system(Counter { runs: 0 })
            .build();
        let reports = engine.run(&mut world, 3, 0.1, &TickInput::default()).unwrap();
        assert_eq!(engine.tick(), 3);
        assert_eq!(reports[2].events, vec![SimEvent::Research { points: 3 }]);
    }

    #[test]
    fn carried_events_lead_the_report() {
        let config = SimConfig::default();
        let mut world = flat_world(&config);
        let mut engine = EngineBuilder::new(config, RngManager::new(1))
            .with_system(Counter { runs: 0 })
            .build();
        let report = engine
            .step(&mut world, &TickInput::default(), 0.1, vec![SimEvent::PlayerDied])
            .unwrap();
        assert_eq!(report.events[0], SimEvent::PlayerDied);
        assert_eq!(report.events.len(), 2);
    }

    #[test]
    fn standard_pipeline_order() {
        let engine = EngineBuilder::new(SimConfig::default(), RngManager::new(1))
            .with_standard_systems()
            .build();
        assert_eq!(
            engine.system_names(),
            vec![
                "movement",
                "clock",
                "survival",
                "abilities",
                "enemies",
                "buildings",
                "regrowth",
                "spawning",
                "world_events",
                "feedback"
            ]
        );
    }
}
