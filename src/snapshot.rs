//! Periodic JSON exports of the world for offline inspection.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::enemy::{AiState, EnemyKind};
use crate::environment::{Season, Weather};
use crate::items::ResourceKind;
use crate::player::CharClass;
use crate::world::World;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub class: CharClass,
    pub x: f32,
    pub y: f32,
    pub health: f32,
    pub hunger: f32,
    pub sanity: f32,
    pub temperature: f32,
    pub resources: BTreeMap<ResourceKind, u32>,
    pub research_points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySummary {
    pub id: u64,
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
    pub health: i32,
    pub state: AiState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub day: u32,
    pub time_of_day: f32,
    pub season: Season,
    pub weather: Weather,
    pub player: PlayerSummary,
    pub enemies: Vec<EnemySummary>,
    pub object_count: usize,
    pub building_count: usize,
}

impl WorldSnapshot {
    pub fn capture(tick: u64, world: &World) -> Self {
        let player = &world.player;
        Self {
            tick,
            day: world.environment.day_count,
            time_of_day: world.environment.time_of_day,
            season: world.environment.season,
            weather: world.environment.weather,
            player: PlayerSummary {
                class: player.class,
                x: player.x,
                y: player.y,
                health: player.health.current,
                hunger: player.hunger.current,
                sanity: player.sanity.current,
                temperature: player.temperature.current,
                resources: player.resources.clone(),
                research_points: player.research_points,
            },
            enemies: world
                .enemies
                .iter()
                .map(|enemy| EnemySummary {
                    id: enemy.id.raw(),
                    kind: enemy.kind,
                    x: enemy.x,
                    y: enemy.y,
                    health: enemy.health,
                    state: enemy.state,
                })
                .collect(),
            object_count: world.objects.len(),
            building_count: world.buildings.len(),
        }
    }
}

pub struct SnapshotWriter {
    output_dir: PathBuf,
    interval_ticks: u64,
}

impl SnapshotWriter {
    pub fn new(output_dir: impl AsRef<Path>, interval_ticks: u64) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            interval_ticks,
        }
    }

    /// Writes `<dir>/<scenario>/tick_NNNNNN.json` on every interval tick.
    /// An interval of zero disables output.
    pub fn maybe_write(&self, tick: u64, scenario_name: &str, world: &World) -> Result<Option<PathBuf>> {
        if self.interval_ticks == 0 || tick % self.interval_ticks != 0 {
            return Ok(None);
        }
        let dir = self.output_dir.join(scenario_name);
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create snapshot dir {}", dir.display()))?;
        let path = dir.join(format!("tick_{tick:06}.json"));
        let json = serde_json::to_string_pretty(&WorldSnapshot::capture(tick, world))
            .context("failed to serialize snapshot")?;
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(Some(path))
    }
}
