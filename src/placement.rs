//! Scatters world objects over a generated terrain grid.
//!
//! Placement is purely additive: nothing checks whether a tile already holds
//! an object, so later passes may stack on earlier ones.

use rand::Rng;
use tracing::debug;

use crate::config::{ObjectTable, PlacementConfig};
use crate::objects::{ObjectId, ObjectKind, WorldObject};
use crate::rng::RngExt;
use crate::terrain::{Biome, TerrainGrid};

pub struct ObjectPlacer<'a> {
    config: &'a PlacementConfig,
    table: &'a ObjectTable,
    next_id: u64,
}

impl<'a> ObjectPlacer<'a> {
    pub fn new(config: &'a PlacementConfig, table: &'a ObjectTable, first_id: u64) -> Self {
        Self {
            config,
            table,
            next_id: first_id,
        }
    }

    /// First id not handed out yet.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn populate<R: Rng>(&mut self, grid: &TerrainGrid, spawn: (i32, i32), rng: &mut R) -> Vec<WorldObject> {
        let mut objects = Vec::new();
        self.scatter_biome_objects(grid, rng, &mut objects);
        let scattered = objects.len();
        self.scatter_deposits(grid, rng, &mut objects);
        self.ring_starter_resources(grid, spawn, rng, &mut objects);
        self.place_ruins(grid, rng, &mut objects);
        self.place_caves(grid, rng, &mut objects);
        debug!(
            scattered,
            total = objects.len(),
            "placed world objects"
        );
        objects
    }

    fn spawn_object<R: Rng>(&mut self, kind: ObjectKind, x: i32, y: i32, rng: &mut R) -> WorldObject {
        let id = ObjectId::new(self.next_id);
        self.next_id += 1;
        WorldObject::from_profile(id, kind, x, y, self.table.get(kind), rng)
    }

    fn scatter_biome_objects<R: Rng>(&mut self, grid: &TerrainGrid, rng: &mut R, out: &mut Vec<WorldObject>) {
        let stride = self.config.stride.max(1) as usize;
        for y in (0..grid.height() as i32).step_by(stride) {
            for x in (0..grid.width() as i32).step_by(stride) {
                if grid.tile(x, y).is_hazard() {
                    continue;
                }
                let rules = self.config.biome_rules.get(grid.biome(x, y));
                let picked = rules.iter().find(|rule| rng.chance(rule.chance)).map(|rule| rule.kind);
                if let Some(kind) = picked {
                    let object = self.spawn_object(kind, x, y, rng);
                    out.push(object);
                }
            }
        }
    }

    fn scatter_deposits<R: Rng>(&mut self, grid: &TerrainGrid, rng: &mut R, out: &mut Vec<WorldObject>) {
        let config = self.config;
        for rule in &config.deposits {
            for _ in 0..rule.count {
                if let Some((x, y)) = self.random_tile(grid, rng, |_| true) {
                    let object = self.spawn_object(rule.kind, x, y, rng);
                    out.push(object);
                }
            }
        }
    }

    fn ring_starter_resources<R: Rng>(
        &mut self,
        grid: &TerrainGrid,
        spawn: (i32, i32),
        rng: &mut R,
        out: &mut Vec<WorldObject>,
    ) {
        let config = self.config;
        let inner = config.starter_inner_radius;
        let outer = config.starter_outer_radius.max(inner);
        for rule in &config.starter_ring {
            for _ in 0..rule.count {
                let spot = (0..config.max_attempts).find_map(|_| {
                    let angle = rng.random_f32(0.0, std::f32::consts::TAU);
                    let radius = rng.random_f32(inner, outer);
                    let x = spawn.0 + (angle.cos() * radius).round() as i32;
                    let y = spawn.1 + (angle.sin() * radius).round() as i32;
                    (grid.in_bounds(x, y) && !grid.tile(x, y).is_hazard()).then_some((x, y))
                });
                if let Some((x, y)) = spot {
                    let object = self.spawn_object(rule.kind, x, y, rng);
                    out.push(object);
                }
            }
        }
    }

    fn place_ruins<R: Rng>(&mut self, grid: &TerrainGrid, rng: &mut R, out: &mut Vec<WorldObject>) {
        let spread = self.config.ruin_spread.max(0);
        let min = self.config.ruins_per_cluster_min;
        let max = self.config.ruins_per_cluster_max.max(min);
        for _ in 0..self.config.ruin_clusters {
            let Some((cx, cy)) = self.random_tile(grid, rng, |_| true) else {
                continue;
            };
            let count = rng.gen_range(min..=max);
            for _ in 0..count {
                let x = cx + rng.gen_range(-spread..=spread);
                let y = cy + rng.gen_range(-spread..=spread);
                if grid.in_bounds(x, y) && !grid.tile(x, y).is_hazard() {
                    let object = self.spawn_object(ObjectKind::AncientRuin, x, y, rng);
                    out.push(object);
                }
            }
        }
    }

    fn place_caves<R: Rng>(&mut self, grid: &TerrainGrid, rng: &mut R, out: &mut Vec<WorldObject>) {
        let config = self.config;
        for _ in 0..config.cave_count {
            if let Some((x, y)) = self.random_tile(grid, rng, |biome| config.cave_biomes.contains(&biome)) {
                let object = self.spawn_object(ObjectKind::CaveEntrance, x, y, rng);
                out.push(object);
            }
        }
    }

    /// Uniform random non-hazard tile whose biome passes `accept`, giving up
    /// after the configured attempt budget.
    fn random_tile<R, F>(&self, grid: &TerrainGrid, rng: &mut R, accept: F) -> Option<(i32, i32)>
    where
        R: Rng,
        F: Fn(Biome) -> bool,
    {
        let width = grid.width() as i32;
        let height = grid.height() as i32;
        (0..self.config.max_attempts).find_map(|_| {
            let x = rng.gen_range(0..width);
            let y = rng.gen_range(0..height);
            (!grid.tile(x, y).is_hazard() && accept(grid.biome(x, y))).then_some((x, y))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CountRule, SpawnRule};
    use crate::terrain::TileKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn quiet_config() -> PlacementConfig {
        let mut config = PlacementConfig::default();
        for rules in [
            &mut config.biome_rules.grassland,
            &mut config.biome_rules.forest,
            &mut config.biome_rules.desert,
            &mut config.biome_rules.swamp,
            &mut config.biome_rules.tundra,
            &mut config.biome_rules.volcanic,
        ] {
            rules.clear();
        }
        config.deposits.clear();
        config.starter_ring.clear();
        config.ruin_clusters = 0;
        config.cave_count = 0;
        config
    }

    #[test]
    fn scatter_skips_water_and_respects_stride() {
        let mut config = quiet_config();
        config.biome_rules.grassland = vec![SpawnRule {
            kind: ObjectKind::Tree,
            chance: 1.0,
        }];
        let table = ObjectTable::default();
        let mut grid = TerrainGrid::filled(10, 10, TileKind::Grass, Biome::Grassland);
        grid.set_tile(2, 2, TileKind::Water);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let objects = ObjectPlacer::new(&config, &table, 1).populate(&grid, (5, 5), &mut rng);
        assert_eq!(objects.len(), 24);
        assert!(objects.iter().all(|o| o.x % 2 == 0 && o.y % 2 == 0));
        assert!(!objects.iter().any(|o| (o.x, o.y) == (2, 2)));
    }

    #[test]
    fn starter_ring_surrounds_spawn() {
        let mut config = quiet_config();
        config.starter_ring = vec![CountRule {
            kind: ObjectKind::Bush,
            count: 6,
        }];
        let table = ObjectTable::default();
        let grid = TerrainGrid::filled(40, 40, TileKind::Grass, Biome::Grassland);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let objects = ObjectPlacer::new(&config, &table, 1).populate(&grid, (20, 20), &mut rng);
        assert_eq!(objects.len(), 6);
        for object in &objects {
            let d = object.distance_to(20.0, 20.0);
            assert!((2.0..=7.0).contains(&d), "bush at distance {d}");
        }
    }

    #[test]
    fn caves_only_in_allowed_biomes() {
        let mut config = quiet_config();
        config.cave_count = 5;
        let table = ObjectTable::default();
        let mut grid = TerrainGrid::filled(20, 20, TileKind::Grass, Biome::Grassland);
        for y in 0..20 {
            for x in 0..5 {
                grid.set_biome(x, y, Biome::Forest);
            }
        }
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let objects = ObjectPlacer::new(&config, &table, 1).populate(&grid, (10, 10), &mut rng);
        assert!(!objects.is_empty());
        assert!(objects.iter().all(|o| o.kind == ObjectKind::CaveEntrance && o.x < 5));
    }

    #[test]
    fn ids_are_sequential() {
        let config = PlacementConfig::default();
        let table = ObjectTable::default();
        let grid = TerrainGrid::filled(30, 30, TileKind::Grass, Biome::Forest);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut placer = ObjectPlacer::new(&config, &table, 100);
        let objects = placer.populate(&grid, (15, 15), &mut rng);
        for (i, object) in objects.iter().enumerate() {
            assert_eq!(object.id.raw(), 100 + i as u64);
        }
        assert_eq!(placer.next_id(), 100 + objects.len() as u64);
    }
}
