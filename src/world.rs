use std::collections::BTreeMap;

use anyhow::{Context, Result};
use rand::Rng;
use tracing::info;

use crate::building::{Building, BuildingId, BuildingKind};
use crate::config::{BuildingConfig, EnemyTable, ObjectTable, SimConfig};
use crate::enemy::{Enemy, EnemyId, EnemyKind};
use crate::environment::EnvironmentState;
use crate::error::ActionError;
use crate::feedback::{Feedback, FeedbackKind};
use crate::items::ResourceKind;
use crate::objects::{ObjectId, ObjectKind, WorldObject};
use crate::placement::ObjectPlacer;
use crate::player::{CharClass, Player};
use crate::terrain::{Biome, TerrainGenerator, TerrainGrid, TileKind};

/// An enemy removed from the world together with the loot it paid out.
#[derive(Debug, Clone, PartialEq)]
pub struct Kill {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
    pub loot: BTreeMap<ResourceKind, u32>,
}

/// Sole owner of every entity in the simulation.
#[derive(Debug, Clone)]
pub struct World {
    pub terrain: TerrainGrid,
    pub objects: Vec<WorldObject>,
    pub enemies: Vec<Enemy>,
    pub buildings: Vec<Building>,
    pub environment: EnvironmentState,
    pub player: Player,
    pub feedback: Vec<Feedback>,
    spawn_point: (i32, i32),
    death_reported: bool,
    next_object_id: u64,
    next_enemy_id: u64,
    next_building_id: u64,
}

impl World {
    /// Generates terrain and objects from the logic stream and puts the
    /// player on the first walkable tile out from the center.
    pub fn generate<R: Rng>(config: &SimConfig, class: CharClass, rng: &mut R) -> Result<Self> {
        let terrain = TerrainGenerator::new(&config.world).generate(rng);
        let mut world = Self::from_terrain(terrain, config, class)?;

        let mut placer = ObjectPlacer::new(&config.placement, &config.objects, world.next_object_id);
        let spawn = world.spawn_point;
        let mut objects = placer.populate(&world.terrain, spawn, rng);
        objects.retain(|object| (object.x, object.y) != spawn);
        world.next_object_id = placer.next_id();
        world.objects = objects;

        info!(
            width = world.terrain.width(),
            height = world.terrain.height(),
            water = world.terrain.count_tiles(TileKind::Water),
            objects = world.objects.len(),
            spawn_x = spawn.0,
            spawn_y = spawn.1,
            "world generated"
        );
        Ok(world)
    }

    /// A world with the given terrain and nothing placed on it.
    pub fn from_terrain(terrain: TerrainGrid, config: &SimConfig, class: CharClass) -> Result<Self> {
        let spawn_point = terrain
            .find_spawn()
            .context("world has no walkable tile to spawn the player on")?;
        let player = Player::new(
            spawn_point.0 as f32,
            spawn_point.1 as f32,
            class,
            &config.player,
            config.classes.get(class),
        );
        Ok(Self {
            terrain,
            objects: Vec::new(),
            enemies: Vec::new(),
            buildings: Vec::new(),
            environment: EnvironmentState::default(),
            player,
            feedback: Vec::new(),
            spawn_point,
            death_reported: false,
            next_object_id: 1,
            next_enemy_id: 1,
            next_building_id: 1,
        })
    }

    pub fn size(&self) -> (f32, f32) {
        (self.terrain.width() as f32, self.terrain.height() as f32)
    }

    pub fn spawn_point(&self) -> (i32, i32) {
        self.spawn_point
    }

    /// Water outside the map.
    pub fn get_tile(&self, x: i32, y: i32) -> TileKind {
        self.terrain.tile(x, y)
    }

    /// Grassland outside the map.
    pub fn get_biome_at(&self, x: i32, y: i32) -> Biome {
        self.terrain.biome(x, y)
    }

    pub fn player_tile(&self) -> (i32, i32) {
        (self.player.x.floor() as i32, self.player.y.floor() as i32)
    }

    pub fn player_biome(&self) -> Biome {
        let (x, y) = self.player_tile();
        self.get_biome_at(x, y)
    }

    pub fn object(&self, id: ObjectId) -> Option<&WorldObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut WorldObject> {
        self.objects.iter_mut().find(|object| object.id == id)
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Option<WorldObject> {
        let index = self.objects.iter().position(|object| object.id == id)?;
        Some(self.objects.remove(index))
    }

    pub fn add_object<R: Rng>(&mut self, kind: ObjectKind, x: i32, y: i32, table: &ObjectTable, rng: &mut R) -> ObjectId {
        let id = ObjectId::new(self.next_object_id);
        self.next_object_id += 1;
        self.objects
            .push(WorldObject::from_profile(id, kind, x, y, table.get(kind), rng));
        id
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|enemy| enemy.id == id)
    }

    pub fn spawn_enemy(&mut self, kind: EnemyKind, x: f32, y: f32, table: &EnemyTable) -> EnemyId {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id += 1;
        self.enemies.push(Enemy::new(id, kind, x, y, table.get(kind)));
        id
    }

    pub fn building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.iter().find(|building| building.id == id)
    }

    pub fn building_mut(&mut self, id: BuildingId) -> Option<&mut Building> {
        self.buildings.iter_mut().find(|building| building.id == id)
    }

    /// True when an object or building already sits on the tile.
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.objects.iter().any(|o| o.x == x && o.y == y)
            || self.buildings.iter().any(|b| b.x == x && b.y == y)
    }

    /// Places a building after the bounds and occupancy checks.
    pub fn place_building(
        &mut self,
        kind: BuildingKind,
        x: i32,
        y: i32,
        config: &BuildingConfig,
    ) -> Result<BuildingId, ActionError> {
        if !self.terrain.in_bounds(x, y) {
            return Err(ActionError::OutOfBounds { x, y });
        }
        if self.is_occupied(x, y) {
            return Err(ActionError::Occupied { x, y });
        }
        let id = BuildingId::new(self.next_building_id);
        self.next_building_id += 1;
        self.buildings.push(Building::new(id, kind, x, y, config));
        Ok(id)
    }

    /// Centers of everything the player cannot walk through.
    pub fn obstacles(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        let objects = self.objects.iter().map(|o| (o.x as f32, o.y as f32));
        let walls = self
            .buildings
            .iter()
            .filter(|b| b.kind.blocks_movement())
            .map(|b| (b.x as f32, b.y as f32));
        objects.chain(walls)
    }

    /// Whether the player stands in light: a held torch or a burning
    /// campfire within its light radius.
    pub fn player_has_light(&self) -> bool {
        self.player.has_torch()
            || self
                .buildings
                .iter()
                .any(|b| b.is_lit() && b.distance_to(self.player.x, self.player.y) <= b.light_radius)
    }

    /// Removes every enemy at or below zero health and pays its loot into
    /// the player's resource pool. Each enemy is reaped exactly once because
    /// it leaves the list in the same step.
    pub fn remove_dead_enemies<R: Rng>(&mut self, table: &EnemyTable, rng: &mut R) -> Vec<Kill> {
        let (dead, alive): (Vec<Enemy>, Vec<Enemy>) =
            std::mem::take(&mut self.enemies).into_iter().partition(Enemy::is_dead);
        self.enemies = alive;
        dead.into_iter()
            .map(|enemy| {
                let loot = enemy.drop_loot(table.get(enemy.kind), rng);
                for (resource, amount) in &loot {
                    self.player.add_resource(*resource, *amount);
                }
                Kill {
                    id: enemy.id,
                    kind: enemy.kind,
                    x: enemy.x,
                    y: enemy.y,
                    loot,
                }
            })
            .collect()
    }

    /// True the first time it is called after the player has died.
    pub fn take_death_notice(&mut self) -> bool {
        if self.player.is_alive() || self.death_reported {
            return false;
        }
        self.death_reported = true;
        true
    }

    pub fn push_feedback<R: Rng>(&mut self, kind: FeedbackKind, value: f32, x: f32, y: f32, seconds: f32, rng: &mut R) {
        self.feedback.push(Feedback::new(kind, value, x, y, seconds, rng));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn flat_world() -> (SimConfig, World) {
        let config = SimConfig::default();
        let terrain = TerrainGrid::filled(30, 30, TileKind::Grass, Biome::Grassland);
        let world = World::from_terrain(terrain, &config, CharClass::Warrior).unwrap();
        (config, world)
    }

    #[test]
    fn spawn_on_flat_world_is_center() {
        let (_, world) = flat_world();
        assert_eq!(world.spawn_point(), (15, 15));
        assert_eq!((world.player.x, world.player.y), (15.0, 15.0));
    }

    #[test]
    fn out_of_bounds_queries_default() {
        let (_, world) = flat_world();
        assert_eq!(world.get_tile(-3, 4), TileKind::Water);
        assert_eq!(world.get_biome_at(99, 99), Biome::Grassland);
    }

    #[test]
    fn campfire_light_reach_follows_building_config() {
        let (mut config, mut world) = flat_world();
        world
            .place_building(BuildingKind::Campfire, 15, 22, &config.buildings)
            .unwrap();
        assert!(!world.player_has_light());

        config.buildings.campfire_light_radius = 8.0;
        let (_, mut world) = flat_world();
        world
            .place_building(BuildingKind::Campfire, 15, 22, &config.buildings)
            .unwrap();
        assert!(world.player_has_light());
    }

    #[test]
    fn placement_rejects_occupied_and_outside() {
        let (config, mut world) = flat_world();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        world.add_object(ObjectKind::Rock, 3, 3, &config.objects, &mut rng);
        assert_eq!(
            world.place_building(BuildingKind::Campfire, 3, 3, &config.buildings),
            Err(ActionError::Occupied { x: 3, y: 3 })
        );
        assert_eq!(
            world.place_building(BuildingKind::Campfire, 30, 3, &config.buildings),
            Err(ActionError::OutOfBounds { x: 30, y: 3 })
        );
        let id = world
            .place_building(BuildingKind::WoodenWall, 4, 3, &config.buildings)
            .unwrap();
        assert!(world.building(id).is_some());
        assert_eq!(
            world.place_building(BuildingKind::Campfire, 4, 3, &config.buildings),
            Err(ActionError::Occupied { x: 4, y: 3 })
        );
    }

    #[test]
    fn walls_block_but_campfires_do_not() {
        let (config, mut world) = flat_world();
        world
            .place_building(BuildingKind::Campfire, 1, 1, &config.buildings)
            .unwrap();
        world
            .place_building(BuildingKind::WoodenWall, 2, 2, &config.buildings)
            .unwrap();
        let obstacles: Vec<_> = world.obstacles().collect();
        assert_eq!(obstacles, vec![(2.0, 2.0)]);
    }

    #[test]
    fn campfire_light_reaches_player() {
        let (config, mut world) = flat_world();
        assert!(!world.player_has_light());
        let id = world
            .place_building(BuildingKind::Campfire, 18, 15, &config.buildings)
            .unwrap();
        assert!(world.player_has_light());
        if let Some(fire) = world.building_mut(id) {
            fire.fuel = 0.0;
        }
        assert!(!world.player_has_light());
    }

    #[test]
    fn dead_enemies_are_reaped_once() {
        let (config, mut world) = flat_world();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let wolf = world.spawn_enemy(EnemyKind::Wolf, 16.0, 15.0, &config.enemies);
        world.spawn_enemy(EnemyKind::Goblin, 20.0, 15.0, &config.enemies);
        world.enemies[0].health = 0;

        let kills = world.remove_dead_enemies(&config.enemies, &mut rng);
        assert_eq!(kills.len(), 1);
        assert_eq!(kills[0].id, wolf);
        let meat = world.player.resource(ResourceKind::Meat);
        assert!((2..=4).contains(&meat));
        assert_eq!(world.enemies.len(), 1);

        assert!(world.remove_dead_enemies(&config.enemies, &mut rng).is_empty());
        assert_eq!(world.player.resource(ResourceKind::Meat), meat);
    }

    #[test]
    fn death_notice_fires_once() {
        let (_, mut world) = flat_world();
        assert!(!world.take_death_notice());
        world.player.health.set(0.0);
        assert!(world.take_death_notice());
        assert!(!world.take_death_notice());
    }
}
