use std::collections::HashSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wildmere::{
    config::SimConfig,
    player::CharClass,
    terrain::{TerrainGenerator, TileKind},
    World,
};

fn generate(seed: u64) -> World {
    let config = SimConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    World::generate(&config, CharClass::Warrior, &mut rng).expect("world generates")
}

#[test]
fn same_seed_same_world() {
    let a = generate(42);
    let b = generate(42);
    assert_eq!(a.terrain.tiles(), b.terrain.tiles());
    assert_eq!(a.terrain.biomes(), b.terrain.biomes());
    assert_eq!(a.objects, b.objects);
    assert_eq!(a.spawn_point(), b.spawn_point());
}

#[test]
fn different_seeds_diverge() {
    let a = generate(1);
    let b = generate(2);
    assert_ne!(a.objects, b.objects);
}

#[test]
fn spawn_is_walkable_and_clear() {
    let world = generate(42);
    let (x, y) = world.spawn_point();
    assert!(!world.get_tile(x, y).is_hazard());
    assert!(!world.is_occupied(x, y));
    assert_eq!(world.player_tile(), (x, y));
}

#[test]
fn objects_sit_on_dry_unique_tiles() {
    let world = generate(7);
    let mut seen = HashSet::new();
    for object in &world.objects {
        assert!(
            !world.get_tile(object.x, object.y).is_hazard(),
            "{:?} placed on a hazard",
            object.kind
        );
        assert!(seen.insert(object.id), "duplicate id {:?}", object.id);
    }
}

#[test]
fn out_of_bounds_reads_as_water() {
    let world = generate(3);
    let (w, h) = (world.terrain.width() as i32, world.terrain.height() as i32);
    assert_eq!(world.get_tile(-1, 0), TileKind::Water);
    assert_eq!(world.get_tile(w, h), TileKind::Water);
}

#[test]
fn lakes_are_carved() {
    let config = SimConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let grid = TerrainGenerator::new(&config.world).generate(&mut rng);
    assert!(grid.count_tiles(TileKind::Water) > 0);
}
