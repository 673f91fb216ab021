use wildmere::{
    combat::AbilityEffect,
    config::SimConfig,
    enemy::EnemyKind,
    items::{ItemKind, ResourceKind},
    player::CharClass,
    terrain::{Biome, TerrainGrid, TileKind},
    ActionError, Game, World,
};

fn arena(class: CharClass) -> Game {
    let config = SimConfig::default();
    let terrain = TerrainGrid::filled(40, 40, TileKind::Grass, Biome::Grassland);
    let world = World::from_terrain(terrain, &config, class).expect("arena builds");
    Game::from_world(config, world)
}

fn spawn(game: &mut Game, kind: EnemyKind, dx: f32, dy: f32) {
    let (x, y) = (game.player().x + dx, game.player().y + dy);
    let table = game.config().enemies.clone();
    game.world_mut().spawn_enemy(kind, x, y, &table);
}

#[test]
fn wolf_falls_to_two_sword_hits() {
    let mut game = arena(CharClass::Warrior);
    spawn(&mut game, EnemyKind::Wolf, 1.5, 0.0);
    let world = game.world_mut();
    world.player.add_resource(ResourceKind::Wood, 2);
    world.player.add_resource(ResourceKind::Stone, 4);
    let sword = game.craft(ItemKind::Sword).unwrap();
    game.equip(sword).unwrap();

    assert!(game.attack_nearest_enemy().unwrap().kills.is_empty());
    let outcome = game.attack_nearest_enemy().unwrap();
    assert_eq!(outcome.kills.len(), 1);
    assert_eq!(outcome.kills[0].kind, EnemyKind::Wolf);
    assert!(game.enemies().is_empty());
    assert!((2..=4).contains(&game.player().resource(ResourceKind::Meat)));
    assert_eq!(game.player().item(sword).unwrap().durability, Some(148));
}

#[test]
fn enemies_out_of_reach_are_not_hit() {
    let mut game = arena(CharClass::Warrior);
    spawn(&mut game, EnemyKind::Goblin, 6.0, 0.0);
    assert_eq!(game.attack_nearest_enemy(), Err(ActionError::NoTarget));
}

#[test]
fn ability_without_target_keeps_cooldown_clear() {
    let mut game = arena(CharClass::Warrior);
    assert_eq!(game.use_ability(), Err(ActionError::NoTarget));
    assert_eq!(game.player().ability_cooldown, 0.0);
}

#[test]
fn archer_volley_is_capped() {
    let mut game = arena(CharClass::Archer);
    for i in 0..5 {
        spawn(&mut game, EnemyKind::Goblin, 2.0 + i as f32, 0.0);
    }
    let outcome = game.use_ability().unwrap();
    match outcome.report.effect {
        AbilityEffect::Struck(hits) => {
            assert_eq!(hits.len(), 3);
            assert!(hits.windows(2).all(|w| w[0].x <= w[1].x));
        }
        other => panic!("unexpected effect {other:?}"),
    }
    assert!(matches!(
        game.use_ability(),
        Err(ActionError::OnCooldown { .. })
    ));
}

#[test]
fn paladin_shield_blocks_damage() {
    let mut game = arena(CharClass::Paladin);
    game.world_mut().player.health.current = 40.0;
    game.use_ability().unwrap();
    assert_eq!(game.player().health.current, 90.0);
    assert!(game.player().is_invulnerable());

    spawn(&mut game, EnemyKind::Goblin, 0.5, 0.0);
    game.update(0.5).unwrap();
    assert_eq!(game.player().health.current, 90.0);
}

#[test]
fn idle_player_takes_hits_from_adjacent_enemy() {
    let mut game = arena(CharClass::Mage);
    spawn(&mut game, EnemyKind::Goblin, 0.5, 0.0);
    let start = game.player().health.current;
    let start_sanity = game.player().sanity.current;
    let mut hits = 0;
    for _ in 0..20 {
        hits += game
            .update(0.1)
            .unwrap()
            .events
            .iter()
            .filter(|event| matches!(event, wildmere::SimEvent::PlayerHit { .. }))
            .count();
    }
    assert!(hits >= 1);
    assert!(game.player().health.current < start);
    assert!(game.player().sanity.current < start_sanity);
}
