use wildmere::{config::SimConfig, engine::SimEvent, player::CharClass, Game};

fn assert_bounded(game: &Game) {
    let player = game.player();
    for (label, stat) in [
        ("health", player.health),
        ("hunger", player.hunger),
        ("sanity", player.sanity),
        ("temperature", player.temperature),
    ] {
        assert!(
            (0.0..=stat.max).contains(&stat.current),
            "{label} out of bounds: {} / {}",
            stat.current,
            stat.max
        );
    }
}

#[test]
fn stats_stay_bounded_through_a_full_cycle() {
    let mut game = Game::new(SimConfig::default(), CharClass::Archer).expect("game builds");
    let mut day_breaks = 0;
    let mut nights = 0;
    for _ in 0..1000 {
        let report = game.update(1.0).unwrap();
        assert_bounded(&game);
        for event in &report.events {
            match event {
                SimEvent::DayBroke { .. } => day_breaks += 1,
                SimEvent::NightFell { .. } => nights += 1,
                _ => {}
            }
        }
    }
    assert_eq!(nights, 1);
    assert_eq!(day_breaks, 1);
    assert_eq!(game.world().environment.day_count, 2);
}

#[test]
fn hunger_drains_while_idle() {
    let mut game = Game::new(SimConfig::default(), CharClass::Warrior).unwrap();
    let start = game.player().hunger.current;
    for _ in 0..100 {
        game.update(1.0).unwrap();
    }
    assert!(game.player().hunger.current < start);
}

#[test]
fn starving_player_dies_once() {
    let mut config = SimConfig::default();
    config.survival.starvation_health_drain = 50.0;
    let mut game = Game::new(config, CharClass::Mage).unwrap();
    game.world_mut().player.hunger.current = 0.0;

    let mut deaths = 0;
    for _ in 0..20 {
        let report = game.update(1.0).unwrap();
        deaths += report
            .events
            .iter()
            .filter(|event| **event == SimEvent::PlayerDied)
            .count();
    }
    assert_eq!(deaths, 1);
    assert!(!game.player().is_alive());
    assert_eq!(game.player().health.current, 0.0);
}
