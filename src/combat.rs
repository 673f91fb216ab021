//! Player-initiated combat: the basic melee swing and the class abilities.
//!
//! Enemy-side attacks are resolved by the enemy AI system; the only shared
//! piece is [`incoming_damage`], which applies armor.

use serde::{Deserialize, Serialize};

use crate::config::{ClassProfile, CombatConfig};
use crate::enemy::{Enemy, EnemyId};
use crate::error::ActionError;
use crate::items::ItemKind;
use crate::player::{CharClass, Player};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub enemy: EnemyId,
    pub damage: i32,
    pub killed: bool,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeleeOutcome {
    pub hit: Hit,
    /// Set when the swing wore the equipped sword out.
    pub broke: Option<ItemKind>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AbilityEffect {
    Struck(Vec<Hit>),
    Shielded { healed: f32, duration: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AbilityReport {
    pub class: CharClass,
    pub effect: AbilityEffect,
}

/// Hits the nearest living enemy inside melee range. On equal distance the
/// earlier enemy in the list wins.
pub fn melee_attack(
    player: &mut Player,
    enemies: &mut [Enemy],
    config: &CombatConfig,
) -> Result<MeleeOutcome, ActionError> {
    let mut nearest: Option<(usize, f32)> = None;
    for (index, enemy) in enemies.iter().enumerate() {
        if enemy.is_dead() {
            continue;
        }
        let dist = enemy.distance_to(player.x, player.y);
        if dist <= config.melee_range && nearest.map_or(true, |(_, best)| dist < best) {
            nearest = Some((index, dist));
        }
    }
    let (index, _) = nearest.ok_or(ActionError::NoTarget)?;

    let armed = player.equipped_tool_kind() == Some(ItemKind::Sword);
    let damage = if armed {
        config.sword_damage
    } else {
        config.base_damage
    };
    let broke = if armed { player.wear_tool() } else { None };

    let enemy = &mut enemies[index];
    let killed = enemy.take_damage(damage);
    Ok(MeleeOutcome {
        hit: Hit {
            enemy: enemy.id,
            damage,
            killed,
            x: enemy.x,
            y: enemy.y,
        },
        broke,
    })
}

/// Fires the player's class ability. Offensive abilities with nothing in
/// range fail without starting the cooldown.
pub fn use_ability(
    player: &mut Player,
    enemies: &mut [Enemy],
    profile: &ClassProfile,
) -> Result<AbilityReport, ActionError> {
    if player.ability_cooldown > 0.0 {
        return Err(ActionError::OnCooldown {
            remaining: player.ability_cooldown,
        });
    }

    let effect = match player.class {
        CharClass::Paladin => {
            let healed = player.heal(profile.ability_heal);
            player.ability_active = true;
            player.ability_duration = profile.ability_duration;
            AbilityEffect::Shielded {
                healed,
                duration: profile.ability_duration,
            }
        }
        CharClass::Warrior | CharClass::Mage | CharClass::Archer => {
            let targets = select_targets(player, enemies, profile);
            if targets.is_empty() {
                return Err(ActionError::NoTarget);
            }
            let hits = targets
                .into_iter()
                .map(|index| {
                    let enemy = &mut enemies[index];
                    let killed = enemy.take_damage(profile.ability_damage);
                    Hit {
                        enemy: enemy.id,
                        damage: profile.ability_damage,
                        killed,
                        x: enemy.x,
                        y: enemy.y,
                    }
                })
                .collect();
            AbilityEffect::Struck(hits)
        }
    };

    player.ability_cooldown = profile.ability_cooldown;
    Ok(AbilityReport {
        class: player.class,
        effect,
    })
}

/// Living enemies within ability range, nearest first, capped at the class
/// target limit.
fn select_targets(player: &Player, enemies: &[Enemy], profile: &ClassProfile) -> Vec<usize> {
    let mut in_range: Vec<(usize, f32)> = enemies
        .iter()
        .enumerate()
        .filter(|(_, enemy)| !enemy.is_dead())
        .map(|(index, enemy)| (index, enemy.distance_to(player.x, player.y)))
        .filter(|(_, dist)| *dist <= profile.ability_range)
        .collect();
    in_range.sort_by(|a, b| a.1.total_cmp(&b.1));
    if let Some(limit) = profile.ability_max_targets {
        in_range.truncate(limit);
    }
    in_range.into_iter().map(|(index, _)| index).collect()
}

/// Damage an enemy blow deals after armor. Armor never reduces a hit below 1.
pub fn incoming_damage(player: &Player, raw: i32, config: &CombatConfig) -> i32 {
    if player.equipped_armor().is_some() {
        (raw - config.armor_defense).max(1)
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::enemy::EnemyKind;

    fn setup(class: CharClass) -> (SimConfig, Player) {
        let config = SimConfig::default();
        let player = Player::new(10.0, 10.0, class, &config.player, config.classes.get(class));
        (config, player)
    }

    fn enemy(config: &SimConfig, id: u64, kind: EnemyKind, x: f32, y: f32) -> Enemy {
        Enemy::new(EnemyId::new(id), kind, x, y, config.enemies.get(kind))
    }

    #[test]
    fn melee_picks_nearest_and_first_on_ties() {
        let (config, mut p) = setup(CharClass::Warrior);
        let mut enemies = vec![
            enemy(&config, 1, EnemyKind::Goblin, 11.5, 10.0),
            enemy(&config, 2, EnemyKind::Goblin, 11.0, 10.0),
            enemy(&config, 3, EnemyKind::Goblin, 9.0, 10.0),
        ];
        let outcome = melee_attack(&mut p, &mut enemies, &config.combat).unwrap();
        assert_eq!(outcome.hit.enemy, EnemyId::new(2));
        assert_eq!(outcome.hit.damage, 10);
        assert_eq!(enemies[1].health, 20);
    }

    #[test]
    fn melee_out_of_range_is_no_target() {
        let (config, mut p) = setup(CharClass::Warrior);
        let mut enemies = vec![enemy(&config, 1, EnemyKind::Wolf, 13.0, 10.0)];
        assert_eq!(
            melee_attack(&mut p, &mut enemies, &config.combat),
            Err(ActionError::NoTarget)
        );
    }

    #[test]
    fn sword_hits_harder_and_wears() {
        let (config, mut p) = setup(CharClass::Warrior);
        let sword = p.new_item(ItemKind::Sword, &config.crafting);
        let id = p.store_item(sword).unwrap();
        p.equip(id).unwrap();
        let mut enemies = vec![enemy(&config, 1, EnemyKind::Wolf, 11.0, 10.0)];
        let outcome = melee_attack(&mut p, &mut enemies, &config.combat).unwrap();
        assert_eq!(outcome.hit.damage, 20);
        assert_eq!(p.item(id).unwrap().durability, Some(149));
    }

    #[test]
    fn warrior_without_targets_keeps_cooldown_idle() {
        let (config, mut p) = setup(CharClass::Warrior);
        let mut enemies = vec![enemy(&config, 1, EnemyKind::Goblin, 14.0, 10.0)];
        let result = use_ability(&mut p, &mut enemies, config.classes.get(CharClass::Warrior));
        assert_eq!(result, Err(ActionError::NoTarget));
        assert_eq!(p.ability_cooldown, 0.0);
    }

    #[test]
    fn warrior_burst_hits_everything_in_range() {
        let (config, mut p) = setup(CharClass::Warrior);
        let mut enemies = (0..5)
            .map(|i| enemy(&config, i, EnemyKind::Goblin, 10.0 + i as f32 * 0.5, 10.0))
            .collect::<Vec<_>>();
        let report = use_ability(&mut p, &mut enemies, config.classes.get(CharClass::Warrior)).unwrap();
        match report.effect {
            AbilityEffect::Struck(hits) => assert_eq!(hits.len(), 5),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(p.ability_cooldown, 8.0);
    }

    #[test]
    fn mage_hits_only_the_nearest() {
        let (config, mut p) = setup(CharClass::Mage);
        let mut enemies = vec![
            enemy(&config, 1, EnemyKind::Wolf, 16.0, 10.0),
            enemy(&config, 2, EnemyKind::Wolf, 13.0, 10.0),
        ];
        let report = use_ability(&mut p, &mut enemies, config.classes.get(CharClass::Mage)).unwrap();
        let AbilityEffect::Struck(hits) = report.effect else {
            panic!("mage ability should strike");
        };
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].enemy, EnemyId::new(2));
        assert!(hits[0].killed);
    }

    #[test]
    fn archer_volley_takes_three_closest() {
        let (config, mut p) = setup(CharClass::Archer);
        let mut enemies = vec![
            enemy(&config, 1, EnemyKind::Goblin, 19.0, 10.0),
            enemy(&config, 2, EnemyKind::Goblin, 12.0, 10.0),
            enemy(&config, 3, EnemyKind::Goblin, 10.0, 17.0),
            enemy(&config, 4, EnemyKind::Goblin, 10.0, 11.0),
            enemy(&config, 5, EnemyKind::Goblin, 10.0, 30.0),
        ];
        let report = use_ability(&mut p, &mut enemies, config.classes.get(CharClass::Archer)).unwrap();
        let AbilityEffect::Struck(hits) = report.effect else {
            panic!("archer ability should strike");
        };
        let ids: Vec<u64> = hits.iter().map(|h| h.enemy.raw()).collect();
        assert_eq!(ids, vec![4, 2, 3]);
    }

    #[test]
    fn paladin_heals_and_shields_without_targets() {
        let (config, mut p) = setup(CharClass::Paladin);
        p.health.set(40.0);
        let report = use_ability(&mut p, &mut [], config.classes.get(CharClass::Paladin)).unwrap();
        assert_eq!(
            report.effect,
            AbilityEffect::Shielded {
                healed: 50.0,
                duration: 3.0
            }
        );
        assert!(p.is_invulnerable());
        assert!(matches!(
            use_ability(&mut p, &mut [], config.classes.get(CharClass::Paladin)),
            Err(ActionError::OnCooldown { .. })
        ));
    }

    #[test]
    fn armor_blunts_but_never_nullifies() {
        let (config, mut p) = setup(CharClass::Warrior);
        assert_eq!(incoming_damage(&p, 8, &config.combat), 8);
        let armor = p.new_item(ItemKind::IronArmor, &config.crafting);
        let id = p.store_item(armor).unwrap();
        p.equip(id).unwrap();
        assert_eq!(incoming_damage(&p, 8, &config.combat), 5);
        assert_eq!(incoming_damage(&p, 2, &config.combat), 1);
    }
}
