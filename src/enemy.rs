use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::EnemyProfile;
use crate::items::ResourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Goblin,
    Wolf,
    Scorpion,
    SwampLurker,
    FrostWraith,
    FireImp,
    WizardBoss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnemyId(u64);

impl EnemyId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Non-owning reference to whatever an enemy is chasing. The player is the
/// only thing enemies hunt, and it outlives every enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    Player,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiState {
    Idle,
    Pursuing,
    Attacking,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
    pub health: i32,
    pub max_health: i32,
    pub speed: f32,
    pub damage: i32,
    pub detection_range: f32,
    pub attack_range: f32,
    pub attack_speed: f32,
    pub attack_cooldown: f32,
    pub target: Option<Target>,
    pub state: AiState,
}

/// Result of one AI update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AiAction {
    None,
    Moved,
    Attacked { damage: i32 },
}

impl Enemy {
    pub fn new(id: EnemyId, kind: EnemyKind, x: f32, y: f32, profile: &EnemyProfile) -> Self {
        Self {
            id,
            kind,
            x,
            y,
            health: profile.max_health,
            max_health: profile.max_health,
            speed: profile.speed,
            damage: profile.damage,
            detection_range: profile.detection_range,
            attack_range: profile.attack_range,
            attack_speed: profile.attack_speed,
            attack_cooldown: 0.0,
            target: None,
            state: AiState::Idle,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health -= amount;
        self.is_dead()
    }

    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Detection is re-evaluated from scratch every tick, so a target that
    /// walks back into range is picked up again immediately.
    pub fn update(&mut self, dt: f32, player_x: f32, player_y: f32) -> AiAction {
        let dist = self.distance_to(player_x, player_y);
        let mut action = AiAction::None;

        if dist <= self.detection_range {
            self.target = Some(Target::Player);
            if dist > self.attack_range {
                self.state = AiState::Pursuing;
                let dx = player_x - self.x;
                let dy = player_y - self.y;
                if dist > 0.0 {
                    self.x += dx / dist * self.speed * dt;
                    self.y += dy / dist * self.speed * dt;
                    action = AiAction::Moved;
                }
            } else {
                self.state = AiState::Attacking;
                if self.attack_cooldown <= 0.0 {
                    action = AiAction::Attacked {
                        damage: self.damage,
                    };
                    self.attack_cooldown = if self.attack_speed > 0.0 {
                        1.0 / self.attack_speed
                    } else {
                        f32::INFINITY
                    };
                }
            }
        } else {
            self.target = None;
            self.state = AiState::Idle;
        }

        if self.attack_cooldown > 0.0 {
            self.attack_cooldown -= dt;
        }
        action
    }

    /// Rolls the loot table. Called once, on the tick the enemy is removed.
    pub fn drop_loot<R: Rng>(&self, profile: &EnemyProfile, rng: &mut R) -> BTreeMap<ResourceKind, u32> {
        let mut loot = BTreeMap::new();
        for entry in &profile.loot {
            let amount = if entry.max <= entry.min {
                entry.min
            } else {
                rng.gen_range(entry.min..=entry.max)
            };
            if amount > 0 {
                *loot.entry(entry.resource).or_insert(0) += amount;
            }
        }
        loot
    }
}
