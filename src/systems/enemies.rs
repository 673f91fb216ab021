use anyhow::Result;
use tracing::debug;

use crate::{
    combat::incoming_damage,
    enemy::AiAction,
    engine::{SimEvent, SimulationContext, System},
    feedback::FeedbackKind,
    world::World,
};

/// Enemy AI, enemy attacks on the player, and removal of the dead.
pub struct EnemySystem;

impl EnemySystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EnemySystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for EnemySystem {
    fn name(&self) -> &str {
        "enemies"
    }

    fn run(&mut self, ctx: &mut SimulationContext<'_>, world: &mut World) -> Result<()> {
        let (px, py) = (world.player.x, world.player.y);
        let mut attacks = Vec::new();
        for enemy in world.enemies.iter_mut().filter(|enemy| !enemy.is_dead()) {
            if let AiAction::Attacked { damage } = enemy.update(ctx.dt, px, py) {
                attacks.push((enemy.id, enemy.kind, damage));
            }
        }

        for (id, kind, raw) in attacks {
            if !world.player.is_alive() {
                break;
            }
            let damage = incoming_damage(&world.player, raw, &ctx.config.combat);
            let applied = world
                .player
                .take_damage(damage as f32, ctx.config.survival.hit_sanity_loss);
            if applied <= 0.0 {
                continue;
            }
            if let Some(broken) = world.player.wear_armor() {
                ctx.emit(SimEvent::ItemBroke(broken));
            }
            world.push_feedback(
                FeedbackKind::DamageTaken,
                applied,
                px,
                py,
                ctx.config.combat.feedback_seconds,
                ctx.rng.cosmetic(),
            );
            debug!(tick = ctx.tick, ?kind, damage = applied, "player hit");
            ctx.emit(SimEvent::PlayerHit {
                enemy: id,
                kind,
                damage: applied,
            });
        }

        for kill in world.remove_dead_enemies(&ctx.config.enemies, ctx.rng.logic()) {
            debug!(tick = ctx.tick, kind = ?kill.kind, loot = ?kill.loot, "enemy killed");
            ctx.emit(SimEvent::EnemyKilled(kill));
        }
        super::report_death(ctx, world);
        Ok(())
    }
}
