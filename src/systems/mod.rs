mod abilities;
mod buildings;
mod clock;
mod enemies;
mod events;
mod feedback;
mod movement;
mod spawning;
mod survival;

pub use abilities::AbilitySystem;
pub use buildings::{BuildingSystem, RegrowthSystem};
pub use clock::ClockSystem;
pub use enemies::EnemySystem;
pub use events::WorldEventSystem;
pub use feedback::FeedbackSystem;
pub use movement::MovementSystem;
pub use spawning::{pick_enemy_kind, SpawnSystem};
pub use survival::SurvivalSystem;

use crate::engine::{SimEvent, SimulationContext};
use crate::world::World;

/// Emits `PlayerDied` the first time any system observes a dead player.
fn report_death(ctx: &mut SimulationContext<'_>, world: &mut World) {
    if world.take_death_notice() {
        tracing::info!(tick = ctx.tick, day = world.environment.day_count, "player died");
        ctx.emit(SimEvent::PlayerDied);
    }
}
