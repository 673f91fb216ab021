use anyhow::Result;

use crate::{
    engine::{SimulationContext, System},
    world::World,
};

/// Ability cooldown and effect-window timers.
pub struct AbilitySystem;

impl AbilitySystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AbilitySystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for AbilitySystem {
    fn name(&self) -> &str {
        "abilities"
    }

    fn run(&mut self, ctx: &mut SimulationContext<'_>, world: &mut World) -> Result<()> {
        world.player.tick_ability(ctx.dt);
        world.player.prune_equipment();
        Ok(())
    }
}
