use anyhow::Result;

use crate::{
    engine::{SimEvent, SimulationContext, System},
    environment::{update_survival, SurvivalInputs},
    items::ItemKind,
    world::World,
};

pub struct SurvivalSystem;

impl SurvivalSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SurvivalSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for SurvivalSystem {
    fn name(&self) -> &str {
        "survival"
    }

    fn run(&mut self, ctx: &mut SimulationContext<'_>, world: &mut World) -> Result<()> {
        if !world.player.is_alive() {
            return Ok(());
        }
        let is_night = world.environment.is_night(&ctx.config.clock);
        let inputs = SurvivalInputs {
            season: world.environment.season,
            weather: world.environment.weather,
            biome: world.player_biome(),
            is_night,
            has_light: world.player_has_light(),
        };
        update_survival(&mut world.player, &inputs, ctx.dt, &ctx.config.survival);

        if is_night && world.player.burn_torch(ctx.dt) {
            ctx.emit(SimEvent::ItemBroke(ItemKind::Torch));
        }
        super::report_death(ctx, world);
        Ok(())
    }
}
