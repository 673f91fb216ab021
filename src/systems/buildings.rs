use anyhow::Result;
use tracing::debug;

use crate::{
    engine::{SimEvent, SimulationContext, System},
    world::World,
};

/// Campfire fuel consumption.
pub struct BuildingSystem;

impl BuildingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BuildingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for BuildingSystem {
    fn name(&self) -> &str {
        "buildings"
    }

    fn run(&mut self, ctx: &mut SimulationContext<'_>, world: &mut World) -> Result<()> {
        let rate = ctx.config.buildings.campfire_burn_rate;
        for building in &mut world.buildings {
            if building.burn(ctx.dt, rate) {
                debug!(tick = ctx.tick, id = building.id.raw(), "campfire burned out");
                ctx.emit(SimEvent::CampfireOut(building.id));
            }
        }
        Ok(())
    }
}

/// Restores the yield of stripped bushes, mushrooms and cacti.
pub struct RegrowthSystem;

impl RegrowthSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RegrowthSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for RegrowthSystem {
    fn name(&self) -> &str {
        "regrowth"
    }

    fn run(&mut self, ctx: &mut SimulationContext<'_>, world: &mut World) -> Result<()> {
        for object in &mut world.objects {
            if object.tick_regrowth(ctx.dt, &ctx.config.objects, ctx.rng.logic()) {
                ctx.emit(SimEvent::ObjectRegrown(object.id));
            }
        }
        Ok(())
    }
}
