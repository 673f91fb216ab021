use anyhow::Result;
use tracing::{debug, info};

use crate::{
    engine::{SimulationContext, System},
    environment::ClockEvent,
    world::World,
};

/// Day/night, season and weather timers.
pub struct ClockSystem;

impl ClockSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ClockSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ClockSystem {
    fn name(&self) -> &str {
        "clock"
    }

    fn run(&mut self, ctx: &mut SimulationContext<'_>, world: &mut World) -> Result<()> {
        let events = world
            .environment
            .advance(ctx.dt, &ctx.config.clock, ctx.rng.logic());
        for event in events {
            match event {
                ClockEvent::DayBroke { day } => info!(tick = ctx.tick, day, "day broke"),
                ClockEvent::NightFell { day } => info!(tick = ctx.tick, day, "night fell"),
                ClockEvent::SeasonChanged(season) => debug!(tick = ctx.tick, ?season, "season changed"),
                ClockEvent::WeatherChanged(weather) => debug!(tick = ctx.tick, ?weather, "weather changed"),
            }
            ctx.emit(event);
        }
        Ok(())
    }
}
