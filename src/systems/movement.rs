use anyhow::Result;

use crate::{
    engine::{SimulationContext, System},
    world::World,
};

/// Turns the tick's movement intent into a collision-checked step.
pub struct MovementSystem;

impl MovementSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MovementSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for MovementSystem {
    fn name(&self) -> &str {
        "movement"
    }

    fn run(&mut self, ctx: &mut SimulationContext<'_>, world: &mut World) -> Result<()> {
        let input = *ctx.input;
        if !world.player.is_alive() || (input.move_x == 0.0 && input.move_y == 0.0) {
            return Ok(());
        }

        // Diagonal intent is normalized so it is not faster than straight.
        let len = (input.move_x * input.move_x + input.move_y * input.move_y).sqrt();
        let scale = if len > 1.0 { 1.0 / len } else { 1.0 };

        let mut speed = world.player.speed;
        if input.sprint {
            speed *= world.player.sprint_multiplier;
            let drain = ctx.config.survival.sprint_hunger_drain * ctx.dt;
            world.player.hunger.add(-drain);
        }

        let step = speed * ctx.dt * scale;
        let obstacles: Vec<(f32, f32)> = world.obstacles().collect();
        let size = world.size();
        world.player.try_move(
            input.move_x * step,
            input.move_y * step,
            size,
            obstacles,
            &ctx.config.player,
        );
        Ok(())
    }
}
