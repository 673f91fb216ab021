use anyhow::Result;

use crate::{
    engine::{SimulationContext, System},
    world::World,
};

/// Expires floating damage numbers. Runs last so entries created this tick
/// have already been seen by the rest of the pipeline.
pub struct FeedbackSystem;

impl FeedbackSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FeedbackSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for FeedbackSystem {
    fn name(&self) -> &str {
        "feedback"
    }

    fn run(&mut self, ctx: &mut SimulationContext<'_>, world: &mut World) -> Result<()> {
        let dt = ctx.dt;
        world.feedback.retain_mut(|entry| entry.tick(dt));
        Ok(())
    }
}
