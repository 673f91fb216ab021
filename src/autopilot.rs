//! A scripted player for headless runs.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::engine::TickInput;
use crate::game::Game;
use crate::items::{ItemKind, ResourceKind};

/// What the autopilot did on one decision step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Idle,
    Ate,
    Attacked,
    UsedAbility,
    Gathered,
    Crafted(ItemKind),
    Wandered,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutopilotStats {
    pub attacks: u32,
    pub abilities: u32,
    pub gathers: u32,
    pub crafts: u32,
    pub meals: u32,
}

/// Wanders, fights whatever is close, keeps fed and gathers what it walks
/// past. Owns its own RNG so its choices never perturb the simulation's.
pub struct Autopilot {
    rng: ChaCha8Rng,
    heading: (f32, f32),
    retarget_in: f32,
    hungry_below: f32,
    pub stats: AutopilotStats,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            heading: (0.0, 0.0),
            retarget_in: 0.0,
            hungry_below: 50.0,
            stats: AutopilotStats::default(),
        }
    }

    /// Issues at most one command and refreshes the movement intent.
    pub fn act(&mut self, game: &mut Game, dt: f32) -> Decision {
        if !game.player().is_alive() {
            game.set_input(TickInput::default());
            return Decision::Idle;
        }
        let decision = self.command(game);
        self.steer(game, dt, decision);
        debug!(?decision, "autopilot");
        decision
    }

    fn command(&mut self, game: &mut Game) -> Decision {
        let player = game.player();
        if player.hunger.current < self.hungry_below && self.eat(game) {
            self.stats.meals += 1;
            return Decision::Ate;
        }
        if game.attack_nearest_enemy().is_ok() {
            self.stats.attacks += 1;
            return Decision::Attacked;
        }
        if !game.enemies().is_empty() && game.use_ability().is_ok() {
            self.stats.abilities += 1;
            return Decision::UsedAbility;
        }
        for kind in [ItemKind::Sword, ItemKind::Axe] {
            if game.player().count_items(kind) == 0 && game.craft(kind).is_ok() {
                self.equip_first(game, kind);
                self.stats.crafts += 1;
                return Decision::Crafted(kind);
            }
        }
        if game.gather_nearest().is_ok() {
            self.stats.gathers += 1;
            return Decision::Gathered;
        }
        Decision::Wandered
    }

    fn eat(&mut self, game: &mut Game) -> bool {
        const FOOD_SLOT: usize = 0;
        let slotted = |game: &Game| {
            game.player().hotbar[FOOD_SLOT]
                .as_ref()
                .map_or(false, |item| item.kind.is_food())
        };
        if !slotted(game) {
            let packed = game
                .player()
                .inventory
                .iter()
                .flatten()
                .find(|item| item.kind.is_food())
                .map(|item| item.id);
            if let Some(id) = packed {
                let _ = game.assign_hotbar(id, FOOD_SLOT);
            }
        }
        if slotted(game) && game.use_hotbar(FOOD_SLOT).is_ok() {
            return true;
        }
        [ResourceKind::Berries, ResourceKind::Mushrooms, ResourceKind::CactusFlesh]
            .into_iter()
            .any(|food| game.eat(food).is_ok())
    }

    fn equip_first(&mut self, game: &mut Game, kind: ItemKind) {
        let item = game
            .player()
            .items()
            .find(|item| item.kind == kind)
            .map(|item| item.id);
        if let Some(id) = item {
            let _ = game.equip(id);
        }
    }

    fn steer(&mut self, game: &mut Game, dt: f32, decision: Decision) {
        let player = game.player();
        let (px, py) = (player.x, player.y);

        // Close in on the nearest enemy, otherwise drift on a random heading.
        let nearest = game
            .enemies()
            .iter()
            .filter(|enemy| !enemy.is_dead())
            .map(|enemy| (enemy.x - px, enemy.y - py))
            .min_by(|a, b| (a.0.hypot(a.1)).total_cmp(&b.0.hypot(b.1)));
        let (move_x, move_y) = match (decision, nearest) {
            (Decision::Gathered | Decision::Crafted(_) | Decision::Ate, _) => (0.0, 0.0),
            (_, Some((dx, dy))) if dx.hypot(dy) < 12.0 => (dx, dy),
            _ => {
                self.retarget_in -= dt;
                if self.retarget_in <= 0.0 {
                    let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
                    self.heading = (angle.cos(), angle.sin());
                    self.retarget_in = self.rng.gen_range(2.0..6.0);
                }
                self.heading
            }
        };
        game.set_input(TickInput::toward(move_x, move_y));
    }
}
