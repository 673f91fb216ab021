use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{ObjectProfile, ObjectTable};
use crate::items::{ItemKind, ResourceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Tree,
    Rock,
    Bush,
    MushroomPatch,
    CactusPlant,
    IceDeposit,
    IronDeposit,
    GoldDeposit,
    GemDeposit,
    AncientRuin,
    CaveEntrance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(u64);

impl ObjectId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Yield {
    pub resource: ResourceKind,
    pub amount: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Regrowth {
    pub period: f32,
    /// Seconds until the yield returns; zero while the object is ripe.
    pub remaining: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub x: i32,
    pub y: i32,
    pub health: i32,
    pub max_health: i32,
    pub harvestable: bool,
    pub resource: Option<Yield>,
    pub regrowth: Option<Regrowth>,
    pub tool: Option<ItemKind>,
}

/// What a completed harvest hit did to the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestState {
    /// Still standing, nothing granted yet.
    Damaged,
    /// Health ran out and the object must be removed from the world.
    Destroyed(Option<Yield>),
    /// Health ran out on a regrowing object; it stays but is bare.
    Stripped(Option<Yield>),
}

impl WorldObject {
    pub fn from_profile<R: Rng>(
        id: ObjectId,
        kind: ObjectKind,
        x: i32,
        y: i32,
        profile: &ObjectProfile,
        rng: &mut R,
    ) -> Self {
        let resource = profile.resource.map(|resource| Yield {
            resource,
            amount: roll_amount(profile, rng),
        });
        Self {
            id,
            kind,
            x,
            y,
            health: profile.max_health,
            max_health: profile.max_health,
            harvestable: profile.harvestable,
            resource,
            regrowth: profile.regrow_seconds.map(|period| Regrowth {
                period,
                remaining: 0.0,
            }),
            tool: profile.tool,
        }
    }

    /// Returns true once health has dropped to zero or below.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health -= amount;
        self.health <= 0
    }

    pub fn is_harvestable(&self) -> bool {
        self.harvestable && self.resource.map_or(false, |y| y.amount > 0)
    }

    pub fn current_yield(&self) -> Option<Yield> {
        self.resource.filter(|y| y.amount > 0)
    }

    pub fn is_regrowing(&self) -> bool {
        self.regrowth.map_or(false, |r| r.remaining > 0.0)
    }

    /// Applies one harvest hit and resolves what happens at zero health.
    pub fn harvest_hit(&mut self, damage: i32) -> HarvestState {
        if !self.take_damage(damage) {
            return HarvestState::Damaged;
        }
        let granted = self.current_yield();
        match self.regrowth.as_mut() {
            Some(regrowth) => {
                regrowth.remaining = regrowth.period;
                if let Some(resource) = self.resource.as_mut() {
                    resource.amount = 0;
                }
                self.health = self.max_health;
                HarvestState::Stripped(granted)
            }
            None => HarvestState::Destroyed(granted),
        }
    }

    /// Advances the regrow timer. Returns true on the tick the yield returns.
    pub fn tick_regrowth<R: Rng>(&mut self, dt: f32, table: &ObjectTable, rng: &mut R) -> bool {
        let Some(regrowth) = self.regrowth.as_mut() else {
            return false;
        };
        if regrowth.remaining <= 0.0 {
            return false;
        }
        regrowth.remaining -= dt;
        if regrowth.remaining > 0.0 {
            return false;
        }
        regrowth.remaining = 0.0;
        let profile = table.get(self.kind);
        if let Some(resource) = self.resource.as_mut() {
            resource.amount = roll_amount(profile, rng);
        }
        self.health = self.max_health;
        true
    }

    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        let dx = self.x as f32 - x;
        let dy = self.y as f32 - y;
        (dx * dx + dy * dy).sqrt()
    }
}

fn roll_amount<R: Rng>(profile: &ObjectProfile, rng: &mut R) -> u32 {
    if profile.yield_max <= profile.yield_min {
        profile.yield_min
    } else {
        rng.gen_range(profile.yield_min..=profile.yield_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn spawn(kind: ObjectKind) -> WorldObject {
        let table = ObjectTable::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        WorldObject::from_profile(ObjectId::new(1), kind, 3, 4, table.get(kind), &mut rng)
    }

    #[test]
    fn take_damage_reports_destruction() {
        let mut tree = spawn(ObjectKind::Tree);
        assert!(!tree.take_damage(20));
        assert!(!tree.take_damage(20));
        assert!(tree.take_damage(20));
        assert!(tree.health <= 0);
    }

    #[test]
    fn tree_yield_in_configured_range() {
        let tree = spawn(ObjectKind::Tree);
        let y = tree.current_yield().unwrap();
        assert_eq!(y.resource, ResourceKind::Wood);
        assert!((3..=6).contains(&y.amount));
    }

    #[test]
    fn rock_is_destroyed_by_harvest() {
        let mut rock = spawn(ObjectKind::Rock);
        assert_eq!(rock.harvest_hit(30), HarvestState::Damaged);
        match rock.harvest_hit(30) {
            HarvestState::Destroyed(Some(y)) => assert_eq!(y.resource, ResourceKind::Stone),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bush_strips_then_regrows() {
        let table = ObjectTable::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut bush = spawn(ObjectKind::Bush);
        let state = bush.harvest_hit(20);
        assert!(matches!(state, HarvestState::Stripped(Some(_))));
        assert!(!bush.is_harvestable());
        assert!(bush.is_regrowing());
        assert_eq!(bush.health, bush.max_health);

        assert!(!bush.tick_regrowth(100.0, &table, &mut rng));
        assert!(bush.tick_regrowth(20.0, &table, &mut rng));
        assert!(bush.is_harvestable());
        assert!((1..=3).contains(&bush.current_yield().unwrap().amount));
    }

    #[test]
    fn cave_entrance_is_not_harvestable() {
        let cave = spawn(ObjectKind::CaveEntrance);
        assert!(!cave.is_harvestable());
        assert!(cave.current_yield().is_none());
    }
}
