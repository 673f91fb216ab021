use serde::{Deserialize, Serialize};

use crate::config::BuildingConfig;
use crate::items::ItemKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    Campfire,
    WoodenWall,
}

impl BuildingKind {
    pub fn from_item(kind: ItemKind) -> Option<Self> {
        match kind {
            ItemKind::Campfire => Some(BuildingKind::Campfire),
            ItemKind::WoodenWall => Some(BuildingKind::WoodenWall),
            _ => None,
        }
    }

    /// Only walls stop the player.
    pub fn blocks_movement(self) -> bool {
        matches!(self, BuildingKind::WoodenWall)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildingId(u64);

impl BuildingId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub kind: BuildingKind,
    pub x: i32,
    pub y: i32,
    pub health: i32,
    pub max_health: i32,
    pub fuel: f32,
    pub max_fuel: f32,
    pub light_radius: f32,
}

impl Building {
    pub fn new(id: BuildingId, kind: BuildingKind, x: i32, y: i32, config: &BuildingConfig) -> Self {
        match kind {
            BuildingKind::Campfire => Self {
                id,
                kind,
                x,
                y,
                health: config.campfire_health,
                max_health: config.campfire_health,
                fuel: config.campfire_fuel,
                max_fuel: config.campfire_fuel,
                light_radius: config.campfire_light_radius,
            },
            BuildingKind::WoodenWall => Self {
                id,
                kind,
                x,
                y,
                health: config.wall_health,
                max_health: config.wall_health,
                fuel: 0.0,
                max_fuel: 0.0,
                light_radius: 0.0,
            },
        }
    }

    pub fn is_lit(&self) -> bool {
        self.kind == BuildingKind::Campfire && self.fuel > 0.0
    }

    /// Burns fuel. Returns true on the tick a campfire goes out.
    pub fn burn(&mut self, dt: f32, rate: f32) -> bool {
        if !self.is_lit() {
            return false;
        }
        self.fuel -= dt * rate;
        if self.fuel <= 0.0 {
            self.fuel = 0.0;
            return true;
        }
        false
    }

    pub fn refuel(&mut self, amount: f32) {
        self.fuel = (self.fuel + amount).min(self.max_fuel);
    }

    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        let dx = self.x as f32 - x;
        let dy = self.y as f32 - y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campfire_burns_out() {
        let config = BuildingConfig::default();
        let mut fire = Building::new(BuildingId::new(1), BuildingKind::Campfire, 0, 0, &config);
        assert!(fire.is_lit());
        assert!(!fire.burn(10.0, 2.0));
        assert_eq!(fire.fuel, 80.0);
        assert!(fire.burn(45.0, 2.0));
        assert_eq!(fire.fuel, 0.0);
        assert!(!fire.is_lit());
        assert!(!fire.burn(1.0, 2.0));
        fire.refuel(500.0);
        assert_eq!(fire.fuel, fire.max_fuel);
    }

    #[test]
    fn walls_never_burn() {
        let config = BuildingConfig::default();
        let mut wall = Building::new(BuildingId::new(2), BuildingKind::WoodenWall, 1, 1, &config);
        assert!(!wall.is_lit());
        assert!(!wall.burn(5.0, 2.0));
        assert!(wall.kind.blocks_movement());
    }
}
