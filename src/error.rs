use thiserror::Error;

use crate::items::ResourceKind;

/// Recoverable outcome of a player command. None of these are fatal; the
/// caller decides how to surface them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    #[error("tile ({x}, {y}) is already occupied")]
    Occupied { x: i32, y: i32 },
    #[error("tile ({x}, {y}) is outside the world")]
    OutOfBounds { x: i32, y: i32 },
    #[error("target is {distance:.1} tiles away, limit is {limit:.1}")]
    OutOfRange { distance: f32, limit: f32 },
    #[error("target no longer exists")]
    NotFound,
    #[error("object cannot be harvested right now")]
    NotHarvestable,
    #[error("not enough {resource:?}: need {needed}, have {available}")]
    InsufficientResources {
        resource: ResourceKind,
        needed: u32,
        available: u32,
    },
    #[error("inventory is full")]
    InventoryFull,
    #[error("ability is on cooldown for {remaining:.1}s")]
    OnCooldown { remaining: f32 },
    #[error("no valid target in range")]
    NoTarget,
    #[error("campfire has no fuel")]
    NoFuel,
    #[error("nothing to cook")]
    NothingToCook,
    #[error("hotbar slot {0} is empty")]
    SlotEmpty(usize),
    #[error("item cannot be equipped or used")]
    NotEquippable,
    #[error("the player is dead")]
    PlayerDead,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config validation error: {0}")]
    Validation(String),
}
