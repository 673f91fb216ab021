use serde::{Deserialize, Serialize};

/// Stackable raw materials held in the player's resource pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Wood,
    Stone,
    Berries,
    Meat,
    Mushrooms,
    CactusFlesh,
    Ice,
    Iron,
    Gold,
    Gems,
    Relics,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 11] = [
        ResourceKind::Wood,
        ResourceKind::Stone,
        ResourceKind::Berries,
        ResourceKind::Meat,
        ResourceKind::Mushrooms,
        ResourceKind::CactusFlesh,
        ResourceKind::Ice,
        ResourceKind::Iron,
        ResourceKind::Gold,
        ResourceKind::Gems,
        ResourceKind::Relics,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Axe,
    Pickaxe,
    Sword,
    Torch,
    Berries,
    CookedMeat,
    Campfire,
    WoodenWall,
    IronArmor,
}

impl ItemKind {
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Axe => "Axe",
            ItemKind::Pickaxe => "Pickaxe",
            ItemKind::Sword => "Sword",
            ItemKind::Torch => "Torch",
            ItemKind::Berries => "Berries",
            ItemKind::CookedMeat => "Cooked Meat",
            ItemKind::Campfire => "Campfire",
            ItemKind::WoodenWall => "Wooden Wall",
            ItemKind::IronArmor => "Iron Armor",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ItemKind::Axe => "Chop trees for wood",
            ItemKind::Pickaxe => "Mine rocks for stone",
            ItemKind::Sword => "Defend yourself",
            ItemKind::Torch => "Light source",
            ItemKind::Berries => "A handful of berries",
            ItemKind::CookedMeat => "Hearty and warm",
            ItemKind::Campfire => "Provides light and warmth",
            ItemKind::WoodenWall => "Basic defense",
            ItemKind::IronArmor => "Blunts incoming blows",
        }
    }

    pub fn is_tool(self) -> bool {
        matches!(
            self,
            ItemKind::Axe | ItemKind::Pickaxe | ItemKind::Sword | ItemKind::Torch
        )
    }

    pub fn is_armor(self) -> bool {
        matches!(self, ItemKind::IronArmor)
    }

    pub fn is_food(self) -> bool {
        matches!(self, ItemKind::Berries | ItemKind::CookedMeat)
    }

    pub fn stackable(self) -> bool {
        self.is_food()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(u64);

impl ItemId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    pub quantity: u32,
    pub durability: Option<u32>,
    pub max_durability: Option<u32>,
}

impl Item {
    /// A single item, at full `durability` when it wears at all.
    pub fn new(id: ItemId, kind: ItemKind, durability: Option<u32>) -> Self {
        Self {
            id,
            kind,
            quantity: 1,
            durability,
            max_durability: durability,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Consumes one point of durability. Returns true once the item is worn
    /// out and should be discarded.
    pub fn wear(&mut self) -> bool {
        match self.durability.as_mut() {
            Some(durability) => {
                *durability = durability.saturating_sub(1);
                *durability == 0
            }
            None => false,
        }
    }
}
