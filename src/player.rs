use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{ClassProfile, CraftingConfig, FoodConfig, PlayerConfig};
use crate::error::ActionError;
use crate::items::{Item, ItemId, ItemKind, ResourceKind};

pub const HOTBAR_SLOTS: usize = 5;

pub type Requirements = BTreeMap<ResourceKind, u32>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharClass {
    Warrior,
    Mage,
    Archer,
    Paladin,
}

impl CharClass {
    pub const ALL: [CharClass; 4] = [
        CharClass::Warrior,
        CharClass::Mage,
        CharClass::Archer,
        CharClass::Paladin,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub current: f32,
    pub max: f32,
}

impl Stat {
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn new(current: f32, max: f32) -> Self {
        Self {
            current: current.clamp(0.0, max),
            max,
        }
    }

    pub fn add(&mut self, delta: f32) {
        self.current = (self.current + delta).clamp(0.0, self.max);
    }

    pub fn set(&mut self, value: f32) {
        self.current = value.clamp(0.0, self.max);
    }

    pub fn clamp(&mut self) {
        self.current = self.current.clamp(0.0, self.max);
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }
}

/// What using a hotbar slot did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotbarUse {
    Ate(ItemKind),
    Equipped(ItemKind),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub class: CharClass,
    pub facing: Facing,
    pub health: Stat,
    pub hunger: Stat,
    pub sanity: Stat,
    pub temperature: Stat,
    pub speed: f32,
    pub sprint_multiplier: f32,
    pub resources: BTreeMap<ResourceKind, u32>,
    pub inventory: Vec<Option<Item>>,
    pub hotbar: [Option<Item>; HOTBAR_SLOTS],
    pub selected_slot: usize,
    equipped_tool: Option<ItemId>,
    equipped_armor: Option<ItemId>,
    pub ability_cooldown: f32,
    pub ability_duration: f32,
    pub ability_active: bool,
    /// Seconds of wetness left.
    pub wetness: f32,
    pub research_points: u32,
    /// Seconds an equipped torch has burned since it last lost durability.
    pub torch_burn: f32,
    next_item_id: u64,
}

impl Player {
    pub fn new(x: f32, y: f32, class: CharClass, config: &PlayerConfig, profile: &ClassProfile) -> Self {
        let resources = ResourceKind::ALL.iter().map(|kind| (*kind, 0)).collect();
        Self {
            x,
            y,
            class,
            facing: Facing::Down,
            health: Stat::full(profile.max_health),
            hunger: Stat::full(config.max_hunger),
            sanity: Stat::full(config.max_sanity),
            temperature: Stat::new(config.start_temperature, config.max_temperature),
            speed: profile.speed,
            sprint_multiplier: config.sprint_multiplier,
            resources,
            inventory: vec![None; config.inventory_slots],
            hotbar: std::array::from_fn(|_| None),
            selected_slot: 0,
            equipped_tool: None,
            equipped_armor: None,
            ability_cooldown: 0.0,
            ability_duration: 0.0,
            ability_active: false,
            wetness: 0.0,
            research_points: 0,
            torch_burn: 0.0,
            next_item_id: 1,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.health.is_empty()
    }

    pub fn is_wet(&self) -> bool {
        self.wetness > 0.0
    }

    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Attempts to translate by `(dx, dy)`. The move is rejected as a whole
    /// when it leaves the world or the player's box overlaps an obstacle's
    /// box; facing follows the requested direction either way.
    pub fn try_move<I>(
        &mut self,
        dx: f32,
        dy: f32,
        world_size: (f32, f32),
        obstacles: I,
        config: &PlayerConfig,
    ) -> bool
    where
        I: IntoIterator<Item = (f32, f32)>,
    {
        if dx < 0.0 {
            self.facing = Facing::Left;
        } else if dx > 0.0 {
            self.facing = Facing::Right;
        } else if dy < 0.0 {
            self.facing = Facing::Up;
        } else if dy > 0.0 {
            self.facing = Facing::Down;
        }

        let new_x = self.x + dx;
        let new_y = self.y + dy;
        if new_x < 0.0 || new_y < 0.0 || new_x >= world_size.0 || new_y >= world_size.1 {
            return false;
        }

        let reach = (config.body_size + config.obstacle_size) / 2.0;
        let blocked = obstacles
            .into_iter()
            .any(|(ox, oy)| (new_x - ox).abs() < reach && (new_y - oy).abs() < reach);
        if blocked {
            return false;
        }
        self.x = new_x;
        self.y = new_y;
        true
    }

    pub fn resource(&self, kind: ResourceKind) -> u32 {
        self.resources.get(&kind).copied().unwrap_or(0)
    }

    pub fn add_resource(&mut self, kind: ResourceKind, amount: u32) {
        *self.resources.entry(kind).or_insert(0) += amount;
    }

    pub fn has_resources(&self, requirements: &Requirements) -> bool {
        self.first_shortfall(requirements).is_none()
    }

    pub fn first_shortfall(&self, requirements: &Requirements) -> Option<ActionError> {
        requirements.iter().find_map(|(kind, needed)| {
            let available = self.resource(*kind);
            (available < *needed).then_some(ActionError::InsufficientResources {
                resource: *kind,
                needed: *needed,
                available,
            })
        })
    }

    /// Callers must check `has_resources` for the same requirements first.
    pub fn consume_resources(&mut self, requirements: &Requirements) {
        debug_assert!(self.has_resources(requirements));
        for (kind, amount) in requirements {
            let entry = self.resources.entry(*kind).or_insert(0);
            *entry = entry.saturating_sub(*amount);
        }
    }

    pub fn new_item(&mut self, kind: ItemKind, crafting: &CraftingConfig) -> Item {
        let id = ItemId::new(self.next_item_id);
        self.next_item_id += 1;
        Item::new(id, kind, crafting.durability(kind))
    }

    pub fn can_store(&self, kind: ItemKind) -> bool {
        let stacks = kind.stackable() && self.items().any(|item| item.kind == kind);
        stacks || self.inventory.iter().any(Option::is_none)
    }

    /// Stackable items merge into an existing stack; anything else takes the
    /// first empty inventory slot.
    pub fn store_item(&mut self, item: Item) -> Result<ItemId, ActionError> {
        if item.kind.stackable() {
            let existing = self
                .inventory
                .iter_mut()
                .chain(self.hotbar.iter_mut())
                .flatten()
                .find(|held| held.kind == item.kind);
            if let Some(stack) = existing {
                stack.quantity += item.quantity;
                return Ok(stack.id);
            }
        }
        let slot = self
            .inventory
            .iter_mut()
            .find(|slot| slot.is_none())
            .ok_or(ActionError::InventoryFull)?;
        let id = item.id;
        *slot = Some(item);
        Ok(id)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.inventory.iter().chain(self.hotbar.iter()).flatten()
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items().find(|item| item.id == id)
    }

    fn slot_of(&mut self, id: ItemId) -> Option<&mut Option<Item>> {
        self.inventory
            .iter_mut()
            .chain(self.hotbar.iter_mut())
            .find(|slot| slot.as_ref().map_or(false, |item| item.id == id))
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.slot_of(id).and_then(|slot| slot.as_mut())
    }

    /// Removing an equipped item leaves a stale handle that resolves to
    /// nothing and is cleared on the next `prune_equipment`.
    pub fn remove_item(&mut self, id: ItemId) -> Option<Item> {
        self.slot_of(id).and_then(|slot| slot.take())
    }

    pub fn count_items(&self, kind: ItemKind) -> u32 {
        self.items()
            .filter(|item| item.kind == kind)
            .map(|item| item.quantity)
            .sum()
    }

    pub fn equip(&mut self, id: ItemId) -> Result<ItemKind, ActionError> {
        let kind = self.item(id).map(|item| item.kind).ok_or(ActionError::NotFound)?;
        if kind.is_tool() {
            self.equipped_tool = Some(id);
        } else if kind.is_armor() {
            self.equipped_armor = Some(id);
        } else {
            return Err(ActionError::NotEquippable);
        }
        Ok(kind)
    }

    pub fn unequip_tool(&mut self) -> Option<ItemId> {
        self.equipped_tool.take()
    }

    pub fn equipped_tool(&self) -> Option<&Item> {
        self.equipped_tool.and_then(|id| self.item(id))
    }

    pub fn equipped_tool_kind(&self) -> Option<ItemKind> {
        self.equipped_tool().map(|item| item.kind)
    }

    pub fn equipped_armor(&self) -> Option<&Item> {
        self.equipped_armor.and_then(|id| self.item(id))
    }

    pub fn has_torch(&self) -> bool {
        self.equipped_tool_kind() == Some(ItemKind::Torch)
    }

    pub fn prune_equipment(&mut self) {
        if self.equipped_tool.is_some() && self.equipped_tool().is_none() {
            self.equipped_tool = None;
        }
        if self.equipped_armor.is_some() && self.equipped_armor().is_none() {
            self.equipped_armor = None;
        }
    }

    /// Wears the equipped tool by one use. Returns the kind of a tool that
    /// just broke.
    pub fn wear_tool(&mut self) -> Option<ItemKind> {
        let id = self.equipped_tool?;
        self.wear_item(id)
    }

    pub fn wear_armor(&mut self) -> Option<ItemKind> {
        let id = self.equipped_armor?;
        self.wear_item(id)
    }

    fn wear_item(&mut self, id: ItemId) -> Option<ItemKind> {
        let item = self.item_mut(id)?;
        if !item.wear() {
            return None;
        }
        let kind = item.kind;
        self.remove_item(id);
        self.prune_equipment();
        Some(kind)
    }

    /// Moves an inventory item into a hotbar slot, swapping whatever was
    /// there back into the inventory slot it came from.
    pub fn assign_hotbar(&mut self, id: ItemId, slot: usize) -> Result<(), ActionError> {
        if slot >= HOTBAR_SLOTS {
            return Err(ActionError::SlotEmpty(slot));
        }
        let index = self
            .inventory
            .iter()
            .position(|s| s.as_ref().map_or(false, |item| item.id == id))
            .ok_or(ActionError::NotFound)?;
        let item = self.inventory[index].take();
        self.inventory[index] = self.hotbar[slot].take();
        self.hotbar[slot] = item;
        Ok(())
    }

    pub fn use_hotbar_item(&mut self, slot: usize, food: &FoodConfig) -> Result<HotbarUse, ActionError> {
        let (id, kind) = self
            .hotbar
            .get(slot)
            .and_then(|s| s.as_ref())
            .map(|item| (item.id, item.kind))
            .ok_or(ActionError::SlotEmpty(slot))?;
        self.selected_slot = slot;
        if kind.is_food() {
            self.eat_item_kind(kind, food);
            if let Some(item) = self.hotbar[slot].as_mut() {
                item.quantity = item.quantity.saturating_sub(1);
                if item.quantity == 0 {
                    self.hotbar[slot] = None;
                }
            }
            Ok(HotbarUse::Ate(kind))
        } else {
            self.equip(id).map(HotbarUse::Equipped)
        }
    }

    fn eat_item_kind(&mut self, kind: ItemKind, food: &FoodConfig) {
        match kind {
            ItemKind::Berries => self.hunger.add(food.berries_hunger),
            ItemKind::CookedMeat => {
                self.hunger.add(food.cooked_meat_hunger);
                self.health.add(food.cooked_meat_health);
            }
            _ => {}
        }
    }

    /// Eats one unit of a raw food resource straight from the pool.
    pub fn eat_resource(&mut self, kind: ResourceKind, food: &FoodConfig) -> Result<(), ActionError> {
        let (hunger, sanity) = match kind {
            ResourceKind::Berries => (food.berries_hunger, 0.0),
            ResourceKind::Mushrooms => (food.mushroom_hunger, food.mushroom_sanity),
            ResourceKind::CactusFlesh => (food.cactus_hunger, 0.0),
            _ => return Err(ActionError::NotEquippable),
        };
        let requirement: Requirements = [(kind, 1)].into_iter().collect();
        if let Some(err) = self.first_shortfall(&requirement) {
            return Err(err);
        }
        self.consume_resources(&requirement);
        self.hunger.add(hunger);
        self.sanity.add(sanity);
        Ok(())
    }

    /// Burns an equipped torch, one durability point per whole second.
    /// Returns true on the tick the torch burns out.
    pub fn burn_torch(&mut self, dt: f32) -> bool {
        if !self.has_torch() {
            self.torch_burn = 0.0;
            return false;
        }
        self.torch_burn += dt;
        while self.torch_burn >= 1.0 {
            self.torch_burn -= 1.0;
            if self.wear_tool().is_some() {
                self.torch_burn = 0.0;
                return true;
            }
        }
        false
    }

    pub fn is_invulnerable(&self) -> bool {
        self.class == CharClass::Paladin && self.ability_active
    }

    /// Applies an incoming hit and returns the health actually removed.
    pub fn take_damage(&mut self, damage: f32, sanity_loss: f32) -> f32 {
        if self.is_invulnerable() || damage <= 0.0 {
            return 0.0;
        }
        let before = self.health.current;
        self.health.add(-damage);
        self.sanity.add(-sanity_loss);
        before - self.health.current
    }

    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.health.current;
        self.health.add(amount);
        self.health.current - before
    }

    pub fn tick_ability(&mut self, dt: f32) {
        self.ability_cooldown = (self.ability_cooldown - dt).max(0.0);
        if self.ability_active {
            self.ability_duration -= dt;
            if self.ability_duration <= 0.0 {
                self.ability_duration = 0.0;
                self.ability_active = false;
            }
        }
    }

    pub fn clamp_stats(&mut self) {
        self.health.clamp();
        self.hunger.clamp();
        self.sanity.clamp();
        self.temperature.clamp();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    fn player(class: CharClass) -> Player {
        let config = SimConfig::default();
        Player::new(10.0, 10.0, class, &config.player, config.classes.get(class))
    }

    fn reqs(entries: &[(ResourceKind, u32)]) -> Requirements {
        entries.iter().copied().collect()
    }

    #[test]
    fn blocked_move_still_turns() {
        let config = PlayerConfig::default();
        let mut p = player(CharClass::Warrior);
        let moved = p.try_move(0.5, 0.0, (100.0, 100.0), [(11.0, 10.0)], &config);
        assert!(!moved);
        assert_eq!(p.x, 10.0);
        assert_eq!(p.facing, Facing::Right);
    }

    #[test]
    fn move_rejected_outside_bounds() {
        let config = PlayerConfig::default();
        let mut p = player(CharClass::Mage);
        p.x = 99.5;
        assert!(!p.try_move(1.0, 0.0, (100.0, 100.0), std::iter::empty(), &config));
        assert_eq!(p.x, 99.5);
        assert!(!p.try_move(0.0, -200.0, (100.0, 100.0), std::iter::empty(), &config));
        assert_eq!(p.facing, Facing::Up);
    }

    #[test]
    fn free_move_applies_delta() {
        let config = PlayerConfig::default();
        let mut p = player(CharClass::Archer);
        assert!(p.try_move(-0.25, 0.5, (100.0, 100.0), [(20.0, 20.0)], &config));
        assert_eq!((p.x, p.y), (9.75, 10.5));
        assert_eq!(p.facing, Facing::Left);
    }

    #[test]
    fn resource_arithmetic() {
        let mut p = player(CharClass::Warrior);
        p.add_resource(ResourceKind::Wood, 5);
        p.add_resource(ResourceKind::Stone, 2);
        let r = reqs(&[(ResourceKind::Wood, 3), (ResourceKind::Stone, 2)]);
        assert!(p.has_resources(&r));
        p.consume_resources(&r);
        assert_eq!(p.resource(ResourceKind::Wood), 2);
        assert_eq!(p.resource(ResourceKind::Stone), 0);
        assert!(!p.has_resources(&r));
    }

    #[test]
    fn stale_equipment_handle_clears() {
        let mut p = player(CharClass::Warrior);
        let sword = p.new_item(ItemKind::Sword, &CraftingConfig::default());
        let id = p.store_item(sword).unwrap();
        p.equip(id).unwrap();
        assert_eq!(p.equipped_tool_kind(), Some(ItemKind::Sword));
        p.remove_item(id);
        assert!(p.equipped_tool().is_none());
        p.prune_equipment();
        assert!(p.unequip_tool().is_none());
    }

    #[test]
    fn worn_out_tool_breaks_and_unequips() {
        let mut p = player(CharClass::Warrior);
        let mut torch = p.new_item(ItemKind::Torch, &CraftingConfig::default());
        torch.durability = Some(1);
        let id = p.store_item(torch).unwrap();
        p.equip(id).unwrap();
        assert_eq!(p.wear_tool(), Some(ItemKind::Torch));
        assert!(p.item(id).is_none());
        assert!(!p.has_torch());
    }

    #[test]
    fn torch_burns_down_by_the_second() {
        let mut p = player(CharClass::Mage);
        let torch = p.new_item(ItemKind::Torch, &CraftingConfig::default());
        let id = p.store_item(torch).unwrap();
        p.equip(id).unwrap();
        assert!(!p.burn_torch(2.5));
        assert_eq!(p.item(id).unwrap().durability, Some(58));
        assert!(!p.burn_torch(57.0));
        assert!(p.burn_torch(0.5));
        assert!(!p.has_torch());
    }

    #[test]
    fn food_stacks_and_is_eaten_from_hotbar() {
        let food = FoodConfig::default();
        let mut p = player(CharClass::Archer);
        let first = p.new_item(ItemKind::CookedMeat, &CraftingConfig::default());
        let id = p.store_item(first).unwrap();
        let second = p.new_item(ItemKind::CookedMeat, &CraftingConfig::default());
        assert_eq!(p.store_item(second).unwrap(), id);
        assert_eq!(p.count_items(ItemKind::CookedMeat), 2);

        p.assign_hotbar(id, 0).unwrap();
        p.hunger.set(10.0);
        assert_eq!(p.use_hotbar_item(0, &food), Ok(HotbarUse::Ate(ItemKind::CookedMeat)));
        assert_eq!(p.hunger.current, 50.0);
        assert_eq!(p.count_items(ItemKind::CookedMeat), 1);
        p.use_hotbar_item(0, &food).unwrap();
        assert!(p.hotbar[0].is_none());
        assert_eq!(p.use_hotbar_item(0, &food), Err(ActionError::SlotEmpty(0)));
    }

    #[test]
    fn inventory_fills_up() {
        let mut p = player(CharClass::Mage);
        for _ in 0..p.inventory.len() {
            let axe = p.new_item(ItemKind::Axe, &CraftingConfig::default());
            p.store_item(axe).unwrap();
        }
        let extra = p.new_item(ItemKind::Axe, &CraftingConfig::default());
        assert_eq!(p.store_item(extra), Err(ActionError::InventoryFull));
        assert!(!p.can_store(ItemKind::Pickaxe));
    }

    #[test]
    fn paladin_shield_blocks_damage() {
        let mut p = player(CharClass::Paladin);
        p.ability_active = true;
        p.ability_duration = 1.0;
        assert_eq!(p.take_damage(15.0, 5.0), 0.0);
        assert_eq!(p.sanity.current, 100.0);
        p.tick_ability(1.5);
        assert!(!p.ability_active);
        assert_eq!(p.take_damage(15.0, 5.0), 15.0);
        assert_eq!(p.sanity.current, 95.0);
    }

    #[test]
    fn eating_raw_berries_needs_stock() {
        let food = FoodConfig::default();
        let mut p = player(CharClass::Warrior);
        p.hunger.set(50.0);
        assert!(p.eat_resource(ResourceKind::Berries, &food).is_err());
        p.add_resource(ResourceKind::Berries, 1);
        p.eat_resource(ResourceKind::Berries, &food).unwrap();
        assert_eq!(p.hunger.current, 65.0);
        assert_eq!(p.resource(ResourceKind::Berries), 0);
    }
}
