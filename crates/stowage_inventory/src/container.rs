//! Containers and their accounting
//!
//! A container owns a slot-indexed map of item records and keeps its
//! aggregate volume figure refreshed eagerly after every mutation, so
//! readers always see a consistent post-mutation snapshot.

use crate::equip::Actor;
use crate::host::{GameHost, PartSnapshot};
use crate::item::ItemRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use stowage_node::Node;
use stowage_part::GameData;

/// What kind of entity the container is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainerKind {
    /// A suit inventory on a crew member; the only kind that equips
    Wearer,
    /// A crewed pod
    Pod,
    /// A cargo container
    Container,
    /// An editor-time inventory
    Editor,
}

/// One crew member boarding the container's vessel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    /// Crew member name
    pub name: String,
    /// Skills granted by the member's experience trait
    pub skills: Vec<String>,
}

impl CrewMember {
    /// Create a crew member with the given skills
    pub fn new(name: impl Into<String>, skills: Vec<String>) -> Self {
        Self {
            name: name.into(),
            skills,
        }
    }

    /// Whether the member has `skill`
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }
}

/// Container mutations observable by the host and UI
#[derive(Debug, Clone)]
pub enum InventoryEvent {
    /// A record was created in a slot
    ItemAdded {
        slot: u32,
        part_name: String,
        quantity: u32,
    },
    /// Units were removed from a stack
    ItemRemoved { slot: u32, quantity: u32 },
    /// A record was deleted outright
    ItemDeleted { slot: u32 },
    /// A record was equipped
    ItemEquipped { slot: u32 },
    /// A record was unequipped
    ItemUnequipped { slot: u32 },
    /// A record changed slots
    ItemMoved { from: u32, to: u32 },
}

/// A slot-indexed container of item records
pub struct Inventory {
    pub(crate) kind: ContainerKind,
    name: String,
    max_volume_l: f32,
    pub(crate) items: BTreeMap<u32, ItemRecord>,
    total_volume_l: f32,
    pub(crate) crew: Vec<CrewMember>,
    helmet_equipped: bool,
    pub(crate) default_move_sound: String,
    launch_id: u32,
    pub(crate) events: Vec<InventoryEvent>,
}

impl Inventory {
    /// Create an empty container
    pub fn new(kind: ContainerKind, max_volume_l: f32) -> Self {
        Self {
            kind,
            name: String::new(),
            max_volume_l,
            items: BTreeMap::new(),
            total_volume_l: 0.0,
            crew: Vec::new(),
            helmet_equipped: true,
            default_move_sound: String::new(),
            launch_id: 0,
            events: Vec::new(),
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the boarding crew
    pub fn with_crew(mut self, crew: Vec<CrewMember>) -> Self {
        self.crew = crew;
        self
    }

    /// Set the fallback move sound
    pub fn with_default_move_sound(mut self, path: impl Into<String>) -> Self {
        self.default_move_sound = path.into();
        self
    }

    /// Set the launch identifier stamped into new item payloads
    pub fn with_launch_id(mut self, launch_id: u32) -> Self {
        self.launch_id = launch_id;
        self
    }

    /// Container kind
    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    /// Display name, empty when unnamed
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Volume capacity, in litres
    pub fn max_volume(&self) -> f32 {
        self.max_volume_l
    }

    /// Stowed volume currently used, in litres
    pub fn total_volume(&self) -> f32 {
        self.total_volume_l
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no slot is occupied
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Record in `slot`, if any
    pub fn get(&self, slot: u32) -> Option<&ItemRecord> {
        self.items.get(&slot)
    }

    /// Record in `slot`, mutably
    pub fn get_mut(&mut self, slot: u32) -> Option<&mut ItemRecord> {
        self.items.get_mut(&slot)
    }

    /// Occupied slots and their records, in slot order
    pub fn items(&self) -> impl Iterator<Item = (u32, &ItemRecord)> {
        self.items.iter().map(|(slot, item)| (*slot, item))
    }

    /// Lowest unoccupied slot index
    pub fn first_free_slot(&self) -> u32 {
        (0..).find(|slot| !self.items.contains_key(slot)).unwrap_or(0)
    }

    /// Boarding crew
    pub fn crew(&self) -> &[CrewMember] {
        &self.crew
    }

    /// Replace the boarding crew
    pub fn set_crew(&mut self, crew: Vec<CrewMember>) {
        self.crew = crew;
    }

    /// Whether the wearer's helmet is currently shown
    pub fn helmet_equipped(&self) -> bool {
        self.helmet_equipped
    }

    /// Show or hide the wearer's helmet
    pub fn set_helmet(&mut self, host: &mut dyn GameHost, visible: bool) {
        self.helmet_equipped = visible;
        host.set_helmet(visible);
    }

    /// Slot of the record currently equipped in the named equip slot
    pub fn equipped_item_in(&self, slot_name: &str) -> Option<u32> {
        self.items
            .iter()
            .find(|(_, item)| item.equipped && item.equip_slot.as_deref() == Some(slot_name))
            .map(|(slot, _)| *slot)
    }

    /// Drain the pending mutation events
    pub fn take_events(&mut self) -> Vec<InventoryEvent> {
        std::mem::take(&mut self.events)
    }

    /// Recompute the aggregate volume figure
    ///
    /// Called after every mutating operation; aggregates are never stale
    /// between calls.
    pub fn refresh(&mut self) {
        self.total_volume_l = self.items.values().map(|i| i.stack_volume()).sum();
    }

    /// Mass this container contributes to a parent container, in tons
    pub fn content_mass(&self) -> f32 {
        self.items.values().map(|i| i.total_mass()).sum()
    }

    /// Cost this container contributes to a parent container
    pub fn content_cost(&self) -> f32 {
        self.items.values().map(|i| i.total_cost()).sum()
    }

    /// Whether the record in `slot` is being carried on the wearer
    pub fn is_carried(&self, slot: u32, host: &dyn GameHost) -> bool {
        self.items.get(&slot).is_some_and(|item| {
            item.carriable && self.kind == ContainerKind::Wearer && host.in_flight()
        })
    }

    /// Ingest one saved item node, returning the slot it landed in
    ///
    /// An unknown part name or unreadable node is skipped with a warning;
    /// malformed save data never aborts loading.
    pub fn add_from_save(&mut self, item_node: &Node, data: &GameData) -> Option<u32> {
        let Some(part_name) = item_node.get_value("partName") else {
            log::warn!("Saved item without partName, skipping");
            return None;
        };
        let Some(part) = data.parts.get(part_name) else {
            log::warn!("Unknown part {part_name} in save, skipping");
            return None;
        };
        let slot = item_node
            .get_parsed::<u32>("slot")
            .filter(|slot| !self.items.contains_key(slot))
            .unwrap_or_else(|| self.first_free_slot());
        let quantity = item_node.get_parsed::<u32>("quantity").unwrap_or(1).max(1);
        let item = ItemRecord::from_saved(part, item_node, data, self.launch_id, slot, quantity);
        self.insert(slot, item);
        Some(slot)
    }

    /// Ingest a live part snapshot, returning the slot it landed in
    pub fn add_from_world(
        &mut self,
        snapshot: PartSnapshot,
        data: &GameData,
        quantity: u32,
    ) -> Option<u32> {
        let Some(part) = data.parts.get(&snapshot.part_name) else {
            log::warn!("Unknown part {} captured from world, rejecting", snapshot.part_name);
            return None;
        };
        let slot = self.first_free_slot();
        let item = ItemRecord::from_world(part, snapshot, data, self.launch_id, slot, quantity);
        self.insert(slot, item);
        Some(slot)
    }

    fn insert(&mut self, slot: u32, item: ItemRecord) {
        self.events.push(InventoryEvent::ItemAdded {
            slot,
            part_name: item.part().name.clone(),
            quantity: item.quantity(),
        });
        self.items.insert(slot, item);
        self.refresh();
    }

    /// Write every record into `ITEM` children of `node`
    pub fn save_into(&self, node: &mut Node, host: &dyn GameHost) {
        for item in self.items.values() {
            item.save_into(node.add_node("ITEM"), host);
        }
    }

    /// Ingest every `ITEM` child of `node`
    pub fn load_from(&mut self, node: &Node, data: &GameData) {
        for item_node in node.get_nodes("ITEM") {
            let _ = self.add_from_save(item_node, data);
        }
    }

    /// Whether `qty` more units fit onto the stack in `slot`
    ///
    /// Rejections notify the player; the volume case reports how far over
    /// capacity the add would land.
    pub fn can_stack_add(
        &self,
        slot: u32,
        qty: u32,
        check_volume: bool,
        host: &mut dyn GameHost,
    ) -> bool {
        if qty == 0 {
            return false;
        }
        let Some(item) = self.items.get(&slot) else {
            return false;
        };
        if item.equipped {
            host.notify("Cannot stack with equipped item");
            host.beep_wrong();
            return false;
        }
        if check_volume {
            let new_volume = self.total_volume_l + item.volume_l * qty as f32;
            if new_volume > self.max_volume_l {
                host.notify(&format!(
                    "Max destination volume reached (+{:.4})",
                    new_volume - self.max_volume_l
                ));
                return false;
            }
        }
        true
    }

    /// Add `qty` units to the stack in `slot`
    pub fn stack_add(
        &mut self,
        slot: u32,
        qty: u32,
        check_volume: bool,
        host: &mut dyn GameHost,
    ) -> bool {
        if !self.can_stack_add(slot, qty, check_volume, host) {
            return false;
        }
        let Some(item) = self.items.get_mut(&slot) else {
            return false;
        };
        item.add_quantity(qty);
        self.refresh();
        true
    }

    /// Remove `qty` units from the stack in `slot`
    ///
    /// Exhausting the stack deletes the record; the return value reports
    /// a removal, not a deletion.
    pub fn stack_remove(&mut self, slot: u32, qty: u32, host: &mut dyn GameHost) -> bool {
        if qty == 0 {
            return false;
        }
        let Some(item) = self.items.get(&slot) else {
            return false;
        };
        if item.quantity() <= qty {
            self.delete(slot, host);
            return false;
        }
        if let Some(item) = self.items.get_mut(&slot) {
            item.remove_quantity(qty);
        }
        self.events.push(InventoryEvent::ItemRemoved { slot, quantity: qty });
        self.refresh();
        true
    }

    /// Delete the record in `slot` outright
    ///
    /// Unequips first when needed. Safe to call again from the cascades
    /// an unequip can trigger.
    pub fn delete(&mut self, slot: u32, host: &mut dyn GameHost) {
        if self.items.get(&slot).is_some_and(|item| item.equipped) {
            self.unequip(slot, Actor::Api, host);
        }
        if self.items.remove(&slot).is_some() {
            self.events.push(InventoryEvent::ItemDeleted { slot });
            self.refresh();
        }
    }

    /// Move a record to another slot of the same container
    pub fn move_item(&mut self, from: u32, to: u32, host: &mut dyn GameHost) -> bool {
        if from == to || self.items.contains_key(&to) {
            return false;
        }
        let Some(mut item) = self.items.remove(&from) else {
            return false;
        };
        item.slot = to;
        let sound = self.move_sound_for(&item);
        self.items.insert(to, item);
        host.play_sound(&sound);
        self.events.push(InventoryEvent::ItemMoved { from, to });
        true
    }

    /// Transfer the record in `slot` into `dest`
    ///
    /// An equipped item cannot exist detached from its container-relative
    /// anchor, so crossing containers unequips it first.
    pub fn transfer_to(
        &mut self,
        slot: u32,
        dest: &mut Inventory,
        dest_slot: u32,
        host: &mut dyn GameHost,
    ) -> bool {
        if dest.items.contains_key(&dest_slot) {
            return false;
        }
        if !self.items.contains_key(&slot) {
            return false;
        }
        if self.items.get(&slot).is_some_and(|item| item.equipped) {
            self.unequip(slot, Actor::Api, host);
        }
        let Some(mut item) = self.items.remove(&slot) else {
            return false;
        };
        item.slot = dest_slot;
        let sound = match item.behavior().and_then(|b| b.move_sound().map(str::to_string)) {
            Some(sound) => sound,
            None => dest.default_move_sound.clone(),
        };
        host.play_sound(&sound);
        self.events.push(InventoryEvent::ItemRemoved {
            slot,
            quantity: item.quantity(),
        });
        dest.events.push(InventoryEvent::ItemAdded {
            slot: dest_slot,
            part_name: item.part().name.clone(),
            quantity: item.quantity(),
        });
        dest.items.insert(dest_slot, item);
        self.refresh();
        dest.refresh();
        true
    }

    /// Route the inventory shortcut key for `slot`
    pub fn shortcut_key_press(&mut self, slot: u32, host: &mut dyn GameHost) {
        use stowage_part::{ShortcutAction, UseSource};

        let (action, equipped) = match self.items.get(&slot) {
            Some(item) => (item.shortcut_action(), item.equipped),
            None => return,
        };
        match action {
            ShortcutAction::Drop => {
                self.drop_item(slot, host);
            }
            ShortcutAction::Equip => {
                if equipped {
                    self.unequip(slot, Actor::Player, host);
                } else {
                    let _ = self.equip(slot, Actor::Player, host);
                }
            }
            ShortcutAction::Custom => {
                if let Some(item) = self.items.get_mut(&slot) {
                    item.use_item(UseSource::InventoryShortcut);
                }
            }
        }
    }

    pub(crate) fn move_sound_for(&self, item: &ItemRecord) -> String {
        item.behavior()
            .and_then(|b| b.move_sound().map(str::to_string))
            .unwrap_or_else(|| self.default_move_sound.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{game_data, snapshot_of, MockHost};

    fn loaded_container() -> (Inventory, GameData, MockHost) {
        let data = game_data();
        let host = MockHost::new();
        let mut inv = Inventory::new(ContainerKind::Container, 100.0);
        let part = data.parts.get("wrench").unwrap();
        let slot = inv.add_from_world(snapshot_of(&part), &data, 1);
        assert_eq!(slot, Some(0));
        (inv, data, host)
    }

    #[test]
    fn test_stack_add_refreshes_volume() {
        let (mut inv, _data, mut host) = loaded_container();

        assert!(inv.stack_add(0, 2, true, &mut host));

        assert_eq!(inv.get(0).unwrap().quantity(), 3);
        assert_eq!(inv.total_volume(), 12.0);
    }

    #[test]
    fn test_stack_add_zero_rejected() {
        let (mut inv, _data, mut host) = loaded_container();

        assert!(!inv.stack_add(0, 0, true, &mut host));
        assert_eq!(inv.get(0).unwrap().quantity(), 1);
    }

    #[test]
    fn test_stack_add_over_volume_rejected_without_mutation() {
        let (mut inv, _data, mut host) = loaded_container();

        // 1 + 30 units of 4 L against a 100 L cap.
        assert!(!inv.stack_add(0, 30, true, &mut host));

        assert_eq!(inv.get(0).unwrap().quantity(), 1);
        assert_eq!(inv.total_volume(), 4.0);
        assert_eq!(host.notices.len(), 1);
        assert!(host.notices[0].contains("+24"));
    }

    #[test]
    fn test_stack_add_volume_check_can_be_skipped() {
        let (mut inv, _data, mut host) = loaded_container();

        assert!(inv.stack_add(0, 30, false, &mut host));
        assert_eq!(inv.get(0).unwrap().quantity(), 31);
    }

    #[test]
    fn test_stack_remove_keeps_positive_quantity() {
        let (mut inv, _data, mut host) = loaded_container();
        inv.stack_add(0, 4, true, &mut host);

        assert!(inv.stack_remove(0, 2, &mut host));

        assert_eq!(inv.get(0).unwrap().quantity(), 3);
    }

    #[test]
    fn test_stack_remove_exhaustion_deletes() {
        let (mut inv, _data, mut host) = loaded_container();
        inv.stack_add(0, 1, true, &mut host);

        // Removing everything is a deletion, not a removal.
        assert!(!inv.stack_remove(0, 2, &mut host));

        assert!(inv.get(0).is_none());
        assert_eq!(inv.total_volume(), 0.0);
    }

    #[test]
    fn test_stack_remove_zero_is_noop() {
        let (mut inv, _data, mut host) = loaded_container();

        assert!(!inv.stack_remove(0, 0, &mut host));
        assert!(inv.get(0).is_some());
    }

    #[test]
    fn test_save_load_round_trip() {
        let (inv, data, host) = loaded_container();
        let mut node = Node::new("STOWAGE");
        inv.save_into(&mut node, &host);

        let mut restored = Inventory::new(ContainerKind::Container, 100.0);
        restored.load_from(&node, &data);

        assert_eq!(restored.len(), 1);
        let item = restored.get(0).unwrap();
        assert_eq!(item.part().name, "wrench");
        assert_eq!(item.quantity(), 1);
        assert_eq!(restored.total_volume(), 4.0);
    }

    #[test]
    fn test_load_skips_unknown_parts() {
        let data = game_data();
        let mut node = Node::new("STOWAGE");
        let item = node.add_node("ITEM");
        item.add_value("partName", "no-such-part");
        item.add_node("PART");

        let mut inv = Inventory::new(ContainerKind::Container, 100.0);
        inv.load_from(&node, &data);

        assert!(inv.is_empty());
    }

    #[test]
    fn test_move_item_updates_slot() {
        let (mut inv, _data, mut host) = loaded_container();

        assert!(inv.move_item(0, 5, &mut host));

        assert!(inv.get(0).is_none());
        assert_eq!(inv.get(5).unwrap().slot(), 5);
        assert_eq!(host.sounds.len(), 1);
    }

    #[test]
    fn test_transfer_moves_record() {
        let (mut inv, _data, mut host) = loaded_container();
        let mut dest = Inventory::new(ContainerKind::Pod, 50.0);

        assert!(inv.transfer_to(0, &mut dest, 2, &mut host));

        assert!(inv.is_empty());
        assert_eq!(inv.total_volume(), 0.0);
        assert_eq!(dest.get(2).unwrap().slot(), 2);
        assert_eq!(dest.total_volume(), 4.0);
    }

    #[test]
    fn test_content_aggregates() {
        let (mut inv, _data, mut host) = loaded_container();
        inv.stack_add(0, 1, true, &mut host);

        assert_eq!(inv.content_cost(), 300.0);
        assert!((inv.content_mass() - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_first_free_slot_skips_occupied() {
        let (inv, _data, _host) = loaded_container();

        assert_eq!(inv.first_free_slot(), 1);
    }
}
