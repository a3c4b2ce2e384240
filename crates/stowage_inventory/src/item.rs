//! Item records
//!
//! An [`ItemRecord`] is one inventory-slot entry: a quantity of identical
//! part units plus a single serialized payload shared by the stack. The
//! payload node is authoritative for resources, nested modules and
//! science data; physical attributes are derived from it and from the
//! part definition at construction time.

use crate::equip::EquipState;
use crate::host::{GameHost, PartSnapshot};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stowage_node::Node;
use stowage_part::{
    BehaviorCtx, EquipMode, GameData, ItemBehavior, PartDefinition, ResourceTable, ShortcutAction,
    UsableFrom, UseSource,
};
use thiserror::Error;

/// Module marker carrying a dry-cost override for rescaled parts
const SCALE_MODULE: &str = "PartRescale";

/// Cost computation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CostError {
    /// A payload resource has no definition in the resource table
    #[error("no definition for resource {0}")]
    UnknownResource(String),
}

/// One resource entry of an item payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceInfo {
    /// Resource name
    pub name: String,
    /// Current amount aboard
    pub amount: f64,
    /// Capacity
    pub max_amount: f64,
}

/// One science result stored in an item payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScienceData {
    /// Experiment subject identifier
    pub subject: String,
    /// Stored data amount
    pub data_amount: f32,
}

/// Enumerate the valid resource entries of a payload node
///
/// An entry is valid only when name, amount and maxAmount are all present
/// and readable; anything else is skipped, never an error.
pub fn payload_resources(node: &Node) -> Vec<ResourceInfo> {
    let mut out = Vec::new();
    for res in node.get_nodes("RESOURCE") {
        let (Some(name), Some(amount), Some(max_amount)) = (
            res.get_value("name"),
            res.get_parsed::<f64>("amount"),
            res.get_parsed::<f64>("maxAmount"),
        ) else {
            continue;
        };
        out.push(ResourceInfo {
            name: name.to_string(),
            amount,
            max_amount,
        });
    }
    out
}

/// Compute the cost of one unit described by `node`
///
/// A scale-modifier module with an explicit `DryCost` wins over the
/// nominal part cost; its resource surcharge is priced through the
/// definition table, and a payload resource missing from the table is a
/// configuration-data integrity error.
pub fn compute_cost(
    node: &Node,
    part: &PartDefinition,
    resources: &ResourceTable,
) -> Result<f32, CostError> {
    for module in node.get_nodes("MODULE") {
        if module.get_value("name") != Some(SCALE_MODULE) {
            continue;
        }
        let Some(dry_cost) = module.get_parsed::<f64>("DryCost") else {
            continue;
        };
        let mut resource_cost = 0.0;
        for res in payload_resources(node) {
            let def = resources
                .lookup(&res.name)
                .ok_or_else(|| CostError::UnknownResource(res.name.clone()))?;
            resource_cost += res.amount * def.unit_cost;
        }
        return Ok((dry_cost + resource_cost) as f32);
    }
    Ok(part.cost)
}

/// One inventory-slot entry
pub struct ItemRecord {
    part: Arc<PartDefinition>,
    /// Serialized payload shared by the whole stack
    pub node: Node,
    quantity: u32,
    pub(crate) slot: u32,
    /// Stowed volume of one unit, in litres
    pub volume_l: f32,
    /// Cost of one unit
    pub cost: f32,
    /// Whether quantity may exceed one
    pub stackable: bool,
    /// Whether the item can be equipped
    pub equipable: bool,
    /// Whether the item is carried rather than stowed
    pub carriable: bool,
    /// Contexts the item is usable from
    pub usable_from: UsableFrom,
    /// Named equip slot the item competes for
    pub equip_slot: Option<String>,
    behavior: Option<Arc<dyn ItemBehavior>>,
    /// Whether the item is currently equipped
    pub equipped: bool,
    pub(crate) equip: EquipState,
    /// Mass of resources aboard the stack's payload, in tons
    pub resource_mass: f32,
    /// Mass contributed by a nested container's content, in tons
    pub content_mass: f32,
    /// Cost contributed by a nested container's content
    pub content_cost: f32,
    /// Display name of a nested container, empty when unnamed
    pub inventory_name: String,
}

impl ItemRecord {
    /// Build a record from a saved item node
    ///
    /// Persisted aggregate fields override the computed defaults when
    /// present; an absent payload falls back to the part template.
    pub fn from_saved(
        part: Arc<PartDefinition>,
        item_node: &Node,
        data: &GameData,
        launch_id: u32,
        slot: u32,
        quantity: u32,
    ) -> Self {
        let node = item_node
            .get_node("PART")
            .cloned()
            .unwrap_or_else(|| part.template.clone());
        let mut item = Self::init(part, node, data, launch_id, slot, quantity);
        if let Some(mass) = item_node.get_parsed::<f32>("resourceMass") {
            item.resource_mass = mass;
        }
        if let Some(mass) = item_node.get_parsed::<f32>("contentMass") {
            item.content_mass = mass;
        }
        if let Some(cost) = item_node.get_parsed::<f32>("contentCost") {
            item.content_cost = cost;
        }
        if let Some(name) = item_node.get_value("inventoryName") {
            item.inventory_name = name.to_string();
        }
        item
    }

    /// Build a record by capturing a live part snapshot
    pub fn from_world(
        part: Arc<PartDefinition>,
        snapshot: PartSnapshot,
        data: &GameData,
        launch_id: u32,
        slot: u32,
        quantity: u32,
    ) -> Self {
        let mut item = Self::init(part, snapshot.node, data, launch_id, slot, quantity);
        item.resource_mass = snapshot.resource_mass;
        if let Some(content) = snapshot.content {
            item.content_mass = content.mass;
            item.content_cost = content.cost;
            if !content.name.is_empty() {
                item.inventory_name = content.name;
            }
        }
        item
    }

    /// Shared initializer of both construction paths
    fn init(
        part: Arc<PartDefinition>,
        mut node: Node,
        data: &GameData,
        launch_id: u32,
        slot: u32,
        quantity: u32,
    ) -> Self {
        // Stamp the launch origin, never overwriting a non-zero value.
        match node.get_parsed::<u32>("launchID") {
            None | Some(0) => node.set_value("launchID", launch_id),
            Some(_) => {}
        }

        let behavior = data.parts.behavior(&part.name);
        let volume_l = data.parts.stowed_volume(&part);
        let cost = match compute_cost(&node, &part, &data.resources) {
            Ok(cost) => cost,
            Err(err) => {
                log::warn!("Cost of {} unresolved ({err}), using nominal", part.name);
                part.cost
            }
        };

        let mut item = Self {
            part,
            node,
            quantity,
            slot,
            volume_l,
            cost,
            stackable: false,
            equipable: false,
            carriable: false,
            usable_from: UsableFrom::default(),
            equip_slot: None,
            behavior,
            equipped: false,
            equip: EquipState::Stowed,
            resource_mass: 0.0,
            content_mass: 0.0,
            content_cost: 0.0,
            inventory_name: String::new(),
        };

        if let Some(behavior) = &item.behavior {
            item.equipable = behavior.equipable();
            item.stackable = behavior.stackable();
            item.carriable = behavior.carriable();
            item.usable_from = behavior.usable_from();
            item.equip_slot = behavior.equip_slot().map(str::to_string);
        }

        let non_exempt = item
            .part
            .modules
            .iter()
            .filter(|m| !data.stacking.is_module_exempt(m))
            .count();
        if non_exempt == 0 && item.resources().is_empty() {
            log::info!(
                "No non-exempt module or resource on {}, marking stackable",
                item.part.name
            );
            item.stackable = true;
        }
        if data.stacking.is_override(&item.part.name) {
            log::info!("Part {} forced stackable by settings override", item.part.name);
            item.stackable = true;
        }

        item.resource_mass = item.computed_resource_mass(&data.resources);
        item
    }

    /// Part definition of the stacked units
    pub fn part(&self) -> &Arc<PartDefinition> {
        &self.part
    }

    /// Behavior descriptor, when the item type has one
    pub fn behavior(&self) -> Option<Arc<dyn ItemBehavior>> {
        self.behavior.clone()
    }

    /// Current stack quantity
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Slot index inside the owning container
    pub fn slot(&self) -> u32 {
        self.slot
    }

    /// Representation used while equipped
    pub fn equip_mode(&self) -> EquipMode {
        self.behavior
            .as_ref()
            .map(|b| b.equip_mode())
            .unwrap_or_default()
    }

    /// Action bound to the inventory shortcut key
    pub fn shortcut_action(&self) -> ShortcutAction {
        self.behavior
            .as_ref()
            .map(|b| b.shortcut())
            .unwrap_or_default()
    }

    /// Stowed volume of the whole stack, in litres
    pub fn stack_volume(&self) -> f32 {
        self.volume_l * self.quantity as f32
    }

    /// Dry mass of one unit, in tons
    pub fn dry_mass(&self) -> f32 {
        self.part.mass
    }

    /// Dry mass of the whole stack, in tons
    pub fn stack_dry_mass(&self) -> f32 {
        self.dry_mass() * self.quantity as f32
    }

    /// Cost of the whole stack including nested content
    pub fn total_cost(&self) -> f32 {
        (self.cost + self.content_cost) * self.quantity as f32
    }

    /// Mass of the whole stack including resources and nested content
    pub fn total_mass(&self) -> f32 {
        self.stack_dry_mass() + self.resource_mass + self.content_mass
    }

    pub(crate) fn add_quantity(&mut self, qty: u32) {
        self.quantity += qty;
    }

    pub(crate) fn remove_quantity(&mut self, qty: u32) {
        debug_assert!(qty < self.quantity);
        self.quantity -= qty;
    }

    /// Valid resource entries of the payload, in node order
    pub fn resources(&self) -> Vec<ResourceInfo> {
        payload_resources(&self.node)
    }

    /// Overwrite the amount of the first valid payload entry named `name`
    ///
    /// No-op when the payload has no such entry.
    pub fn set_resource(&mut self, name: &str, amount: f64) {
        for res in self.node.get_nodes_mut("RESOURCE") {
            if res.get_value("name") == Some(name)
                && res.has_value("amount")
                && res.has_value("maxAmount")
            {
                res.set_value("amount", amount);
                return;
            }
        }
    }

    /// Science results stored in the payload's modules
    pub fn science_payload(&self) -> Vec<ScienceData> {
        let mut out = Vec::new();
        for module in self.node.get_nodes("MODULE") {
            for experiment in module.get_nodes("ScienceData") {
                out.push(ScienceData {
                    subject: experiment.get_value("subjectID").unwrap_or_default().to_string(),
                    data_amount: experiment.get_parsed("data").unwrap_or(0.0),
                });
            }
        }
        out
    }

    /// Mass of the resources currently in the payload, in tons
    pub fn computed_resource_mass(&self, resources: &ResourceTable) -> f32 {
        let mut mass = 0.0;
        for res in self.resources() {
            match resources.lookup(&res.name) {
                Some(def) => mass += res.amount * def.density,
                None => log::debug!("Resource {} has no definition, mass unknown", res.name),
            }
        }
        mass as f32
    }

    /// Write the record into a save node
    ///
    /// An item equipped in a live-backed mode is re-synced from its world
    /// instance first so in-flight state survives the save.
    pub fn save_into(&self, node: &mut Node, host: &dyn GameHost) {
        node.add_value("partName", &self.part.name);
        node.add_value("slot", self.slot);
        node.add_value("quantity", self.quantity);
        node.add_value("equipped", self.equipped);
        node.add_value("resourceMass", self.resource_mass);
        node.add_value("contentMass", self.content_mass);
        node.add_value("contentCost", self.content_cost);
        if !self.inventory_name.is_empty() {
            node.add_value("inventoryName", &self.inventory_name);
        }
        let payload = node.add_node("PART");
        match self.equip {
            EquipState::Live { part, .. } => {
                log::info!("Sync payload node of equipped part: {}", self.part.title);
                host.snapshot_part(part).node.copy_into(payload);
            }
            _ => self.node.copy_into(payload),
        }
    }

    /// Use the item
    pub fn use_item(&mut self, source: UseSource) {
        if let Some(behavior) = self.behavior() {
            behavior.on_use(self.behavior_ctx(), source);
        }
    }

    /// Notify the behavior of a drag onto a world part
    pub fn drag_to_part(&mut self, dest_part: &str) {
        if let Some(behavior) = self.behavior() {
            behavior.on_drag_to_part(self.behavior_ctx(), dest_part);
        }
    }

    /// Notify the behavior of a drag onto another inventory slot
    pub fn drag_to_inventory(&mut self, dest_inventory: &str, dest_slot: u32) {
        if let Some(behavior) = self.behavior() {
            behavior.on_drag_to_inventory(self.behavior_ctx(), dest_inventory, dest_slot);
        }
    }

    /// Per-frame GUI hook
    pub fn gui_update(&mut self) {
        if let Some(behavior) = self.behavior() {
            behavior.on_gui(self.behavior_ctx());
        }
    }

    pub(crate) fn behavior_ctx(&mut self) -> BehaviorCtx<'_> {
        BehaviorCtx {
            part: self.part.as_ref(),
            node: &mut self.node,
            quantity: self.quantity,
            equipped: self.equipped,
        }
    }

    pub(crate) fn adopt_payload(&mut self, node: Node) {
        self.node = node;
    }
}
