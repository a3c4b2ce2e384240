//! Item behavior descriptors
//!
//! A behavior descriptor is the per-item-type capability interface: it
//! declares how an item equips and reacts to lifecycle events. Items
//! without a descriptor fall back to the defaults declared here, so call
//! sites dispatch without checking for presence.

use crate::part::PartDefinition;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use stowage_node::Node;

/// How an equipped item is represented in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EquipMode {
    /// Cosmetic model instance with no physical presence
    #[default]
    Model,
    /// Live part instance attached visually, physics disabled
    Part,
    /// Live part instance with full physics
    Physic,
}

/// Action bound to the item's inventory shortcut key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShortcutAction {
    /// Drop the item to the world
    #[default]
    Drop,
    /// Toggle equip state
    Equip,
    /// Forward to the behavior's `on_use`
    Custom,
}

/// Where a use action originated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseSource {
    KeyDown,
    KeyUp,
    InventoryShortcut,
    ContextMenu,
}

/// Contexts an item can be used from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsableFrom {
    /// Usable while on EVA
    pub eva: bool,
    /// Usable from inside a container
    pub container: bool,
    /// Usable from a crewed pod
    pub pod: bool,
    /// Usable in the editor
    pub editor: bool,
}

/// Skinned-mesh attachment point for an equipped representation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorSpec {
    /// Name of the skinned mesh to search
    pub mesh: String,
    /// Name of the bone used as the attachment point
    pub bone: String,
}

/// Item state handed to behavior callbacks
pub struct BehaviorCtx<'a> {
    /// Definition of the item's part
    pub part: &'a PartDefinition,
    /// The item's serialized payload, mutable in place
    pub node: &'a mut Node,
    /// Current stack quantity
    pub quantity: u32,
    /// Whether the item is currently equipped
    pub equipped: bool,
}

/// Per-item-type capability descriptor
///
/// Declarative reads describe how the item equips; notification methods
/// default to no-ops and fire on the matching inventory operation.
pub trait ItemBehavior: Send + Sync {
    /// Representation used while equipped
    fn equip_mode(&self) -> EquipMode {
        EquipMode::Model
    }

    /// Whether the item can be equipped at all
    fn equipable(&self) -> bool {
        false
    }

    /// Whether the item type declares itself stackable
    fn stackable(&self) -> bool {
        false
    }

    /// Whether the item is carried rather than stowed on a wearer
    fn carriable(&self) -> bool {
        false
    }

    /// Named equip slot, when the item competes for one
    fn equip_slot(&self) -> Option<&str> {
        None
    }

    /// Crew skill required to equip, when gated
    fn equip_skill(&self) -> Option<&str> {
        None
    }

    /// Contexts the item is usable from
    fn usable_from(&self) -> UsableFrom {
        UsableFrom::default()
    }

    /// Attachment point on the wearer's skinned mesh
    fn anchor(&self) -> AnchorSpec {
        AnchorSpec::default()
    }

    /// Local equip position offset from the anchor bone
    fn equip_position(&self) -> Vec3 {
        Vec3::ZERO
    }

    /// Local equip orientation offset, euler degrees
    fn equip_direction(&self) -> Vec3 {
        Vec3::ZERO
    }

    /// Whether equipping hides the wearer's helmet
    fn remove_helmet(&self) -> bool {
        false
    }

    /// Sound played on equip, unequip and move
    fn move_sound(&self) -> Option<&str> {
        None
    }

    /// Action bound to the inventory shortcut key
    fn shortcut(&self) -> ShortcutAction {
        ShortcutAction::Drop
    }

    /// The item was equipped
    fn on_equip(&self, _ctx: BehaviorCtx) {}

    /// The item was unequipped
    fn on_unequip(&self, _ctx: BehaviorCtx) {}

    /// The item was used
    fn on_use(&self, _ctx: BehaviorCtx, _source: UseSource) {}

    /// Per-tick update while the item sits in an inventory
    fn on_update(&self, _ctx: BehaviorCtx) {}

    /// Per-frame GUI hook while the owning inventory is shown
    fn on_gui(&self, _ctx: BehaviorCtx) {}

    /// The item was dragged onto a world part
    fn on_drag_to_part(&self, _ctx: BehaviorCtx, _dest_part: &str) {}

    /// The item was dragged onto another inventory slot
    fn on_drag_to_inventory(&self, _ctx: BehaviorCtx, _dest_inventory: &str, _dest_slot: u32) {}
}
