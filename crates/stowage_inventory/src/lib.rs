//! # stowage_inventory - Items, Stacking and Equipment
//!
//! The core of the Stowage mod: stackable, storable and equippable items
//! held in slot-indexed containers attached to in-game entities.
//!
//! # Features
//!
//! - Item records built from saved data or live part snapshots
//! - Stack quantity arithmetic with volume-capacity gating
//! - Equip state machine over three world representations
//! - Eager volume/mass/cost accounting per container
//! - Host engine access behind the [`GameHost`] trait
//!
//! # Example
//!
//! ```ignore
//! use stowage_inventory::prelude::*;
//!
//! let mut inventory = Inventory::new(ContainerKind::Wearer, 300.0);
//! let slot = inventory.add_from_save(&item_node, &game_data).unwrap();
//! inventory.equip(slot, Actor::Player, &mut host)?;
//! ```

pub mod container;
pub mod equip;
pub mod host;
pub mod item;

pub mod prelude {
    pub use crate::container::{ContainerKind, CrewMember, Inventory, InventoryEvent};
    pub use crate::equip::{Actor, EquipError, EquipState, LiveMode, SpawnPhase};
    pub use crate::host::{
        AnchorHandle, ContentInfo, GameHost, GameMode, ModelHandle, PartHandle, PartSnapshot, Pose,
    };
    pub use crate::item::{CostError, ItemRecord, ResourceInfo, ScienceData};
}

pub use prelude::*;

#[cfg(test)]
pub(crate) mod test_support;
