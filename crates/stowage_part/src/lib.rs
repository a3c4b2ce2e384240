//! # stowage_part - Part Catalog and Behavior Descriptors
//!
//! Static data the inventory subsystem reads but never mutates:
//!
//! - Part definitions with the prefab configuration template
//! - The `ItemBehavior` capability trait implemented per item type
//! - The resource definition table (unit cost, density)
//! - Stackability overrides from mod settings

pub mod behavior;
pub mod config;
pub mod part;
pub mod resources;

pub mod prelude {
    pub use crate::behavior::{
        AnchorSpec, BehaviorCtx, EquipMode, ItemBehavior, ShortcutAction, UsableFrom, UseSource,
    };
    pub use crate::config::StackableConfig;
    pub use crate::part::{PartCatalog, PartDefinition};
    pub use crate::resources::{ResourceDefinition, ResourceTable};
    pub use crate::GameData;
}

pub use prelude::*;

/// Bundle of the static lookup tables item construction needs
#[derive(Default)]
pub struct GameData {
    /// Part definitions and their behavior descriptors
    pub parts: part::PartCatalog,
    /// Resource definitions by name
    pub resources: resources::ResourceTable,
    /// Stackability overrides
    pub stacking: config::StackableConfig,
}
