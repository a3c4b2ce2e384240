//! Part definitions and the catalog they are resolved from

use crate::behavior::ItemBehavior;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use stowage_node::Node;

/// Stowed volume assumed for parts that declare none, in litres
const FALLBACK_VOLUME_L: f32 = 100.0;

/// Immutable descriptor of a loadable part
///
/// One definition exists per part name; items reference it through the
/// catalog and never copy it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartDefinition {
    /// Unique part name
    pub name: String,
    /// Display title
    pub title: String,
    /// Nominal cost of one unit
    pub cost: f32,
    /// Dry mass of one unit, in tons
    pub mass: f32,
    /// Stowed volume of one unit, in litres (0 = derive from template)
    pub volume_l: f32,
    /// Behavior module names carried by the part prefab
    pub modules: Vec<String>,
    /// Prefab configuration snapshot, including the resource payload
    pub template: Node,
}

impl PartDefinition {
    /// Create a new part definition
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            template: Node::new("PART"),
            ..Default::default()
        }
    }

    /// Set nominal cost
    pub fn with_cost(mut self, cost: f32) -> Self {
        self.cost = cost;
        self
    }

    /// Set dry mass
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Set stowed volume
    pub fn with_volume(mut self, volume_l: f32) -> Self {
        self.volume_l = volume_l;
        self
    }

    /// Add a prefab behavior module name
    pub fn with_module(mut self, name: impl Into<String>) -> Self {
        self.modules.push(name.into());
        self
    }

    /// Replace the prefab configuration template
    pub fn with_template(mut self, template: Node) -> Self {
        self.template = template;
        self
    }
}

/// Registry of part definitions and their behavior descriptors
#[derive(Default)]
pub struct PartCatalog {
    parts: HashMap<String, Arc<PartDefinition>>,
    behaviors: HashMap<String, Arc<dyn ItemBehavior>>,
}

impl PartCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a part definition, replacing any previous one
    pub fn register(&mut self, part: PartDefinition) {
        if self.parts.contains_key(&part.name) {
            log::warn!("Part {} registered twice, replacing", part.name);
        }
        self.parts.insert(part.name.clone(), Arc::new(part));
    }

    /// Attach a behavior descriptor to a registered part name
    pub fn register_behavior(&mut self, part_name: impl Into<String>, behavior: Arc<dyn ItemBehavior>) {
        self.behaviors.insert(part_name.into(), behavior);
    }

    /// Look up a part definition by name
    pub fn get(&self, name: &str) -> Option<Arc<PartDefinition>> {
        self.parts.get(name).cloned()
    }

    /// Look up the behavior descriptor attached to a part, if any
    pub fn behavior(&self, name: &str) -> Option<Arc<dyn ItemBehavior>> {
        self.behaviors.get(name).cloned()
    }

    /// Number of registered parts
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Stowed volume of one unit of `part`, in litres
    ///
    /// Explicit volume wins; otherwise the template's `volume` value,
    /// otherwise a fallback constant.
    pub fn stowed_volume(&self, part: &PartDefinition) -> f32 {
        if part.volume_l > 0.0 {
            return part.volume_l;
        }
        if let Some(v) = part.template.get_parsed::<f32>("volume") {
            if v > 0.0 {
                return v;
            }
        }
        log::debug!("Part {} declares no volume, assuming {FALLBACK_VOLUME_L} L", part.name);
        FALLBACK_VOLUME_L
    }
}
