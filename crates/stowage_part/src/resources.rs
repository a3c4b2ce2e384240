//! Resource definition table

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Definition of one resource type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceDefinition {
    /// Unique resource name
    pub name: String,
    /// Cost of one unit
    pub unit_cost: f64,
    /// Mass of one unit, in tons
    pub density: f64,
}

impl ResourceDefinition {
    /// Create a new resource definition
    pub fn new(name: impl Into<String>, unit_cost: f64, density: f64) -> Self {
        Self {
            name: name.into(),
            unit_cost,
            density,
        }
    }
}

/// Global name-indexed table of resource definitions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceTable {
    defs: HashMap<String, ResourceDefinition>,
}

impl ResourceTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource definition, replacing any previous one
    pub fn register(&mut self, def: ResourceDefinition) {
        self.defs.insert(def.name.clone(), def);
    }

    /// Look up a resource definition by name
    pub fn lookup(&self, name: &str) -> Option<&ResourceDefinition> {
        self.defs.get(name)
    }

    /// Number of registered resources
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
