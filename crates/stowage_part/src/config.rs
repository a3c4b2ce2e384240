//! Stackability overrides loaded from mod settings
//!
//! Passed explicitly into item construction; there is no process-wide
//! settings state.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Stackability overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StackableConfig {
    /// Behavior module names that do not block auto-stacking
    pub exempt_modules: HashSet<String>,
    /// Part names forced stackable regardless of modules and resources
    pub overrides: HashSet<String>,
}

impl StackableConfig {
    /// Create an empty config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an exempt module name
    pub fn with_exempt_module(mut self, name: impl Into<String>) -> Self {
        self.exempt_modules.insert(name.into());
        self
    }

    /// Add a forced-stackable part name
    pub fn with_override(mut self, name: impl Into<String>) -> Self {
        self.overrides.insert(name.into());
        self
    }

    /// Whether `module` does not count against auto-stacking
    pub fn is_module_exempt(&self, module: &str) -> bool {
        self.exempt_modules.contains(module)
    }

    /// Whether `part_name` is forced stackable
    ///
    /// Settings files cannot hold dots in names, so a dotted part name
    /// also matches its underscore form.
    pub fn is_override(&self, part_name: &str) -> bool {
        if self.overrides.contains(part_name) {
            return true;
        }
        part_name.contains('.') && self.overrides.contains(&part_name.replace('.', "_"))
    }
}
