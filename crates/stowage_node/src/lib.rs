//! # stowage_node - Configuration Node Tree
//!
//! Hierarchical key/value node tree used as the serialized payload of
//! inventory items and as the on-disk save format.
//!
//! A node has a name, an ordered list of string key/value pairs and an
//! ordered list of child nodes. Both keys and child names may repeat;
//! order is preserved across a save/load round trip.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A named node in a configuration tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    name: String,
    values: Vec<(String, String)>,
    nodes: Vec<Node>,
}

impl Node {
    /// Create an empty node with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// Node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the node holds no values and no children
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.nodes.is_empty()
    }

    /// Get the first value stored under `key`
    pub fn get_value(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get all values stored under `key`, in insertion order
    pub fn get_values(&self, key: &str) -> Vec<&str> {
        self.values
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Check whether at least one value exists under `key`
    pub fn has_value(&self, key: &str) -> bool {
        self.values.iter().any(|(k, _)| k == key)
    }

    /// Append a value under `key`, keeping any existing ones
    pub fn add_value(&mut self, key: impl Into<String>, value: impl ToString) {
        self.values.push((key.into(), value.to_string()));
    }

    /// Overwrite the first value under `key`, or append it when absent
    pub fn set_value(&mut self, key: &str, value: impl ToString) {
        if let Some(entry) = self.values.iter_mut().find(|(k, _)| k == key) {
            entry.1 = value.to_string();
        } else {
            self.values.push((key.to_string(), value.to_string()));
        }
    }

    /// Remove every value stored under `key`
    pub fn remove_values(&mut self, key: &str) {
        self.values.retain(|(k, _)| k != key);
    }

    /// Get the first value under `key` parsed as `T`
    ///
    /// A missing or malformed value reads as `None`; malformed save data
    /// must never abort loading.
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get_value(key).and_then(|v| v.parse().ok())
    }

    /// Get the first child node named `name`
    pub fn get_node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Get the first child node named `name`, mutably
    pub fn get_node_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.name == name)
    }

    /// Get all child nodes named `name`, in insertion order
    pub fn get_nodes(&self, name: &str) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.name == name).collect()
    }

    /// Get all child nodes named `name`, mutably
    pub fn get_nodes_mut(&mut self, name: &str) -> Vec<&mut Node> {
        self.nodes.iter_mut().filter(|n| n.name == name).collect()
    }

    /// Check whether a child node named `name` exists
    pub fn has_node(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n.name == name)
    }

    /// Append an empty child node and return it for filling in
    pub fn add_node(&mut self, name: impl Into<String>) -> &mut Node {
        self.nodes.push(Node::new(name));
        self.nodes.last_mut().unwrap()
    }

    /// Append an existing node as a child
    pub fn push_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// All child nodes in insertion order
    pub fn children(&self) -> &[Node] {
        &self.nodes
    }

    /// All key/value pairs in insertion order
    pub fn entries(&self) -> &[(String, String)] {
        &self.values
    }

    /// Drop all values and children, keeping the name
    pub fn clear(&mut self) {
        self.values.clear();
        self.nodes.clear();
    }

    /// Append this node's values and children into `target`
    ///
    /// The target keeps its own name and existing content.
    pub fn copy_into(&self, target: &mut Node) {
        target.values.extend(self.values.iter().cloned());
        target.nodes.extend(self.nodes.iter().cloned());
    }
}
