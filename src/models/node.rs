use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A network point with a geographic position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub code: String,
    pub lat: f64,
    pub lon: f64,
}

impl Node {
    #[must_use]
    pub fn new(code: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self { code: code.into(), lat, lon }
    }

    #[must_use]
    pub const fn position(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }

    /// Whether the coordinates are finite and within geographic range
    #[must_use]
    pub fn has_valid_position(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown node code '{code}'")]
pub struct UnknownNodeError {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("node code '{code}' appears more than once")]
pub struct DuplicateNodeError {
    pub code: String,
}

/// Lookup table from node code to position, one row per code
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeTable {
    nodes: IndexMap<String, Node>,
}

impl NodeTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from nodes, rejecting repeated codes
    ///
    /// # Errors
    ///
    /// Returns an error naming the first code that appears twice.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Result<Self, DuplicateNodeError> {
        let mut table = Self::new();
        for node in nodes {
            table.insert(node)?;
        }
        Ok(table)
    }

    /// Add a node
    ///
    /// # Errors
    ///
    /// Returns an error if a node with the same code is already present.
    pub fn insert(&mut self, node: Node) -> Result<(), DuplicateNodeError> {
        if self.nodes.contains_key(&node.code) {
            return Err(DuplicateNodeError { code: node.code });
        }
        self.nodes.insert(node.code.clone(), node);
        Ok(())
    }

    /// Position `(lat, lon)` of the node with this code
    ///
    /// # Errors
    ///
    /// Returns `UnknownNodeError` if the code is not in the table.
    pub fn resolve(&self, code: &str) -> Result<(f64, f64), UnknownNodeError> {
        self.nodes
            .get(code)
            .map(Node::position)
            .ok_or_else(|| UnknownNodeError { code: code.to_string() })
    }

    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Node> {
        self.nodes.get(code)
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.nodes.contains_key(code)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in load order
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }
}
