//! Cluster nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A node participating in the cluster.
///
/// A node is identified by its name alone: two `Node` values with the same
/// name compare and hash equal, so they are interchangeable as map keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Node {
    name: String,
}

impl Node {
    /// Create a node with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The node name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
