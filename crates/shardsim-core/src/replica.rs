//! Replica types and the immutable replica value.

use serde::{Deserialize, Serialize};

use crate::named::Named;
use crate::node::Node;

/// Kind of replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplicaType {
    /// Near-real-time: indexes locally and is searchable. Leader eligible.
    Nrt,
    /// Transaction log only; replicates the index from the leader. Leader eligible.
    Tlog,
    /// Read-only copy pulled from the leader. Never a leader.
    Pull,
}

impl ReplicaType {
    /// All replica types, in the order replicas are created for a shard.
    pub const ALL: [ReplicaType; 3] = [ReplicaType::Nrt, ReplicaType::Tlog, ReplicaType::Pull];

    /// One-character suffix used in generated replica names.
    #[must_use]
    pub const fn suffix_char(self) -> char {
        match self {
            Self::Nrt => 'n',
            Self::Tlog => 't',
            Self::Pull => 'p',
        }
    }

    /// Returns true if a replica of this type may become shard leader.
    #[must_use]
    pub const fn is_leader_eligible(self) -> bool {
        !matches!(self, Self::Pull)
    }
}

/// Lifecycle state of a replica.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplicaState {
    /// Serving requests.
    #[default]
    Active,
    /// Not reachable.
    Down,
    /// Catching up with the leader.
    Recovering,
    /// Recovery gave up.
    RecoveryFailed,
}

/// One physical copy of a shard, hosted on a node.
///
/// The owning shard and collection are held by name; resolve them through
/// [`Cluster::shard_of`](crate::Cluster::shard_of) and
/// [`Cluster::collection_of`](crate::Cluster::collection_of).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replica {
    name: String,
    core_name: String,
    replica_type: ReplicaType,
    state: ReplicaState,
    node: Node,
    shard_name: String,
    collection_name: String,
}

impl Replica {
    /// Create a replica bound to the named shard of the named collection.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        core_name: impl Into<String>,
        replica_type: ReplicaType,
        state: ReplicaState,
        node: Node,
        shard_name: impl Into<String>,
        collection_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            core_name: core_name.into(),
            replica_type,
            state,
            node,
            shard_name: shard_name.into(),
            collection_name: collection_name.into(),
        }
    }

    /// Replica name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Core name on the hosting node.
    #[must_use]
    pub fn core_name(&self) -> &str {
        &self.core_name
    }

    /// Replica type.
    #[must_use]
    pub fn replica_type(&self) -> ReplicaType {
        self.replica_type
    }

    /// Replica state.
    #[must_use]
    pub fn state(&self) -> ReplicaState {
        self.state
    }

    /// Hosting node.
    #[must_use]
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Name of the owning shard.
    #[must_use]
    pub fn shard_name(&self) -> &str {
        &self.shard_name
    }

    /// Name of the collection owning the shard.
    #[must_use]
    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }
}

impl Named for Replica {
    fn name(&self) -> &str {
        &self.name
    }
}
