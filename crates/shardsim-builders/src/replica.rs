//! Replica builder.

use shardsim_core::{Replica, ReplicaState, ReplicaType, TopologyError, TopologyResult};

use crate::node::NodeHandle;

/// Describes one replica and the node hosting it.
///
/// The hosting node is a [`NodeHandle`], an association rather than a copy: the
/// node is resolved from the shared builder each time the replica is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplicaBuilder {
    name: String,
    core_name: Option<String>,
    replica_type: ReplicaType,
    state: ReplicaState,
    node: Option<NodeHandle>,
}

impl ReplicaBuilder {
    /// Create an active replica builder with no hosting node yet.
    #[must_use]
    pub fn new(name: impl Into<String>, replica_type: ReplicaType) -> Self {
        Self {
            name: name.into(),
            core_name: None,
            replica_type,
            state: ReplicaState::Active,
            node: None,
        }
    }

    /// Set the replica name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the core name. Defaults to `<replica name>_c`.
    #[must_use]
    pub fn with_core_name(mut self, core_name: impl Into<String>) -> Self {
        self.core_name = Some(core_name.into());
        self
    }

    /// Set the replica type.
    #[must_use]
    pub fn with_type(mut self, replica_type: ReplicaType) -> Self {
        self.replica_type = replica_type;
        self
    }

    /// Set the replica state.
    #[must_use]
    pub fn with_state(mut self, state: ReplicaState) -> Self {
        self.state = state;
        self
    }

    /// Set the hosting node.
    #[must_use]
    pub fn with_node(mut self, node: impl Into<NodeHandle>) -> Self {
        self.node = Some(node.into());
        self
    }

    /// Move the replica to another node in place.
    pub fn set_node(&mut self, node: impl Into<NodeHandle>) {
        self.node = Some(node.into());
    }

    /// Replica name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Core name, explicit or derived.
    #[must_use]
    pub fn core_name(&self) -> String {
        self.core_name.clone().unwrap_or_else(|| format!("{}_c", self.name))
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

    /// Hosting node, if set.
    #[must_use]
    pub fn node(&self) -> Option<&NodeHandle> {
        self.node.as_ref()
    }

    /// Build the replica as a member of the named shard.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::UnhostedReplica`] if no hosting node was set.
    pub fn build(&self, shard_name: &str, collection_name: &str) -> TopologyResult<Replica> {
        let node = self
            .node
            .as_ref()
            .ok_or_else(|| TopologyError::unhosted_replica(shard_name, &self.name))?;

        Ok(Replica::new(
            self.name.clone(),
            self.core_name(),
            self.replica_type,
            self.state,
            node.build(),
            shard_name,
            collection_name,
        ))
    }
}
