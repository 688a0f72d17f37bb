//! Shard builder.

use shardsim_core::{Shard, TopologyResult};

use crate::replica::ReplicaBuilder;

/// Describes one shard: an ordered list of replicas and an optional leader.
///
/// The leader is a position in the replica list, so it can be chosen before
/// replica names are final.
#[derive(Debug, Clone, PartialEq)]
pub struct ShardBuilder {
    name: String,
    replicas: Vec<ReplicaBuilder>,
    leader: Option<usize>,
}

impl ShardBuilder {
    /// Create an empty shard builder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), replicas: Vec::new(), leader: None }
    }

    /// Set the shard name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Append a replica.
    #[must_use]
    pub fn with_replica(mut self, replica: ReplicaBuilder) -> Self {
        self.replicas.push(replica);
        self
    }

    /// Replace the replica list.
    #[must_use]
    pub fn with_replicas(mut self, replicas: Vec<ReplicaBuilder>) -> Self {
        self.replicas = replicas;
        self
    }

    /// Designate the replica at `index` as leader.
    #[must_use]
    pub fn with_leader(mut self, index: usize) -> Self {
        self.leader = Some(index);
        self
    }

    /// Designate or clear the leader in place.
    pub fn set_leader(&mut self, index: Option<usize>) {
        self.leader = index;
    }

    /// Shard name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replica builders in order.
    #[must_use]
    pub fn replicas(&self) -> &[ReplicaBuilder] {
        &self.replicas
    }

    /// Replica builders, for redistributing replicas after initialization.
    pub fn replicas_mut(&mut self) -> &mut Vec<ReplicaBuilder> {
        &mut self.replicas
    }

    /// Leader position, if designated.
    #[must_use]
    pub fn leader(&self) -> Option<usize> {
        self.leader
    }

    /// Build the shard as a member of the named collection.
    ///
    /// Replicas are built in order and the leader is the built replica at the
    /// designated position.
    ///
    /// # Errors
    ///
    /// Returns an error if a replica has no hosting node, or if the leader
    /// position is out of range or designates a PULL replica.
    pub fn build(&self, collection_name: &str) -> TopologyResult<Shard> {
        let replicas = self
            .replicas
            .iter()
            .map(|replica| replica.build(&self.name, collection_name))
            .collect::<TopologyResult<Vec<_>>>()?;

        Shard::new(self.name.clone(), collection_name, replicas, self.leader)
    }
}

#[cfg(test)]
mod tests {
    use shardsim_core::{ReplicaType, ShardState, TopologyError};

    use super::*;
    use crate::node::NodeBuilder;

    fn replica(name: &str, replica_type: ReplicaType, node: &str) -> ReplicaBuilder {
        ReplicaBuilder::new(name, replica_type).with_node(NodeBuilder::new(node))
    }

    #[test]
    fn test_build_resolves_leader_by_position() {
        let shard = ShardBuilder::new("shard1")
            .with_replica(replica("p", ReplicaType::Pull, "a"))
            .with_replica(replica("n", ReplicaType::Nrt, "b"))
            .with_leader(1)
            .build("coll")
            .unwrap();

        assert_eq!(shard.name(), "shard1");
        assert_eq!(shard.collection_name(), "coll");
        assert_eq!(shard.state(), ShardState::Active);
        assert_eq!(shard.leader().unwrap().name(), "n");
        assert_eq!(shard.replicas().names().collect::<Vec<_>>(), vec!["p", "n"]);
    }

    #[test]
    fn test_leader_follows_position_not_name() {
        let mut builder = ShardBuilder::new("shard1")
            .with_replica(replica("x", ReplicaType::Nrt, "a"))
            .with_leader(0);
        builder.replicas_mut()[0] = replica("renamed", ReplicaType::Tlog, "a");

        let shard = builder.build("coll").unwrap();
        assert_eq!(shard.leader().unwrap().name(), "renamed");
    }

    #[test]
    fn test_no_leader() {
        let shard = ShardBuilder::new("shard1")
            .with_replica(replica("p", ReplicaType::Pull, "a"))
            .build("coll")
            .unwrap();
        assert!(shard.leader().is_none());
    }

    #[test]
    fn test_unhosted_replica_propagates() {
        let result = ShardBuilder::new("shard1")
            .with_replica(ReplicaBuilder::new("r", ReplicaType::Nrt))
            .build("coll");
        assert!(matches!(result, Err(TopologyError::UnhostedReplica { .. })));
    }

    #[test]
    fn test_pull_leader_rejected() {
        let result = ShardBuilder::new("shard1")
            .with_replica(replica("p", ReplicaType::Pull, "a"))
            .with_leader(0)
            .build("coll");
        assert!(matches!(result, Err(TopologyError::PullLeader { .. })));
    }

    #[test]
    fn test_clear_leader() {
        let mut builder = ShardBuilder::new("shard1")
            .with_replica(replica("n", ReplicaType::Nrt, "a"))
            .with_leader(0);
        builder.set_leader(None);
        assert!(builder.build("coll").unwrap().leader().is_none());
    }
}
