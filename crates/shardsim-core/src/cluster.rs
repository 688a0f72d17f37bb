//! The cluster: live nodes plus every collection.
//!
//! The cluster owns the whole topology graph. Replicas and shards refer to
//! their parents by name, and the cluster resolves those back-references.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::collection::Collection;
use crate::named::NamedMap;
use crate::node::Node;
use crate::replica::Replica;
use crate::shard::Shard;

/// A complete, immutable cluster topology.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    live_nodes: BTreeSet<Node>,
    collections: NamedMap<Collection>,
}

impl Cluster {
    /// Create a cluster.
    ///
    /// Nodes sharing a name collapse to one; collections sharing a name
    /// collapse to the last one.
    #[must_use]
    pub fn new(
        live_nodes: impl IntoIterator<Item = Node>,
        collections: impl IntoIterator<Item = Collection>,
    ) -> Self {
        Self {
            live_nodes: live_nodes.into_iter().collect(),
            collections: collections.into_iter().collect(),
        }
    }

    /// The set of live nodes.
    #[must_use]
    pub fn live_nodes(&self) -> &BTreeSet<Node> {
        &self.live_nodes
    }

    /// Returns true if a node with this name is live.
    #[must_use]
    pub fn is_live(&self, node: &Node) -> bool {
        self.live_nodes.contains(node)
    }

    /// Collections in creation order.
    #[must_use]
    pub fn collections(&self) -> &NamedMap<Collection> {
        &self.collections
    }

    /// Look up a collection by name.
    #[must_use]
    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name)
    }

    /// The collection owning a shard.
    #[must_use]
    pub fn collection_of(&self, shard: &Shard) -> Option<&Collection> {
        self.collections.get(shard.collection_name())
    }

    /// The shard owning a replica.
    #[must_use]
    pub fn shard_of(&self, replica: &Replica) -> Option<&Shard> {
        self.collections.get(replica.collection_name())?.shard(replica.shard_name())
    }

    /// Every replica hosted on `node`, across all collections.
    pub fn replicas_on<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Replica> + 'a {
        self.collections
            .iter()
            .flat_map(Collection::replicas)
            .filter(move |replica| replica.node() == node)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::replica::{ReplicaState, ReplicaType};

    fn build_cluster() -> Cluster {
        let replicas = vec![
            Replica::new(
                "r0",
                "r0_c",
                ReplicaType::Nrt,
                ReplicaState::Active,
                Node::new("node_0"),
                "shard1",
                "coll",
            ),
            Replica::new(
                "r1",
                "r1_c",
                ReplicaType::Pull,
                ReplicaState::Active,
                Node::new("node_1"),
                "shard1",
                "coll",
            ),
        ];
        let shard = Shard::new("shard1", "coll", replicas, Some(0)).unwrap();
        let coll = Collection::new("coll", vec![shard], BTreeMap::new());

        let nodes = vec![Node::new("node_0"), Node::new("node_1"), Node::new("node_0")];
        Cluster::new(nodes, vec![coll])
    }

    #[test]
    fn test_live_nodes_deduplicated() {
        let cluster = build_cluster();
        assert_eq!(cluster.live_nodes().len(), 2);
        assert!(cluster.is_live(&Node::new("node_1")));
        assert!(!cluster.is_live(&Node::new("node_9")));
    }

    #[test]
    fn test_back_references() {
        let cluster = build_cluster();
        let coll = cluster.collection("coll").unwrap();
        let shard = coll.shard("shard1").unwrap();
        let replica = shard.replica("r1").unwrap();

        assert_eq!(cluster.shard_of(replica).unwrap().name(), "shard1");
        assert_eq!(cluster.collection_of(shard).unwrap().name(), "coll");
    }

    #[test]
    fn test_replicas_on_node() {
        let cluster = build_cluster();
        let node = Node::new("node_1");
        let hosted: Vec<_> = cluster.replicas_on(&node).map(Replica::name).collect();
        assert_eq!(hosted, vec!["r1"]);
    }
}
