//! Cluster builder and attribute aggregation.

use std::collections::BTreeSet;

use shardsim_core::{AttributeValues, Cluster, Node, SnapshotAttributeFetcher, TopologyResult};
use tracing::{debug, warn};

use crate::collection::CollectionBuilder;
use crate::node::{NodeBuilder, NodeHandle};

/// Describes a whole cluster: its nodes and collections.
///
/// [`build`](Self::build) produces the topology and
/// [`build_attribute_values`](Self::build_attribute_values) produces the
/// attribute snapshot. Both can be called any number of times; each call
/// allocates a fresh, independent result.
///
/// Nodes are held as [`NodeHandle`]s shared with the replicas placed on them.
/// Cloning the cluster builder shares those node builders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterBuilder {
    node_builders: Vec<NodeHandle>,
    collection_builders: Vec<CollectionBuilder>,
}

impl ClusterBuilder {
    /// Create an empty cluster builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all node builders with `count` nodes named `node_0`, `node_1`, ...
    #[must_use]
    pub fn initialize_nodes(mut self, count: usize) -> Self {
        self.node_builders =
            (0..count).map(|n| NodeHandle::new(NodeBuilder::new(format!("node_{n}")))).collect();
        self
    }

    /// Append a node builder.
    #[must_use]
    pub fn add_node(mut self, node: impl Into<NodeHandle>) -> Self {
        self.node_builders.push(node.into());
        self
    }

    /// Append a collection builder.
    #[must_use]
    pub fn add_collection(mut self, collection: CollectionBuilder) -> Self {
        self.collection_builders.push(collection);
        self
    }

    /// Node builders in order.
    #[must_use]
    pub fn node_builders(&self) -> &[NodeHandle] {
        &self.node_builders
    }

    /// Node builder list, for adding, removing or reordering nodes.
    ///
    /// Edit a node through its handle to keep placed replicas bound to it.
    /// Replacing an entry with a new handle leaves those replicas on the old
    /// builder.
    pub fn node_builders_mut(&mut self) -> &mut Vec<NodeHandle> {
        &mut self.node_builders
    }

    /// Collection builders in order.
    #[must_use]
    pub fn collection_builders(&self) -> &[CollectionBuilder] {
        &self.collection_builders
    }

    /// Collection builders, for adjusting distributions before building.
    pub fn collection_builders_mut(&mut self) -> &mut Vec<CollectionBuilder> {
        &mut self.collection_builders
    }

    /// Build every node, in order. Duplicate names are kept.
    #[must_use]
    pub fn build_live_nodes(&self) -> Vec<Node> {
        self.node_builders.iter().map(NodeHandle::build).collect()
    }

    /// Build the cluster.
    ///
    /// Node builders sharing a name collapse into one live node. Collections
    /// sharing a name collapse to the last one built.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while building a collection.
    pub fn build(&self) -> TopologyResult<Cluster> {
        let nodes = self.build_live_nodes();
        let live_nodes: BTreeSet<Node> = nodes.iter().cloned().collect();
        if live_nodes.len() < nodes.len() {
            warn!(
                node_builders = nodes.len(),
                live_nodes = live_nodes.len(),
                "Duplicate node names collapsed into one live node"
            );
        }

        let collections = self
            .collection_builders
            .iter()
            .map(CollectionBuilder::build)
            .collect::<TopologyResult<Vec<_>>>()?;

        debug!(
            live_nodes = live_nodes.len(),
            collections = collections.len(),
            "Built cluster"
        );

        Ok(Cluster::new(live_nodes, collections))
    }

    /// Build the attribute snapshot from the node builders' overrides.
    ///
    /// Nodes are rebuilt from the builders rather than taken from a previous
    /// [`build`](Self::build). Attributes a builder never set stay absent.
    #[must_use]
    pub fn build_attribute_values(&self) -> AttributeValues {
        let mut values = AttributeValues::builder();

        for handle in &self.node_builders {
            let node_builder = handle.get();
            let node = node_builder.build();

            if let Some(count) = node_builder.core_count() {
                values.core_count(node.clone(), count);
            }
            if let Some(gb) = node_builder.free_disk_gb() {
                values.free_disk_gb(node.clone(), gb);
            }
            if let Some(gb) = node_builder.total_disk_gb() {
                values.total_disk_gb(node.clone(), gb);
            }
            if let Some(usage) = node_builder.heap_usage() {
                values.heap_usage(node.clone(), usage);
            }
            if let Some(load) = node_builder.system_load_average() {
                values.system_load_average(node.clone(), load);
            }
            for (tag, value) in node_builder.sysprops() {
                values.sysprop(tag.as_str(), node.clone(), value.as_str());
            }
            for (tag, value) in node_builder.metrics() {
                values.metric(tag.as_str(), node.clone(), *value);
            }
        }

        debug!(node_builders = self.node_builders.len(), "Built attribute snapshot");
        values.build()
    }

    /// Build an attribute fetcher serving the snapshot.
    #[must_use]
    pub fn build_attribute_fetcher(&self) -> SnapshotAttributeFetcher {
        SnapshotAttributeFetcher::new(self.build_attribute_values())
    }
}
