//! Declarative topology configuration.
//!
//! A [`TopologyConfig`] describes nodes, their attribute overrides and the
//! collections to distribute over them, and turns into a [`ClusterBuilder`].
//!
//! ```toml
//! node_count = 3
//!
//! [[nodes]]
//! index = 0
//! name = "fast_node"
//! core_count = 4
//! free_disk_gb = 500
//! sysprops = { zone = "east" }
//! metrics = [{ registry = "jvm", name = "heap", value = 0.5 }]
//!
//! [[collections]]
//! name = "products"
//! shards = 2
//! nrt = 2
//! pull = 1
//! nodes = ["fast_node", "node_1"]
//! custom_properties = { policy = "spread" }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use shardsim_core::{NodeMetricRegistry, TopologyError, TopologyResult};
use tracing::debug;

use crate::cluster::ClusterBuilder;
use crate::collection::{CollectionBuilder, ReplicaCounts};
use crate::node::{NodeBuilder, NodeHandle};

/// A whole topology.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    /// Number of default-named nodes to create.
    pub node_count: usize,
    /// Overrides applied to nodes by index.
    pub nodes: Vec<NodeOverride>,
    /// Collections, in creation order.
    pub collections: Vec<CollectionConfig>,
}

/// Overrides for one node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeOverride {
    /// Index of the node to override, from 0.
    pub index: usize,
    /// Replacement name.
    pub name: Option<String>,
    /// Core count.
    pub core_count: Option<i32>,
    /// Free disk, in GB.
    pub free_disk_gb: Option<i64>,
    /// Total disk, in GB.
    pub total_disk_gb: Option<i64>,
    /// Heap usage.
    pub heap_usage: Option<f64>,
    /// System load average.
    pub system_load_average: Option<f64>,
    /// System properties by raw name.
    pub sysprops: BTreeMap<String, String>,
    /// Metrics.
    pub metrics: Vec<MetricOverride>,
}

/// One metric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricOverride {
    /// Registry holding the metric.
    pub registry: NodeMetricRegistry,
    /// Raw metric name.
    pub name: String,
    /// Value.
    pub value: f64,
}

/// One collection and its replica layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Collection name.
    pub name: String,
    /// Number of shards.
    pub shards: usize,
    /// Replicas per shard.
    #[serde(flatten)]
    pub replicas: ReplicaCounts,
    /// Candidate node names, in order. Empty means every node.
    pub nodes: Vec<String>,
    /// Custom properties.
    pub custom_properties: BTreeMap<String, String>,
}

impl TopologyConfig {
    /// Load a topology from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> TopologyResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a topology from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string cannot be parsed.
    pub fn parse(content: &str) -> TopologyResult<Self> {
        toml::from_str(content).map_err(|e| TopologyError::InvalidConfig(e.to_string()))
    }

    /// Turn the topology into a cluster builder.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidConfig`] for an override index past
    /// `node_count` or an unknown candidate node name, and
    /// [`TopologyError::NodeExhaustion`] for a collection requesting replicas
    /// with no candidate nodes.
    pub fn into_cluster_builder(self) -> TopologyResult<ClusterBuilder> {
        let mut builder = ClusterBuilder::new().initialize_nodes(self.node_count);

        for node in self.nodes {
            let handle = builder.node_builders().get(node.index).ok_or_else(|| {
                TopologyError::InvalidConfig(format!(
                    "node override index {} out of range for {} node(s)",
                    node.index, self.node_count
                ))
            })?;
            handle.update(|current| node.apply(current));
        }

        for collection in self.collections {
            let candidates = collection.candidates(builder.node_builders())?;
            debug!(
                collection = %collection.name,
                candidates = candidates.len(),
                "Configuring collection"
            );

            let mut collection_builder = CollectionBuilder::new(collection.name)
                .initialize_shards_replicas(collection.shards, collection.replicas, &candidates)?;
            for (name, value) in collection.custom_properties {
                collection_builder = collection_builder.with_custom_property(name, value);
            }
            builder = builder.add_collection(collection_builder);
        }

        Ok(builder)
    }
}

impl NodeOverride {
    fn apply(self, mut node: NodeBuilder) -> NodeBuilder {
        if let Some(name) = self.name {
            node = node.with_name(name);
        }
        if let Some(count) = self.core_count {
            node = node.with_core_count(count);
        }
        if let Some(gb) = self.free_disk_gb {
            node = node.with_free_disk_gb(gb);
        }
        if let Some(gb) = self.total_disk_gb {
            node = node.with_total_disk_gb(gb);
        }
        if let Some(usage) = self.heap_usage {
            node = node.with_heap_usage(usage);
        }
        if let Some(load) = self.system_load_average {
            node = node.with_system_load_average(load);
        }
        for (key, value) in self.sysprops {
            node = node.with_sysprop(&key, value);
        }
        for metric in self.metrics {
            node = node.with_metric(metric.registry, &metric.name, metric.value);
        }
        node
    }
}

impl CollectionConfig {
    fn candidates(&self, nodes: &[NodeHandle]) -> TopologyResult<Vec<NodeHandle>> {
        if self.nodes.is_empty() {
            return Ok(nodes.to_vec());
        }

        self.nodes
            .iter()
            .map(|name| {
                let found = nodes.iter().find(|node| node.get().name() == name.as_str());
                found.cloned().ok_or_else(|| {
                    TopologyError::InvalidConfig(format!(
                        "collection {} names unknown node {name}",
                        self.name
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use shardsim_core::Node;

    use super::*;

    const SAMPLE: &str = r#"
node_count = 3

[[nodes]]
index = 0
name = "fast_node"
core_count = 4
free_disk_gb = 500
sysprops = { zone = "east" }
metrics = [{ registry = "jvm", name = "heap", value = 0.5 }]

[[collections]]
name = "products"
shards = 2
nrt = 2
pull = 1
nodes = ["fast_node", "node_1"]
custom_properties = { policy = "spread" }
"#;

    #[test]
    fn test_parse_sample() {
        let config = TopologyConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.node_count, 3);
        assert_eq!(config.nodes[0].name.as_deref(), Some("fast_node"));
        assert_eq!(config.nodes[0].metrics[0].registry, NodeMetricRegistry::Jvm);
        assert_eq!(config.collections[0].replicas, ReplicaCounts::new(2, 0, 1));
    }

    #[test]
    fn test_into_cluster_builder() {
        let builder = TopologyConfig::parse(SAMPLE).unwrap().into_cluster_builder().unwrap();
        let cluster = builder.build().unwrap();
        let values = builder.build_attribute_values();

        assert_eq!(cluster.live_nodes().len(), 3);
        assert!(cluster.is_live(&Node::new("fast_node")));

        let products = cluster.collection("products").unwrap();
        assert_eq!(products.custom_property("policy"), Some("spread"));
        assert_eq!(products.replicas().count(), 6);
        assert!(products.replicas().all(|r| r.node().name() != "node_2"));

        let fast = Node::new("fast_node");
        assert_eq!(values.core_count(&fast), Some(4));
        assert_eq!(values.system_property(&fast, "zone"), Some("east"));
        assert_eq!(values.metric(&fast, "heap", NodeMetricRegistry::Jvm), Some(0.5));
    }

    #[test]
    fn test_empty_config() {
        let builder = TopologyConfig::parse("").unwrap().into_cluster_builder().unwrap();
        let cluster = builder.build().unwrap();
        assert!(cluster.live_nodes().is_empty());
        assert!(cluster.collections().is_empty());
    }

    #[test]
    fn test_override_index_out_of_range() {
        let config = TopologyConfig::parse("node_count = 1\n[[nodes]]\nindex = 4\n").unwrap();
        assert!(matches!(config.into_cluster_builder(), Err(TopologyError::InvalidConfig(_))));
    }

    #[test]
    fn test_unknown_candidate_node() {
        let config = TopologyConfig::parse(
            "node_count = 1\n[[collections]]\nname = \"c\"\nshards = 1\nnrt = 1\nnodes = [\"x\"]\n",
        )
        .unwrap();
        assert!(matches!(config.into_cluster_builder(), Err(TopologyError::InvalidConfig(_))));
    }

    #[test]
    fn test_no_nodes_with_replicas_exhausts() {
        let config =
            TopologyConfig::parse("[[collections]]\nname = \"c\"\nshards = 1\ntlog = 1\n").unwrap();
        assert!(matches!(
            config.into_cluster_builder(),
            Err(TopologyError::NodeExhaustion { .. })
        ));
    }

    #[test]
    fn test_invalid_toml() {
        let result = TopologyConfig::parse("node_count = \"three\"");
        assert!(matches!(result, Err(TopologyError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = TopologyConfig::from_file(file.path()).unwrap();
        assert_eq!(config.collections.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let result = TopologyConfig::from_file(Path::new("/nonexistent/topology.toml"));
        assert!(matches!(result, Err(TopologyError::Io(_))));
    }

    #[test]
    fn test_candidates_share_cluster_nodes() {
        let mut builder = TopologyConfig::parse(SAMPLE).unwrap().into_cluster_builder().unwrap();
        builder.node_builders_mut()[0].set_name("renamed_fast");

        let cluster = builder.build().unwrap();
        let products = cluster.collection("products").unwrap();
        assert!(products.replicas().all(|r| cluster.is_live(r.node())));
        assert!(products.replicas().any(|r| r.node().name() == "renamed_fast"));
    }
}
