//! Rendering of a built topology.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use shardsim_core::{AttributeValues, Cluster, NodeAttributes};

/// A built cluster, optionally with its attribute snapshot.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    /// The cluster.
    pub cluster: &'a Cluster,
    /// Attributes by node name, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeMap<String, NodeAttributes>>,
}

impl<'a> Report<'a> {
    /// Report on a cluster without attributes.
    pub fn new(cluster: &'a Cluster) -> Self {
        Self { cluster, attributes: None }
    }

    /// Include the attributes of every live node.
    pub fn with_attributes(mut self, values: &AttributeValues) -> Self {
        self.attributes = Some(
            self.cluster
                .live_nodes()
                .iter()
                .map(|node| (node.name().to_string(), values.node_attributes(node)))
                .collect(),
        );
        self
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Indented text tree.
impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let live: Vec<_> = self.cluster.live_nodes().iter().map(|n| n.name()).collect();
        writeln!(f, "Live nodes ({}): {}", live.len(), live.join(", "))?;

        for collection in self.cluster.collections() {
            writeln!(f, "Collection {}", collection.name())?;
            for (name, value) in collection.custom_properties() {
                writeln!(f, "  property {name} = {value}")?;
            }
            for shard in collection.shards() {
                let leader = shard.leader().map_or("none", |r| r.name());
                writeln!(f, "  Shard {} (leader: {leader})", shard.name())?;
                for replica in shard.replicas() {
                    writeln!(
                        f,
                        "    {} {:?} on {}",
                        replica.name(),
                        replica.replica_type(),
                        replica.node()
                    )?;
                }
            }
        }

        if let Some(attributes) = &self.attributes {
            writeln!(f, "Attributes")?;
            for (node, attrs) in attributes {
                writeln!(f, "  {node}")?;
                write_attr(f, "core_count", attrs.core_count)?;
                write_attr(f, "free_disk_gb", attrs.free_disk_gb)?;
                write_attr(f, "total_disk_gb", attrs.total_disk_gb)?;
                write_attr(f, "heap_usage", attrs.heap_usage)?;
                write_attr(f, "system_load_average", attrs.system_load_average)?;
                for (tag, value) in &attrs.sysprops {
                    writeln!(f, "    {tag} = {value}")?;
                }
                for (tag, value) in &attrs.metrics {
                    writeln!(f, "    {tag} = {value}")?;
                }
            }
        }

        Ok(())
    }
}

fn write_attr<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    value: Option<T>,
) -> fmt::Result {
    match value {
        Some(value) => writeln!(f, "    {name} = {value}"),
        None => Ok(()),
    }
}
