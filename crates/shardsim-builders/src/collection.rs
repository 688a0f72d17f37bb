//! Collection builder and replica distribution.
//!
//! [`CollectionBuilder::initialize_shards_replicas`] expands shard and replica
//! counts into concrete shard builders:
//!
//! - Within a shard, replicas are created NRT first, then TLOG, then PULL.
//! - One sequence number runs across the whole collection and increments once
//!   per replica of any type. Replica `i` is named
//!   `<collection>_<shard>_replica_<suffix><i>` and hosted on candidate node
//!   `i mod K`, so replicas spread evenly whatever the counts.
//! - The first NRT or TLOG replica of a shard leads it. A PULL-only shard has
//!   no leader.
//!
//! The result is a starting point: shard builders stay mutable through
//! [`CollectionBuilder::shard_builders_mut`] so a test can move replicas around
//! before building.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shardsim_core::{Collection, ReplicaState, ReplicaType, TopologyError, TopologyResult};
use tracing::{debug, trace};

use crate::node::NodeHandle;
use crate::replica::ReplicaBuilder;
use crate::shard::ShardBuilder;

/// Replicas requested per shard, by type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplicaCounts {
    /// NRT replicas per shard.
    pub nrt: usize,
    /// TLOG replicas per shard.
    pub tlog: usize,
    /// PULL replicas per shard.
    pub pull: usize,
}

impl ReplicaCounts {
    /// Create replica counts.
    #[must_use]
    pub const fn new(nrt: usize, tlog: usize, pull: usize) -> Self {
        Self { nrt, tlog, pull }
    }

    /// Count for one replica type.
    #[must_use]
    pub const fn of(&self, replica_type: ReplicaType) -> usize {
        match replica_type {
            ReplicaType::Nrt => self.nrt,
            ReplicaType::Tlog => self.tlog,
            ReplicaType::Pull => self.pull,
        }
    }

    /// Replicas per shard, all types.
    #[must_use]
    pub const fn per_shard(&self) -> usize {
        self.nrt + self.tlog + self.pull
    }
}

/// Describes one collection: its shards and custom properties.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionBuilder {
    name: String,
    shard_builders: Vec<ShardBuilder>,
    custom_properties: BTreeMap<String, String>,
}

impl CollectionBuilder {
    /// Create a collection builder with no shards.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), shard_builders: Vec::new(), custom_properties: BTreeMap::new() }
    }

    /// Set a custom property. Setting a name twice keeps the last value.
    #[must_use]
    pub fn with_custom_property(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.custom_properties.insert(name.into(), value.into());
        self
    }

    /// Append a hand-built shard.
    #[must_use]
    pub fn add_shard(mut self, shard: ShardBuilder) -> Self {
        self.shard_builders.push(shard);
        self
    }

    /// Collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Custom properties.
    #[must_use]
    pub fn custom_properties(&self) -> &BTreeMap<String, String> {
        &self.custom_properties
    }

    /// Shard builders in order.
    #[must_use]
    pub fn shard_builders(&self) -> &[ShardBuilder] {
        &self.shard_builders
    }

    /// Shard builders, for changing the distribution after initialization.
    pub fn shard_builders_mut(&mut self) -> &mut Vec<ShardBuilder> {
        &mut self.shard_builders
    }

    /// Replace all shards with `shard_count` shards of `counts` replicas each,
    /// distributed round robin over `nodes`.
    ///
    /// Replicas are bound to the given handles, so later edits to those node
    /// builders are seen when the collection is built.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::NodeExhaustion`] if any replica is requested
    /// and `nodes` is empty.
    pub fn initialize_shards_replicas(
        mut self,
        shard_count: usize,
        counts: ReplicaCounts,
        nodes: &[NodeHandle],
    ) -> TopologyResult<Self> {
        let per_shard = counts.per_shard();
        if shard_count > 0 && per_shard > 0 && nodes.is_empty() {
            return Err(TopologyError::node_exhaustion(&self.name, "shard1", per_shard));
        }

        debug!(
            collection = %self.name,
            shard_count,
            nrt = counts.nrt,
            tlog = counts.tlog,
            pull = counts.pull,
            node_count = nodes.len(),
            "Initializing shards and replicas"
        );

        let mut sequence = 0usize;
        let mut shard_builders = Vec::with_capacity(shard_count);

        for shard_number in 1..=shard_count {
            let shard_name = format!("shard{shard_number}");
            let mut replicas = Vec::with_capacity(per_shard);
            let mut leader = None;

            for replica_type in ReplicaType::ALL {
                let prefix =
                    format!("{}_{}_replica_{}", self.name, shard_name, replica_type.suffix_char());

                for _ in 0..counts.of(replica_type) {
                    let node = &nodes[sequence % nodes.len()];
                    let replica_name = format!("{prefix}{sequence}");
                    trace!(replica = %replica_name, node = %node.name(), "Placing replica");

                    if leader.is_none() && replica_type.is_leader_eligible() {
                        leader = Some(replicas.len());
                    }

                    replicas.push(
                        ReplicaBuilder::new(replica_name.as_str(), replica_type)
                            .with_core_name(format!("{replica_name}_c"))
                            .with_state(ReplicaState::Active)
                            .with_node(node.clone()),
                    );
                    sequence += 1;
                }
            }

            let mut shard = ShardBuilder::new(shard_name).with_replicas(replicas);
            shard.set_leader(leader);
            shard_builders.push(shard);
        }

        self.shard_builders = shard_builders;
        Ok(self)
    }

    /// Build the collection, shards in order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while building a shard.
    pub fn build(&self) -> TopologyResult<Collection> {
        let shards = self
            .shard_builders
            .iter()
            .map(|shard| shard.build(&self.name))
            .collect::<TopologyResult<Vec<_>>>()?;

        Ok(Collection::new(self.name.clone(), shards, self.custom_properties.clone()))
    }
}
