//! Fluent builders for synthetic cluster topologies.
//!
//! The builders describe a cluster as plain, mutable values and turn it into
//! an immutable [`shardsim_core::Cluster`] plus an attribute snapshot. They are
//! meant for tests and simulations that need a realistic layout without a
//! running cluster.
//!
//! # Architecture
//!
//! ```text
//! ClusterBuilder
//! ├── NodeHandle*             shared NodeBuilder: name + attribute overrides
//! └── CollectionBuilder*          ▲
//!     └── ShardBuilder*           │  leader index
//!         └── ReplicaBuilder* ────┘  hosted on a shared node
//! ```
//!
//! [`CollectionBuilder::initialize_shards_replicas`] fills shards round robin
//! over the candidate nodes; [`TopologyConfig`] does the same from TOML.
//!
//! # Example
//!
//! ```
//! use shardsim_builders::{new_cluster_builder, new_collection_builder, ReplicaCounts};
//!
//! let nodes = new_cluster_builder().initialize_nodes(2);
//! let books = new_collection_builder("books")
//!     .initialize_shards_replicas(2, ReplicaCounts::new(1, 0, 0), nodes.node_builders())
//!     .unwrap();
//! let cluster = nodes.add_collection(books).build().unwrap();
//!
//! let shard2 = cluster.collection("books").unwrap().shard("shard2").unwrap();
//! assert_eq!(shard2.leader().unwrap().node().name(), "node_1");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cluster;
pub mod collection;
pub mod config;
pub mod node;
pub mod replica;
pub mod shard;

pub use cluster::ClusterBuilder;
pub use collection::{CollectionBuilder, ReplicaCounts};
pub use config::{CollectionConfig, MetricOverride, NodeOverride, TopologyConfig};
pub use node::{NodeBuilder, NodeHandle};
pub use replica::ReplicaBuilder;
pub use shard::ShardBuilder;

/// Start an empty cluster builder.
#[must_use]
pub fn new_cluster_builder() -> ClusterBuilder {
    ClusterBuilder::new()
}

/// Start a collection builder with no shards.
#[must_use]
pub fn new_collection_builder(name: impl Into<String>) -> CollectionBuilder {
    CollectionBuilder::new(name)
}
