//! Immutable cluster topology model for exercising placement logic.
//!
//! This crate holds the value side of a synthetic search cluster: nodes,
//! collections, shards and replicas, plus a per-node attribute snapshot that a
//! placement engine reads. Values are produced by the builders in
//! `shardsim-builders` and never change after construction.
//!
//! # Ownership
//!
//! ```text
//! Cluster ──owns──▶ Collection ──owns──▶ Shard ──owns──▶ Replica ──refers──▶ Node
//!    ▲                   ▲                  ▲                │
//!    └────── by name ────┴──── by name ─────┴────────────────┘
//! ```
//!
//! Back-references (replica → shard → collection) are names, resolved through
//! [`Cluster::shard_of`] and [`Cluster::collection_of`].
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use shardsim_core::{Cluster, Collection, Node, Replica, ReplicaState, ReplicaType, Shard};
//!
//! let node = Node::new("node_0");
//! let replica = Replica::new(
//!     "books_shard1_replica_n0",
//!     "books_shard1_replica_n0_c",
//!     ReplicaType::Nrt,
//!     ReplicaState::Active,
//!     node.clone(),
//!     "shard1",
//!     "books",
//! );
//! let shard = Shard::new("shard1", "books", vec![replica], Some(0)).unwrap();
//! let cluster = Cluster::new(
//!     vec![node],
//!     vec![Collection::new("books", vec![shard], BTreeMap::new())],
//! );
//!
//! let leader = cluster.collection("books").unwrap().shard("shard1").unwrap().leader().unwrap();
//! assert_eq!(cluster.shard_of(leader).unwrap().name(), "shard1");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod attributes;
pub mod cluster;
pub mod collection;
pub mod error;
pub mod named;
pub mod node;
pub mod replica;
pub mod shard;

pub use attributes::{
    metric_tag, sysprop_tag, AttributeFetcher, AttributeSelector, AttributeValue,
    AttributeValues, AttributeValuesBuilder, NodeAttributes, NodeMetricRegistry,
    SnapshotAttributeFetcher,
};
pub use cluster::Cluster;
pub use collection::Collection;
pub use error::{TopologyError, TopologyResult};
pub use named::{Named, NamedMap};
pub use node::Node;
pub use replica::{Replica, ReplicaState, ReplicaType};
pub use shard::{Shard, ShardState};
