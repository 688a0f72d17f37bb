//! Error types for topology assembly.

use thiserror::Error;

/// Result type for topology operations.
pub type TopologyResult<T> = Result<T, TopologyError>;

/// Errors that can occur while assembling a synthetic topology.
///
/// Duplicate collection, shard or replica names are not errors: the later
/// entry silently replaces the earlier one in the resulting mapping.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// Replicas were requested but there were no candidate nodes to host them.
    #[error("no candidate nodes for {requested} replica(s) of {collection}/{shard}")]
    NodeExhaustion {
        /// Collection being initialized.
        collection: String,
        /// Shard whose first replica could not be placed.
        shard: String,
        /// Replicas requested per shard.
        requested: usize,
    },

    /// A replica builder was assembled without a hosting node.
    #[error("replica {replica} of shard {shard} has no hosting node")]
    UnhostedReplica {
        /// Owning shard.
        shard: String,
        /// Replica name.
        replica: String,
    },

    /// The leader designation does not point into the replica list.
    #[error("leader index {index} out of range for shard {shard} with {replicas} replica(s)")]
    LeaderOutOfRange {
        /// Shard name.
        shard: String,
        /// Designated leader index.
        index: usize,
        /// Number of replicas in the shard.
        replicas: usize,
    },

    /// The leader designation points at a PULL replica.
    #[error("PULL replica {replica} cannot lead shard {shard}")]
    PullLeader {
        /// Shard name.
        shard: String,
        /// Replica name.
        replica: String,
    },

    /// Invalid topology configuration.
    #[error("Invalid topology configuration: {0}")]
    InvalidConfig(String),

    /// I/O error while reading a topology file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TopologyError {
    /// Create a node exhaustion error.
    pub fn node_exhaustion(
        collection: impl Into<String>,
        shard: impl Into<String>,
        requested: usize,
    ) -> Self {
        Self::NodeExhaustion { collection: collection.into(), shard: shard.into(), requested }
    }

    /// Create an unhosted replica error.
    pub fn unhosted_replica(shard: impl Into<String>, replica: impl Into<String>) -> Self {
        Self::UnhostedReplica { shard: shard.into(), replica: replica.into() }
    }
}
