//! Shards: ordered replica sets with an optional leader.

use serde::{Deserialize, Serialize};

use crate::error::{TopologyError, TopologyResult};
use crate::named::{Named, NamedMap};
use crate::replica::{Replica, ReplicaType};

/// Lifecycle state of a shard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShardState {
    /// Serving requests.
    #[default]
    Active,
    /// Retired, e.g. after a split.
    Inactive,
    /// Being created by a split.
    Construction,
    /// Being recovered.
    Recovery,
    /// Recovery gave up.
    RecoveryFailed,
}

/// A partition of a collection, replicated across nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shard {
    name: String,
    collection_name: String,
    state: ShardState,
    replicas: NamedMap<Replica>,
    leader: Option<String>,
}

impl Shard {
    /// Create an active shard from replicas in creation order.
    ///
    /// `leader` is a position in `replicas`. Replicas sharing a name collapse
    /// to the last one, kept at the first one's position.
    ///
    /// # Errors
    ///
    /// Returns an error if the leader position is out of range or resolves to
    /// a PULL replica.
    pub fn new(
        name: impl Into<String>,
        collection_name: impl Into<String>,
        replicas: Vec<Replica>,
        leader: Option<usize>,
    ) -> TopologyResult<Self> {
        let name = name.into();
        let count = replicas.len();

        let leader_name = match leader {
            Some(index) => match replicas.get(index) {
                Some(replica) => Some(replica.name().to_string()),
                None => {
                    return Err(TopologyError::LeaderOutOfRange {
                        shard: name,
                        index,
                        replicas: count,
                    })
                }
            },
            None => None,
        };

        let replicas: NamedMap<Replica> = replicas.into_iter().collect();

        if let Some(leader) = leader_name.as_deref().and_then(|n| replicas.get(n)) {
            if !leader.replica_type().is_leader_eligible() {
                return Err(TopologyError::PullLeader {
                    shard: name,
                    replica: leader.name().to_string(),
                });
            }
        }

        Ok(Self {
            name,
            collection_name: collection_name.into(),
            state: ShardState::Active,
            replicas,
            leader: leader_name,
        })
    }

    /// Shard name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the owning collection.
    #[must_use]
    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// Shard state. Always [`ShardState::Active`] for built shards.
    #[must_use]
    pub fn state(&self) -> ShardState {
        self.state
    }

    /// Replicas in creation order.
    #[must_use]
    pub fn replicas(&self) -> &NamedMap<Replica> {
        &self.replicas
    }

    /// Look up a replica by name.
    #[must_use]
    pub fn replica(&self, name: &str) -> Option<&Replica> {
        self.replicas.get(name)
    }

    /// The shard leader, absent for PULL-only shards.
    #[must_use]
    pub fn leader(&self) -> Option<&Replica> {
        self.leader.as_deref().and_then(|name| self.replicas.get(name))
    }

    /// Replicas of the given type, in creation order.
    pub fn replicas_of_type(&self, replica_type: ReplicaType) -> impl Iterator<Item = &Replica> {
        self.replicas.iter().filter(move |r| r.replica_type() == replica_type)
    }
}

impl Named for Shard {
    fn name(&self) -> &str {
        &self.name
    }
}
