//! Collections: named, sharded datasets.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::named::{Named, NamedMap};
use crate::replica::Replica;
use crate::shard::Shard;

/// A named dataset partitioned into shards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection {
    name: String,
    shards: NamedMap<Shard>,
    custom_properties: BTreeMap<String, String>,
}

impl Collection {
    /// Create a collection from shards in creation order.
    ///
    /// Shards sharing a name collapse to the last one.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        shards: impl IntoIterator<Item = Shard>,
        custom_properties: BTreeMap<String, String>,
    ) -> Self {
        Self { name: name.into(), shards: shards.into_iter().collect(), custom_properties }
    }

    /// Collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shards in creation order.
    #[must_use]
    pub fn shards(&self) -> &NamedMap<Shard> {
        &self.shards
    }

    /// Look up a shard by name.
    #[must_use]
    pub fn shard(&self, name: &str) -> Option<&Shard> {
        self.shards.get(name)
    }

    /// All custom properties.
    #[must_use]
    pub fn custom_properties(&self) -> &BTreeMap<String, String> {
        &self.custom_properties
    }

    /// A single custom property.
    #[must_use]
    pub fn custom_property(&self, name: &str) -> Option<&str> {
        self.custom_properties.get(name).map(String::as_str)
    }

    /// Every replica of every shard, shards in order.
    pub fn replicas(&self) -> impl Iterator<Item = &Replica> {
        self.shards.iter().flat_map(|shard| shard.replicas().iter())
    }
}

impl Named for Collection {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::replica::{ReplicaState, ReplicaType};

    fn shard(name: &str, replicas: &[&str]) -> Shard {
        let replicas = replicas
            .iter()
            .map(|r| {
                Replica::new(
                    *r,
                    format!("{r}_c"),
                    ReplicaType::Nrt,
                    ReplicaState::Active,
                    Node::new("node_0"),
                    name,
                    "coll",
                )
            })
            .collect();
        Shard::new(name, "coll", replicas, Some(0)).unwrap()
    }

    #[test]
    fn test_shard_order_and_lookup() {
        let coll = Collection::new(
            "coll",
            vec![shard("shard2", &["a"]), shard("shard1", &["b", "c"])],
            BTreeMap::new(),
        );

        assert_eq!(coll.shards().names().collect::<Vec<_>>(), vec!["shard2", "shard1"]);
        assert_eq!(coll.shard("shard1").unwrap().replicas().len(), 2);
        assert_eq!(coll.replicas().map(Replica::name).collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_custom_properties() {
        let mut props = BTreeMap::new();
        props.insert("policy".to_string(), "spread".to_string());
        let coll = Collection::new("coll", Vec::new(), props);

        assert_eq!(coll.custom_property("policy"), Some("spread"));
        assert_eq!(coll.custom_property("missing"), None);
        assert!(coll.shards().is_empty());
    }
}
