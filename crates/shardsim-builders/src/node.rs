//! Node builder.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeMap;
use std::rc::Rc;

use shardsim_core::{metric_tag, sysprop_tag, Node, NodeMetricRegistry};

/// Describes one node and its optional attribute overrides.
///
/// Every attribute defaults to absent. System properties and metrics are
/// stored under the same tags the attribute snapshot is queried with, so a
/// value set here is found by [`shardsim_core::AttributeValues::system_property`]
/// and [`shardsim_core::AttributeValues::metric`].
#[derive(Debug, Clone, PartialEq)]
pub struct NodeBuilder {
    name: String,
    core_count: Option<i32>,
    free_disk_gb: Option<i64>,
    total_disk_gb: Option<i64>,
    heap_usage: Option<f64>,
    system_load_average: Option<f64>,
    sysprops: BTreeMap<String, String>,
    metrics: BTreeMap<String, f64>,
}

impl NodeBuilder {
    /// Create a builder for a node with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            core_count: None,
            free_disk_gb: None,
            total_disk_gb: None,
            heap_usage: None,
            system_load_average: None,
            sysprops: BTreeMap::new(),
            metrics: BTreeMap::new(),
        }
    }

    /// Set the node name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the number of cores on the node.
    #[must_use]
    pub fn with_core_count(mut self, count: i32) -> Self {
        self.core_count = Some(count);
        self
    }

    /// Set free disk, in GB.
    #[must_use]
    pub fn with_free_disk_gb(mut self, gb: i64) -> Self {
        self.free_disk_gb = Some(gb);
        self
    }

    /// Set total disk, in GB.
    #[must_use]
    pub fn with_total_disk_gb(mut self, gb: i64) -> Self {
        self.total_disk_gb = Some(gb);
        self
    }

    /// Set heap usage.
    #[must_use]
    pub fn with_heap_usage(mut self, usage: f64) -> Self {
        self.heap_usage = Some(usage);
        self
    }

    /// Set the system load average.
    #[must_use]
    pub fn with_system_load_average(mut self, load: f64) -> Self {
        self.system_load_average = Some(load);
        self
    }

    /// Set a system property.
    #[must_use]
    pub fn with_sysprop(mut self, key: &str, value: impl Into<String>) -> Self {
        self.sysprops.insert(sysprop_tag(key), value.into());
        self
    }

    /// Set a metric in the given registry.
    #[must_use]
    pub fn with_metric(mut self, registry: NodeMetricRegistry, key: &str, value: f64) -> Self {
        self.metrics.insert(metric_tag(key, registry), value);
        self
    }

    /// Rename in place, for callers holding the builder by reference.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The node name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configured core count.
    #[must_use]
    pub fn core_count(&self) -> Option<i32> {
        self.core_count
    }

    /// Configured free disk, in GB.
    #[must_use]
    pub fn free_disk_gb(&self) -> Option<i64> {
        self.free_disk_gb
    }

    /// Configured total disk, in GB.
    #[must_use]
    pub fn total_disk_gb(&self) -> Option<i64> {
        self.total_disk_gb
    }

    /// Configured heap usage.
    #[must_use]
    pub fn heap_usage(&self) -> Option<f64> {
        self.heap_usage
    }

    /// Configured system load average.
    #[must_use]
    pub fn system_load_average(&self) -> Option<f64> {
        self.system_load_average
    }

    /// System properties keyed by tag.
    #[must_use]
    pub fn sysprops(&self) -> &BTreeMap<String, String> {
        &self.sysprops
    }

    /// Metrics keyed by tag.
    #[must_use]
    pub fn metrics(&self) -> &BTreeMap<String, f64> {
        &self.metrics
    }

    /// Build the node. Repeatable; equal names give interchangeable nodes.
    #[must_use]
    pub fn build(&self) -> Node {
        Node::new(self.name.clone())
    }
}

/// Shared handle to a [`NodeBuilder`].
///
/// The cluster builder and every replica placed on a node hold handles to the
/// same builder, so a rename or attribute change made through any handle is
/// seen when the topology is built. Cloning a handle shares the builder.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeHandle(Rc<RefCell<NodeBuilder>>);

impl NodeHandle {
    /// Wrap a builder in a new, unshared handle.
    #[must_use]
    pub fn new(builder: NodeBuilder) -> Self {
        Self(Rc::new(RefCell::new(builder)))
    }

    /// Borrow the builder.
    pub fn get(&self) -> Ref<'_, NodeBuilder> {
        self.0.borrow()
    }

    /// Borrow the builder mutably.
    pub fn get_mut(&self) -> RefMut<'_, NodeBuilder> {
        self.0.borrow_mut()
    }

    /// Replace the builder with the result of chaining setters on it.
    pub fn update(&self, f: impl FnOnce(NodeBuilder) -> NodeBuilder) {
        let mut slot = self.0.borrow_mut();
        let current = std::mem::replace(&mut *slot, NodeBuilder::new(String::new()));
        *slot = f(current);
    }

    /// Rename the shared builder.
    pub fn set_name(&self, name: impl Into<String>) {
        self.0.borrow_mut().set_name(name);
    }

    /// Current node name.
    #[must_use]
    pub fn name(&self) -> String {
        self.0.borrow().name().to_string()
    }

    /// Build the node from the builder's current state.
    #[must_use]
    pub fn build(&self) -> Node {
        self.0.borrow().build()
    }

    /// Returns true if both handles share one builder.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl From<NodeBuilder> for NodeHandle {
    fn from(builder: NodeBuilder) -> Self {
        Self::new(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_absent() {
        let builder = NodeBuilder::new("node_0");
        assert_eq!(builder.core_count(), None);
        assert_eq!(builder.free_disk_gb(), None);
        assert!(builder.sysprops().is_empty());
        assert!(builder.metrics().is_empty());
    }

    #[test]
    fn test_sysprop_and_metric_are_tagged() {
        let builder = NodeBuilder::new("node_0")
            .with_sysprop("zone", "east")
            .with_metric(NodeMetricRegistry::Jvm, "heap", 0.5);

        assert_eq!(builder.sysprops().get("sysprop.zone").map(String::as_str), Some("east"));
        assert_eq!(builder.metrics().get("metrics:solr.jvm:heap"), Some(&0.5));
    }

    #[test]
    fn test_repeated_key_last_write_wins() {
        let builder =
            NodeBuilder::new("n").with_sysprop("zone", "east").with_sysprop("zone", "west");
        assert_eq!(builder.sysprops().len(), 1);
        assert_eq!(builder.sysprops().get("sysprop.zone").map(String::as_str), Some("west"));
    }

    #[test]
    fn test_build_is_repeatable() {
        let builder = NodeBuilder::new("node_3").with_core_count(2);
        assert_eq!(builder.build(), builder.build());
        assert_eq!(builder.build().name(), "node_3");
    }

    #[test]
    fn test_rename() {
        let mut builder = NodeBuilder::new("node_0").with_name("fast");
        assert_eq!(builder.name(), "fast");
        builder.set_name("slow");
        assert_eq!(builder.build().name(), "slow");
    }

    #[test]
    fn test_handle_shares_builder() {
        let handle = NodeHandle::from(NodeBuilder::new("node_0"));
        let bound = handle.clone();

        handle.set_name("renamed");
        handle.update(|node| node.with_core_count(8));

        assert!(bound.ptr_eq(&handle));
        assert_eq!(bound.build().name(), "renamed");
        assert_eq!(bound.get().core_count(), Some(8));
    }

    #[test]
    fn test_separate_handles_are_independent() {
        let first = NodeHandle::new(NodeBuilder::new("a"));
        let second = NodeHandle::new(NodeBuilder::new("a"));
        assert_eq!(first, second);
        assert!(!first.ptr_eq(&second));

        first.get_mut().set_name("b");
        assert_eq!(second.name(), "a");
    }
}
