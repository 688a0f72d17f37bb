//! Per-node attribute snapshot and its lookup contract.
//!
//! A placement engine asks for node attributes (core count, free disk, system
//! properties, metrics) through [`AttributeValues`]. Named attributes are
//! stored under a normalized tag computed by [`sysprop_tag`] and
//! [`metric_tag`]. Both the code that records values and the code that reads
//! them must go through these functions: a tag computed any other way is not
//! an error, it just never matches and the lookup returns `None`.
//!
//! Absence always means "unknown". A node with no recorded free disk has
//! `None`, never `Some(0)`.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::Node;

const SYSPROP_PREFIX: &str = "sysprop.";
const METRICS_PREFIX: &str = "metrics:";

/// Metric registry a node metric is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeMetricRegistry {
    /// Node-level registry.
    Node,
    /// JVM registry.
    Jvm,
}

impl NodeMetricRegistry {
    /// Registry name as it appears in metric tags.
    #[must_use]
    pub const fn registry_name(self) -> &'static str {
        match self {
            Self::Node => "solr.node",
            Self::Jvm => "solr.jvm",
        }
    }
}

impl fmt::Display for NodeMetricRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.registry_name())
    }
}

/// Tag a system property is stored under.
#[must_use]
pub fn sysprop_tag(key: &str) -> String {
    format!("{SYSPROP_PREFIX}{key}")
}

/// Tag a metric is stored under.
#[must_use]
pub fn metric_tag(key: &str, registry: NodeMetricRegistry) -> String {
    format!("{METRICS_PREFIX}{}:{key}", registry.registry_name())
}

/// Selects one attribute of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeSelector {
    /// Number of cores hosted by the node.
    CoreCount,
    /// Free disk, in GB.
    FreeDisk,
    /// Total disk, in GB.
    TotalDisk,
    /// Heap usage.
    HeapUsage,
    /// System load average.
    SystemLoadAverage,
    /// A system property, by its raw (un-tagged) name.
    Sysprop(String),
    /// A metric, by its raw name and registry.
    Metric {
        /// Registry holding the metric.
        registry: NodeMetricRegistry,
        /// Raw metric name.
        name: String,
    },
}

/// A recorded attribute value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Integer attribute (core count).
    Int(i32),
    /// Long attribute (disk sizes).
    Long(i64),
    /// Floating point attribute (heap, load, metrics).
    Double(f64),
    /// String attribute (system properties).
    Text(String),
}

/// Everything recorded for one node, flattened for reporting.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeAttributes {
    /// Core count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core_count: Option<i32>,
    /// Free disk in GB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_disk_gb: Option<i64>,
    /// Total disk in GB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_disk_gb: Option<i64>,
    /// Heap usage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heap_usage: Option<f64>,
    /// System load average.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_load_average: Option<f64>,
    /// System properties keyed by tag.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub sysprops: BTreeMap<String, String>,
    /// Metrics keyed by tag.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, f64>,
}

/// Immutable snapshot of per-node attribute values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeValues {
    core_count: HashMap<Node, i32>,
    free_disk_gb: HashMap<Node, i64>,
    total_disk_gb: HashMap<Node, i64>,
    heap_usage: HashMap<Node, f64>,
    system_load_average: HashMap<Node, f64>,
    sysprops: HashMap<String, HashMap<Node, String>>,
    metrics: HashMap<String, HashMap<Node, f64>>,
}

impl AttributeValues {
    /// Start accumulating a snapshot.
    #[must_use]
    pub fn builder() -> AttributeValuesBuilder {
        AttributeValuesBuilder::default()
    }

    /// Core count of a node.
    #[must_use]
    pub fn core_count(&self, node: &Node) -> Option<i32> {
        self.core_count.get(node).copied()
    }

    /// Free disk of a node, in GB.
    #[must_use]
    pub fn free_disk_gb(&self, node: &Node) -> Option<i64> {
        self.free_disk_gb.get(node).copied()
    }

    /// Total disk of a node, in GB.
    #[must_use]
    pub fn total_disk_gb(&self, node: &Node) -> Option<i64> {
        self.total_disk_gb.get(node).copied()
    }

    /// Heap usage of a node.
    #[must_use]
    pub fn heap_usage(&self, node: &Node) -> Option<f64> {
        self.heap_usage.get(node).copied()
    }

    /// System load average of a node.
    #[must_use]
    pub fn system_load_average(&self, node: &Node) -> Option<f64> {
        self.system_load_average.get(node).copied()
    }

    /// A system property of a node, by raw name.
    #[must_use]
    pub fn system_property(&self, node: &Node, name: &str) -> Option<&str> {
        self.sysprops.get(&sysprop_tag(name))?.get(node).map(String::as_str)
    }

    /// A metric of a node, by raw name and registry.
    #[must_use]
    pub fn metric(&self, node: &Node, name: &str, registry: NodeMetricRegistry) -> Option<f64> {
        self.metrics.get(&metric_tag(name, registry))?.get(node).copied()
    }

    /// Look up any attribute of a node.
    #[must_use]
    pub fn lookup(&self, node: &Node, selector: &AttributeSelector) -> Option<AttributeValue> {
        match selector {
            AttributeSelector::CoreCount => self.core_count(node).map(AttributeValue::Int),
            AttributeSelector::FreeDisk => self.free_disk_gb(node).map(AttributeValue::Long),
            AttributeSelector::TotalDisk => self.total_disk_gb(node).map(AttributeValue::Long),
            AttributeSelector::HeapUsage => self.heap_usage(node).map(AttributeValue::Double),
            AttributeSelector::SystemLoadAverage => {
                self.system_load_average(node).map(AttributeValue::Double)
            }
            AttributeSelector::Sysprop(name) => {
                self.system_property(node, name).map(|v| AttributeValue::Text(v.to_string()))
            }
            AttributeSelector::Metric { registry, name } => {
                self.metric(node, name, *registry).map(AttributeValue::Double)
            }
        }
    }

    /// Every node with at least one recorded attribute.
    #[must_use]
    pub fn nodes(&self) -> BTreeSet<&Node> {
        self.core_count
            .keys()
            .chain(self.free_disk_gb.keys())
            .chain(self.total_disk_gb.keys())
            .chain(self.heap_usage.keys())
            .chain(self.system_load_average.keys())
            .chain(self.sysprops.values().flat_map(HashMap::keys))
            .chain(self.metrics.values().flat_map(HashMap::keys))
            .collect()
    }

    /// Everything recorded for one node.
    #[must_use]
    pub fn node_attributes(&self, node: &Node) -> NodeAttributes {
        NodeAttributes {
            core_count: self.core_count(node),
            free_disk_gb: self.free_disk_gb(node),
            total_disk_gb: self.total_disk_gb(node),
            heap_usage: self.heap_usage(node),
            system_load_average: self.system_load_average(node),
            sysprops: self
                .sysprops
                .iter()
                .filter_map(|(tag, values)| Some((tag.clone(), values.get(node)?.clone())))
                .collect(),
            metrics: self
                .metrics
                .iter()
                .filter_map(|(tag, values)| Some((tag.clone(), *values.get(node)?)))
                .collect(),
        }
    }
}

/// Accumulates attribute values into a snapshot.
///
/// Named attributes are recorded by tag, as produced by [`sysprop_tag`] and
/// [`metric_tag`]. Recording the same attribute twice for a node keeps the
/// last value.
#[derive(Debug, Default)]
pub struct AttributeValuesBuilder {
    values: AttributeValues,
}

impl AttributeValuesBuilder {
    /// Record a core count.
    pub fn core_count(&mut self, node: Node, count: i32) -> &mut Self {
        self.values.core_count.insert(node, count);
        self
    }

    /// Record free disk, in GB.
    pub fn free_disk_gb(&mut self, node: Node, gb: i64) -> &mut Self {
        self.values.free_disk_gb.insert(node, gb);
        self
    }

    /// Record total disk, in GB.
    pub fn total_disk_gb(&mut self, node: Node, gb: i64) -> &mut Self {
        self.values.total_disk_gb.insert(node, gb);
        self
    }

    /// Record heap usage.
    pub fn heap_usage(&mut self, node: Node, usage: f64) -> &mut Self {
        self.values.heap_usage.insert(node, usage);
        self
    }

    /// Record a system load average.
    pub fn system_load_average(&mut self, node: Node, load: f64) -> &mut Self {
        self.values.system_load_average.insert(node, load);
        self
    }

    /// Record a system property under an already-normalized tag.
    pub fn sysprop(
        &mut self,
        tag: impl Into<String>,
        node: Node,
        value: impl Into<String>,
    ) -> &mut Self {
        self.values.sysprops.entry(tag.into()).or_default().insert(node, value.into());
        self
    }

    /// Record a metric under an already-normalized tag.
    pub fn metric(&mut self, tag: impl Into<String>, node: Node, value: f64) -> &mut Self {
        self.values.metrics.entry(tag.into()).or_default().insert(node, value);
        self
    }

    /// Finish the snapshot.
    #[must_use]
    pub fn build(self) -> AttributeValues {
        self.values
    }
}

/// Source of attribute values for a placement engine.
///
/// Callers declare which attributes they need and for which nodes, then read
/// the snapshot.
pub trait AttributeFetcher {
    /// Declare interest in an attribute.
    fn request(&mut self, selector: AttributeSelector);

    /// Restrict fetching to these nodes.
    fn fetch_from(&mut self, nodes: BTreeSet<Node>);

    /// Produce the attribute snapshot.
    fn fetch_attributes(&self) -> AttributeValues;
}

/// An [`AttributeFetcher`] that serves a fixed snapshot.
///
/// Requests and node restrictions are recorded so tests can inspect what a
/// placement engine asked for, but the full snapshot is always returned.
#[derive(Debug, Clone)]
pub struct SnapshotAttributeFetcher {
    values: AttributeValues,
    requested: Vec<AttributeSelector>,
    nodes: Option<BTreeSet<Node>>,
}

impl SnapshotAttributeFetcher {
    /// Serve the given snapshot.
    #[must_use]
    pub fn new(values: AttributeValues) -> Self {
        Self { values, requested: Vec::new(), nodes: None }
    }

    /// Attributes requested so far, in request order.
    #[must_use]
    pub fn requested(&self) -> &[AttributeSelector] {
        &self.requested
    }

    /// Nodes passed to the last [`AttributeFetcher::fetch_from`] call.
    #[must_use]
    pub fn nodes(&self) -> Option<&BTreeSet<Node>> {
        self.nodes.as_ref()
    }
}

impl AttributeFetcher for SnapshotAttributeFetcher {
    fn request(&mut self, selector: AttributeSelector) {
        self.requested.push(selector);
    }

    fn fetch_from(&mut self, nodes: BTreeSet<Node>) {
        self.nodes = Some(nodes);
    }

    fn fetch_attributes(&self) -> AttributeValues {
        self.values.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> AttributeValues {
        let mut builder = AttributeValues::builder();
        builder
            .core_count(Node::new("a"), 3)
            .free_disk_gb(Node::new("a"), 120)
            .sysprop(sysprop_tag("zone"), Node::new("a"), "east")
            .metric(metric_tag("heap", NodeMetricRegistry::Jvm), Node::new("b"), 0.75);
        builder.build()
    }

    #[test]
    fn test_tags() {
        assert_eq!(sysprop_tag("zone"), "sysprop.zone");
        assert_eq!(metric_tag("cores", NodeMetricRegistry::Node), "metrics:solr.node:cores");
        assert_eq!(metric_tag("heap", NodeMetricRegistry::Jvm), "metrics:solr.jvm:heap");
    }

    #[test]
    fn test_typed_getters() {
        let values = snapshot();
        let a = Node::new("a");
        let b = Node::new("b");

        assert_eq!(values.core_count(&a), Some(3));
        assert_eq!(values.free_disk_gb(&a), Some(120));
        assert_eq!(values.system_property(&a, "zone"), Some("east"));
        assert_eq!(values.metric(&b, "heap", NodeMetricRegistry::Jvm), Some(0.75));
    }

    #[test]
    fn test_absent_is_none_not_zero() {
        let values = snapshot();
        let b = Node::new("b");

        assert_eq!(values.core_count(&b), None);
        assert_eq!(values.free_disk_gb(&b), None);
        assert_eq!(values.system_property(&b, "zone"), None);
        assert_eq!(values.heap_usage(&b), None);
    }

    #[test]
    fn test_wrong_registry_is_absent() {
        let values = snapshot();
        assert_eq!(values.metric(&Node::new("b"), "heap", NodeMetricRegistry::Node), None);
    }

    #[test]
    fn test_lookup_by_selector() {
        let values = snapshot();
        let a = Node::new("a");

        assert_eq!(values.lookup(&a, &AttributeSelector::CoreCount), Some(AttributeValue::Int(3)));
        assert_eq!(
            values.lookup(&a, &AttributeSelector::FreeDisk),
            Some(AttributeValue::Long(120))
        );
        assert_eq!(
            values.lookup(&a, &AttributeSelector::Sysprop("zone".into())),
            Some(AttributeValue::Text("east".into()))
        );
        let heap =
            AttributeSelector::Metric { registry: NodeMetricRegistry::Jvm, name: "heap".into() };
        assert_eq!(values.lookup(&Node::new("b"), &heap), Some(AttributeValue::Double(0.75)));
        assert_eq!(values.lookup(&a, &AttributeSelector::TotalDisk), None);
    }

    #[test]
    fn test_nodes_and_node_attributes() {
        let values = snapshot();
        let nodes: Vec<_> = values.nodes().into_iter().map(Node::name).collect();
        assert_eq!(nodes, vec!["a", "b"]);

        let attrs = values.node_attributes(&Node::new("a"));
        assert_eq!(attrs.core_count, Some(3));
        assert_eq!(attrs.sysprops.get("sysprop.zone").map(String::as_str), Some("east"));
        assert!(attrs.metrics.is_empty());
    }

    #[test]
    fn test_last_record_wins() {
        let mut builder = AttributeValues::builder();
        builder.core_count(Node::new("a"), 1).core_count(Node::new("a"), 2);
        assert_eq!(builder.build().core_count(&Node::new("a")), Some(2));
    }

    #[test]
    fn test_snapshot_fetcher_records_requests() {
        let mut fetcher = SnapshotAttributeFetcher::new(snapshot());
        fetcher.request(AttributeSelector::CoreCount);
        fetcher.request(AttributeSelector::Sysprop("zone".into()));
        fetcher.fetch_from([Node::new("a")].into_iter().collect());

        assert_eq!(fetcher.requested().len(), 2);
        assert_eq!(fetcher.nodes().map(BTreeSet::len), Some(1));
        assert_eq!(fetcher.fetch_attributes(), snapshot());
    }
}
