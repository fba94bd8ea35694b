//! Plugin registry and node graph

use meshview_core::{Error, Result};
use std::collections::HashMap;
use std::fmt::Debug;
use tracing::debug;

/// A processing node created by a plugin
pub trait Node: Debug + Send + Sync {
    /// Unique name of this node within its graph
    fn name(&self) -> &str;

    /// Type the node was created from
    fn node_type(&self) -> &str;
}

/// Trait implemented by plugins that create nodes
pub trait NodeFactory: Send + Sync {
    /// Plugin name, for diagnostics
    fn plugin_name(&self) -> &'static str;

    /// Node types this factory can create
    fn node_types(&self) -> &[&'static str];

    /// Create a node of `node_type` called `name`
    fn create_node(&self, node_type: &str, name: &str) -> Result<Box<dyn Node>>;
}

/// Nodes owned by a processing graph, keyed by unique name
#[derive(Debug, Default)]
pub struct NodeGraph {
    nodes: Vec<Box<dyn Node>>,
}

impl NodeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; names must be unique within the graph
    pub fn add(&mut self, node: Box<dyn Node>) -> Result<&dyn Node> {
        if self.contains(node.name()) {
            return Err(Error::DuplicateNode(node.name().to_string()));
        }
        self.nodes.push(node);
        Ok(self.nodes[self.nodes.len() - 1].as_ref())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Node> {
        self.nodes
            .iter()
            .find(|node| node.name() == name)
            .map(|node| node.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.iter().map(|node| node.name())
    }
}

/// Registry mapping node types to the factories that create them
#[derive(Default)]
pub struct PluginRegistry {
    factories: Vec<Box<dyn NodeFactory>>,
    by_type: HashMap<String, usize>,
}

impl PluginRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin. A node type already provided by an earlier plugin
    /// is taken over by the new one.
    pub fn register(&mut self, factory: Box<dyn NodeFactory>) {
        let index = self.factories.len();
        for node_type in factory.node_types() {
            if let Some(previous) = self.by_type.insert(node_type.to_string(), index) {
                debug!(
                    node_type,
                    previous = self.factories[previous].plugin_name(),
                    plugin = factory.plugin_name(),
                    "node type overridden"
                );
            }
        }
        debug!(plugin = factory.plugin_name(), "plugin registered");
        self.factories.push(factory);
    }

    /// Check whether some plugin creates `node_type`
    pub fn supports(&self, node_type: &str) -> bool {
        self.by_type.contains_key(node_type)
    }

    /// All registered node types, sorted
    pub fn node_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.by_type.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Create a node of `node_type` named `name` and add it to `graph`
    pub fn create_node<'g>(
        &self,
        node_type: &str,
        name: &str,
        graph: &'g mut NodeGraph,
    ) -> Result<&'g dyn Node> {
        let index = self
            .by_type
            .get(node_type)
            .ok_or_else(|| Error::UnknownNodeType(node_type.to_string()))?;

        if graph.contains(name) {
            return Err(Error::DuplicateNode(name.to_string()));
        }

        let node = self.factories[*index].create_node(node_type, name)?;
        debug!(node_type, name, "node created");
        graph.add(node)
    }
}
