//! Node factory interface
//!
//! Processing plugins expose their node types through [`NodeFactory`].
//! Hosts link plugins statically and register them in a [`PluginRegistry`],
//! which dispatches `create_node` calls by node type and inserts the
//! created node into a [`NodeGraph`].

pub mod registry;

pub use registry::*;

/// Interface identifier hosts use to recognise compatible plugins
pub const PLUGIN_INTERFACE_ID: &str = "meshroom.PluginInterface/1.0";
