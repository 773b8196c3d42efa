// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the graph framework.

use crate::port::{Port, PortDirection, PortIndex};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a node within one graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Get the raw ID value
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Closed set of node kinds for one graph family.
///
/// Implemented by a plain enum; each variant declares its ports statically so
/// the compiler can validate edges without instantiating anything.
pub trait NodeKind: Copy + Eq + fmt::Debug {
    /// Value carried along edges of this graph family
    type Value: Clone + Default + fmt::Debug;

    /// Display name
    fn name(&self) -> &'static str;

    /// Declared input ports
    fn inputs(&self) -> &'static [Port];

    /// Declared output ports
    fn outputs(&self) -> &'static [Port];

    /// Get a declared port by direction and index
    fn port(&self, direction: PortDirection, index: PortIndex) -> Option<&'static Port> {
        let ports = match direction {
            PortDirection::Input => self.inputs(),
            PortDirection::Output => self.outputs(),
        };
        ports.get(usize::from(index))
    }
}

/// A node instance in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node<K> {
    /// Unique instance ID
    pub id: NodeId,
    /// Node kind
    pub kind: K,
    /// String properties in insertion order
    properties: IndexMap<String, String>,
}

impl<K: NodeKind> Node<K> {
    /// Create a new node without properties
    pub fn new(id: NodeId, kind: K) -> Self {
        Self {
            id,
            kind,
            properties: IndexMap::new(),
        }
    }

    /// Insert or replace a property
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Get a raw property value
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Get a property value, or `default` when absent
    pub fn property_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.property(key).unwrap_or(default)
    }

    /// Parse a property, falling back to `default` when it is absent, empty
    /// or malformed.
    pub fn parse_property<T: FromStr>(&self, key: &str, default: T) -> T {
        match self.property(key).map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse().unwrap_or(default),
            _ => default,
        }
    }

    /// Iterate over properties in insertion order
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of input slots this node evaluates with
    pub fn input_count(&self) -> usize {
        self.kind.inputs().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortType;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Relay;

    impl NodeKind for Relay {
        type Value = f32;

        fn name(&self) -> &'static str {
            "Relay"
        }

        fn inputs(&self) -> &'static [Port] {
            const INPUTS: &[Port] = &[Port::new("In", PortType::Float)];
            INPUTS
        }

        fn outputs(&self) -> &'static [Port] {
            &[]
        }
    }

    #[test]
    fn test_property_upsert_keeps_order() {
        let mut node = Node::new(NodeId(1), Relay);
        node.set_property("segments", "8");
        node.set_property("label", "hull");
        node.set_property("segments", "12");

        let keys: Vec<_> = node.properties().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["segments", "label"]);
        assert_eq!(node.property("segments"), Some("12"));
        assert_eq!(node.property_or("missing", "fallback"), "fallback");
    }

    #[test]
    fn test_parse_property_defaults() {
        let mut node = Node::new(NodeId(1), Relay);
        assert_eq!(node.parse_property("segments", 8), 8);

        node.set_property("segments", "");
        assert_eq!(node.parse_property("segments", 8), 8);

        node.set_property("segments", "eight");
        assert_eq!(node.parse_property("segments", 8), 8);

        node.set_property("segments", " 16 ");
        assert_eq!(node.parse_property("segments", 8), 16);

        node.set_property("scale", "1.5");
        assert_eq!(node.parse_property("scale", 1.0f32), 1.5);
    }

    #[test]
    fn test_port_lookup() {
        assert_eq!(Relay.port(PortDirection::Input, 0).map(|p| p.name), Some("In"));
        assert!(Relay.port(PortDirection::Input, 1).is_none());
        assert!(Relay.port(PortDirection::Output, 0).is_none());
    }
}
