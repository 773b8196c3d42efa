// SPDX-License-Identifier: MIT OR Apache-2.0
//! Edge definitions for the graph.

use crate::node::NodeId;
use crate::port::PortIndex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A directed edge from an output port to an input port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Source node ID
    pub from_node: NodeId,
    /// Source output port
    pub from_port: PortIndex,
    /// Target node ID
    pub to_node: NodeId,
    /// Target input port
    pub to_port: PortIndex,
}

impl Edge {
    /// Create a new edge
    pub fn new(
        from_node: NodeId,
        from_port: PortIndex,
        to_node: NodeId,
        to_port: PortIndex,
    ) -> Self {
        Self {
            from_node,
            from_port,
            to_node,
            to_port,
        }
    }

    /// Check if this edge involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from_node == node_id || self.to_node == node_id
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} -> {}:{}",
            self.from_node, self.from_port, self.to_node, self.to_port
        )
    }
}
