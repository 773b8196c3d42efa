// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure and compiler.
//!
//! Compilation validates every edge against the node kinds' port
//! declarations and orders the nodes with Kahn's algorithm. Nodes that
//! become ready at the same time are scheduled in insertion order: the
//! initial queue follows node insertion order and successors are released in
//! edge insertion order. Downstream assembly (which merge consumes which
//! branch first) depends on that order, so it is part of the contract.

use crate::connection::Edge;
use crate::evaluation::OutputCache;
use crate::node::{Node, NodeId, NodeKind};
use crate::port::{PortDirection, PortIndex};
use indexmap::IndexMap;
use std::collections::VecDeque;

/// A node graph over a closed set of node kinds
#[derive(Debug, Clone)]
pub struct Graph<K: NodeKind> {
    /// Graph name
    pub name: String,
    /// Nodes in insertion order
    nodes: IndexMap<NodeId, Node<K>>,
    /// Edges in insertion order
    edges: Vec<Edge>,
    /// Next node ID to hand out
    next_id: u32,
    /// Execution order from the last successful compile
    order: Vec<NodeId>,
    /// Whether `order` is valid for the current nodes and edges
    compiled: bool,
    /// Values produced by the last execution
    pub(crate) outputs: OutputCache<K::Value>,
}

impl<K: NodeKind> Graph<K> {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            edges: Vec::new(),
            next_id: 1,
            order: Vec::new(),
            compiled: false,
            outputs: OutputCache::new(),
        }
    }

    /// Add a node of the given kind
    pub fn add_node(&mut self, kind: K) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node::new(id, kind));
        self.compiled = false;
        id
    }

    /// Insert or replace a node property.
    ///
    /// Returns `false` (and leaves the graph untouched) if the node does not
    /// exist.
    pub fn set_node_property(
        &mut self,
        node_id: NodeId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        let Some(node) = self.nodes.get_mut(&node_id) else {
            return false;
        };
        node.set_property(key, value);
        self.compiled = false;
        true
    }

    /// Remove a node and every edge touching it
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node<K>> {
        self.edges.retain(|e| !e.involves_node(node_id));
        self.compiled = false;
        self.nodes.shift_remove(&node_id)
    }

    /// Append an edge.
    ///
    /// Endpoints are not checked here; `compile` rejects edges that do not
    /// resolve.
    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
        self.compiled = false;
    }

    /// Remove every copy of an edge. Returns whether anything was removed.
    pub fn remove_edge(&mut self, edge: &Edge) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| e != edge);
        self.compiled = false;
        self.edges.len() != before
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node<K>> {
        self.nodes.get(&node_id)
    }

    /// Get all nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node<K>> {
        self.nodes.values()
    }

    /// Get all edges in insertion order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Get edges feeding a node, in insertion order
    pub fn edges_into(&self, node_id: NodeId) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.to_node == node_id)
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has been compiled since its last mutation
    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// Mark the compiled state stale.
    ///
    /// Owners call this when state the evaluator reads changes outside the
    /// graph itself.
    pub fn invalidate(&mut self) {
        self.compiled = false;
    }

    /// Execution order from the last successful compile (empty otherwise)
    pub fn execution_order(&self) -> &[NodeId] {
        &self.order
    }

    /// Validate edges and compute the execution order
    pub fn compile(&mut self) -> Result<(), CompileError> {
        self.compiled = false;
        self.order.clear();

        if let Err(err) = self.validate_edges().and_then(|()| self.schedule()) {
            tracing::warn!("Graph '{}' failed to compile: {err}", self.name);
            return Err(err);
        }

        self.compiled = true;
        tracing::debug!(
            "Compiled graph '{}': {} nodes, {} edges",
            self.name,
            self.nodes.len(),
            self.edges.len()
        );
        Ok(())
    }

    fn validate_edges(&self) -> Result<(), CompileError> {
        for edge in &self.edges {
            let (Some(source), Some(target)) =
                (self.nodes.get(&edge.from_node), self.nodes.get(&edge.to_node))
            else {
                return Err(CompileError::DanglingEdge(*edge));
            };

            let output = source
                .kind
                .port(PortDirection::Output, edge.from_port)
                .ok_or(CompileError::InvalidPort {
                    node: edge.from_node,
                    port: edge.from_port,
                    direction: PortDirection::Output,
                })?;
            let input = target
                .kind
                .port(PortDirection::Input, edge.to_port)
                .ok_or(CompileError::InvalidPort {
                    node: edge.to_node,
                    port: edge.to_port,
                    direction: PortDirection::Input,
                })?;

            if !output.can_connect(input) {
                return Err(CompileError::IncompatiblePorts(*edge));
            }
        }
        Ok(())
    }

    fn schedule(&mut self) -> Result<(), CompileError> {
        let mut in_degree: IndexMap<NodeId, usize> =
            self.nodes.keys().map(|&id| (id, 0)).collect();
        for edge in &self.edges {
            if let Some(degree) = in_degree.get_mut(&edge.to_node) {
                *degree += 1;
            }
        }

        let mut queue: VecDeque<NodeId> = in_degree
            .iter()
            .filter(|(_, &degree)| degree == 0)
            .map(|(&id, _)| id)
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(node_id) = queue.pop_front() {
            order.push(node_id);
            for edge in self.edges.iter().filter(|e| e.from_node == node_id) {
                if let Some(degree) = in_degree.get_mut(&edge.to_node) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(edge.to_node);
                    }
                }
            }
        }

        if order.len() != self.nodes.len() {
            let unresolved = in_degree
                .into_iter()
                .filter(|&(_, degree)| degree > 0)
                .map(|(id, _)| id)
                .collect();
            return Err(CompileError::CycleDetected { unresolved });
        }

        self.order = order;
        Ok(())
    }
}

impl<K: NodeKind> Default for Graph<K> {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Error when compiling a graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// Some nodes never reach zero in-degree
    #[error("Graph contains a cycle through {} node(s)", .unresolved.len())]
    CycleDetected {
        /// Nodes left with unresolved inputs
        unresolved: Vec<NodeId>,
    },

    /// Edge references a node that does not exist
    #[error("Edge {0} references a missing node")]
    DanglingEdge(Edge),

    /// Edge references a port the node kind does not declare
    #[error("Node {node} has no {direction:?} port {port}")]
    InvalidPort {
        /// Node the port was looked up on
        node: NodeId,
        /// Requested port
        port: PortIndex,
        /// Port direction
        direction: PortDirection,
    },

    /// Port types do not match
    #[error("Incompatible port types on edge {0}")]
    IncompatiblePorts(Edge),
}
