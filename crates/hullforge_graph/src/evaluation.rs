// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph evaluation and execution.

use crate::graph::Graph;
use crate::node::{Node, NodeId, NodeKind};
use crate::port::PortIndex;
use std::collections::HashMap;

/// Result of evaluating a node
#[derive(Debug, Clone)]
pub struct NodeOutput<V> {
    /// Output values by port
    pub values: HashMap<PortIndex, V>,
}

impl<V> NodeOutput<V> {
    /// Create a new empty output
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Create an output with a single value on port 0
    pub fn single(value: V) -> Self {
        let mut output = Self::new();
        output.set(0, value);
        output
    }

    /// Set an output value
    pub fn set(&mut self, port: PortIndex, value: V) {
        self.values.insert(port, value);
    }

    /// Get an output value
    pub fn get(&self, port: PortIndex) -> Option<&V> {
        self.values.get(&port)
    }
}

impl<V> Default for NodeOutput<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Values produced during one execution, keyed by `(node, port)`
#[derive(Debug, Clone)]
pub struct OutputCache<V> {
    values: HashMap<(NodeId, PortIndex), V>,
}

impl<V> OutputCache<V> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Get a cached value
    pub fn get(&self, node_id: NodeId, port: PortIndex) -> Option<&V> {
        self.values.get(&(node_id, port))
    }

    /// Store every value of a node output
    pub fn store(&mut self, node_id: NodeId, output: NodeOutput<V>) {
        for (port, value) in output.values {
            self.values.insert((node_id, port), value);
        }
    }

    /// Number of cached values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop every cached value
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl<V> Default for OutputCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for evaluating nodes.
///
/// Implemented by whatever owns the state nodes read besides their inputs
/// (element stores, an AI blackboard, ...). Evaluation must be a pure
/// function of the node, its inputs and that state.
pub trait NodeEvaluator<K: NodeKind> {
    /// Evaluate a node given one value per declared input port
    fn evaluate(&self, node: &Node<K>, inputs: &[K::Value]) -> NodeOutput<K::Value>;
}

impl<K: NodeKind> Graph<K> {
    /// Run every node in compiled order.
    ///
    /// Fails without touching the cache if the graph is not compiled. Input
    /// slots with no edge, or whose source produced nothing on that port,
    /// are passed as `K::Value::default()`. When several edges feed the same
    /// slot the last one in edge order wins.
    pub fn execute<E>(&mut self, evaluator: &E) -> Result<(), ExecuteError>
    where
        E: NodeEvaluator<K> + ?Sized,
    {
        if !self.is_compiled() {
            return Err(ExecuteError::NotCompiled);
        }

        let mut cache: OutputCache<K::Value> = OutputCache::new();

        for &node_id in self.execution_order() {
            let node = self.node(node_id).ok_or(ExecuteError::NodeNotFound(node_id))?;

            let mut inputs = vec![K::Value::default(); node.input_count()];
            for edge in self.edges_into(node_id) {
                let Some(slot) = inputs.get_mut(usize::from(edge.to_port)) else {
                    continue;
                };
                if let Some(value) = cache.get(edge.from_node, edge.from_port) {
                    *slot = value.clone();
                }
            }

            let output = evaluator.evaluate(node, &inputs);
            tracing::trace!(
                "Evaluated {} {}: {} output(s)",
                node.kind.name(),
                node_id,
                output.values.len()
            );
            cache.store(node_id, output);
        }

        tracing::debug!(
            "Executed graph '{}': {} cached value(s)",
            self.name,
            cache.len()
        );
        self.outputs = cache;
        Ok(())
    }

    /// Get a value produced by the last execution
    pub fn output(&self, node_id: NodeId, port: PortIndex) -> Option<&K::Value> {
        self.outputs.get(node_id, port)
    }

    /// Get every value produced by the last execution
    pub fn outputs(&self) -> &OutputCache<K::Value> {
        &self.outputs
    }
}

/// Error during execution
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    /// Graph has not been compiled since its last mutation
    #[error("Graph is not compiled")]
    NotCompiled,

    /// Compiled order references a node that no longer exists
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),
}
