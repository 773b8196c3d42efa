// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node graph framework for Hullforge.
//!
//! This crate provides the dataflow core shared by every graph family:
//! - Ship hull graphs (procedural mesh assembly)
//! - Behaviour and animation graphs
//! - Flow graphs
//!
//! ## Architecture
//!
//! A graph family is a closed enum implementing [`NodeKind`], which declares
//! each kind's ports and the value type carried along edges. The framework
//! provides:
//! - Node/edge bookkeeping with monotonic node IDs
//! - Compilation: edge validation, cycle detection, topological scheduling
//! - Execution: input gathering from a `(node, port)` output cache and
//!   evaluation through a [`NodeEvaluator`]

pub mod node;
pub mod port;
pub mod connection;
pub mod graph;
pub mod evaluation;

pub use node::{Node, NodeId, NodeKind};
pub use port::{Port, PortDirection, PortIndex, PortType};
pub use connection::Edge;
pub use graph::{CompileError, Graph};
pub use evaluation::{ExecuteError, NodeEvaluator, NodeOutput, OutputCache};
