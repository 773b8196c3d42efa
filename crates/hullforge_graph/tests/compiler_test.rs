// SPDX-License-Identifier: MIT OR Apache-2.0
//! Compiler and executor tests over a small arithmetic graph family.

use hullforge_graph::{
    CompileError, Edge, ExecuteError, Graph, Node, NodeEvaluator, NodeId, NodeKind, NodeOutput,
    Port, PortType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Calc {
    Constant,
    Add,
    Sink,
    Flag,
}

const NONE: &[Port] = &[];
const ONE_FLOAT: &[Port] = &[Port::new("Value", PortType::Float)];
const TWO_FLOATS: &[Port] = &[
    Port::new("A", PortType::Float),
    Port::new("B", PortType::Float),
];
const ONE_BOOL: &[Port] = &[Port::new("Flag", PortType::Bool)];

impl NodeKind for Calc {
    type Value = f32;

    fn name(&self) -> &'static str {
        match self {
            Calc::Constant => "Constant",
            Calc::Add => "Add",
            Calc::Sink => "Sink",
            Calc::Flag => "Flag",
        }
    }

    fn inputs(&self) -> &'static [Port] {
        match self {
            Calc::Constant | Calc::Flag => NONE,
            Calc::Add => TWO_FLOATS,
            Calc::Sink => ONE_FLOAT,
        }
    }

    fn outputs(&self) -> &'static [Port] {
        match self {
            Calc::Constant | Calc::Add => ONE_FLOAT,
            Calc::Sink => NONE,
            Calc::Flag => ONE_BOOL,
        }
    }
}

struct Calculator;

impl NodeEvaluator<Calc> for Calculator {
    fn evaluate(&self, node: &Node<Calc>, inputs: &[f32]) -> NodeOutput<f32> {
        match node.kind {
            Calc::Constant => NodeOutput::single(node.parse_property("value", 0.0)),
            Calc::Add => NodeOutput::single(inputs[0] + inputs[1]),
            Calc::Flag => NodeOutput::single(1.0),
            Calc::Sink => NodeOutput::new(),
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn constant(graph: &mut Graph<Calc>, value: f32) -> NodeId {
    let id = graph.add_node(Calc::Constant);
    graph.set_node_property(id, "value", value.to_string());
    id
}

fn assert_topological(graph: &Graph<Calc>) {
    let order = graph.execution_order();
    assert_eq!(order.len(), graph.node_count());
    for edge in graph.edges() {
        let from = order.iter().position(|&n| n == edge.from_node).unwrap();
        let to = order.iter().position(|&n| n == edge.to_node).unwrap();
        assert!(from < to, "edge {edge} scheduled out of order");
    }
}

#[test]
fn test_node_ids_are_monotonic() {
    let mut graph = Graph::new("ids");
    let a = graph.add_node(Calc::Constant);
    let b = graph.add_node(Calc::Constant);
    graph.remove_node(b);
    let c = graph.add_node(Calc::Constant);

    assert_eq!(a, NodeId(1));
    assert_eq!(c, NodeId(3));
    assert_eq!(graph.node_count(), 2);
}

#[test]
fn test_acyclic_graph_compiles_in_topological_order() {
    let mut graph = Graph::new("sum");
    let add = graph.add_node(Calc::Add);
    let a = constant(&mut graph, 2.0);
    let b = constant(&mut graph, 3.0);
    let add2 = graph.add_node(Calc::Add);
    let c = constant(&mut graph, 10.0);

    graph.add_edge(Edge::new(add, 0, add2, 0));
    graph.add_edge(Edge::new(c, 0, add2, 1));
    graph.add_edge(Edge::new(a, 0, add, 0));
    graph.add_edge(Edge::new(b, 0, add, 1));

    assert!(graph.compile().is_ok());
    assert!(graph.is_compiled());
    assert_topological(&graph);

    assert!(graph.execute(&Calculator).is_ok());
    assert_eq!(graph.output(add, 0), Some(&5.0));
    assert_eq!(graph.output(add2, 0), Some(&15.0));
}

#[test]
fn test_ready_nodes_follow_insertion_order() {
    let mut graph = Graph::new("ties");
    let a = constant(&mut graph, 1.0);
    let b = constant(&mut graph, 1.0);
    let sink_b = graph.add_node(Calc::Sink);
    let sink_a = graph.add_node(Calc::Sink);

    // Sinks are released as their sources are visited, not by insertion.
    graph.add_edge(Edge::new(b, 0, sink_b, 0));
    graph.add_edge(Edge::new(a, 0, sink_a, 0));

    graph.compile().unwrap();
    assert_eq!(graph.execution_order(), &[a, b, sink_a, sink_b]);
}

#[test]
fn test_cycle_fails_compile() {
    init_tracing();
    let mut graph = Graph::new("cycle");
    let root = constant(&mut graph, 1.0);
    let x = graph.add_node(Calc::Add);
    let y = graph.add_node(Calc::Add);

    graph.add_edge(Edge::new(root, 0, x, 0));
    graph.add_edge(Edge::new(x, 0, y, 0));
    graph.add_edge(Edge::new(y, 0, x, 1));

    let err = graph.compile().unwrap_err();
    assert_eq!(err, CompileError::CycleDetected { unresolved: vec![x, y] });
    assert!(!graph.is_compiled());
    assert!(graph.execution_order().is_empty());
}

#[test]
fn test_self_loop_is_a_cycle() {
    let mut graph = Graph::new("loop");
    let x = graph.add_node(Calc::Add);
    graph.add_edge(Edge::new(x, 0, x, 0));

    assert!(matches!(graph.compile(), Err(CompileError::CycleDetected { .. })));
}

#[test]
fn test_failed_compile_discards_previous_order() {
    let mut graph = Graph::new("recompile");
    let a = constant(&mut graph, 1.0);
    let sink = graph.add_node(Calc::Sink);
    graph.add_edge(Edge::new(a, 0, sink, 0));
    graph.compile().unwrap();
    assert_eq!(graph.execution_order().len(), 2);

    graph.add_edge(Edge::new(sink, 0, a, 0));
    assert!(graph.compile().is_err());
    assert!(graph.execution_order().is_empty());
    assert_eq!(graph.execute(&Calculator), Err(ExecuteError::NotCompiled));
}

#[test]
fn test_dangling_edge_rejected() {
    let mut graph = Graph::new("dangling");
    let a = constant(&mut graph, 1.0);
    let add = graph.add_node(Calc::Add);
    let edge = Edge::new(NodeId(99), 0, add, 1);
    graph.add_edge(Edge::new(a, 0, add, 0));
    graph.add_edge(edge);

    assert_eq!(graph.compile(), Err(CompileError::DanglingEdge(edge)));
}

#[test]
fn test_port_validation() {
    let mut graph = Graph::new("ports");
    let a = constant(&mut graph, 1.0);
    let sink = graph.add_node(Calc::Sink);
    graph.add_edge(Edge::new(a, 0, sink, 3));
    assert!(matches!(
        graph.compile(),
        Err(CompileError::InvalidPort { port: 3, .. })
    ));

    graph.remove_edge(&Edge::new(a, 0, sink, 3));
    let flag = graph.add_node(Calc::Flag);
    graph.add_edge(Edge::new(flag, 0, sink, 0));
    assert!(matches!(graph.compile(), Err(CompileError::IncompatiblePorts(_))));
}

#[test]
fn test_removing_node_drops_its_edges() {
    let mut graph = Graph::new("remove");
    let a = constant(&mut graph, 4.0);
    let b = constant(&mut graph, 6.0);
    let add = graph.add_node(Calc::Add);
    graph.add_edge(Edge::new(a, 0, add, 0));
    graph.add_edge(Edge::new(b, 0, add, 1));

    graph.remove_node(b);
    assert_eq!(graph.edge_count(), 1);

    graph.compile().unwrap();
    graph.execute(&Calculator).unwrap();
    // Unconnected slot evaluates as the default value.
    assert_eq!(graph.output(add, 0), Some(&4.0));
}

#[test]
fn test_mutation_invalidates() {
    let mut graph = Graph::new("invalidate");
    let a = constant(&mut graph, 1.0);
    graph.compile().unwrap();

    graph.set_node_property(a, "value", "2");
    assert!(!graph.is_compiled());

    graph.compile().unwrap();
    graph.add_node(Calc::Sink);
    assert!(!graph.is_compiled());

    graph.compile().unwrap();
    graph.invalidate();
    assert!(!graph.is_compiled());

    assert!(!graph.set_node_property(NodeId(42), "value", "1"));
}

#[test]
fn test_last_edge_into_slot_wins() {
    let mut graph = Graph::new("duplicate");
    let a = constant(&mut graph, 1.0);
    let b = constant(&mut graph, 7.0);
    let add = graph.add_node(Calc::Add);
    graph.add_edge(Edge::new(a, 0, add, 0));
    graph.add_edge(Edge::new(b, 0, add, 0));

    graph.compile().unwrap();
    graph.execute(&Calculator).unwrap();
    assert_eq!(graph.output(add, 0), Some(&7.0));
}

#[test]
fn test_execute_clears_previous_outputs() {
    let mut graph = Graph::new("rerun");
    let a = constant(&mut graph, 1.0);
    graph.compile().unwrap();
    graph.execute(&Calculator).unwrap();
    assert_eq!(graph.outputs().len(), 1);

    graph.remove_node(a);
    let b = constant(&mut graph, 2.0);
    graph.compile().unwrap();
    graph.execute(&Calculator).unwrap();
    assert_eq!(graph.outputs().len(), 1);
    assert!(graph.output(a, 0).is_none());
    assert_eq!(graph.output(b, 0), Some(&2.0));
}
