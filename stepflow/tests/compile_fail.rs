//! Compile-time validation of graph construction: unknown nodes, missing or
//! duplicate edges, unreachable END, unknown interrupt points.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use stepflow::{CompilationError, EngineError, GraphState, Node, StateGraph, END, START};

#[derive(Debug, Clone, Default)]
struct Unit;

impl GraphState for Unit {
    type Update = ();

    fn apply(&mut self, _update: Self::Update) {}
}

struct Noop;

#[async_trait]
impl Node<Unit> for Noop {
    async fn run(&self, _state: &Unit) -> Result<(), EngineError> {
        Ok(())
    }
}

/// **Scenario**: an edge to an unregistered node fails compile with NodeNotFound.
#[test]
fn edge_to_unknown_node_fails_compile() {
    let mut graph = StateGraph::<Unit>::new();
    graph.add_node("a", Arc::new(Noop));
    graph.add_edge(START, "a");
    graph.add_edge("a", "ghost");
    match graph.compile() {
        Err(CompilationError::NodeNotFound(id)) => assert_eq!(id, "ghost"),
        other => panic!("expected NodeNotFound, got {:?}", other.err()),
    }
}

/// **Scenario**: a conditional path map targeting an unregistered node fails
/// compile; the allow-list is checked at construction time, not first use.
#[test]
fn path_map_to_unknown_node_fails_compile() {
    let mut graph = StateGraph::<Unit>::new();
    graph.add_node("router", Arc::new(Noop));
    graph.add_edge(START, "router");
    graph.add_conditional_edges(
        "router",
        |_: &Unit| "x".to_string(),
        HashMap::from([
            ("x".to_string(), "ghost".to_string()),
            ("END".to_string(), END.to_string()),
        ]),
    );
    match graph.compile() {
        Err(CompilationError::NodeNotFound(id)) => assert_eq!(id, "ghost"),
        other => panic!("expected NodeNotFound, got {:?}", other.err()),
    }
}

/// **Scenario**: no edge from START fails compile with MissingStart.
#[test]
fn missing_start_edge_fails_compile() {
    let mut graph = StateGraph::<Unit>::new();
    graph.add_node("a", Arc::new(Noop));
    graph.add_edge("a", END);
    assert!(matches!(
        graph.compile(),
        Err(CompilationError::MissingStart)
    ));
}

/// **Scenario**: a node with no outgoing edge fails compile with MissingEdge.
#[test]
fn node_without_outgoing_edge_fails_compile() {
    let mut graph = StateGraph::<Unit>::new();
    graph.add_node("a", Arc::new(Noop));
    graph.add_node("b", Arc::new(Noop));
    graph.add_edge(START, "a");
    graph.add_edge("a", END);
    match graph.compile() {
        Err(CompilationError::MissingEdge(id)) => assert_eq!(id, "b"),
        other => panic!("expected MissingEdge, got {:?}", other.err()),
    }
}

/// **Scenario**: two outgoing edges from the same node fail compile with
/// DuplicateEdge.
#[test]
fn duplicate_outgoing_edge_fails_compile() {
    let mut graph = StateGraph::<Unit>::new();
    graph.add_node("a", Arc::new(Noop));
    graph.add_node("b", Arc::new(Noop));
    graph.add_edge(START, "a");
    graph.add_edge("a", "b");
    graph.add_edge("a", END);
    graph.add_edge("b", END);
    match graph.compile() {
        Err(CompilationError::DuplicateEdge(id)) => assert_eq!(id, "a"),
        other => panic!("expected DuplicateEdge, got {:?}", other.err()),
    }
}

/// **Scenario**: a pure cycle with no path to END fails compile with
/// UnreachableEnd; router cycles are legal only when END stays reachable.
#[test]
fn cycle_without_end_fails_compile() {
    let mut graph = StateGraph::<Unit>::new();
    graph.add_node("a", Arc::new(Noop));
    graph.add_node("b", Arc::new(Noop));
    graph.add_edge(START, "a");
    graph.add_edge("a", "b");
    graph.add_edge("b", "a");
    assert!(matches!(
        graph.compile(),
        Err(CompilationError::UnreachableEnd)
    ));
}

/// **Scenario**: a router-loop (worker cycles back to router, END in the path
/// map) compiles fine.
#[test]
fn router_loop_with_reachable_end_compiles() {
    let mut graph = StateGraph::<Unit>::new();
    graph.add_node("router", Arc::new(Noop));
    graph.add_node("a", Arc::new(Noop));
    graph.add_edge(START, "router");
    graph.add_conditional_edges(
        "router",
        |_: &Unit| "a".to_string(),
        HashMap::from([
            ("a".to_string(), "a".to_string()),
            ("END".to_string(), END.to_string()),
        ]),
    );
    graph.add_edge("a", "router");
    graph.interrupt_after(["a"]);
    assert!(graph.compile().is_ok());
}

/// **Scenario**: interrupt_after naming an unregistered node fails compile.
#[test]
fn unknown_interrupt_point_fails_compile() {
    let mut graph = StateGraph::<Unit>::new();
    graph.add_node("a", Arc::new(Noop));
    graph.add_edge(START, "a");
    graph.add_edge("a", END);
    graph.interrupt_after(["ghost"]);
    match graph.compile() {
        Err(CompilationError::UnknownInterrupt(id)) => assert_eq!(id, "ghost"),
        other => panic!("expected UnknownInterrupt, got {:?}", other.err()),
    }
}
