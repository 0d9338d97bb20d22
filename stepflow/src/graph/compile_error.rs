//! Graph compilation error.
//!
//! Returned by `StateGraph::compile` when edges reference unknown nodes, a
//! node has no (or more than one) outgoing edge, a conditional path map
//! targets an unknown node, or END is unreachable.

use thiserror::Error;

/// Error when compiling a state graph.
///
/// Validation ensures every id in edges and conditional path maps (except
/// START/END) exists in the node map, each node and START have exactly one
/// outgoing edge, every interrupt id is a registered node, and END is
/// reachable. A graph that compiles cannot hit a missing node at run time;
/// the only remaining runtime routing fault is a routing function returning a
/// token outside its path map.
#[derive(Debug, Error)]
pub enum CompilationError {
    /// A node id in an edge or path map was not registered via `add_node`
    /// (and is not START/END).
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No outgoing edge from START, or more than one.
    #[error("graph must have exactly one outgoing edge from START")]
    MissingStart,

    /// A registered node has no outgoing edge, so execution would dead-end.
    #[error("node '{0}' has no outgoing edge")]
    MissingEdge(String),

    /// Two outgoing edges were declared for the same source node.
    #[error("node '{0}' has more than one outgoing edge")]
    DuplicateEdge(String),

    /// No path of edges reaches END, so no execution can ever complete.
    #[error("END is not reachable from START")]
    UnreachableEnd,

    /// An interrupt_after id was not registered via `add_node`.
    #[error("interrupt point '{0}' is not a registered node")]
    UnknownInterrupt(String),
}
