//! State graph builder: nodes, fixed and conditional edges, interrupt points.
//!
//! Add nodes with `add_node`, wire them with `add_edge(from, to)` using
//! `START` and `END` for graph entry/exit, declare data-dependent routing
//! with `add_conditional_edges`, mark suspension points with
//! `interrupt_after`, then `compile` or `compile_with_checkpointer` to get a
//! `CompiledGraph`.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use crate::checkpoint::{Checkpointer, StatelessSaver};
use crate::graph::compile_error::CompilationError;
use crate::graph::compiled::CompiledGraph;
use crate::graph::node::Node;
use crate::state::GraphState;

/// Sentinel for graph entry: use as `from` in `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as `to` in `add_edge(last_node_id, END)` or as
/// a conditional path-map target.
pub const END: &str = "__end__";

/// Outgoing edge of one node: a constant successor, or a routing function
/// plus the closed path map of tokens it may return.
pub(super) enum Edge<S> {
    Fixed(String),
    Conditional {
        route: Arc<dyn Fn(&S) -> String + Send + Sync>,
        path_map: HashMap<String, String>,
    },
}

impl<S> Clone for Edge<S> {
    fn clone(&self) -> Self {
        match self {
            Edge::Fixed(to) => Edge::Fixed(to.clone()),
            Edge::Conditional { route, path_map } => Edge::Conditional {
                route: route.clone(),
                path_map: path_map.clone(),
            },
        }
    }
}

/// State graph under construction: node registry plus edge table.
///
/// Generic over the state type `S`. Every node has exactly one outgoing edge
/// (fixed or conditional); cycles through a router node are legal as long as
/// END stays reachable. Compile to obtain an executable [`CompiledGraph`].
pub struct StateGraph<S: GraphState> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    edges: Vec<(String, Edge<S>)>,
    interrupt_after: Vec<String>,
}

impl<S: GraphState> Default for StateGraph<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GraphState> StateGraph<S> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            interrupt_after: Vec::new(),
        }
    }

    /// Adds a node; id must be unique. Replaces if same id.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node<S>>) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Adds a fixed edge from `from` to `to`.
    ///
    /// Use `START` for graph entry and `END` for graph exit. Both ids (except
    /// START/END) must be registered via `add_node` before `compile()`.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.edges.push((from.into(), Edge::Fixed(to.into())));
        self
    }

    /// Adds a conditional edge: `route` reads the current state and returns a
    /// token; `path_map` maps each allowed token to a registered node id or
    /// `END`. A token outside the map fails the super-step at run time.
    ///
    /// `route` must be pure: resolution is repeatable and never mutates state.
    pub fn add_conditional_edges(
        &mut self,
        from: impl Into<String>,
        route: impl Fn(&S) -> String + Send + Sync + 'static,
        path_map: HashMap<String, String>,
    ) -> &mut Self {
        self.edges.push((
            from.into(),
            Edge::Conditional {
                route: Arc::new(route),
                path_map,
            },
        ));
        self
    }

    /// Marks nodes after which execution suspends and checkpoints before any
    /// further node runs.
    pub fn interrupt_after<I, T>(&mut self, ids: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.interrupt_after.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Builds the executable graph with no server-side persistence: the
    /// checkpointer is a [`StatelessSaver`], so suspended state must be
    /// carried by the caller and resumed via `resume_detached`.
    pub fn compile(self) -> Result<CompiledGraph<S>, CompilationError> {
        self.compile_internal(Arc::new(StatelessSaver::new()))
    }

    /// Builds the executable graph with a checkpointer for persistence,
    /// keyed by thread id.
    pub fn compile_with_checkpointer(
        self,
        checkpointer: Arc<dyn Checkpointer<S>>,
    ) -> Result<CompiledGraph<S>, CompilationError> {
        self.compile_internal(checkpointer)
    }

    fn compile_internal(
        self,
        checkpointer: Arc<dyn Checkpointer<S>>,
    ) -> Result<CompiledGraph<S>, CompilationError> {
        let is_node = |id: &str| self.nodes.contains_key(id);

        // Every edge endpoint and path-map target must exist.
        for (from, edge) in &self.edges {
            if from != START && !is_node(from) {
                return Err(CompilationError::NodeNotFound(from.clone()));
            }
            match edge {
                Edge::Fixed(to) => {
                    if to != END && !is_node(to) {
                        return Err(CompilationError::NodeNotFound(to.clone()));
                    }
                }
                Edge::Conditional { path_map, .. } => {
                    for target in path_map.values() {
                        if target != END && !is_node(target) {
                            return Err(CompilationError::NodeNotFound(target.clone()));
                        }
                    }
                }
            }
        }

        // Exactly one outgoing edge per source, exactly one from START.
        let mut edge_table: HashMap<String, Edge<S>> = HashMap::new();
        for (from, edge) in self.edges {
            if edge_table.insert(from.clone(), edge).is_some() {
                return Err(CompilationError::DuplicateEdge(from));
            }
        }
        if !edge_table.contains_key(START) {
            return Err(CompilationError::MissingStart);
        }
        for id in self.nodes.keys() {
            if !edge_table.contains_key(id) {
                return Err(CompilationError::MissingEdge(id.clone()));
            }
        }

        for id in &self.interrupt_after {
            if !is_node(id) {
                return Err(CompilationError::UnknownInterrupt(id.clone()));
            }
        }

        // END must be reachable from START across fixed targets and every
        // path-map target.
        let mut queue = VecDeque::from([START.to_string()]);
        let mut seen: HashSet<String> = HashSet::new();
        let mut end_reachable = false;
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id.clone()) {
                continue;
            }
            let targets: Vec<&String> = match edge_table.get(&id) {
                Some(Edge::Fixed(to)) => vec![to],
                Some(Edge::Conditional { path_map, .. }) => path_map.values().collect(),
                None => continue,
            };
            for target in targets {
                if target == END {
                    end_reachable = true;
                } else {
                    queue.push_back(target.clone());
                }
            }
        }
        if !end_reachable {
            return Err(CompilationError::UnreachableEnd);
        }

        Ok(CompiledGraph::new(
            self.nodes,
            edge_table,
            self.interrupt_after.into_iter().collect(),
            checkpointer,
        ))
    }
}
