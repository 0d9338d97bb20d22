//! Compiled graph: the execution engine for one validated topology.
//!
//! Built by `StateGraph::compile` or `compile_with_checkpointer`. Immutable;
//! an owned value injected into whatever serves requests, so multiple
//! independently configured engines can coexist in one process.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::checkpoint::{Checkpoint, Checkpointer};
use crate::error::EngineError;
use crate::graph::logging;
use crate::graph::node::Node;
use crate::graph::state_graph::{Edge, END, START};
use crate::state::GraphState;

/// Result of one super-step: the state at the suspension point and the node a
/// later `resume` re-enters at (`END` when the run completed).
#[derive(Debug, Clone, PartialEq)]
pub struct SuperStep<S> {
    pub state: S,
    pub pending_node: String,
}

impl<S> SuperStep<S> {
    /// True when the run reached the terminal marker; `resume` has nothing
    /// left to execute.
    pub fn is_completed(&self) -> bool {
        self.pending_node == END
    }
}

/// Read-only view of a thread's persisted checkpoint, returned by the session
/// accessor.
#[derive(Debug, Clone)]
pub struct ThreadSnapshot<S> {
    pub state: S,
    pub pending_node: String,
    pub step: u64,
}

/// Compiled graph: node registry, edge table, interrupt points, and the
/// checkpoint store behind `start` / `resume` / `get_state`.
///
/// One super-step (`start` or `resume`) runs nodes in sequence following
/// edges, halts after any interrupt point or on reaching `END`, persists the
/// resulting (state, pending node) pair, and returns it. The only store write
/// in a super-step is that final save, so a failure anywhere earlier leaves
/// the prior checkpoint authoritative and the call safe to retry.
pub struct CompiledGraph<S: GraphState> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    edges: HashMap<String, Edge<S>>,
    interrupt_after: HashSet<String>,
    checkpointer: Arc<dyn Checkpointer<S>>,
}

impl<S: GraphState> CompiledGraph<S> {
    pub(super) fn new(
        nodes: HashMap<String, Arc<dyn Node<S>>>,
        edges: HashMap<String, Edge<S>>,
        interrupt_after: HashSet<String>,
        checkpointer: Arc<dyn Checkpointer<S>>,
    ) -> Self {
        Self {
            nodes,
            edges,
            interrupt_after,
            checkpointer,
        }
    }

    /// Resolves the successor of `from` against the current state.
    ///
    /// Pure: safe to call repeatedly, never mutates state. A conditional edge
    /// whose routing function returns a token outside its path map is an
    /// engine-fatal `InvalidRoute` (graph-construction bug), never a silent
    /// fall-through.
    fn resolve_edge(&self, from: &str, state: &S) -> Result<String, EngineError> {
        match self.edges.get(from) {
            Some(Edge::Fixed(to)) => Ok(to.clone()),
            Some(Edge::Conditional { route, path_map }) => {
                let token = route(state);
                path_map
                    .get(&token)
                    .cloned()
                    .ok_or_else(|| EngineError::InvalidRoute {
                        node: from.to_string(),
                        target: token,
                    })
            }
            None => Err(EngineError::NodeNotFound(from.to_string())),
        }
    }

    /// Runs nodes from `current` until an interrupt point or END, then
    /// persists once when `persist_to` names a thread. `base_step` is the step
    /// counter of the checkpoint this step extends (0 for a fresh thread).
    async fn run_super_step(
        &self,
        mut state: S,
        mut current: String,
        persist_to: Option<&str>,
        base_step: u64,
    ) -> Result<SuperStep<S>, EngineError> {
        loop {
            let node = self
                .nodes
                .get(&current)
                .ok_or_else(|| EngineError::NodeNotFound(current.clone()))?;

            logging::log_node_start(&current);
            let update = node.run(&state).await?;
            state.apply(update);

            let next = self.resolve_edge(&current, &state).map_err(|e| {
                logging::log_engine_error(&e);
                e
            })?;
            logging::log_node_complete(&current, &next);

            let suspend = next == END || self.interrupt_after.contains(&current);
            if !suspend {
                current = next;
                continue;
            }

            if let Some(thread_id) = persist_to {
                let step = base_step + 1;
                let checkpoint = Checkpoint::new(state.clone(), next.clone(), step);
                self.checkpointer.put(thread_id, &checkpoint).await?;
                logging::log_step_saved(thread_id, &next, step);
            }
            return Ok(SuperStep {
                state,
                pending_node: next,
            });
        }
    }

    /// Starts a run: enters at the node the START edge resolves to and
    /// executes until the first interrupt point or END.
    ///
    /// When the thread id already has a checkpoint, the step counter continues
    /// from it (fresh state, preserved counter), so a restart is never
    /// rejected as a stale write.
    pub async fn start(&self, state: S, thread_id: &str) -> Result<SuperStep<S>, EngineError> {
        let base_step = self
            .checkpointer
            .get(thread_id)
            .await?
            .map(|c| c.step)
            .unwrap_or(0);

        let entry = self.resolve_edge(START, &state)?;
        if entry == END {
            // Degenerate topology: START routes straight to END.
            let step = base_step + 1;
            let checkpoint = Checkpoint::new(state.clone(), END.to_string(), step);
            self.checkpointer.put(thread_id, &checkpoint).await?;
            return Ok(SuperStep {
                state,
                pending_node: END.to_string(),
            });
        }
        self.run_super_step(state, entry, Some(thread_id), base_step)
            .await
    }

    /// Resumes a suspended run from its checkpoint: loads the (state, pending
    /// node) pair for the thread and executes until the next interrupt point
    /// or END.
    ///
    /// Fails with `ThreadNotFound` when no checkpoint exists. Resuming a
    /// completed thread (pending node already END) returns the stored state
    /// unchanged without running anything or writing to the store.
    pub async fn resume(&self, thread_id: &str) -> Result<SuperStep<S>, EngineError> {
        let checkpoint = self
            .checkpointer
            .get(thread_id)
            .await?
            .ok_or_else(|| EngineError::ThreadNotFound(thread_id.to_string()))?;

        if checkpoint.pending_node == END {
            return Ok(SuperStep {
                state: checkpoint.state,
                pending_node: END.to_string(),
            });
        }
        self.run_super_step(
            checkpoint.state,
            checkpoint.pending_node,
            Some(thread_id),
            checkpoint.step,
        )
        .await
    }

    /// Client-carried resume: accepts the full (state, pending node) pair
    /// verbatim from the caller instead of loading a checkpoint, and performs
    /// no store writes; each request is self-contained.
    ///
    /// Fails with `Precondition` when `pending_node` names no registered node
    /// (and is not END): no store lookup occurred, so this is distinct from
    /// `ThreadNotFound`. `pending_node == END` returns the supplied state
    /// unchanged, mirroring `resume` on a completed thread.
    pub async fn resume_detached(
        &self,
        state: S,
        pending_node: &str,
    ) -> Result<SuperStep<S>, EngineError> {
        if pending_node == END {
            return Ok(SuperStep {
                state,
                pending_node: END.to_string(),
            });
        }
        if !self.nodes.contains_key(pending_node) {
            return Err(EngineError::Precondition(format!(
                "pending node '{}' is not part of this graph",
                pending_node
            )));
        }
        self.run_super_step(state, pending_node.to_string(), None, 0)
            .await
    }

    /// Session accessor: the thread's current checkpoint without advancing
    /// execution. `Ok(None)` when the thread has never been checkpointed,
    /// a normal outcome, not a fault.
    pub async fn get_state(
        &self,
        thread_id: &str,
    ) -> Result<Option<ThreadSnapshot<S>>, EngineError> {
        let checkpoint = self.checkpointer.get(thread_id).await?;
        Ok(checkpoint.map(|c| ThreadSnapshot {
            state: c.state,
            pending_node: c.pending_node,
            step: c.step,
        }))
    }
}
