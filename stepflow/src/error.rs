//! Engine execution error types.
//!
//! Node-level business failures are never surfaced here: a node folds them
//! into its returned update (fallback value + error status field). These
//! variants cover the engine-fatal and caller-visible conditions only.

use thiserror::Error;

use crate::checkpoint::CheckpointError;

/// Error from one super-step (`start`, `resume`, `resume_detached`) or from
/// the session accessor.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Execution reached a node id with no registered node. Graph-construction
    /// bug; compile-time validation makes this unreachable for fixed edges.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// A routing function returned a token outside its declared path map.
    /// Graph-construction bug, not a retryable runtime condition.
    #[error("invalid route from '{node}': '{target}' is not in the path map")]
    InvalidRoute { node: String, target: String },

    /// `resume` found no checkpoint for the thread id. A normal caller-facing
    /// outcome (404-equivalent at the API boundary), distinct from a store
    /// failure.
    #[error("no checkpoint for thread: {0}")]
    ThreadNotFound(String),

    /// A detached (client-carried) resume was structurally invalid, e.g. the
    /// supplied pending node names no node in the graph. No store lookup
    /// occurred; distinct from `ThreadNotFound`.
    #[error("resume precondition failed: {0}")]
    Precondition(String),

    /// The checkpoint store failed to save or load. Retry policy belongs to
    /// the caller; the prior checkpoint remains authoritative.
    #[error("checkpoint store: {0}")]
    Checkpoint(#[from] CheckpointError),

    /// Unexpected execution failure with a message.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
}
