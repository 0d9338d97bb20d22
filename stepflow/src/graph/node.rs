//! Node trait: one step of a workflow, state in, partial update out.

use async_trait::async_trait;

use crate::error::EngineError;
use crate::state::GraphState;

/// One computation step in a graph.
///
/// Receives the full current state and returns a partial update; the engine
/// merges the update via [`GraphState::apply`] and resolves the edge table
/// for the successor.
///
/// Business-level failures (an upstream call failing, bad data) must be folded
/// into the returned update, typically a user-visible fallback value plus an
/// error status field, so the engine never special-cases node failure. The
/// `Err` channel is reserved for engine-fatal faults; returning `Err` aborts
/// the super-step and leaves the prior checkpoint authoritative.
#[async_trait]
pub trait Node<S: GraphState>: Send + Sync {
    /// Runs one step against the current state.
    async fn run(&self, state: &S) -> Result<S::Update, EngineError>;
}
