//! Checkpoint record: the persisted (state, pending node) pair per thread.

use std::time::SystemTime;

/// One checkpoint: state snapshot, the node execution will re-enter at, and a
/// monotonically increasing super-step counter.
///
/// Written once per super-step, after the last node of the step has fully
/// completed; `state` and `pending_node` therefore always describe a
/// consistent suspension point, never an in-flight node.
///
/// **Interaction**: produced by the engine's run loop; consumed by
/// `Checkpointer::put`, returned by `Checkpointer::get`.
#[derive(Debug, Clone)]
pub struct Checkpoint<S> {
    /// State after the last completed node of the step.
    pub state: S,
    /// Node id the next `resume` re-enters at, or `END` when completed.
    pub pending_node: String,
    /// Super-step counter, starting at 1 for the first `start` step. Savers
    /// reject a put whose step is not exactly one greater than the stored
    /// step, so a lost update from a concurrent resume surfaces as a
    /// `Conflict` instead of silently winning.
    pub step: u64,
    /// Milliseconds since the Unix epoch at creation time.
    pub created_at_ms: u128,
}

impl<S> Checkpoint<S> {
    /// Creates a checkpoint from the state at a suspension point. Uses current
    /// time for the timestamp.
    pub fn new(state: S, pending_node: impl Into<String>, step: u64) -> Self {
        let created_at_ms = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        Self {
            state,
            pending_node: pending_node.into(),
            step,
            created_at_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: new() records the given pending node and step, and a non-zero timestamp.
    #[test]
    fn new_records_pending_node_step_and_timestamp() {
        let ck = Checkpoint::new(7u32, "explain", 3);
        assert_eq!(ck.state, 7);
        assert_eq!(ck.pending_node, "explain");
        assert_eq!(ck.step, 3);
        assert!(ck.created_at_ms > 0);
    }
}
