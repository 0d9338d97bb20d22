//! Logging helpers for engine execution.
//!
//! Structured events via `tracing` when the `tracing` feature is enabled,
//! stderr fallback otherwise.

/// Log node execution start.
pub fn log_node_start(node_id: &str) {
    #[cfg(feature = "tracing")]
    tracing::debug!(node_id = node_id, "running node");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[DEBUG] running node: {}", node_id);
}

/// Log node execution completion with the resolved successor.
pub fn log_node_complete(node_id: &str, next: &str) {
    #[cfg(feature = "tracing")]
    tracing::debug!(node_id = node_id, next = next, "node complete");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[DEBUG] node complete: {} -> {}", node_id, next);
}

/// Log a persisted super-step checkpoint.
pub fn log_step_saved(thread_id: &str, pending_node: &str, step: u64) {
    #[cfg(feature = "tracing")]
    tracing::info!(
        thread_id = thread_id,
        pending_node = pending_node,
        step = step,
        "checkpoint saved"
    );

    #[cfg(not(feature = "tracing"))]
    eprintln!(
        "[INFO] checkpoint saved: thread={} pending={} step={}",
        thread_id, pending_node, step
    );
}

/// Log an engine-fatal error before it propagates to the caller.
pub fn log_engine_error(error: &crate::error::EngineError) {
    #[cfg(feature = "tracing")]
    tracing::error!(?error, "engine error");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[ERROR] engine error: {:?}", error);
}
