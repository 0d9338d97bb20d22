//! Checkpointer trait and store error type.

use async_trait::async_trait;
use thiserror::Error;

use crate::checkpoint::Checkpoint;

/// Checkpoint store failure.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Backend unreachable or I/O failure (e.g. SQLite error).
    #[error("storage failure: {0}")]
    Storage(String),

    /// State could not be serialized or deserialized.
    #[error("serialization failure: {0}")]
    Serialization(String),

    /// A put carried a step counter that is not exactly one greater than the
    /// stored step. Indicates a concurrent writer on the same thread id.
    #[error("step conflict: expected step {expected}, got {found}")]
    Conflict { expected: u64, found: u64 },
}

/// Pluggable key-value checkpoint store, keyed by thread id.
///
/// `put` must be atomic with respect to concurrent `get` on the same id: a
/// reader observes either the prior record or the new one, never a
/// half-written record. `get` miss is `Ok(None)`, a normal outcome, never an
/// error.
///
/// Implementations: [`MemorySaver`](crate::checkpoint::MemorySaver)
/// (ephemeral, in-process), `SqliteSaver` (durable, feature `sqlite`), and
/// [`StatelessSaver`](crate::checkpoint::StatelessSaver) (client-carried: put
/// is a no-op, get always misses).
#[async_trait]
pub trait Checkpointer<S>: Send + Sync
where
    S: Clone + Send + Sync + 'static,
{
    /// Saves the checkpoint for a thread, replacing any prior record. When a
    /// record exists, rejects with [`CheckpointError::Conflict`] unless
    /// `checkpoint.step == stored.step + 1`.
    async fn put(&self, thread_id: &str, checkpoint: &Checkpoint<S>)
        -> Result<(), CheckpointError>;

    /// Loads the latest checkpoint for a thread, or `Ok(None)` when the
    /// thread has never been checkpointed.
    async fn get(&self, thread_id: &str) -> Result<Option<Checkpoint<S>>, CheckpointError>;
}
