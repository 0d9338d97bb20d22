//! Client-carried "persistence": the store that stores nothing.

use async_trait::async_trait;

use crate::checkpoint::{Checkpoint, CheckpointError, Checkpointer};

/// Checkpointer for client-carried mode: `put` is a no-op and `get` always
/// misses. The caller's request payload is the session; the engine's detached
/// resume path accepts the full (state, pending node) pair directly instead of
/// a thread id.
///
/// Modeling the mode as a store implementation keeps one engine correct under
/// all three backends instead of forking the run loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatelessSaver;

impl StatelessSaver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl<S> Checkpointer<S> for StatelessSaver
where
    S: Clone + Send + Sync + 'static,
{
    async fn put(&self, _thread_id: &str, _checkpoint: &Checkpoint<S>) -> Result<(), CheckpointError> {
        Ok(())
    }

    async fn get(&self, _thread_id: &str) -> Result<Option<Checkpoint<S>>, CheckpointError> {
        Ok(None)
    }
}
