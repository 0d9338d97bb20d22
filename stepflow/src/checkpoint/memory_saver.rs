//! In-process checkpointer for dev, tests, and single-process deployments.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::checkpoint::{Checkpoint, CheckpointError, Checkpointer};

/// Ephemeral checkpointer backed by a concurrent in-process map.
///
/// Checkpoints do not survive a process restart; acceptable only when the
/// calling pattern guarantees single-process lifetime. The per-key entry lock
/// makes the step-conflict check and the write one atomic action.
#[derive(Default)]
pub struct MemorySaver<S> {
    checkpoints: DashMap<String, Checkpoint<S>>,
}

impl<S> MemorySaver<S> {
    pub fn new() -> Self {
        Self {
            checkpoints: DashMap::new(),
        }
    }
}

#[async_trait]
impl<S> Checkpointer<S> for MemorySaver<S>
where
    S: Clone + Send + Sync + 'static,
{
    async fn put(
        &self,
        thread_id: &str,
        checkpoint: &Checkpoint<S>,
    ) -> Result<(), CheckpointError> {
        match self.checkpoints.entry(thread_id.to_string()) {
            Entry::Occupied(mut entry) => {
                let expected = entry.get().step + 1;
                if checkpoint.step != expected {
                    return Err(CheckpointError::Conflict {
                        expected,
                        found: checkpoint.step,
                    });
                }
                entry.insert(checkpoint.clone());
                Ok(())
            }
            Entry::Vacant(entry) => {
                entry.insert(checkpoint.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, thread_id: &str) -> Result<Option<Checkpoint<S>>, CheckpointError> {
        Ok(self.checkpoints.get(thread_id).map(|r| r.value().clone()))
    }
}
