//! Durable checkpointer backed by SQLite (feature `sqlite`).

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::checkpoint::{Checkpoint, CheckpointError, Checkpointer, Serializer};

/// Durable checkpointer: one row per thread id in a SQLite file, state
/// serialized through a [`Serializer`] (typically
/// [`JsonSerializer`](crate::checkpoint::JsonSerializer)).
///
/// Survives process restarts. `open` is idempotent against an existing file:
/// table setup uses `CREATE TABLE IF NOT EXISTS`. The step-conflict check and
/// the row write happen inside one immediate transaction, so concurrent
/// readers never see a half-written record and a stale writer gets a
/// [`CheckpointError::Conflict`].
pub struct SqliteSaver<S>
where
    S: Clone + Send + Sync + 'static,
{
    conn: Mutex<Connection>,
    serializer: Arc<dyn Serializer<S>>,
}

impl<S> SqliteSaver<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Opens (or creates) the database file and runs idempotent table setup.
    pub fn open(
        path: impl AsRef<Path>,
        serializer: Arc<dyn Serializer<S>>,
    ) -> Result<Self, CheckpointError> {
        let conn =
            Connection::open(path).map_err(|e| CheckpointError::Storage(e.to_string()))?;
        let saver = Self {
            conn: Mutex::new(conn),
            serializer,
        };
        saver.setup()?;
        Ok(saver)
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, CheckpointError> {
        self.conn
            .lock()
            .map_err(|_| CheckpointError::Storage("connection mutex poisoned".into()))
    }

    /// Creates the checkpoints table if it does not exist. Safe to call on an
    /// already-initialized database.
    fn setup(&self) -> Result<(), CheckpointError> {
        let conn = self.lock_conn()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS checkpoints (
                thread_id     TEXT PRIMARY KEY,
                state         BLOB NOT NULL,
                pending_node  TEXT NOT NULL,
                step          INTEGER NOT NULL,
                created_at_ms INTEGER NOT NULL
            );",
        )
        .map_err(|e| CheckpointError::Storage(e.to_string()))
    }
}

#[async_trait]
impl<S> Checkpointer<S> for SqliteSaver<S>
where
    S: Clone + Send + Sync + 'static,
{
    async fn put(
        &self,
        thread_id: &str,
        checkpoint: &Checkpoint<S>,
    ) -> Result<(), CheckpointError> {
        let bytes = self.serializer.serialize(&checkpoint.state)?;
        let mut conn = self.lock_conn()?;
        let tx = conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)
            .map_err(|e| CheckpointError::Storage(e.to_string()))?;

        let stored_step: Option<u64> = tx
            .query_row(
                "SELECT step FROM checkpoints WHERE thread_id = ?1",
                params![thread_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| CheckpointError::Storage(e.to_string()))?;

        if let Some(stored) = stored_step {
            let expected = stored + 1;
            if checkpoint.step != expected {
                return Err(CheckpointError::Conflict {
                    expected,
                    found: checkpoint.step,
                });
            }
        }

        tx.execute(
            "INSERT OR REPLACE INTO checkpoints
                 (thread_id, state, pending_node, step, created_at_ms)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                thread_id,
                bytes,
                checkpoint.pending_node,
                checkpoint.step,
                checkpoint.created_at_ms as i64
            ],
        )
        .map_err(|e| CheckpointError::Storage(e.to_string()))?;
        tx.commit()
            .map_err(|e| CheckpointError::Storage(e.to_string()))
    }

    async fn get(&self, thread_id: &str) -> Result<Option<Checkpoint<S>>, CheckpointError> {
        let conn = self.lock_conn()?;
        let row: Option<(Vec<u8>, String, u64, i64)> = conn
            .query_row(
                "SELECT state, pending_node, step, created_at_ms
                 FROM checkpoints WHERE thread_id = ?1",
                params![thread_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()
            .map_err(|e| CheckpointError::Storage(e.to_string()))?;

        match row {
            None => Ok(None),
            Some((bytes, pending_node, step, created_at_ms)) => {
                let state = self.serializer.deserialize(&bytes)?;
                Ok(Some(Checkpoint {
                    state,
                    pending_node,
                    step,
                    created_at_ms: created_at_ms as u128,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::JsonSerializer;

    #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    struct TestState {
        topic: String,
        joke: Option<String>,
    }

    fn open_saver(path: &std::path::Path) -> SqliteSaver<TestState> {
        SqliteSaver::open(path, Arc::new(JsonSerializer)).expect("open sqlite saver")
    }

    /// **Scenario**: A checkpoint written through one saver instance is read
    /// back by a second instance opened on the same file (restart survival).
    #[tokio::test]
    async fn checkpoint_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoints.db");

        let saver = open_saver(&path);
        let state = TestState {
            topic: "cats".into(),
            joke: Some("a cat joke".into()),
        };
        saver
            .put("t1", &Checkpoint::new(state.clone(), "explain", 1))
            .await
            .unwrap();
        drop(saver);

        let reopened = open_saver(&path);
        let loaded = reopened.get("t1").await.unwrap().unwrap();
        assert_eq!(loaded.state, state);
        assert_eq!(loaded.pending_node, "explain");
        assert_eq!(loaded.step, 1);
    }

    /// **Scenario**: open() against an already-initialized file succeeds (idempotent setup).
    #[tokio::test]
    async fn open_is_idempotent_on_existing_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoints.db");
        let _first = open_saver(&path);
        let _second = open_saver(&path);
    }

    /// **Scenario**: a put whose step is not stored+1 fails with Conflict and
    /// the stored row keeps its prior contents.
    #[tokio::test]
    async fn stale_step_rejected_and_row_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let saver = open_saver(&dir.path().join("checkpoints.db"));
        let first = TestState {
            topic: "cats".into(),
            joke: None,
        };
        saver
            .put("t1", &Checkpoint::new(first.clone(), "explain", 1))
            .await
            .unwrap();

        let stale = saver
            .put(
                "t1",
                &Checkpoint::new(
                    TestState {
                        topic: "dogs".into(),
                        joke: None,
                    },
                    "explain",
                    3,
                ),
            )
            .await;
        assert!(matches!(
            stale,
            Err(CheckpointError::Conflict {
                expected: 2,
                found: 3
            })
        ));
        let stored = saver.get("t1").await.unwrap().unwrap();
        assert_eq!(stored.state, first);
        assert_eq!(stored.step, 1);
    }
}
