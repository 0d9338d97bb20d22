//! # Checkpointing
//!
//! The persisted suspension point of a workflow thread: the
//! [`Checkpoint`] record, the pluggable [`Checkpointer`] store trait, and the
//! three interchangeable backends.
//!
//! | Type              | Persistence      | Use case                                  | Feature  |
//! |-------------------|------------------|-------------------------------------------|----------|
//! | [`MemorySaver`]   | In-process map   | Dev, tests, single-process deployments    | n/a      |
//! | `SqliteSaver`     | SQLite file      | Single-node durable, survives restart     | `sqlite` |
//! | [`StatelessSaver`]| None (client)    | Client carries the full state per request | n/a      |
//!
//! Use with
//! [`StateGraph::compile_with_checkpointer`](crate::graph::StateGraph::compile_with_checkpointer).
//! `SqliteSaver` serializes state through [`JsonSerializer`] (state must be
//! `Serialize + DeserializeOwned`); `MemorySaver` holds values directly.
//!
//! Every checkpoint carries a super-step counter; the real savers reject a
//! write whose counter is not exactly one greater than the stored one, so
//! lost updates from concurrent resumes of the same thread surface as
//! [`CheckpointError::Conflict`].

mod checkpoint;
mod checkpointer;
mod memory_saver;
mod serializer;
mod stateless_saver;

#[cfg(feature = "sqlite")]
mod sqlite_saver;

pub use checkpoint::Checkpoint;
pub use checkpointer::{CheckpointError, Checkpointer};
pub use memory_saver::MemorySaver;
pub use serializer::{JsonSerializer, Serializer};
pub use stateless_saver::StatelessSaver;

#[cfg(feature = "sqlite")]
pub use sqlite_saver::SqliteSaver;
