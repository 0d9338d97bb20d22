//! # stepflow
//!
//! Resumable, checkpointed state-machine workflows in Rust. A small graph of
//! computation steps ("nodes") connected by fixed or data-dependent edges is
//! executed super-step by super-step: execution suspends after designated
//! interrupt points, persists a checkpoint, and later resumes exactly where
//! it left off, possibly in a different process, identified only by an
//! opaque thread id.
//!
//! ## Design Principles
//!
//! - **Single state type**: each graph uses one state struct implementing
//!   [`GraphState`]; nodes read the full state and return a partial update
//!   merged additively.
//! - **One engine, three persistence modes**: the same [`CompiledGraph`] runs
//!   against a durable store ([`SqliteSaver`]), an in-process map
//!   ([`MemorySaver`]), or no store at all ([`StatelessSaver`] with
//!   client-carried state and `resume_detached`).
//! - **Checkpoints are consistent**: a checkpoint is written once per
//!   super-step, after its last node fully completed; a crash mid-step leaves
//!   the prior checkpoint authoritative and the call retry-safe.
//!
//! ## Main Modules
//!
//! - [`graph`]: `StateGraph`, `CompiledGraph`, `Node`, `START`/`END`; build
//!   and run workflows.
//! - [`checkpoint`]: `Checkpoint`, the `Checkpointer` trait, and the three
//!   backends.
//! - [`state`]: the `GraphState` trait (state + partial-update merge).
//! - [`error`]: the `EngineError` taxonomy.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use stepflow::{
//!     CompiledGraph, EngineError, GraphState, MemorySaver, Node, StateGraph, END, START,
//! };
//!
//! #[derive(Debug, Clone, Default)]
//! struct Greeting {
//!     name: String,
//!     text: Option<String>,
//! }
//!
//! #[derive(Default)]
//! struct GreetingUpdate {
//!     text: Option<String>,
//! }
//!
//! impl GraphState for Greeting {
//!     type Update = GreetingUpdate;
//!     fn apply(&mut self, update: Self::Update) {
//!         if let Some(t) = update.text {
//!             self.text = Some(t);
//!         }
//!     }
//! }
//!
//! struct Greet;
//!
//! #[async_trait]
//! impl Node<Greeting> for Greet {
//!     async fn run(&self, state: &Greeting) -> Result<GreetingUpdate, EngineError> {
//!         Ok(GreetingUpdate {
//!             text: Some(format!("hello, {}", state.name)),
//!         })
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut graph = StateGraph::new();
//! graph.add_node("greet", Arc::new(Greet));
//! graph.add_edge(START, "greet");
//! graph.add_edge("greet", END);
//! let engine: CompiledGraph<Greeting> =
//!     graph.compile_with_checkpointer(Arc::new(MemorySaver::<Greeting>::new()))?;
//!
//! let out = engine
//!     .start(Greeting { name: "ada".into(), text: None }, "thread-1")
//!     .await?;
//! assert!(out.is_completed());
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `sqlite` (default): durable checkpointer backed by SQLite.
//! - `tracing`: structured logging via the `tracing` crate (stderr fallback
//!   otherwise).
//!
//! Concrete workflows (e.g. the joke-generation graphs) live in
//! `stepflow-server`, not in this engine crate.

pub mod checkpoint;
pub mod error;
pub mod graph;
pub mod state;

pub use checkpoint::{
    Checkpoint, CheckpointError, Checkpointer, JsonSerializer, MemorySaver, Serializer,
    StatelessSaver,
};
#[cfg(feature = "sqlite")]
pub use checkpoint::SqliteSaver;
pub use error::EngineError;
pub use graph::{
    CompilationError, CompiledGraph, Node, StateGraph, SuperStep, ThreadSnapshot, END, START,
};
pub use state::GraphState;
