//! Joke workflow server: one engine, three persistence modes.
//!
//! `build_app` wires a mode to its checkpoint backend and graph shape and
//! returns the axum router; the binary in `main.rs` only parses flags and
//! serves it.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use stepflow::{CompilationError, CheckpointError, JsonSerializer, MemorySaver, SqliteSaver};

pub mod api;
pub mod jokes;
pub mod llm;

pub use api::{build_router, AppState, Mode};
use jokes::{linear_workflow, router_workflow, JokeState};
use llm::TextGenerator;

/// Startup failure: the graph did not validate or the durable store could not
/// be opened.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("graph compilation failed: {0}")]
    Compile(#[from] CompilationError),
    #[error("checkpoint store setup failed: {0}")]
    Store(#[from] CheckpointError),
}

/// Builds the full application for a mode.
///
/// Durable and ephemeral modes serve the linear-interrupt shape (joke, then
/// explanation on `/continue`); stateless mode serves the router-loop shape,
/// where every `/continue` carries the full state and advances one worker.
pub fn build_app(
    mode: Mode,
    llm: Arc<dyn TextGenerator>,
    db_path: &Path,
) -> Result<axum::Router, SetupError> {
    let engine = match mode {
        Mode::Durable => {
            let saver: SqliteSaver<JokeState> =
                SqliteSaver::open(db_path, Arc::new(JsonSerializer))?;
            linear_workflow(llm).compile_with_checkpointer(Arc::new(saver))?
        }
        Mode::Ephemeral => {
            linear_workflow(llm)
                .compile_with_checkpointer(Arc::new(MemorySaver::<JokeState>::new()))?
        }
        Mode::Stateless => router_workflow(llm).compile()?,
    };
    Ok(build_router(Arc::new(AppState { mode, engine })))
}
