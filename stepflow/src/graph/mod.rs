//! State graph: node registry, edge table, compile, and the execution engine.
//!
//! Build with `StateGraph` (nodes, fixed/conditional edges, interrupt
//! points), compile to a `CompiledGraph`, then drive it with `start` /
//! `resume` / `resume_detached` / `get_state`.

mod compile_error;
mod compiled;
pub mod logging;
mod node;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::{CompiledGraph, SuperStep, ThreadSnapshot};
pub use node::Node;
pub use state_graph::{StateGraph, END, START};
