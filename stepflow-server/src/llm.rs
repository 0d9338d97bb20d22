//! Text generation behind the joke nodes.
//!
//! Node bodies are opaque to the engine; they only need something that turns
//! a prompt into text. `MockGenerator` is the in-repo implementation: fully
//! deterministic, good for tests and for running the server without any
//! upstream service.

use async_trait::async_trait;
use thiserror::Error;

/// Text generation failure. Nodes fold this into state as a fallback value
/// plus an error status; it never reaches the engine.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("generation failed: {0}")]
    Failed(String),
}

/// Turns a prompt into generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

/// Deterministic generator: echoes the prompt behind a fixed prefix.
#[derive(Debug, Clone, Default)]
pub struct MockGenerator;

impl MockGenerator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        Ok(format!("[generated] {}", prompt))
    }
}
