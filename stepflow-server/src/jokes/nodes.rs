//! Node bodies of the joke workflows.
//!
//! Every generator node matches on the `TextGenerator` result: success writes
//! the generated text, failure writes a user-visible apology plus
//! `Status::Error`. Either way the routing token advances, so a failed
//! generation never wedges the workflow and never surfaces as an engine
//! fault.

use std::sync::Arc;

use async_trait::async_trait;
use stepflow::{EngineError, Node};
use tracing::warn;

use crate::jokes::{JokeState, JokeUpdate, Status};
use crate::llm::TextGenerator;

/// Dispatch node of the router-loop shape. Touches nothing; the routing
/// decision lives in its conditional edge, which reads `next_node`.
pub struct Router;

#[async_trait]
impl Node<JokeState> for Router {
    async fn run(&self, _state: &JokeState) -> Result<JokeUpdate, EngineError> {
        Ok(JokeUpdate::default())
    }
}

/// Generates a joke about the topic.
pub struct GenerateJoke {
    llm: Arc<dyn TextGenerator>,
    next_token: Option<&'static str>,
}

impl GenerateJoke {
    pub fn new(llm: Arc<dyn TextGenerator>, next_token: Option<&'static str>) -> Self {
        Self { llm, next_token }
    }
}

#[async_trait]
impl Node<JokeState> for GenerateJoke {
    async fn run(&self, state: &JokeState) -> Result<JokeUpdate, EngineError> {
        let prompt = format!("Generate a funny joke about {}", state.topic);
        let (joke, status) = match self.llm.generate(&prompt).await {
            Ok(text) => (text, Status::JokeGenerated),
            Err(e) => {
                warn!(error = %e, topic = %state.topic, "joke generation failed");
                (
                    format!(
                        "Sorry, I couldn't generate a joke about {} right now.",
                        state.topic
                    ),
                    Status::Error,
                )
            }
        };
        Ok(JokeUpdate {
            joke: Some(joke),
            next_node: self.next_token.map(str::to_string),
            status: Some(status),
            ..Default::default()
        })
    }
}

/// Explains why the joke is funny.
pub struct GenerateExplanation {
    llm: Arc<dyn TextGenerator>,
    next_token: Option<&'static str>,
    ok_status: Status,
}

impl GenerateExplanation {
    pub fn new(
        llm: Arc<dyn TextGenerator>,
        next_token: Option<&'static str>,
        ok_status: Status,
    ) -> Self {
        Self {
            llm,
            next_token,
            ok_status,
        }
    }
}

#[async_trait]
impl Node<JokeState> for GenerateExplanation {
    async fn run(&self, state: &JokeState) -> Result<JokeUpdate, EngineError> {
        // A never-set joke reads as empty, not as an error.
        let joke = state.joke.as_deref().unwrap_or_default();
        let prompt = format!("Explain why this joke is funny: {}", joke);
        let (explanation, status) = match self.llm.generate(&prompt).await {
            Ok(text) => (text, self.ok_status),
            Err(e) => {
                warn!(error = %e, "explanation generation failed");
                (
                    "Sorry, I couldn't generate an explanation for this joke.".to_string(),
                    Status::Error,
                )
            }
        };
        Ok(JokeUpdate {
            explanation: Some(explanation),
            next_node: self.next_token.map(str::to_string),
            status: Some(status),
            ..Default::default()
        })
    }
}

/// Rates the joke on a 1-10 scale with reasoning. Router-loop shape only.
pub struct GenerateRating {
    llm: Arc<dyn TextGenerator>,
}

impl GenerateRating {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Node<JokeState> for GenerateRating {
    async fn run(&self, state: &JokeState) -> Result<JokeUpdate, EngineError> {
        let joke = state.joke.as_deref().unwrap_or_default();
        let prompt = format!(
            "Rate this joke on a scale of 1-10 and provide reasoning for your rating: {}",
            joke
        );
        let (rating, status) = match self.llm.generate(&prompt).await {
            Ok(text) => (text, Status::RatingGenerated),
            Err(e) => {
                warn!(error = %e, "rating generation failed");
                (
                    "Sorry, I couldn't generate a rating for this joke.".to_string(),
                    Status::Error,
                )
            }
        };
        Ok(JokeUpdate {
            rating: Some(rating),
            next_node: Some("generate_alternative".to_string()),
            status: Some(status),
            ..Default::default()
        })
    }
}

/// Generates an alternative version of the joke and routes to END.
/// Router-loop shape only.
pub struct GenerateAlternative {
    llm: Arc<dyn TextGenerator>,
}

impl GenerateAlternative {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Node<JokeState> for GenerateAlternative {
    async fn run(&self, state: &JokeState) -> Result<JokeUpdate, EngineError> {
        let joke = state.joke.as_deref().unwrap_or_default();
        let prompt = format!(
            "Generate an alternative version of this joke about {}: {}",
            state.topic, joke
        );
        let (alternative, status) = match self.llm.generate(&prompt).await {
            Ok(text) => (text, Status::Completed),
            Err(e) => {
                warn!(error = %e, "alternative generation failed");
                (
                    "Sorry, I couldn't generate an alternative joke.".to_string(),
                    Status::Error,
                )
            }
        };
        Ok(JokeUpdate {
            alternative: Some(alternative),
            next_node: Some("END".to_string()),
            status: Some(status),
            ..Default::default()
        })
    }
}
