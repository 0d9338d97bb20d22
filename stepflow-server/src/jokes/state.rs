//! State of the joke workflows.

use serde::{Deserialize, Serialize};
use stepflow::GraphState;

/// Workflow status marker carried in state. Node failures are folded here as
/// `Error`; the workflow itself keeps running with fallback text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Started,
    JokeGenerated,
    ExplanationGenerated,
    RatingGenerated,
    Completed,
    Error,
}

/// State flowing through both joke graph shapes. The field set is closed:
/// optional fields a node never set read as `None` downstream, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JokeState {
    pub topic: String,
    pub joke: Option<String>,
    pub explanation: Option<String>,
    pub rating: Option<String>,
    pub alternative: Option<String>,
    /// Routing token the router's conditional edge reads; workers set it to
    /// name the next worker, or "END" to finish. Unused by the linear shape.
    pub next_node: Option<String>,
    pub status: Status,
}

impl JokeState {
    /// Initial state for a fresh run: only the topic is set, routing points at
    /// the first worker.
    pub fn started(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            joke: None,
            explanation: None,
            rating: None,
            alternative: None,
            next_node: Some(super::GENERATE_JOKE.to_string()),
            status: Status::Started,
        }
    }
}

/// Partial update returned by the joke nodes; `Some` fields overwrite,
/// omitted fields are left unchanged.
#[derive(Debug, Default)]
pub struct JokeUpdate {
    pub joke: Option<String>,
    pub explanation: Option<String>,
    pub rating: Option<String>,
    pub alternative: Option<String>,
    pub next_node: Option<String>,
    pub status: Option<Status>,
}

impl GraphState for JokeState {
    type Update = JokeUpdate;

    fn apply(&mut self, update: Self::Update) {
        if let Some(v) = update.joke {
            self.joke = Some(v);
        }
        if let Some(v) = update.explanation {
            self.explanation = Some(v);
        }
        if let Some(v) = update.rating {
            self.rating = Some(v);
        }
        if let Some(v) = update.alternative {
            self.alternative = Some(v);
        }
        if let Some(v) = update.next_node {
            self.next_node = Some(v);
        }
        if let Some(v) = update.status {
            self.status = v;
        }
    }
}
