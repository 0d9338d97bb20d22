//! The two joke graph shapes.

use std::collections::HashMap;
use std::sync::Arc;

use stepflow::{StateGraph, END, START};

use crate::jokes::nodes::{
    GenerateAlternative, GenerateExplanation, GenerateJoke, GenerateRating, Router,
};
use crate::jokes::{JokeState, Status};
use crate::llm::TextGenerator;

pub const ROUTER: &str = "router";
pub const GENERATE_JOKE: &str = "generate_joke";
const GENERATE_EXPLANATION: &str = "generate_explanation";
const GENERATE_RATING: &str = "generate_rating";
const GENERATE_ALTERNATIVE: &str = "generate_alternative";

/// Linear-interrupt shape: `generate_joke -> generate_explanation -> END`
/// with an interrupt point after the joke. One `start` super-step produces
/// the joke and suspends; one `resume` produces the explanation and
/// completes.
pub fn linear_workflow(llm: Arc<dyn TextGenerator>) -> StateGraph<JokeState> {
    let mut graph = StateGraph::new();
    graph.add_node(GENERATE_JOKE, Arc::new(GenerateJoke::new(llm.clone(), None)));
    graph.add_node(
        GENERATE_EXPLANATION,
        Arc::new(GenerateExplanation::new(llm, None, Status::Completed)),
    );
    graph.add_edge(START, GENERATE_JOKE);
    graph.add_edge(GENERATE_JOKE, GENERATE_EXPLANATION);
    graph.add_edge(GENERATE_EXPLANATION, END);
    graph.interrupt_after([GENERATE_JOKE]);
    graph
}

/// Router-loop shape: a dispatch node with conditional edges over the
/// `next_node` token to four workers or END; every worker edges back to the
/// router and interrupts. Each super-step runs router -> one worker; the
/// final worker sets the token to "END", so the next super-step is a bare
/// router pass that completes.
pub fn router_workflow(llm: Arc<dyn TextGenerator>) -> StateGraph<JokeState> {
    let mut graph = StateGraph::new();
    graph.add_node(ROUTER, Arc::new(Router));
    graph.add_node(
        GENERATE_JOKE,
        Arc::new(GenerateJoke::new(llm.clone(), Some(GENERATE_EXPLANATION))),
    );
    graph.add_node(
        GENERATE_EXPLANATION,
        Arc::new(GenerateExplanation::new(
            llm.clone(),
            Some(GENERATE_RATING),
            Status::ExplanationGenerated,
        )),
    );
    graph.add_node(GENERATE_RATING, Arc::new(GenerateRating::new(llm.clone())));
    graph.add_node(GENERATE_ALTERNATIVE, Arc::new(GenerateAlternative::new(llm)));

    graph.add_edge(START, ROUTER);
    graph.add_conditional_edges(
        ROUTER,
        |state: &JokeState| {
            state
                .next_node
                .clone()
                .unwrap_or_else(|| GENERATE_JOKE.to_string())
        },
        HashMap::from([
            (GENERATE_JOKE.to_string(), GENERATE_JOKE.to_string()),
            (
                GENERATE_EXPLANATION.to_string(),
                GENERATE_EXPLANATION.to_string(),
            ),
            (GENERATE_RATING.to_string(), GENERATE_RATING.to_string()),
            (
                GENERATE_ALTERNATIVE.to_string(),
                GENERATE_ALTERNATIVE.to_string(),
            ),
            ("END".to_string(), END.to_string()),
        ]),
    );
    for worker in [
        GENERATE_JOKE,
        GENERATE_EXPLANATION,
        GENERATE_RATING,
        GENERATE_ALTERNATIVE,
    ] {
        graph.add_edge(worker, ROUTER);
    }
    graph.interrupt_after([
        GENERATE_JOKE,
        GENERATE_EXPLANATION,
        GENERATE_RATING,
        GENERATE_ALTERNATIVE,
    ]);
    graph
}
