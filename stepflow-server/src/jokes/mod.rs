//! Joke-generation workflows: state type, node bodies, and the two graph
//! shapes (linear-interrupt and router-loop).

mod graph;
mod nodes;
mod state;

pub use graph::{linear_workflow, router_workflow, GENERATE_JOKE, ROUTER};
pub use nodes::{GenerateAlternative, GenerateExplanation, GenerateJoke, GenerateRating, Router};
pub use state::{JokeState, JokeUpdate, Status};
