//! HTTP surface: start / continue / status over one compiled joke workflow.
//!
//! The handlers are thin: decode the request, call the engine, map the error
//! taxonomy to status codes (`ThreadNotFound` -> 404, `Precondition` -> 422,
//! everything engine-fatal or store-level -> 500).

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use stepflow::{CompiledGraph, EngineError, SuperStep};

use crate::jokes::{JokeState, Status, GENERATE_JOKE};

/// Where suspended state lives: the only difference between the three
/// deployment modes. The engine and graph contract are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// SQLite-backed checkpoints, survive process restarts.
    Durable,
    /// In-process checkpoints, lost on restart.
    Ephemeral,
    /// No server-side state; the client carries the full state per request.
    Stateless,
}

/// Shared state for all routes.
pub struct AppState {
    pub mode: Mode,
    pub engine: CompiledGraph<JokeState>,
}

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub topic: String,
    /// Required in durable/ephemeral mode; ignored in stateless mode.
    pub thread_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContinueRequest {
    /// Durable/ephemeral: names the checkpoint to resume.
    pub thread_id: Option<String>,
    /// Stateless: the full state exactly as returned by the previous call.
    pub state: Option<JokeState>,
    /// Stateless: the pending node exactly as returned by the previous call.
    pub pending_node: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub thread_id: String,
}

/// Response of one super-step (`/start` or `/continue`).
#[derive(Debug, Serialize)]
pub struct RunResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    pub state: JokeState,
    pub pending_node: String,
    pub completed: bool,
}

impl RunResponse {
    fn from_step(step: SuperStep<JokeState>, thread_id: Option<String>) -> Self {
        let completed = step.is_completed();
        Self {
            thread_id,
            state: step.state,
            pending_node: step.pending_node,
            completed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub exists: bool,
    pub thread_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub has_joke: bool,
    pub has_explanation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_node: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<u64>,
}

/// Errors a handler can produce, mapped onto HTTP status codes.
pub enum ApiError {
    BadRequest(String),
    Engine(EngineError),
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        ApiError::Engine(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, detail) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Engine(e) => {
                let code = match &e {
                    EngineError::ThreadNotFound(_) => StatusCode::NOT_FOUND,
                    EngineError::Precondition(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (code, e.to_string())
            }
        };
        (code, Json(json!({ "detail": detail }))).into_response()
    }
}

async fn root(State(app): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "message": "Joke workflow API is running",
        "mode": format!("{:?}", app.mode),
        "endpoints": ["/health", "/start", "/continue", "/status"],
    }))
}

async fn health(State(app): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "mode": format!("{:?}", app.mode) }))
}

async fn start(
    State(app): State<Arc<AppState>>,
    Json(req): Json<StartRequest>,
) -> Result<Json<RunResponse>, ApiError> {
    if req.topic.trim().is_empty() {
        return Err(ApiError::BadRequest("topic must not be empty".into()));
    }
    let thread_id = match app.mode {
        Mode::Stateless => req.thread_id.unwrap_or_else(|| "detached".to_string()),
        _ => req.thread_id.ok_or_else(|| {
            ApiError::BadRequest("thread_id is required in durable/ephemeral mode".into())
        })?,
    };
    info!(topic = %req.topic, thread_id = %thread_id, "start");
    let step = app
        .engine
        .start(JokeState::started(&req.topic), &thread_id)
        .await?;
    let echo_thread = (app.mode != Mode::Stateless).then_some(thread_id);
    Ok(Json(RunResponse::from_step(step, echo_thread)))
}

async fn continue_run(
    State(app): State<Arc<AppState>>,
    Json(req): Json<ContinueRequest>,
) -> Result<Json<RunResponse>, ApiError> {
    match app.mode {
        Mode::Stateless => {
            let state = req.state.ok_or_else(|| {
                ApiError::BadRequest("state is required in stateless mode".into())
            })?;
            let pending_node = req.pending_node.ok_or_else(|| {
                ApiError::BadRequest("pending_node is required in stateless mode".into())
            })?;
            // The supplied state must show that the first worker already ran;
            // no store lookup happened, so this is a Precondition, not a 404.
            let routing_to_first = state.next_node.as_deref() == Some(GENERATE_JOKE);
            if state.joke.is_none() && !routing_to_first {
                return Err(EngineError::Precondition(
                    "supplied state has no joke; start the workflow first".into(),
                )
                .into());
            }
            info!(pending_node = %pending_node, "continue (stateless)");
            let step = app.engine.resume_detached(state, &pending_node).await?;
            Ok(Json(RunResponse::from_step(step, None)))
        }
        _ => {
            let thread_id = req.thread_id.ok_or_else(|| {
                ApiError::BadRequest("thread_id is required in durable/ephemeral mode".into())
            })?;
            info!(thread_id = %thread_id, "continue");
            let step = app.engine.resume(&thread_id).await?;
            Ok(Json(RunResponse::from_step(step, Some(thread_id))))
        }
    }
}

async fn status(
    State(app): State<Arc<AppState>>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    if app.mode == Mode::Stateless {
        return Err(ApiError::BadRequest(
            "status is unavailable in stateless mode: the server holds no sessions".into(),
        ));
    }
    let snapshot = app.engine.get_state(&req.thread_id).await?;
    let response = match snapshot {
        None => StatusResponse {
            exists: false,
            thread_id: req.thread_id,
            status: None,
            topic: None,
            has_joke: false,
            has_explanation: false,
            pending_node: None,
            step: None,
        },
        Some(snap) => StatusResponse {
            exists: true,
            thread_id: req.thread_id,
            status: Some(snap.state.status),
            topic: Some(snap.state.topic.clone()),
            has_joke: snap.state.joke.is_some(),
            has_explanation: snap.state.explanation.is_some(),
            pending_node: Some(snap.pending_node),
            step: Some(snap.step),
        },
    };
    Ok(Json(response))
}

/// Builds the application router over shared state.
pub fn build_router(app: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/start", post(start))
        .route("/continue", post(continue_run))
        .route("/status", post(status))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}
