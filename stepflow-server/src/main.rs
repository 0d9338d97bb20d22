//! HTTP server exposing POST /start, /continue, /status over the joke
//! workflows. Pick where suspended state lives with --mode; the execution
//! contract is identical in all three.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stepflow_server::llm::MockGenerator;
use stepflow_server::{build_app, Mode};

#[derive(Parser, Debug)]
#[command(name = "stepflow-server", about = "Checkpointed joke workflow API")]
struct Args {
    /// Where suspended state lives.
    #[arg(long, value_enum, default_value = "durable")]
    mode: Mode,

    /// SQLite file for durable mode.
    #[arg(long, default_value = "checkpoints.db")]
    db_path: PathBuf,

    #[arg(long, default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let app = build_app(args.mode, Arc::new(MockGenerator::new()), &args.db_path)?;

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(mode = ?args.mode, addr = %addr, "serving");
    axum::serve(listener, app).await?;
    Ok(())
}
