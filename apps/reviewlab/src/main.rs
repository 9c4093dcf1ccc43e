mod cli;
mod config;
mod db;
mod errors;
mod feedback;
mod llm_client;
mod models;
mod rating;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Commands, ServeArgs};
use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::feedback::service::FeedbackService;
use crate::feedback::store::{MemoryReviewStore, PgReviewStore, ReviewStore};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting reviewlab v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Evaluate(args) => rating::command::run(args, &config).await,
        Commands::Serve(args) => serve(args, &config).await,
    }
}

/// `reviewlab serve`: the review feedback API.
async fn serve(args: ServeArgs, config: &Config) -> Result<()> {
    config.require_api_key()?;

    let store: Arc<dyn ReviewStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Arc::new(PgReviewStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL is not set; reviews are kept in memory only");
            Arc::new(MemoryReviewStore::new())
        }
    };

    let llm = LlmClient::new(config.llm.clone()).context("failed to build LLM client")?;
    info!("LLM client initialized (model: {})", llm.model());

    let state = AppState {
        store,
        feedback: FeedbackService::new(Arc::new(llm)),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let port = match args.port {
        Some(port) => port,
        None => config.port()?,
    };
    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
