//! coursegen - server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use coursegen::config::{Config, ConfigOverrides};
use coursegen::server::{AppState, build_app};
use coursegen::{CourseGenerator, GeminiBackend, ModelSelector};

const DEFAULT_LOG_FILTER: &str = "coursegen=info,tower_http=info";

/// Serve AI course-structure generation over HTTP.
#[derive(Parser, Debug)]
#[command(name = "coursegen")]
#[command(about = "Serve AI course-structure generation over HTTP")]
#[command(version)]
struct Cli {
    /// Address to listen on (overrides COURSEGEN_BIND_ADDR)
    #[arg(long)]
    bind: Option<String>,

    /// Comma-separated model preference list (overrides COURSEGEN_MODELS)
    #[arg(long, value_delimiter = ',')]
    models: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        bind: cli.bind,
        models: cli.models,
    };
    let config = Config::load(&overrides).context("Failed to load configuration")?;

    let backend = GeminiBackend::new(
        config.gemini_base_url.as_str(),
        config.api_key.as_str(),
        config.backend_timeout,
    )
    .context("Failed to build Gemini HTTP client")?;

    let generator = CourseGenerator::new(Arc::new(backend), ModelSelector::new(config.models.clone()));
    let app = build_app(AppState::new(generator), &config.cors_origins);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    info!(
        "Listening on {} (models: {})",
        listening_addr(&listener, config.bind_addr),
        config.models.join(", ")
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server terminated unexpectedly")?;

    info!("Server stopped");
    Ok(())
}

fn listening_addr(listener: &TcpListener, fallback: SocketAddr) -> SocketAddr {
    listener.local_addr().unwrap_or(fallback)
}

/// Resolve on Ctrl+C so in-flight requests can finish.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
