mod analysis;
mod config;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{HeaderValue, StatusCode};
use axum::response::Response;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyCors, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::scoring::LexicalScorer;
use crate::analysis::AnalysisPipeline;
use crate::config::Config;
use crate::errors::error_response;
use crate::llm_client::{AiProvider, DeepSeekProvider, GeminiProvider, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Analyzer API v{}", env!("CARGO_PKG_VERSION"));

    // Stopwords are loaded once and shared read-only by every request
    let scorer = LexicalScorer::from_stopword_file(&config.stopwords_path)?;

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("Failed to create upload dir {}", config.upload_dir.display()))?;
    info!("Uploads are staged in {}", config.upload_dir.display());

    // One pooled HTTP client shared by both providers
    let llm = LlmClient::new().context("Failed to build HTTP client")?;

    let feedback_provider: Option<Arc<dyn AiProvider>> = match &config.deepseek_api_key {
        Some(key) => Some(Arc::new(DeepSeekProvider::new(llm.clone(), key.clone()))),
        None => {
            warn!("DEEPSEEK_API_KEY is not set; lexical analysis will omit AI feedback");
            None
        }
    };
    let structured_provider: Option<Arc<dyn AiProvider>> = match &config.gemini_api_key {
        Some(key) => Some(Arc::new(GeminiProvider::new(llm.clone(), key.clone()))),
        None => {
            warn!("GEMINI_API_KEY is not set; structured analysis is unavailable");
            None
        }
    };

    let pipeline = AnalysisPipeline::new(
        scorer,
        feedback_provider,
        structured_provider,
        config.upload_dir.clone(),
        config.provider_timeout,
    );

    let cors = build_cors(&config)?;

    // Build app state
    let state = AppState {
        config: config.clone(),
        pipeline: Arc::new(pipeline),
    };

    // Build router
    let app = build_router(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// CORS restricted to the configured front-end origins.
fn build_cors(config: &Config) -> Result<CorsLayer> {
    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid origin in ALLOWED_ORIGINS: '{origin}'"))
        })
        .collect::<Result<Vec<_>>>()?;
    info!("CORS allowed origins: {:?}", config.allowed_origins);

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AnyCors)
        .allow_headers(AnyCors))
}

/// Converts a handler panic into the generic 500 envelope; detail goes to the log only.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    error!("Request handler panicked: {detail}");

    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An error occurred while analyzing the resume",
    )
}
