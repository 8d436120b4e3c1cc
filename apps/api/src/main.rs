mod analysis;
mod config;
mod errors;
mod generation;
mod llm_client;
mod profile;
mod routes;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::OpenAiClient;
use crate::profile::scrape::ProfileScraper;
use crate::routes::build_router;
use crate::session::store::{run_expiry_sweep, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Profile Auditor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize completion client
    let llm = OpenAiClient::new(
        config.openai_api_base.clone(),
        config.openai_model.clone(),
        config.openai_api_key.clone(),
    );
    info!("Completion client initialized (model: {})", llm.model());
    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; every session must supply its own key");
    }
    info!("Analysis response format: {:?}", config.analysis_format);

    // Sessions expire after a period of inactivity
    let idle_ttl = Duration::from_secs(config.session_idle_ttl_secs);
    let sessions = SessionStore::with_idle_ttl(idle_ttl);
    let sweep_every = idle_ttl.min(Duration::from_secs(60));
    tokio::spawn(run_expiry_sweep(sessions.clone(), sweep_every));
    info!("Idle sessions expire after {}s", idle_ttl.as_secs());

    // Build app state
    let state = AppState {
        config: config.clone(),
        llm: Arc::new(llm),
        sessions,
        scraper: ProfileScraper::new(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the UI host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
