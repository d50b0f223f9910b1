mod config;
mod documents;
mod errors;
mod llm_client;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::documents::template::DocumentKind;
use crate::llm_client::GeminiClient;
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

    info!("Starting Blueprint API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Gemini client (credential injected here, never read ad hoc)
    let gemini = GeminiClient::from_config(&config)?;
    if gemini.has_credential() {
        info!(
            base_url = %config.gemini_base_url,
            timeout_secs = config.llm_timeout_secs,
            max_retries = config.llm_max_retries,
            "Gemini client initialized"
        );
    } else {
        warn!("GEMINI_API_KEY is not set; every generation request will return a fallback document");
    }

    for kind in DocumentKind::ALL {
        let template = kind.template();
        info!(
            kind = %kind,
            version = template.version,
            model = template.model,
            "Template loaded"
        );
    }

    let state = AppState {
        provider: Arc::new(gemini),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
