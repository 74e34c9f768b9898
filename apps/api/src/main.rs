mod canonical;
mod config;
mod errors;
mod layout;
mod models;
mod pipeline;
mod render;
mod routes;
mod state;

use anyhow::{bail, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting onepage API v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::new(config.clone());
    if state.templates.get(&config.default_template).is_none() {
        bail!(
            "DEFAULT_TEMPLATE '{}' is not a built-in template (available: {})",
            config.default_template,
            state.templates.names().join(", ")
        );
    }
    info!(
        default_template = %config.default_template,
        templates = state.templates.names().len(),
        body_limit_bytes = config.body_limit_bytes,
        "Template catalog loaded"
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
