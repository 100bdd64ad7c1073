mod auth;
mod config;
mod errors;
mod extract;
mod gateway;
mod llm_client;
mod models;
mod question;
mod recipe;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::TokenAuthenticator;
use crate::config::Config;
use crate::gateway::ratelimit::RateLimits;
use crate::llm_client::providers::build_fallback_chain;
use crate::llm_client::{HttpBackend, ModelBackend};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Scrivener API v{}", env!("CARGO_PKG_VERSION"));

    // Install-token signer. A missing secret does not abort boot: gated routes
    // answer SERVER_MISCONFIGURED until the deploy is fixed.
    let token_auth = match &config.auth_secret {
        Some(secret) => Some(Arc::new(TokenAuthenticator::new(secret.clone()))),
        None => {
            error!("AUTH_TOKEN_SECRET is not set — token issuance and verification disabled");
            None
        }
    };

    // Model backend: ordered provider fallback chain.
    let chain = build_fallback_chain(&config);
    if chain.is_empty() {
        error!("no provider API key configured — /api/generate will fail upstream dispatch");
    } else {
        info!(
            providers = ?chain.iter().map(|p| p.name).collect::<Vec<_>>(),
            model = %chain[0].model,
            "provider chain configured"
        );
    }
    let backend: Arc<dyn ModelBackend> = Arc::new(HttpBackend::new(chain));

    // Prompt recipe, swappable via RECIPE (unknown names fall back to default).
    let recipe = recipe::select_recipe(&config.recipe);
    recipe::log_selected(recipe.as_ref());

    let state = AppState {
        auth: token_auth,
        limits: Arc::new(RateLimits::new()),
        backend,
        recipe,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // the extension calls from arbitrary page origins

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
