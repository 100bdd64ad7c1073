use std::sync::Arc;

use crate::auth::TokenAuthenticator;
use crate::config::Config;
use crate::gateway::ratelimit::RateLimits;
use crate::llm_client::ModelBackend;
use crate::recipe::Recipe;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when the signing secret is missing at boot — token routes then
    /// answer SERVER_MISCONFIGURED instead of the process refusing to start.
    pub auth: Option<Arc<TokenAuthenticator>>,
    pub limits: Arc<RateLimits>,
    /// Model seam. Production: `HttpBackend` with the fallback chain; tests
    /// swap in a mock.
    pub backend: Arc<dyn ModelBackend>,
    /// Pluggable prompt recipe, selected once at startup via `RECIPE`.
    pub recipe: Arc<dyn Recipe>,
    pub config: Config,
}
