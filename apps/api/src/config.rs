use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// The signing secret and provider keys are optional AT BOOT on purpose: a
/// half-configured deploy should come up, log loudly, and answer
/// SERVER_MISCONFIGURED on the affected routes instead of crash-looping.
#[derive(Debug, Clone)]
pub struct Config {
    /// HMAC secret for install tokens. Gated routes 500 without it.
    pub auth_secret: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    /// Overrides the model identifier for every provider in the chain.
    pub model: Option<String>,
    /// Prompt recipe name; unknown values fall back to "default".
    pub recipe: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            auth_secret: optional_env("AUTH_TOKEN_SECRET"),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            model: optional_env("MODEL"),
            recipe: std::env::var("RECIPE").unwrap_or_else(|_| "default".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Treats unset AND empty as missing — `FOO=` in a .env file is a common way
/// to "unset" a secret.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
