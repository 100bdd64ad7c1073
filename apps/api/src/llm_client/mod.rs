//! Model backend — the single seam to language-model providers.
//!
//! ARCHITECTURAL RULE: no other module may speak to a provider API directly.
//! The gateway depends on the `ModelBackend` trait, never on HTTP; tests swap
//! in a mock, production uses `HttpBackend` with the configured fallback
//! chain.
//!
//! There is no automatic retry against a provider — the fallback chain IS the
//! retry policy: each entry is attempted once, in order, and every failure is
//! collected into one combined error.

pub mod providers;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::recipe::PromptPair;
use self::providers::{call_provider, ProviderConfig};

/// Upstream timeout — deliberately shorter than the ~120 s the extension
/// client waits, so the proxy answers 502 instead of letting clients hang.
const UPSTREAM_TIMEOUT_SECS: u64 = 90;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{provider}: transport error: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider}: API error (status {status}): {detail}")]
    Api {
        provider: &'static str,
        status: u16,
        detail: String,
    },

    #[error("{provider}: no answer in provider response")]
    NoAnswer { provider: &'static str },

    #[error("no model provider is configured")]
    NoProviders,

    #[error("all providers failed: {summary}")]
    AllFailed { summary: String },
}

impl LlmError {
    fn http(provider: &'static str, source: reqwest::Error) -> Self {
        LlmError::Http { provider, source }
    }

    fn api(provider: &'static str, status: u16, detail: String) -> Self {
        LlmError::Api {
            provider,
            status,
            detail,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A successful model answer, tagged with the provider that produced it.
#[derive(Debug, Clone)]
pub struct ModelAnswer {
    pub text: String,
    pub provider: String,
    pub model: String,
    pub usage: Option<TokenUsage>,
}

/// The model seam. `AppState` holds an `Arc<dyn ModelBackend>`.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn generate(&self, prompts: &PromptPair) -> Result<ModelAnswer, LlmError>;

    /// Label of the preferred (chain-head) provider, for /api/health.
    fn provider(&self) -> &str;

    /// Model identifier of the preferred provider, for /api/health.
    fn model(&self) -> &str;
}

/// Production backend: tries each configured provider in order.
pub struct HttpBackend {
    client: Client,
    chain: Vec<ProviderConfig>,
}

impl HttpBackend {
    pub fn new(chain: Vec<ProviderConfig>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            chain,
        }
    }
}

#[async_trait]
impl ModelBackend for HttpBackend {
    async fn generate(&self, prompts: &PromptPair) -> Result<ModelAnswer, LlmError> {
        if self.chain.is_empty() {
            return Err(LlmError::NoProviders);
        }

        let mut failures: Vec<String> = Vec::new();

        for provider in &self.chain {
            match call_provider(&self.client, provider, prompts).await {
                Ok((text, usage)) => {
                    debug!(
                        provider = provider.name,
                        model = %provider.model,
                        answer_chars = text.len(),
                        "model call succeeded"
                    );
                    return Ok(ModelAnswer {
                        text,
                        provider: provider.name.to_string(),
                        model: provider.model.clone(),
                        usage,
                    });
                }
                Err(e) => {
                    warn!(provider = provider.name, error = %e, "provider failed, trying next");
                    // Display already names the provider.
                    failures.push(e.to_string());
                }
            }
        }

        Err(LlmError::AllFailed {
            summary: failures.join("; "),
        })
    }

    fn provider(&self) -> &str {
        self.chain.first().map(|p| p.name).unwrap_or("none")
    }

    fn model(&self) -> &str {
        self.chain.first().map(|p| p.model.as_str()).unwrap_or("none")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_chain_fails_fast() {
        let backend = HttpBackend::new(vec![]);
        let prompts = PromptPair {
            system_prompt: "system prompt".to_string(),
            user_prompt: "user prompt".to_string(),
            temperature: 0.7,
        };
        let err = backend.generate(&prompts).await.unwrap_err();
        assert!(matches!(err, LlmError::NoProviders));
    }

    #[test]
    fn test_unconfigured_backend_labels_none() {
        let backend = HttpBackend::new(vec![]);
        assert_eq!(backend.provider(), "none");
        assert_eq!(backend.model(), "none");
    }
}
