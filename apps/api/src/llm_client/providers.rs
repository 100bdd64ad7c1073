//! Provider wire formats and fallback-chain construction.
//!
//! `build_fallback_chain` is a pure function from config to an ordered provider
//! list; `call_provider` speaks each provider's HTTP dialect. Chain iteration
//! lives in the backend (`try_in_order`) — there is no shared provider
//! registry.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::llm_client::{LlmError, TokenUsage};
use crate::recipe::PromptPair;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-5";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Anthropic,
    /// Any OpenAI-compatible chat-completions endpoint (hosted or local).
    OpenAi,
}

/// One entry in the fallback chain.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub name: &'static str,
    pub kind: ProviderKind,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

/// Builds the ordered provider chain from configuration: Anthropic first when
/// keyed, then OpenAI-compatible. The `MODEL` knob overrides every entry's
/// model identifier.
pub fn build_fallback_chain(config: &Config) -> Vec<ProviderConfig> {
    let mut chain = Vec::new();

    if let Some(key) = &config.anthropic_api_key {
        chain.push(ProviderConfig {
            name: "anthropic",
            kind: ProviderKind::Anthropic,
            api_key: key.clone(),
            model: config
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string()),
            base_url: ANTHROPIC_API_URL.to_string(),
        });
    }

    if let Some(key) = &config.openai_api_key {
        chain.push(ProviderConfig {
            name: "openai",
            kind: ProviderKind::OpenAi,
            api_key: key.clone(),
            model: config
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            base_url: config.openai_base_url.clone(),
        });
    }

    chain
}

/// Calls one provider. Returns the answer text and usage, or a typed failure
/// for the chain to collect.
pub async fn call_provider(
    client: &Client,
    provider: &ProviderConfig,
    prompts: &PromptPair,
) -> Result<(String, Option<TokenUsage>), LlmError> {
    match provider.kind {
        ProviderKind::Anthropic => call_anthropic(client, provider, prompts).await,
        ProviderKind::OpenAi => call_openai(client, provider, prompts).await,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Anthropic Messages API
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

async fn call_anthropic(
    client: &Client,
    provider: &ProviderConfig,
    prompts: &PromptPair,
) -> Result<(String, Option<TokenUsage>), LlmError> {
    let body = AnthropicRequest {
        model: &provider.model,
        max_tokens: MAX_TOKENS,
        temperature: prompts.temperature,
        system: &prompts.system_prompt,
        messages: vec![AnthropicMessage {
            role: "user",
            content: &prompts.user_prompt,
        }],
    };

    let response = client
        .post(&provider.base_url)
        .header("x-api-key", &provider.api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .header("content-type", "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| LlmError::http(provider.name, e))?;

    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(LlmError::api(provider.name, status.as_u16(), detail));
    }

    let parsed: AnthropicResponse = response
        .json()
        .await
        .map_err(|e| LlmError::http(provider.name, e))?;

    let text = parsed
        .content
        .iter()
        .find(|b| b.block_type == "text")
        .and_then(|b| b.text.as_deref())
        .unwrap_or_default()
        .to_string();

    if text.trim().is_empty() {
        return Err(LlmError::NoAnswer {
            provider: provider.name,
        });
    }

    let usage = parsed.usage.map(|u| TokenUsage {
        input_tokens: u.input_tokens,
        output_tokens: u.output_tokens,
    });

    Ok((text, usage))
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAI-compatible chat completions
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<OpenAiMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

async fn call_openai(
    client: &Client,
    provider: &ProviderConfig,
    prompts: &PromptPair,
) -> Result<(String, Option<TokenUsage>), LlmError> {
    let body = OpenAiRequest {
        model: &provider.model,
        max_tokens: MAX_TOKENS,
        temperature: prompts.temperature,
        messages: vec![
            OpenAiMessage {
                role: "system",
                content: &prompts.system_prompt,
            },
            OpenAiMessage {
                role: "user",
                content: &prompts.user_prompt,
            },
        ],
    };

    let url = format!("{}/chat/completions", provider.base_url.trim_end_matches('/'));
    let response = client
        .post(url)
        .bearer_auth(&provider.api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| LlmError::http(provider.name, e))?;

    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(LlmError::api(provider.name, status.as_u16(), detail));
    }

    let parsed: OpenAiResponse = response
        .json()
        .await
        .map_err(|e| LlmError::http(provider.name, e))?;

    let text = parsed
        .choices
        .first()
        .and_then(|c| c.message.content.as_deref())
        .unwrap_or_default()
        .to_string();

    if text.trim().is_empty() {
        return Err(LlmError::NoAnswer {
            provider: provider.name,
        });
    }

    let usage = parsed.usage.map(|u| TokenUsage {
        input_tokens: u.prompt_tokens,
        output_tokens: u.completion_tokens,
    });

    Ok((text, usage))
}
