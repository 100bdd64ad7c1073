use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::gateway::ratelimit::RateLimitExceeded;
use crate::llm_client::LlmError;
use crate::recipe::RecipeError;

/// Longest upstream/recipe diagnostic ever forwarded to a client. Anything
/// beyond this could carry unexpected upstream content.
const MAX_DETAIL_CHARS: usize = 300;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant maps onto exactly one status code — the request state
/// machine's terminal states.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(AuthError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Prompt too large: {0}")]
    PromptTooLarge(String),

    #[error("Rate limited")]
    RateLimited { retry_after_secs: u64, limit: u32 },

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Recipe error: {0}")]
    Recipe(String),

    #[error("Server misconfigured: {0}")]
    Misconfigured(&'static str),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Unauthorized(e) => {
                // The reason code is for our logs only; clients get a generic
                // 401 and know to re-register.
                tracing::warn!(reason = e.reason_code(), "rejected install token");
                (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "Invalid or missing install token".to_string(),
                )
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PromptTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PROMPT_TOO_LARGE",
                msg.clone(),
            ),
            AppError::RateLimited { limit, .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                format!("Rate limit of {limit} requests per hour exceeded"),
            ),
            AppError::Upstream(detail) => {
                tracing::error!(detail = %detail, "upstream model call failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    truncate_detail(detail),
                )
            }
            AppError::Recipe(detail) => {
                tracing::error!(detail = %detail, "recipe failed to build prompts");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RECIPE_ERROR",
                    truncate_detail(detail),
                )
            }
            AppError::Misconfigured(what) => {
                tracing::error!(missing = what, "request hit a misconfigured server");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SERVER_MISCONFIGURED",
                    "Server is not configured for this operation".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        let mut response = (status, body).into_response();

        if let AppError::RateLimited {
            retry_after_secs,
            limit,
        } = &self
        {
            let headers = response.headers_mut();
            if let Ok(v) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                headers.insert(header::RETRY_AFTER, v);
            }
            if let Ok(v) = HeaderValue::from_str(&limit.to_string()) {
                headers.insert("x-ratelimit-limit", v);
            }
            headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        }

        response
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Unauthorized(e)
    }
}

impl From<RateLimitExceeded> for AppError {
    fn from(e: RateLimitExceeded) -> Self {
        AppError::RateLimited {
            retry_after_secs: e.retry_after_secs,
            limit: e.limit,
        }
    }
}

impl From<RecipeError> for AppError {
    fn from(e: RecipeError) -> Self {
        AppError::Recipe(e.to_string())
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::NoAnswer { .. } => AppError::Upstream("no answer from provider".to_string()),
            LlmError::NoProviders => AppError::Misconfigured("model provider API key"),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

/// Bounds a diagnostic string before it reaches a client.
fn truncate_detail(detail: &str) -> String {
    if detail.chars().count() <= MAX_DETAIL_CHARS {
        return detail.to_string();
    }
    let head: String = detail.chars().take(MAX_DETAIL_CHARS).collect();
    format!("{head}…")
}
