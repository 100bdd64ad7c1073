//! Gateway handlers.
//!
//! Per-request flow for `/api/generate`:
//! Received → Authenticated → Validated → Routed (structured | legacy) →
//! Dispatched → terminal. Each terminal state is one `AppError` variant (or
//! the 200 response); nothing else escapes a handler.
//!
//! Privacy rule enforced here: CV text, job context, prompts, and answers are
//! never logged and never stored — only lengths, counts, and reason codes.

use axum::{
    extract::{ConnectInfo, Multipart, State},
    http::HeaderMap,
    Json,
};
use std::net::SocketAddr;
use tracing::info;
use uuid::Uuid;

use crate::auth::{AuthError, TokenClaims};
use crate::errors::AppError;
use crate::extract;
use crate::gateway::payload::detect_payload;
use crate::models::generation::{
    GenerateResponse, GenerationPayload, RawGenerationRequest, RegisterResponse, UploadResponse,
};
use crate::llm_client::ModelBackend;
use crate::recipe::{
    PromptPair, Recipe, DEFAULT_TEMPERATURE, MAX_SYSTEM_PROMPT_CHARS, MAX_USER_PROMPT_CHARS,
    MIN_PROMPT_CHARS,
};
use crate::state::AppState;

/// POST /api/register
/// Issues a fresh install token. Unauthenticated but IP-rate-limited.
pub async fn register(
    State(state): State<AppState>,
    conn: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> Result<Json<RegisterResponse>, AppError> {
    let ip = client_ip(&headers, conn.as_ref());
    state.limits.check_register(&ip)?;

    let auth = state
        .auth
        .as_ref()
        .ok_or(AppError::Misconfigured("AUTH_TOKEN_SECRET"))?;

    let issued = auth.issue();
    info!(expires_at = issued.expires_at, "install token issued");

    Ok(Json(RegisterResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}

/// POST /api/generate
/// The core endpoint: bearer-gated, rate-limited, routes structured bodies
/// through the recipe and legacy bodies straight through, then dispatches to
/// the model backend.
pub async fn generate(
    State(state): State<AppState>,
    conn: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(body): Json<RawGenerationRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let request_id = Uuid::new_v4();
    let ip = client_ip(&headers, conn.as_ref());

    let claims = authenticate(&state, &headers)?;
    state.limits.check_generate(&claims.jti, &ip)?;

    let payload = detect_payload(body)?;

    let prompts = match payload {
        GenerationPayload::Structured(request) => {
            info!(
                %request_id,
                route = "structured",
                question_chars = request.question.len(),
                cv_chars = request.cv_text.len(),
                "generate request accepted"
            );
            state.recipe.build_prompts(&request)?
        }
        GenerationPayload::Legacy(request) => {
            info!(
                %request_id,
                route = "legacy",
                system_chars = request.system_prompt.len(),
                user_chars = request.user_prompt.len(),
                "generate request accepted"
            );
            PromptPair {
                system_prompt: request.system_prompt,
                user_prompt: request.user_prompt,
                temperature: request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            }
        }
    };

    enforce_prompt_ceiling(&prompts)?;

    let answer = state.backend.generate(&prompts).await?;
    if answer.text.trim().is_empty() {
        // A 2xx upstream with no usable answer is still an upstream failure.
        return Err(AppError::Upstream("no answer from provider".to_string()));
    }
    info!(
        %request_id,
        provider = %answer.provider,
        model = %answer.model,
        answer_chars = answer.text.len(),
        "generate request completed"
    );

    Ok(Json(GenerateResponse {
        answer: answer.text,
        provider: answer.provider,
        model: answer.model,
    }))
}

/// POST /api/cv/upload
/// Accepts a multipart CV file, returns its extracted, normalized text.
/// Bearer-gated and rate-limited exactly like `/api/generate`.
pub async fn upload_cv(
    State(state): State<AppState>,
    conn: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let ip = client_ip(&headers, conn.as_ref());
    let claims = authenticate(&state, &headers)?;
    state.limits.check_generate(&claims.jti, &ip)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("cv") {
            continue;
        }

        let filename = field.file_name().unwrap_or("cv").to_string();
        let content_type = field.content_type().map(String::from);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;

        let text = extract::extract_text(&bytes, &filename, content_type.as_deref())?;
        info!(
            filename = %filename,
            file_bytes = bytes.len(),
            text_chars = text.len(),
            "CV upload extracted"
        );

        return Ok(Json(UploadResponse {
            success: true,
            text,
            filename,
            size: bytes.len(),
        }));
    }

    Err(AppError::Validation(
        "Multipart field 'cv' is required".to_string(),
    ))
}

/// Verifies the bearer token, mapping a missing secret to 500 and every token
/// problem to 401.
fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<TokenClaims, AppError> {
    let auth = state
        .auth
        .as_ref()
        .ok_or(AppError::Misconfigured("AUTH_TOKEN_SECRET"))?;
    let token = bearer_token(headers)?;
    Ok(auth.verify(token)?)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::Missing)
}

/// Client IP for rate limiting: first `X-Forwarded-For` hop when present
/// (the proxy sits behind a load balancer in production), else the socket
/// peer, else a shared bucket.
fn client_ip(headers: &HeaderMap, conn: Option<&ConnectInfo<SocketAddr>>) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return forwarded.to_string();
    }
    match conn {
        Some(ConnectInfo(addr)) => addr.ip().to_string(),
        None => "unknown".to_string(),
    }
}

/// Defense-in-depth size ceiling, independent of the assembler's caps: a
/// misconfigured recipe (or an oversized legacy body) must not be able to
/// bypass the limit. Rejects — never truncates a second time.
fn enforce_prompt_ceiling(prompts: &PromptPair) -> Result<(), AppError> {
    let system_len = prompts.system_prompt.len();
    let user_len = prompts.user_prompt.len();

    if system_len < MIN_PROMPT_CHARS || user_len < MIN_PROMPT_CHARS {
        return Err(AppError::Validation(format!(
            "Prompts must be at least {MIN_PROMPT_CHARS} characters"
        )));
    }
    if system_len > MAX_SYSTEM_PROMPT_CHARS {
        return Err(AppError::PromptTooLarge(format!(
            "System prompt is {system_len} characters (limit {MAX_SYSTEM_PROMPT_CHARS})"
        )));
    }
    if user_len > MAX_USER_PROMPT_CHARS {
        return Err(AppError::PromptTooLarge(format!(
            "User prompt is {user_len} characters (limit {MAX_USER_PROMPT_CHARS})"
        )));
    }
    Ok(())
}
