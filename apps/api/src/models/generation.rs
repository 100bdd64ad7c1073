//! Wire models for the generation API.
//!
//! The extension sends camelCase JSON. A single raw shape covers both payload
//! variants; the gateway discriminates after deserialization (see
//! `gateway::payload`) so a request missing every field still parses and gets
//! a proper 400 instead of a serde rejection.

use serde::{Deserialize, Serialize};

/// Requested answer size. Scales the word targets in the prompt recipes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerLength {
    Short,
    #[default]
    Medium,
    Long,
}

/// Everything a `/api/generate` body may carry, all optional. Fields the
/// server has no use for (`pageUrl`) are accepted and ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGenerationRequest {
    // Structured shape
    pub question: Option<String>,
    pub length: Option<AnswerLength>,
    pub cv_text: Option<String>,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub job_description: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub platform: Option<String>,

    // Legacy shape: a pre-built prompt pair, bypassing server-side assembly
    pub system_prompt: Option<String>,
    pub user_prompt: Option<String>,
    pub temperature: Option<f32>,
}

/// Page-derived job context, produced by the extension's DOM extraction and
/// consumed read-only by context assembly.
#[derive(Debug, Clone, Default)]
pub struct JobContext {
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub job_description: Option<String>,
    pub requirements: Vec<String>,
    pub platform: Option<String>,
}

impl JobContext {
    pub fn is_empty(&self) -> bool {
        self.job_title.is_none()
            && self.company.is_none()
            && self.job_description.is_none()
            && self.requirements.is_empty()
            && self.platform.is_none()
    }
}

/// Validated structured request — input to the recipe module.
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    /// The question as the page asked it.
    pub question: String,
    pub length: AnswerLength,
    pub cv_text: String,
    pub job: JobContext,
}

/// Validated legacy request — dispatched to the backend unchanged.
#[derive(Debug, Clone)]
pub struct LegacyRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: Option<f32>,
}

/// The two accepted `/api/generate` payload shapes.
#[derive(Debug, Clone)]
pub enum GenerationPayload {
    Structured(StructuredRequest),
    Legacy(LegacyRequest),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub token: String,
    /// Unix seconds.
    pub expires_at: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub answer: String,
    pub provider: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub text: String,
    pub filename: String,
    /// Uploaded file size in bytes (not the extracted text length).
    pub size: usize,
}
