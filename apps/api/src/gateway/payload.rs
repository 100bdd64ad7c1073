//! Payload-shape detection for `/api/generate`.
//!
//! Exactly one of the two shapes must validate. Discrimination is by presence
//! of a non-empty `question`, checked BEFORE the legacy fields — a body
//! carrying both shapes routes structured.

use crate::errors::AppError;
use crate::models::generation::{
    GenerationPayload, JobContext, LegacyRequest, RawGenerationRequest, StructuredRequest,
};

/// Minimum usable CV length. Anything shorter is a wiring bug on the client.
const MIN_CV_CHARS: usize = 5;
/// Legacy prompts below this cannot be real prompts.
const MIN_LEGACY_PROMPT_CHARS: usize = 10;

/// Validates a raw body into exactly one of the two accepted shapes.
pub fn detect_payload(raw: RawGenerationRequest) -> Result<GenerationPayload, AppError> {
    let question = raw.question.as_deref().map(str::trim).unwrap_or_default();

    if !question.is_empty() {
        let cv_text = raw.cv_text.unwrap_or_default();
        if cv_text.trim().len() < MIN_CV_CHARS {
            return Err(AppError::Validation(
                "CV text is missing or too short. Please load your CV first.".to_string(),
            ));
        }

        return Ok(GenerationPayload::Structured(StructuredRequest {
            question: question.to_string(),
            length: raw.length.unwrap_or_default(),
            cv_text,
            job: JobContext {
                job_title: none_if_blank(raw.job_title),
                company: none_if_blank(raw.company),
                job_description: none_if_blank(raw.job_description),
                requirements: raw.requirements.unwrap_or_default(),
                platform: none_if_blank(raw.platform),
            },
        }));
    }

    match (raw.system_prompt, raw.user_prompt) {
        (Some(system_prompt), Some(user_prompt))
            if system_prompt.len() >= MIN_LEGACY_PROMPT_CHARS
                && user_prompt.len() >= MIN_LEGACY_PROMPT_CHARS =>
        {
            Ok(GenerationPayload::Legacy(LegacyRequest {
                system_prompt,
                user_prompt,
                temperature: raw.temperature,
            }))
        }
        (Some(_), Some(_)) => Err(AppError::Validation(format!(
            "systemPrompt and userPrompt must each be at least {MIN_LEGACY_PROMPT_CHARS} characters"
        ))),
        _ => Err(AppError::Validation(
            "Request must carry either a question with cvText, or systemPrompt and userPrompt"
                .to_string(),
        )),
    }
}

fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::generation::AnswerLength;

    fn structured_raw() -> RawGenerationRequest {
        RawGenerationRequest {
            question: Some("Why do you want to work here?".to_string()),
            cv_text: Some("Jane Doe, engineer at Acme since 2019.".to_string()),
            company: Some("Globex".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_structured_shape_is_detected() {
        let payload = detect_payload(structured_raw()).unwrap();
        match payload {
            GenerationPayload::Structured(req) => {
                assert_eq!(req.question, "Why do you want to work here?");
                assert_eq!(req.length, AnswerLength::Medium);
                assert_eq!(req.job.company.as_deref(), Some("Globex"));
            }
            GenerationPayload::Legacy(_) => panic!("expected structured"),
        }
    }

    #[test]
    fn test_short_cv_is_rejected_before_anything_else() {
        let mut raw = structured_raw();
        raw.cv_text = Some("Jane".to_string());
        let err = detect_payload(raw).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("CV")));
    }

    #[test]
    fn test_missing_cv_is_rejected() {
        let mut raw = structured_raw();
        raw.cv_text = None;
        assert!(detect_payload(raw).is_err());
    }

    #[test]
    fn test_whitespace_question_falls_through_to_legacy_check() {
        let raw = RawGenerationRequest {
            question: Some("   ".to_string()),
            ..Default::default()
        };
        let err = detect_payload(raw).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_legacy_shape_is_detected() {
        let raw = RawGenerationRequest {
            system_prompt: Some("You are a helpful assistant.".to_string()),
            user_prompt: Some("Write a one-line greeting.".to_string()),
            temperature: Some(0.2),
            ..Default::default()
        };
        match detect_payload(raw).unwrap() {
            GenerationPayload::Legacy(req) => {
                assert_eq!(req.temperature, Some(0.2));
            }
            GenerationPayload::Structured(_) => panic!("expected legacy"),
        }
    }

    #[test]
    fn test_question_wins_over_legacy_fields() {
        let mut raw = structured_raw();
        raw.system_prompt = Some("You are a helpful assistant.".to_string());
        raw.user_prompt = Some("Write a one-line greeting.".to_string());
        assert!(matches!(
            detect_payload(raw).unwrap(),
            GenerationPayload::Structured(_)
        ));
    }

    #[test]
    fn test_short_legacy_prompts_are_rejected() {
        let raw = RawGenerationRequest {
            system_prompt: Some("short".to_string()),
            user_prompt: Some("also none".to_string()),
            ..Default::default()
        };
        let err = detect_payload(raw).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("10")));
    }

    #[test]
    fn test_neither_shape_is_rejected() {
        let err = detect_payload(RawGenerationRequest::default()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_blank_job_fields_become_none() {
        let mut raw = structured_raw();
        raw.job_title = Some("  ".to_string());
        match detect_payload(raw).unwrap() {
            GenerationPayload::Structured(req) => assert!(req.job.job_title.is_none()),
            GenerationPayload::Legacy(_) => panic!("expected structured"),
        }
    }
}
