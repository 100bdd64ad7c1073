//! The bundled prompt recipe.
//!
//! Dispatches on the question class and fills the templates in `prompts.rs`.
//! Temperatures: extraction runs at 0.1 (a fact lookup has one correct answer),
//! everything narrative at the 0.7 default.

use crate::models::generation::{AnswerLength, StructuredRequest};
use crate::question::{clean_label, classify, QuestionClass};
use crate::recipe::assemble::{
    assemble, MAX_CV_CHARS_EXTRACTION, MAX_CV_CHARS_NARRATIVE, MAX_JOB_DESC_CHARS,
};
use crate::recipe::prompts::{
    BANNED_PHRASES, COVER_LETTER_PROMPT_TEMPLATE, COVER_LETTER_SYSTEM_TEMPLATE,
    EXTRACTION_PROMPT_TEMPLATE, EXTRACTION_SYSTEM, GENERAL_PROMPT_TEMPLATE,
    GENERAL_SYSTEM_TEMPLATE, WHY_COMPANY_APPENDIX,
};
use crate::recipe::{PromptPair, Recipe, RecipeError, DEFAULT_TEMPERATURE};

const EXTRACTION_TEMPERATURE: f32 = 0.1;

/// Word targets for regular answers, by requested length.
fn answer_word_target(length: AnswerLength) -> (u32, u32) {
    match length {
        AnswerLength::Short => (50, 80),
        AnswerLength::Medium => (100, 150),
        AnswerLength::Long => (200, 300),
    }
}

/// Word targets for cover letters — a distinct, larger scale.
fn letter_word_target(length: AnswerLength) -> (u32, u32) {
    match length {
        AnswerLength::Short => (150, 220),
        AnswerLength::Medium => (250, 350),
        AnswerLength::Long => (350, 500),
    }
}

pub struct DefaultRecipe;

impl Recipe for DefaultRecipe {
    fn name(&self) -> &'static str {
        "default"
    }

    fn build_prompts(&self, request: &StructuredRequest) -> Result<PromptPair, RecipeError> {
        let pair = match classify(&request.question) {
            QuestionClass::DataExtraction => build_extraction(request),
            QuestionClass::CoverLetter => build_cover_letter(request),
            QuestionClass::WhyCompany => build_narrative(request, true),
            QuestionClass::General => build_narrative(request, false),
        };
        Ok(pair)
    }
}

fn build_extraction(request: &StructuredRequest) -> PromptPair {
    // Fact lookup: small CV cap, no job context needed.
    let context = assemble(&request.cv_text, &Default::default(), MAX_CV_CHARS_EXTRACTION, 0);
    let label = clean_label(&request.question);

    PromptPair {
        system_prompt: EXTRACTION_SYSTEM.to_string(),
        user_prompt: EXTRACTION_PROMPT_TEMPLATE
            .replace("{cv_block}", &context.cv_block)
            .replace("{label}", &label),
        temperature: EXTRACTION_TEMPERATURE,
    }
}

fn build_cover_letter(request: &StructuredRequest) -> PromptPair {
    let context = assemble(
        &request.cv_text,
        &request.job,
        MAX_CV_CHARS_NARRATIVE,
        MAX_JOB_DESC_CHARS,
    );
    let (lo, hi) = letter_word_target(request.length);

    PromptPair {
        system_prompt: COVER_LETTER_SYSTEM_TEMPLATE
            .replace("{banned_phrases}", &BANNED_PHRASES.join(", ")),
        user_prompt: fill_narrative_template(
            COVER_LETTER_PROMPT_TEMPLATE,
            &context.cv_block,
            &context.job_block,
            &request.question,
            lo,
            hi,
        ),
        temperature: DEFAULT_TEMPERATURE,
    }
}

fn build_narrative(request: &StructuredRequest, why_company: bool) -> PromptPair {
    let context = assemble(
        &request.cv_text,
        &request.job,
        MAX_CV_CHARS_NARRATIVE,
        MAX_JOB_DESC_CHARS,
    );
    let (lo, hi) = answer_word_target(request.length);

    let mut system_prompt =
        GENERAL_SYSTEM_TEMPLATE.replace("{banned_phrases}", &BANNED_PHRASES.join(", "));
    if why_company {
        system_prompt.push_str(WHY_COMPANY_APPENDIX);
    }

    PromptPair {
        system_prompt,
        user_prompt: fill_narrative_template(
            GENERAL_PROMPT_TEMPLATE,
            &context.cv_block,
            &context.job_block,
            &request.question,
            lo,
            hi,
        ),
        temperature: DEFAULT_TEMPERATURE,
    }
}

fn fill_narrative_template(
    template: &str,
    cv_block: &str,
    job_block: &str,
    question: &str,
    word_lo: u32,
    word_hi: u32,
) -> String {
    let job_section = if job_block.is_empty() {
        "(No job context was captured from the page.)".to_string()
    } else {
        format!("JOB CONTEXT:\n{job_block}")
    };

    template
        .replace("{cv_block}", cv_block)
        .replace("{job_block}", &job_section)
        .replace("{question}", question)
        .replace("{word_lo}", &word_lo.to_string())
        .replace("{word_hi}", &word_hi.to_string())
}
