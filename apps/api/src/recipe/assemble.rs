//! Context assembly — bounds CV text and job context into prompt-sized blocks.
//!
//! Truncation happens HERE, once, with caps chosen conservatively below the
//! prompt hard limits. The gateway's final size ceiling is a separate
//! defense-in-depth check and never truncates.
//!
//! CV truncation is head+tail rather than head-only: CVs are typically
//! reverse-chronological, so keeping only the head would feed the model
//! nothing but the most recent role, while the narrative recipes explicitly
//! ask for evidence from at least two different roles/time periods. 60% from
//! the start and 40% from the end preserves early-career signal.

use crate::models::generation::JobContext;

/// CV cap for narrative answers (general, cover letter, why-company).
pub const MAX_CV_CHARS_NARRATIVE: usize = 24_000;
/// CV cap for data extraction — a fact lookup needs far less context.
pub const MAX_CV_CHARS_EXTRACTION: usize = 8_000;
/// Job description head-truncation cap.
pub const MAX_JOB_DESC_CHARS: usize = 6_000;
const MAX_REQUIREMENTS: usize = 8;
const MAX_REQUIREMENT_CHARS: usize = 300;
/// Single-line fields (title, company, platform) share one small cap.
const MAX_FIELD_CHARS: usize = 200;

const CV_OMISSION_MARKER: &str = "\n\n[... middle of CV omitted ...]\n\n";
const TRUNCATION_MARKER: &str = " [truncated]";

/// Head fraction of the head+tail split, in tenths.
const HEAD_TENTHS: usize = 6;

/// Prompt-ready text blocks. `job_block` is empty when no job context exists.
#[derive(Debug, Clone)]
pub struct AssembledContext {
    pub cv_block: String,
    pub job_block: String,
}

/// Bounds and formats CV text and job context for prompt insertion.
pub fn assemble(cv_text: &str, job: &JobContext, max_cv_chars: usize, max_job_chars: usize) -> AssembledContext {
    AssembledContext {
        cv_block: truncate_head_tail(cv_text, max_cv_chars),
        job_block: build_job_block(job, max_job_chars),
    }
}

/// Head+tail truncation: text within the cap passes through byte-identical;
/// longer text keeps `0.6 * max` chars from the start and the remainder from
/// the end, joined with an explicit omission marker.
pub fn truncate_head_tail(text: &str, max_chars: usize) -> String {
    let total = text.chars().count();
    if total <= max_chars {
        return text.to_string();
    }

    let head_len = max_chars * HEAD_TENTHS / 10;
    let tail_len = max_chars - head_len;

    let head: String = text.chars().take(head_len).collect();
    let tail: String = text
        .chars()
        .skip(total - tail_len)
        .collect();

    format!("{head}{CV_OMISSION_MARKER}{tail}")
}

/// Simple head truncation with a trailing marker when cut.
pub fn truncate_head(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{head}{TRUNCATION_MARKER}")
}

/// Formats job context as labeled lines. Requirements are deduplicated by
/// exact string match, capped to the first 8, each individually bounded.
fn build_job_block(job: &JobContext, max_desc_chars: usize) -> String {
    if job.is_empty() {
        return String::new();
    }

    let mut lines: Vec<String> = Vec::new();
    if let Some(title) = &job.job_title {
        lines.push(format!("Job title: {}", truncate_head(title, MAX_FIELD_CHARS)));
    }
    if let Some(company) = &job.company {
        lines.push(format!("Company: {}", truncate_head(company, MAX_FIELD_CHARS)));
    }
    if let Some(platform) = &job.platform {
        lines.push(format!("Platform: {}", truncate_head(platform, MAX_FIELD_CHARS)));
    }

    let requirements = dedup_requirements(&job.requirements);
    if !requirements.is_empty() {
        lines.push("Key requirements:".to_string());
        for req in requirements {
            lines.push(format!("- {}", truncate_head(&req, MAX_REQUIREMENT_CHARS)));
        }
    }

    if let Some(desc) = &job.job_description {
        if !desc.trim().is_empty() {
            lines.push(format!(
                "Job description:\n{}",
                truncate_head(desc, max_desc_chars)
            ));
        }
    }

    lines.join("\n")
}

fn dedup_requirements(requirements: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for req in requirements {
        let trimmed = req.trim();
        if trimmed.is_empty() || seen.iter().any(|s| s == trimmed) {
            continue;
        }
        seen.push(trimmed.to_string());
        if seen.len() == MAX_REQUIREMENTS {
            break;
        }
    }
    seen
}
