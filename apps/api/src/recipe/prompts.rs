// All prompt constants for the default recipe. Templates use {placeholder}
// tokens replaced at build time; cross-cutting fragments live here so the
// per-class builders in default.rs stay small.

/// Answer returned verbatim by the model when an extraction field is absent.
pub const NOT_FOUND_FALLBACK: &str = "Not found in CV";

/// System prompt for data-extraction questions. Terse, literal, no prose.
pub const EXTRACTION_SYSTEM: &str = "\
You extract single facts from a candidate's CV to fill a job-application form field. \
Respond with the exact value from the CV and NOTHING else: no sentence, no label, \
no explanation, no quotation marks. \
If the CV does not contain the requested fact, respond exactly: Not found in CV";

/// User prompt template for data extraction.
/// Replace: {cv_block}, {label}
pub const EXTRACTION_PROMPT_TEMPLATE: &str = "\
CANDIDATE CV:
{cv_block}

Form field requested: {label}

Answer with the exact value from the CV and nothing else. \
If it is not in the CV, answer exactly: Not found in CV";

/// Phrases the model must not use. Application reviewers read hundreds of
/// AI-written answers; these are the tells.
pub const BANNED_PHRASES: &[&str] = &[
    "leverage",
    "leveraging",
    "passionate about",
    "proven track record",
    "results-driven",
    "results-oriented",
    "synergy",
    "think outside the box",
    "team player",
    "go-getter",
    "self-starter",
    "detail-oriented",
    "fast-paced environment",
    "hit the ground running",
    "dynamic professional",
];

/// System prompt template shared by general and why-company answers.
/// Replace: {banned_phrases}
pub const GENERAL_SYSTEM_TEMPLATE: &str = "\
You write answers to job-application questions on behalf of a candidate, \
in the first person, using ONLY facts present in the candidate's CV.

Hard rules:
1. Scan the ENTIRE CV, not just the most recent role. Reference experiences \
from at least 2 different roles or time periods when the CV allows it.
2. When job context is provided, map at least 3 of the job's requirements to \
concrete evidence from the CV.
3. NEVER invent employers, dates, titles, technologies, or metrics that are \
not in the CV. If the CV lacks evidence for a claim, leave the claim out.
4. Never use these phrases or close variants: {banned_phrases}.
5. Do not open with 'As a [current title]' or any restatement of the question.
6. Output the answer text only: no preamble, no headings, no meta-commentary, \
no sign-off unless the question asks for a letter.";

/// User prompt template for general and why-company answers.
/// Replace: {cv_block}, {job_block}, {question}, {word_lo}, {word_hi}
pub const GENERAL_PROMPT_TEMPLATE: &str = "\
CANDIDATE CV:
{cv_block}

{job_block}

APPLICATION QUESTION:
{question}

Write the candidate's answer in the first person. \
Target length: {word_lo}-{word_hi} words.";

/// Appended to the general system prompt for why-company questions.
pub const WHY_COMPANY_APPENDIX: &str = "\

This question asks why the candidate wants THIS job at THIS company. \
Additionally:
7. Name 2-3 specific points from the job context (product, mission, stack, \
team, stated requirements) and map each one to a distinct example from the CV.
8. End with exactly one motivational sentence grounded in the overlap between \
the CV and the job context. Generic enthusiasm ('I would love to grow with \
you') is not acceptable.";

/// System prompt template for cover letters.
/// Replace: {banned_phrases}
pub const COVER_LETTER_SYSTEM_TEMPLATE: &str = "\
You write cover letters on behalf of a job candidate, in the first person, \
using ONLY facts present in the candidate's CV.

Hard rules:
1. Use evidence from the whole CV, not just the latest role. Draw on at least \
2 different roles or time periods.
2. NEVER invent employers, dates, titles, technologies, or metrics that are \
not in the CV.
3. Never use these phrases or close variants: {banned_phrases}.
4. Output the letter only: no preamble, no meta-commentary, no notes about \
what you did.";

/// User prompt template for cover letters.
/// Replace: {cv_block}, {job_block}, {question}, {word_lo}, {word_hi}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = "\
CANDIDATE CV:
{cv_block}

{job_block}

REQUEST FROM THE APPLICATION FORM:
{question}

Write the cover letter with this structure:
1. A greeting ('Dear Hiring Team,' or addressed to the company if it is named \
in the job context).
2. One hook paragraph connecting the candidate to this specific role.
3. 2-3 evidence paragraphs that together map at least 3 of the job's \
requirements to concrete CV evidence, drawn from different roles.
4. A short closing paragraph and sign-off with the candidate's name if the CV \
contains it.

Target length: {word_lo}-{word_hi} words.";
