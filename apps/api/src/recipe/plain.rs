//! Minimal recipe: same context assembly, none of the policy blocks.
//!
//! Useful when a policy instruction is suspected of steering the model wrong —
//! run the same request through `RECIPE=plain` and diff the behavior.

use crate::models::generation::StructuredRequest;
use crate::recipe::assemble::{assemble, MAX_CV_CHARS_NARRATIVE, MAX_JOB_DESC_CHARS};
use crate::recipe::{PromptPair, Recipe, RecipeError, DEFAULT_TEMPERATURE};

const PLAIN_SYSTEM: &str = "\
You answer job-application questions in the first person on behalf of a \
candidate, using only facts from the CV provided. Output the answer text only.";

pub struct PlainRecipe;

impl Recipe for PlainRecipe {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn build_prompts(&self, request: &StructuredRequest) -> Result<PromptPair, RecipeError> {
        let context = assemble(
            &request.cv_text,
            &request.job,
            MAX_CV_CHARS_NARRATIVE,
            MAX_JOB_DESC_CHARS,
        );

        let mut user_prompt = format!("CANDIDATE CV:\n{}\n\n", context.cv_block);
        if !context.job_block.is_empty() {
            user_prompt.push_str(&format!("JOB CONTEXT:\n{}\n\n", context.job_block));
        }
        user_prompt.push_str(&format!("QUESTION:\n{}", request.question));

        Ok(PromptPair {
            system_prompt: PLAIN_SYSTEM.to_string(),
            user_prompt,
            temperature: DEFAULT_TEMPERATURE,
        })
    }
}
