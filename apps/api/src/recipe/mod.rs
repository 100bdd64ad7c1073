//! Recipes — pluggable prompt-construction strategies.
//!
//! A recipe turns a validated structured request into a `PromptPair`. The
//! bundled `default` recipe carries the full answer policy; `plain` is a
//! minimal variant useful when debugging prompt problems. The implementation
//! is chosen once at startup from the `RECIPE` config knob via a static
//! registry (`AppState` holds an `Arc<dyn Recipe>`); an unknown name logs a
//! warning and falls back to the default rather than failing startup.

pub mod assemble;
pub mod default;
pub mod plain;
pub mod prompts;

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::models::generation::StructuredRequest;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Hard prompt bounds, enforced at the gateway boundary (413, never a second
/// truncation). The assembler's caps sit well below these.
pub const MIN_PROMPT_CHARS: usize = 10;
pub const MAX_SYSTEM_PROMPT_CHARS: usize = 30_000;
pub const MAX_USER_PROMPT_CHARS: usize = 120_000;

/// What a recipe produces: the exact payload for the model backend.
#[derive(Debug, Clone)]
pub struct PromptPair {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
}

/// A recipe failed to build prompts. Mapped to HTTP 500 with a truncated
/// diagnostic; must never leak CV or job text.
#[derive(Debug, Error)]
#[error("recipe '{recipe}' failed: {detail}")]
pub struct RecipeError {
    pub recipe: &'static str,
    pub detail: String,
}

/// The prompt-construction seam. One method, selected at process start.
pub trait Recipe: Send + Sync {
    fn name(&self) -> &'static str;

    fn build_prompts(&self, request: &StructuredRequest) -> Result<PromptPair, RecipeError>;
}

/// Resolves a recipe by name. Unknown names fall back to the default with a
/// warning — a bad `RECIPE` value must not take the service down.
pub fn select_recipe(name: &str) -> Arc<dyn Recipe> {
    match name {
        "default" => Arc::new(default::DefaultRecipe),
        "plain" => Arc::new(plain::PlainRecipe),
        other => {
            warn!(recipe = other, "unknown recipe name, falling back to default");
            Arc::new(default::DefaultRecipe)
        }
    }
}

/// Logs the selected recipe at startup.
pub fn log_selected(recipe: &dyn Recipe) {
    info!(recipe = recipe.name(), "prompt recipe selected");
}
