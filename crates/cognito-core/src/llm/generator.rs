//! Generation capability
//!
//! Wraps a provider so that every call yields displayable text. Provider
//! faults are turned into an inline error string instead of an `Err`.

use super::{LlmError, SharedProvider};
use std::sync::Arc;

/// Prefix of every inline generation error
pub const GENERATION_ERROR_PREFIX: &str = "Error communicating with LLM:";

/// Prompt in, text out. Never fails; blocks for the duration of the call.
pub trait Generate: Send + Sync {
    fn generate(&self, prompt: &str) -> String;
}

pub type SharedGenerator = Arc<dyn Generate>;

/// Format a provider fault as inline generation output
pub fn inline_error(err: &LlmError) -> String {
    format!("{} {}", GENERATION_ERROR_PREFIX, err)
}

/// Whether `text` is an inline generation error rather than model output
pub fn is_inline_error(text: &str) -> bool {
    text.starts_with(GENERATION_ERROR_PREFIX)
}

/// Generation capability backed by an LLM provider
pub struct LlmGenerator {
    provider: SharedProvider,
}

impl LlmGenerator {
    pub fn new(provider: SharedProvider) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &SharedProvider {
        &self.provider
    }
}

impl Generate for LlmGenerator {
    fn generate(&self, prompt: &str) -> String {
        match self.provider.complete(prompt) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(
                    provider = self.provider.id(),
                    model = self.provider.model(),
                    error = %err,
                    "generation failed; returning inline error"
                );
                inline_error(&err)
            }
        }
    }
}
