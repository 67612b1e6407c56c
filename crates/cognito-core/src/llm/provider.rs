//! LLM provider trait and status

use super::LlmError;

/// Provider status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderStatus {
    /// Ready to accept requests
    Ready,

    /// Not available (no API key, disabled, etc.)
    Unavailable(String),
}

impl ProviderStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, ProviderStatus::Ready)
    }
}

/// LLM provider trait
///
/// Defines the interface for the chat-completion backends (OpenAI-compatible,
/// Anthropic, Ollama). A provider sends one user prompt and returns the full
/// completion text; it blocks the calling thread for the duration of the HTTP
/// request.
pub trait LlmProvider: Send + Sync {
    /// Get the provider's unique identifier (e.g., "groq", "anthropic", "ollama")
    fn id(&self) -> &str;

    /// Get the provider's display name
    fn name(&self) -> &str;

    /// Get the model this provider sends requests to
    fn model(&self) -> &str;

    /// Get current provider status
    fn status(&self) -> ProviderStatus;

    /// Send a single-turn prompt and return the completion text
    fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Wrapper to make Box<dyn LlmProvider> cloneable via Arc
pub type SharedProvider = std::sync::Arc<dyn LlmProvider>;
