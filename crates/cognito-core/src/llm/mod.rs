//! LLM integration module
//!
//! Provides single-turn completion against one configured provider, plus the
//! generation capability that turns provider faults into inline text.
//!
//! Supported providers:
//! - OpenAI-compatible (OpenAI, Groq)
//! - Anthropic
//! - Ollama (local inference)

mod anthropic;
mod builder;
mod error;
mod generator;
mod ollama;
mod openai;
mod provider;

pub use builder::build_provider;
pub use error::LlmError;
pub use generator::{
    inline_error, is_inline_error, Generate, LlmGenerator, SharedGenerator,
    GENERATION_ERROR_PREFIX,
};
pub use provider::{LlmProvider, ProviderStatus, SharedProvider};

// Provider implementations
pub use anthropic::AnthropicProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAIProvider;
