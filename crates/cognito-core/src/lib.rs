//! Cognito Core - Backend library for Cognito
//!
//! This crate provides the transport-agnostic backend of the code
//! refactoring copilot:
//! - Static analysis (complexity, smells, security findings)
//! - Best-practice context retrieval from a knowledge directory
//! - Prompt construction for refactor, test and chat requests
//! - LLM providers (Groq, OpenAI, Anthropic, Ollama)
//! - Refactor and chat orchestration with per-stage timeouts
//! - Configuration loading
//!
//! Any front end (HTTP, CLI) consumes this crate through [`CopilotService`].
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐  refactor/chat  ┌──────────────────┐
//! │   Any caller      │ ───────────────→│   cognito-core   │
//! │ (HTTP, CLI)       │                 │  CopilotService  │
//! │                   │ ←───────────────│                  │
//! └───────────────────┘     results     └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use cognito_core::{load_config, CopilotService, RefactorStyle};
//!
//! let config = load_config(&std::env::current_dir()?)?;
//! let service = CopilotService::from_config(&config)?;
//!
//! let result = service
//!     .refactor("def f(x):\n return x+1", RefactorStyle::parse("conciseness"))
//!     .await?;
//! println!("{}", result.refactored_code);
//! ```

// Public API modules
pub mod error;
pub mod types;

// Configuration
pub mod config;

// Capabilities
pub mod analysis;
pub mod knowledge;
pub mod llm;

// Prompt construction
pub mod prompt;

// Request orchestration
pub mod orchestration;

// Main service facade
pub mod service;

// Re-export commonly used types
pub use error::{CognitoError, Result};
pub use types::{ChatResult, ConversationTurn, RefactorResult, TurnRole, DOCUMENTATION_NOTE};

// Re-export config types
pub use config::{
    load_config, AnalysisConfig, CognitoConfig, KnowledgeConfig, LlmConfig, PipelineConfig,
    ProviderConfig, ScannerKind, ServerConfig,
};

// Re-export capability types
pub use analysis::{AnalysisReport, Analyze, CodeAnalyzer, ComplexityScore, SmellTag};
pub use knowledge::{ContextSource, KnowledgeBase};
pub use llm::{Generate, LlmError, LlmGenerator, LlmProvider, SharedProvider};

// Re-export prompt and orchestration types
pub use orchestration::{ChatOrchestrator, RefactorOrchestrator, StageTimeouts};
pub use prompt::{extract_code_block, RefactorStyle};
pub use service::CopilotService;

/// Get the crate version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
