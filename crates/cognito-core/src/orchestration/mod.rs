//! Request orchestration
//!
//! Two independent entry points, each invoked once per request:
//! - [`RefactorOrchestrator`]: analysis, context retrieval, then refactor and
//!   test generation
//! - [`ChatOrchestrator`]: a single generation call over the chat prompt
//!
//! # Example
//!
//! ```no_run
//! use cognito_core::analysis::CodeAnalyzer;
//! use cognito_core::knowledge::KnowledgeBase;
//! use cognito_core::llm::{LlmGenerator, OllamaProvider};
//! use cognito_core::orchestration::RefactorOrchestrator;
//! use cognito_core::RefactorStyle;
//! use std::sync::Arc;
//!
//! # async fn demo() -> cognito_core::Result<()> {
//! let generator = Arc::new(LlmGenerator::new(Arc::new(OllamaProvider::default())));
//! let orchestrator = RefactorOrchestrator::new(
//!     Arc::new(CodeAnalyzer::default()),
//!     Arc::new(KnowledgeBase::new("knowledge_base")),
//!     generator,
//! );
//! let result = orchestrator.run("def f(x):\n return x+1", RefactorStyle::Conciseness).await?;
//! println!("{}", result.refactored_code);
//! # Ok(())
//! # }
//! ```

mod chat;
mod refactor;
mod stage;

pub use chat::ChatOrchestrator;
pub use refactor::RefactorOrchestrator;
pub use stage::StageTimeouts;
