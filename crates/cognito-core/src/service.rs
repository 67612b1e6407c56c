//! CopilotService - backend facade
//!
//! Bundles the refactor and chat orchestrators over one set of capabilities.
//! Built once at startup and shared by reference; it holds no per-request
//! state, so concurrent requests never interfere.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  refactor / chat  ┌────────────────────┐
//! │  Any caller  │ ─────────────────→│   CopilotService   │
//! │ (HTTP, CLI)  │                   │                    │
//! │              │ ←─────────────────│ analysis, context, │
//! └──────────────┘  RefactorResult   │ generation         │
//!                   / ChatResult     └────────────────────┘
//! ```

use crate::analysis::{CodeAnalyzer, SharedAnalyzer};
use crate::config::CognitoConfig;
use crate::error::Result;
use crate::knowledge::{KnowledgeBase, SharedContextSource};
use crate::llm::{build_provider, LlmGenerator, SharedGenerator};
use crate::orchestration::{ChatOrchestrator, RefactorOrchestrator, StageTimeouts};
use crate::prompt::RefactorStyle;
use crate::types::{ChatResult, ConversationTurn, RefactorResult};
use std::sync::Arc;

/// Main backend service facade
#[derive(Clone)]
pub struct CopilotService {
    refactor: RefactorOrchestrator,
    chat: ChatOrchestrator,
    provider_label: String,
}

impl CopilotService {
    /// Assemble the service from injected capabilities
    pub fn new(
        analyzer: SharedAnalyzer,
        context: SharedContextSource,
        generator: SharedGenerator,
        timeouts: StageTimeouts,
    ) -> Self {
        Self {
            refactor: RefactorOrchestrator::new(analyzer, context, generator.clone())
                .with_timeouts(timeouts),
            chat: ChatOrchestrator::new(generator).with_timeout(timeouts.generation),
            provider_label: "custom".to_string(),
        }
    }

    /// Build every capability from configuration.
    ///
    /// Fails when the generation provider is misconfigured (unknown, disabled,
    /// or missing credentials); the caller should treat that as fatal.
    pub fn from_config(config: &CognitoConfig) -> Result<Self> {
        let provider = build_provider(config)?;
        let provider_label = format!("{}/{}", provider.id(), provider.model());

        let knowledge_dir = &config.knowledge.dir;
        if !knowledge_dir.is_dir() {
            tracing::warn!(
                dir = %knowledge_dir.display(),
                "knowledge directory not found; retrieval will fall back to defaults"
            );
        }

        let mut service = Self::new(
            Arc::new(CodeAnalyzer::from_config(&config.analysis)),
            Arc::new(KnowledgeBase::new(knowledge_dir.clone())),
            Arc::new(LlmGenerator::new(provider)),
            StageTimeouts::from(&config.pipeline),
        );
        service.provider_label = provider_label;

        tracing::info!(
            provider = %service.provider_label,
            scanner = ?config.analysis.scanner,
            "copilot service ready"
        );
        Ok(service)
    }

    /// `provider/model` of the generation backend
    pub fn provider_label(&self) -> &str {
        &self.provider_label
    }

    /// Analyze, retrieve context, then generate a refactor and its tests
    pub async fn refactor(&self, code: &str, style: RefactorStyle) -> Result<RefactorResult> {
        self.refactor.run(code, style).await
    }

    /// Answer a follow-up question about `code`
    pub async fn chat(
        &self,
        code: &str,
        history: &[ConversationTurn],
        question: &str,
    ) -> Result<ChatResult> {
        self.chat.run(code, history, question).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::GENERIC_CONTEXT;
    use crate::llm::Generate;
    use crate::CognitoError;
    use pretty_assertions::assert_eq;

    struct Canned;

    impl Generate for Canned {
        fn generate(&self, prompt: &str) -> String {
            if prompt.contains(GENERIC_CONTEXT) {
                "refactored".to_string()
            } else {
                "answer".to_string()
            }
        }
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let mut config = CognitoConfig::default();
        config.llm.provider = "openai".to_string();
        if let Some(p) = config.llm.providers.get_mut("openai") {
            p.api_key = None;
        }
        let err = CopilotService::from_config(&config).err().unwrap();
        assert!(matches!(err, CognitoError::Config(_)));
    }

    #[test]
    fn test_from_config_with_ollama() {
        let mut config = CognitoConfig::default();
        config.llm.provider = "ollama".to_string();
        let service = CopilotService::from_config(&config).unwrap();
        assert!(service.provider_label().starts_with("ollama/"));
    }

    #[tokio::test]
    async fn test_refactor_and_chat_share_generator() {
        let dir = tempfile::TempDir::new().unwrap();
        let service = CopilotService::new(
            Arc::new(CodeAnalyzer::default()),
            Arc::new(KnowledgeBase::new(dir.path())),
            Arc::new(Canned),
            StageTimeouts::default(),
        );

        let result = service
            .refactor("def f(x):\n return x+1", RefactorStyle::Readability)
            .await
            .unwrap();
        assert_eq!(result.refactored_code, "refactored");
        assert_eq!(result.unit_tests, "answer");

        let chat = service
            .chat("x=1", &[ConversationTurn::user("hi")], "what?")
            .await
            .unwrap();
        assert_eq!(chat.answer, "answer");
        assert_eq!(service.provider_label(), "custom");
    }
}
