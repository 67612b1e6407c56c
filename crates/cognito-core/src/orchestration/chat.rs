//! Chat turn: one prompt, one generation call. The caller owns the history.

use super::stage::generate_bounded;
use crate::llm::SharedGenerator;
use crate::prompt::build_chat_prompt;
use crate::types::{ChatResult, ConversationTurn};
use crate::Result;
use std::time::Duration;

#[derive(Clone)]
pub struct ChatOrchestrator {
    generator: SharedGenerator,
    timeout: Duration,
}

impl ChatOrchestrator {
    pub fn new(generator: SharedGenerator) -> Self {
        Self {
            generator,
            timeout: super::StageTimeouts::default().generation,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Answer `question` about `code` given the conversation so far
    pub async fn run(
        &self,
        code: &str,
        history: &[ConversationTurn],
        question: &str,
    ) -> Result<ChatResult> {
        tracing::debug!(turns = history.len(), "chat started");
        let prompt = build_chat_prompt(code, history, question);
        let answer = generate_bounded(&self.generator, "chat", prompt, self.timeout).await?;
        tracing::debug!(len = answer.len(), "chat answered");
        Ok(ChatResult { answer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{inline_error, is_inline_error, Generate, LlmError};
    use crate::CognitoError;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct EchoGenerator {
        last_prompt: Mutex<Option<String>>,
    }

    impl Generate for EchoGenerator {
        fn generate(&self, prompt: &str) -> String {
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            "It assigns 1 to x.".to_string()
        }
    }

    struct OfflineGenerator;

    impl Generate for OfflineGenerator {
        fn generate(&self, _prompt: &str) -> String {
            inline_error(&LlmError::Connection("dns error".to_string()))
        }
    }

    struct StuckGenerator;

    impl Generate for StuckGenerator {
        fn generate(&self, _prompt: &str) -> String {
            std::thread::sleep(Duration::from_millis(300));
            String::new()
        }
    }

    #[tokio::test]
    async fn test_chat_prompt_and_answer() {
        let generator = Arc::new(EchoGenerator::default());
        let chat = ChatOrchestrator::new(generator.clone());

        let history = vec![ConversationTurn::user("hi")];
        let result = chat.run("x=1", &history, "what does this do?").await.unwrap();
        assert_eq!(result.answer, "It assigns 1 to x.");

        let prompt = generator.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("x=1"));
        assert!(prompt.contains("user: hi"));
        assert!(prompt.contains("what does this do?"));
    }

    #[tokio::test]
    async fn test_offline_generator_answers_inline_error() {
        let chat = ChatOrchestrator::new(Arc::new(OfflineGenerator));
        let result = chat.run("x=1", &[], "why?").await.unwrap();
        assert!(is_inline_error(&result.answer));
        assert!(result.answer.contains("dns error"));
    }

    #[tokio::test]
    async fn test_chat_timeout_is_error() {
        let chat = ChatOrchestrator::new(Arc::new(StuckGenerator))
            .with_timeout(Duration::from_millis(20));
        let err = chat.run("x=1", &[], "why?").await.unwrap_err();
        assert!(matches!(err, CognitoError::Timeout { stage: "chat", .. }));
    }
}
