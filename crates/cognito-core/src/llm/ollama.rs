//! Ollama LLM provider
//!
//! Connects to a local Ollama instance for chat completions.

use super::{LlmError, LlmProvider, ProviderStatus};
use std::time::Duration;

pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Ollama provider for local LLM inference
pub struct OllamaProvider {
    /// Base URL for Ollama API
    base_url: String,

    /// Model to use
    model: String,

    agent: ureq::Agent,
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new(OLLAMA_BASE_URL, "llama3")
    }
}

impl OllamaProvider {
    /// Create a new Ollama provider
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            agent: ureq::Agent::new(),
        }
    }

    /// Create with default URL
    pub fn with_model(model: &str) -> Self {
        Self::new(OLLAMA_BASE_URL, model)
    }

    /// Bound every request by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = ureq::AgentBuilder::new().timeout(timeout).build();
        self
    }
}

impl LlmProvider for OllamaProvider {
    fn id(&self) -> &str {
        "ollama"
    }

    fn name(&self) -> &str {
        "Ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    // Local server, no credentials; reachability surfaces per request.
    fn status(&self) -> ProviderStatus {
        ProviderStatus::Ready
    }

    fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/chat", self.base_url);

        let response = self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_json(&serde_json::json!({
                "model": self.model,
                "messages": [{ "role": "user", "content": prompt }],
                "stream": false
            }))?;

        let json: serde_json::Value = response.into_json()?;

        if let Some(error) = json.get("error").and_then(|e| e.as_str()) {
            return Err(LlmError::Api {
                status: 500,
                message: error.to_string(),
            });
        }

        json.get("message")
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| LlmError::InvalidResponse("missing message.content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_targets_localhost() {
        let provider = OllamaProvider::default();
        assert_eq!(provider.base_url, OLLAMA_BASE_URL);
        assert_eq!(provider.model(), "llama3");
        assert!(provider.status().is_ready());
    }

    #[test]
    fn test_unreachable_server_is_connection_error() {
        // Port 9 (discard) is closed on CI machines.
        let provider = OllamaProvider::new("http://127.0.0.1:9", "llama3")
            .with_timeout(Duration::from_secs(2));
        let err = provider.complete("hi").unwrap_err();
        assert!(matches!(err, LlmError::Connection(_)));
    }
}
