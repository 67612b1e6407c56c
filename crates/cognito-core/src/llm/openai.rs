//! OpenAI-compatible LLM provider
//!
//! Talks to any `/chat/completions` endpoint: OpenAI itself, Groq, or a local
//! proxy exposing the same API.

use super::{LlmError, LlmProvider, ProviderStatus};
use std::time::Duration;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// OpenAI-compatible provider
pub struct OpenAIProvider {
    /// Registry id ("openai", "groq", ...)
    id: String,

    /// Display name
    name: String,

    /// API key
    api_key: String,

    /// Base URL for the API
    base_url: String,

    /// Model to use
    model: String,

    /// HTTP agent, reused across requests
    agent: ureq::Agent,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            id: "openai".to_string(),
            name: "OpenAI".to_string(),
            api_key: api_key.to_string(),
            base_url: OPENAI_BASE_URL.to_string(),
            model: model.to_string(),
            agent: ureq::Agent::new(),
        }
    }

    /// Create a provider for Groq's OpenAI-compatible endpoint
    pub fn groq(api_key: &str, model: &str) -> Self {
        Self {
            id: "groq".to_string(),
            name: "Groq".to_string(),
            base_url: GROQ_BASE_URL.to_string(),
            ..Self::new(api_key, model)
        }
    }

    /// Create with a specific base URL (for OpenAI-compatible APIs like Azure, local proxies)
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Bound every request by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = ureq::AgentBuilder::new().timeout(timeout).build();
        self
    }
}

impl LlmProvider for OpenAIProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn status(&self) -> ProviderStatus {
        if self.api_key.is_empty() {
            ProviderStatus::Unavailable("No API key configured".to_string())
        } else {
            ProviderStatus::Ready
        }
    }

    fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(&body)?;

        let json: serde_json::Value = response.into_json()?;
        parse_completion(&json)
    }
}

/// Pull the first choice's message text out of a chat completion
fn parse_completion(json: &serde_json::Value) -> Result<String, LlmError> {
    if let Some(error) = json.get("error") {
        let error_msg = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error");
        return Err(LlmError::Api {
            status: 500,
            message: error_msg.to_string(),
        });
    }

    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| LlmError::InvalidResponse("missing choices[0].message.content".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_completion() {
        let json = serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "```python\npass\n```" } }]
        });
        assert_eq!(parse_completion(&json).unwrap(), "```python\npass\n```");
    }

    #[test]
    fn test_parse_completion_error_body() {
        let json = serde_json::json!({ "error": { "message": "model decommissioned" } });
        let err = parse_completion(&json).unwrap_err();
        assert!(matches!(err, LlmError::Api { message, .. } if message == "model decommissioned"));
    }

    #[test]
    fn test_parse_completion_missing_content() {
        let json = serde_json::json!({ "choices": [] });
        assert!(matches!(
            parse_completion(&json),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_groq_identity() {
        let provider = OpenAIProvider::groq("key", "llama3-70b-8192");
        assert_eq!(provider.id(), "groq");
        assert_eq!(provider.model(), "llama3-70b-8192");
        assert!(provider.status().is_ready());
    }

    #[test]
    fn test_missing_key_is_unavailable() {
        let provider = OpenAIProvider::new("", "gpt-4o").with_base_url("http://localhost:9/v1/");
        assert!(!provider.status().is_ready());
        assert_eq!(provider.base_url, "http://localhost:9/v1");
    }
}
