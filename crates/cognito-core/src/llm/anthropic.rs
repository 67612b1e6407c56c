//! Anthropic LLM provider
//!
//! Connects to Anthropic's Messages API.

use super::{LlmError, LlmProvider, ProviderStatus};
use std::time::Duration;

/// Anthropic provider
pub struct AnthropicProvider {
    api_key: String,
    base_url: String,
    model: String,
    agent: ureq::Agent,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            model: model.to_string(),
            agent: ureq::Agent::new(),
        }
    }

    /// Create with a specific base URL (for proxies)
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

impl LlmProvider for AnthropicProvider {
    fn id(&self) -> &str {
        "anthropic"
    }

    fn name(&self) -> &str {
        "Anthropic"
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
            "max_tokens": 8192,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let url = format!("{}/v1/messages", self.base_url);

        let response = self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .set("x-api-key", &self.api_key)
            .set("anthropic-version", "2023-06-01")
            .send_json(&body)?;

        let json: serde_json::Value = response.into_json()?;
        parse_message(&json)
    }
}

/// Concatenate the text blocks of a Messages API response
fn parse_message(json: &serde_json::Value) -> Result<String, LlmError> {
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

    let blocks = json
        .get("content")
        .and_then(|c| c.as_array())
        .ok_or_else(|| LlmError::InvalidResponse("missing content".to_string()))?;

    let text: String = blocks
        .iter()
        .filter(|b| b.get("type").and_then(|t| t.as_str()) == Some("text"))
        .filter_map(|b| b.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.is_empty() {
        return Err(LlmError::InvalidResponse("no text blocks".to_string()));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_message_joins_text_blocks() {
        let json = serde_json::json!({
            "content": [
                { "type": "text", "text": "def f():\n" },
                { "type": "text", "text": "    pass" }
            ]
        });
        assert_eq!(parse_message(&json).unwrap(), "def f():\n    pass");
    }

    #[test]
    fn test_parse_message_without_text() {
        let json = serde_json::json!({ "content": [] });
        assert!(matches!(parse_message(&json), Err(LlmError::InvalidResponse(_))));
    }
}
