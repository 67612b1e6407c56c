//! Provider construction from configuration

use super::{AnthropicProvider, OllamaProvider, OpenAIProvider, ProviderStatus, SharedProvider};
use crate::config::CognitoConfig;
use crate::error::{CognitoError, Result};
use std::sync::Arc;
use std::time::Duration;

/// Build the configured provider
///
/// Fails when the provider is unknown, disabled, has no model, or reports
/// itself unavailable (e.g. no API key). These are startup errors; callers
/// should not retry them per request.
pub fn build_provider(config: &CognitoConfig) -> Result<SharedProvider> {
    let id = config.llm.provider.as_str();
    let provider_config = config
        .active_provider_config()
        .ok_or_else(|| CognitoError::config(format!("Unknown LLM provider '{}'", id)))?;

    if !provider_config.enabled {
        return Err(CognitoError::config(format!(
            "LLM provider '{}' is disabled",
            id
        )));
    }

    let model = config
        .active_model()
        .ok_or_else(|| CognitoError::config(format!("No model configured for '{}'", id)))?;
    let timeout = Duration::from_secs(config.llm.timeout);
    let base_url = provider_config.base_url.as_deref();

    // An unexpanded `${VAR}` placeholder counts as no key at all.
    let api_key = provider_config
        .api_key
        .as_deref()
        .filter(|k| !k.starts_with("${"))
        .unwrap_or("");

    let provider: SharedProvider = match id {
        "groq" => {
            let mut p = OpenAIProvider::groq(api_key, &model).with_timeout(timeout);
            if let Some(url) = base_url {
                p = p.with_base_url(url);
            }
            Arc::new(p)
        }
        "openai" => {
            let mut p = OpenAIProvider::new(api_key, &model).with_timeout(timeout);
            if let Some(url) = base_url {
                p = p.with_base_url(url);
            }
            Arc::new(p)
        }
        "anthropic" => {
            let mut p = AnthropicProvider::new(api_key, &model).with_timeout(timeout);
            if let Some(url) = base_url {
                p = p.with_base_url(url);
            }
            Arc::new(p)
        }
        "ollama" => Arc::new(
            OllamaProvider::new(base_url.unwrap_or(super::ollama::OLLAMA_BASE_URL), &model)
                .with_timeout(timeout),
        ),
        other => {
            return Err(CognitoError::config(format!(
                "Unsupported LLM provider: {}",
                other
            )))
        }
    };

    if let ProviderStatus::Unavailable(reason) = provider.status() {
        return Err(CognitoError::config(format!(
            "LLM provider '{}' is unavailable: {}",
            id, reason
        )));
    }

    tracing::info!(
        provider = provider.name(),
        model = provider.model(),
        "LLM provider ready"
    );
    Ok(provider)
}
