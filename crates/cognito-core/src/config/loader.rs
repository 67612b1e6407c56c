//! Configuration loader with environment variable expansion
//!
//! Loads configuration from `.cognito.toml` in the working directory or the
//! user config directory.

use super::types::{CognitoConfig, ProviderConfig};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Configuration loading error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Load configuration from various sources
///
/// Priority order:
/// 1. Project-level `.cognito.toml`
/// 2. User-level `~/.config/cognito/config.toml`
/// 3. Default configuration
///
/// Environment overrides are applied on top of whichever source wins.
pub fn load_config(project_dir: &Path) -> Result<CognitoConfig, ConfigError> {
    let project_config = project_dir.join(".cognito.toml");
    if project_config.exists() {
        return load_from_file(&project_config);
    }

    if let Some(user_config) = get_user_config_path() {
        if user_config.exists() {
            return load_from_file(&user_config);
        }
    }

    Ok(apply_env_overrides(CognitoConfig::default()))
}

/// Get user config directory path
fn get_user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cognito").join("config.toml"))
}

/// Load configuration from a specific file
pub fn load_from_file(path: &Path) -> Result<CognitoConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut config: CognitoConfig = toml::from_str(&content)?;

    expand_env_vars(&mut config);

    Ok(apply_env_overrides(config))
}

fn env_regex() -> &'static Regex {
    static ENV_REGEX: OnceLock<Regex> = OnceLock::new();
    ENV_REGEX.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

/// Expand ${VAR} patterns in provider string values
fn expand_env_vars(config: &mut CognitoConfig) {
    let env_regex = env_regex();

    for provider in config.llm.providers.values_mut() {
        if let Some(ref api_key) = provider.api_key {
            provider.api_key = Some(expand_string(api_key, env_regex));
        }
        if let Some(ref base_url) = provider.base_url {
            provider.base_url = Some(expand_string(base_url, env_regex));
        }
    }
}

/// Expand environment variables in a single string
fn expand_string(s: &str, regex: &Regex) -> String {
    regex
        .replace_all(s, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn set_api_key(config: &mut CognitoConfig, provider_id: &str, key: String) {
    let provider = config
        .llm
        .providers
        .entry(provider_id.to_string())
        .or_insert_with(ProviderConfig::default);
    provider.api_key = Some(key);
    provider.enabled = true;
}

/// Apply environment variable overrides for common settings
///
/// - GROQ_API_KEY -> groq.api_key
/// - OPENAI_API_KEY -> openai.api_key
/// - ANTHROPIC_API_KEY -> anthropic.api_key
/// - OLLAMA_BASE_URL -> ollama.base_url
/// - COGNITO_PROVIDER / COGNITO_MODEL -> llm.provider / llm.model
/// - COGNITO_KNOWLEDGE_DIR -> knowledge.dir
/// - PORT -> server.port
fn apply_env_overrides(mut config: CognitoConfig) -> CognitoConfig {
    for (env_var, provider_id) in [
        ("GROQ_API_KEY", "groq"),
        ("OPENAI_API_KEY", "openai"),
        ("ANTHROPIC_API_KEY", "anthropic"),
    ] {
        if let Some(key) = non_empty_env(env_var) {
            set_api_key(&mut config, provider_id, key);
        }
    }

    if let Some(url) = non_empty_env("OLLAMA_BASE_URL") {
        let provider = config
            .llm
            .providers
            .entry("ollama".to_string())
            .or_insert_with(ProviderConfig::default);
        provider.base_url = Some(url);
    }

    if let Some(provider) = non_empty_env("COGNITO_PROVIDER") {
        config.llm.provider = provider;
    }

    if let Some(model) = non_empty_env("COGNITO_MODEL") {
        config.llm.model = Some(model);
    }

    if let Some(dir) = non_empty_env("COGNITO_KNOWLEDGE_DIR") {
        config.knowledge.dir = PathBuf::from(dir);
    }

    if let Some(port) = non_empty_env("PORT").and_then(|p| p.parse().ok()) {
        config.server.port = port;
    }

    config
}

/// Create a sample configuration file content
pub fn sample_config() -> &'static str {
    r#"# Cognito Configuration
# Place this file in your project root as .cognito.toml
# or in ~/.config/cognito/config.toml for global settings

[llm]
# Provider: groq, openai, anthropic, ollama
provider = "groq"

# Optional model override (defaults to the provider's default_model)
# model = "llama3-70b-8192"

# HTTP request timeout in seconds
timeout = 120

[llm.providers.groq]
enabled = true
api_key = "${GROQ_API_KEY}"
base_url = "https://api.groq.com/openai/v1"
default_model = "llama3-70b-8192"

[llm.providers.openai]
enabled = false
api_key = "${OPENAI_API_KEY}"
base_url = "https://api.openai.com/v1"
default_model = "gpt-4o"

[llm.providers.anthropic]
enabled = false
api_key = "${ANTHROPIC_API_KEY}"
default_model = "claude-sonnet-4-20250514"

[llm.providers.ollama]
enabled = true
base_url = "http://localhost:11434"
default_model = "llama3"

[analysis]
complexity_threshold = 5
long_function_lines = 30
# builtin or bandit
scanner = "builtin"
bandit_command = "bandit"

[knowledge]
dir = "knowledge_base"

[pipeline]
analysis_timeout = 30
retrieval_timeout = 5
generation_timeout = 180

[server]
host = "127.0.0.1"
port = 8000
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScannerKind;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = CognitoConfig::default();
        assert_eq!(config.llm.provider, "groq");
        assert!(config.llm.providers.contains_key("groq"));
        assert_eq!(config.active_model().as_deref(), Some("llama3-70b-8192"));
        assert_eq!(config.analysis.complexity_threshold, 5);
        assert_eq!(config.analysis.long_function_lines, 30);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_expand_env_var() {
        std::env::set_var("COGNITO_TEST_VAR", "test_value");
        let result = expand_string("prefix_${COGNITO_TEST_VAR}_suffix", env_regex());
        assert_eq!(result, "prefix_test_value_suffix");
        std::env::remove_var("COGNITO_TEST_VAR");
    }

    #[test]
    fn test_missing_env_var() {
        let result = expand_string("${COGNITO_NONEXISTENT_VAR}", env_regex());
        assert_eq!(result, "${COGNITO_NONEXISTENT_VAR}");
    }

    #[test]
    fn test_sample_config_parses() {
        let config: CognitoConfig = toml::from_str(sample_config()).unwrap();
        assert_eq!(config.llm.provider, "groq");
        assert_eq!(config.analysis.scanner, ScannerKind::Builtin);
        assert_eq!(config.pipeline.generation_timeout, 180);
        assert_eq!(config.llm.providers.len(), 4);
    }

    #[test]
    fn test_load_from_file_partial_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[analysis]\nscanner = \"bandit\"\ncomplexity_threshold = 8\n\n[knowledge]\ndir = \"kb\""
        )
        .unwrap();

        let config = load_from_file(file.path()).unwrap();
        assert_eq!(config.analysis.scanner, ScannerKind::Bandit);
        assert_eq!(config.analysis.complexity_threshold, 8);
        assert_eq!(config.analysis.long_function_lines, 30);
        assert_eq!(config.knowledge.dir, PathBuf::from("kb"));
        assert!(config.llm.providers.contains_key("ollama"));
    }

    #[test]
    fn test_load_from_file_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[llm\nprovider = ").unwrap();
        assert!(matches!(
            load_from_file(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }
}
