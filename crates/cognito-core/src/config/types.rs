//! Configuration types for Cognito
//!
//! Defines the structure of `.cognito.toml` configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CognitoConfig {
    /// LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Static analysis thresholds and scanner selection
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Best-practice knowledge base
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Per-stage timeouts
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// LLM configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider to use (groq, openai, anthropic, ollama)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model override; falls back to the provider's `default_model`
    #[serde(default)]
    pub model: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Provider configurations
    #[serde(default = "default_providers")]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "groq".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            timeout: default_timeout(),
            providers: default_providers(),
        }
    }
}

/// Individual provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// API key (supports ${ENV_VAR} syntax)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL for the API
    #[serde(default)]
    pub base_url: Option<String>,

    /// Default model for this provider
    #[serde(default)]
    pub default_model: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: None,
            default_model: None,
        }
    }
}

/// Create default provider configurations
fn default_providers() -> HashMap<String, ProviderConfig> {
    let mut providers = HashMap::new();

    providers.insert(
        "groq".to_string(),
        ProviderConfig {
            enabled: true,
            api_key: None,
            base_url: Some("https://api.groq.com/openai/v1".to_string()),
            default_model: Some("llama3-70b-8192".to_string()),
        },
    );

    providers.insert(
        "openai".to_string(),
        ProviderConfig {
            enabled: false,
            api_key: None,
            base_url: Some("https://api.openai.com/v1".to_string()),
            default_model: Some("gpt-4o".to_string()),
        },
    );

    providers.insert(
        "anthropic".to_string(),
        ProviderConfig {
            enabled: false,
            api_key: None,
            base_url: Some("https://api.anthropic.com".to_string()),
            default_model: Some("claude-sonnet-4-20250514".to_string()),
        },
    );

    // Ollama - local, no API key needed
    providers.insert(
        "ollama".to_string(),
        ProviderConfig {
            enabled: true,
            api_key: None,
            base_url: Some("http://localhost:11434".to_string()),
            default_model: Some("llama3".to_string()),
        },
    );

    providers
}

/// Security scanner backing the analysis capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScannerKind {
    /// Rule scanner compiled into the binary
    #[default]
    Builtin,
    /// External `bandit` executable
    Bandit,
}

/// Static analysis section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Complexity above which `high_cyclomatic_complexity` is raised
    #[serde(default = "default_complexity_threshold")]
    pub complexity_threshold: u32,

    /// Line count above which `long_function` is raised
    #[serde(default = "default_long_function_lines")]
    pub long_function_lines: usize,

    /// Which security scanner to run
    #[serde(default)]
    pub scanner: ScannerKind,

    /// Command used when `scanner = "bandit"`
    #[serde(default = "default_bandit_command")]
    pub bandit_command: String,
}

fn default_complexity_threshold() -> u32 {
    5
}

fn default_long_function_lines() -> usize {
    30
}

fn default_bandit_command() -> String {
    "bandit".to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            complexity_threshold: default_complexity_threshold(),
            long_function_lines: default_long_function_lines(),
            scanner: ScannerKind::default(),
            bandit_command: default_bandit_command(),
        }
    }
}

/// Knowledge base section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Directory holding one `<smell>.md` file per smell
    #[serde(default = "default_knowledge_dir")]
    pub dir: PathBuf,
}

fn default_knowledge_dir() -> PathBuf {
    PathBuf::from("knowledge_base")
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            dir: default_knowledge_dir(),
        }
    }
}

/// Per-stage timeouts, in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_analysis_timeout")]
    pub analysis_timeout: u64,

    #[serde(default = "default_retrieval_timeout")]
    pub retrieval_timeout: u64,

    #[serde(default = "default_generation_timeout")]
    pub generation_timeout: u64,
}

fn default_analysis_timeout() -> u64 {
    30
}

fn default_retrieval_timeout() -> u64 {
    5
}

fn default_generation_timeout() -> u64 {
    180
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            analysis_timeout: default_analysis_timeout(),
            retrieval_timeout: default_retrieval_timeout(),
            generation_timeout: default_generation_timeout(),
        }
    }
}

impl PipelineConfig {
    pub fn analysis(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout)
    }

    pub fn retrieval(&self) -> Duration {
        Duration::from_secs(self.retrieval_timeout)
    }

    pub fn generation(&self) -> Duration {
        Duration::from_secs(self.generation_timeout)
    }
}

/// HTTP server section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl CognitoConfig {
    /// Get a provider config by name
    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.llm.providers.get(name)
    }

    /// Get the selected provider config
    pub fn active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider(&self.llm.provider)
    }

    /// Model for the selected provider, honoring the `llm.model` override
    pub fn active_model(&self) -> Option<String> {
        self.llm.model.clone().or_else(|| {
            self.active_provider_config()
                .and_then(|p| p.default_model.clone())
        })
    }
}
