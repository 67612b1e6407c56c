//! Configuration module for Cognito
//!
//! Handles loading and parsing of `.cognito.toml` configuration files
//! with support for environment variable expansion.

mod loader;
mod types;

pub use loader::{load_config, load_from_file, sample_config, ConfigError};
pub use types::{
    AnalysisConfig, CognitoConfig, KnowledgeConfig, LlmConfig, PipelineConfig, ProviderConfig,
    ScannerKind, ServerConfig,
};
