//! Request and result types shared by the orchestrators and the server
//!
//! These types are serializable for the HTTP API.

use crate::analysis::AnalysisReport;
use crate::prompt::extract_code_block;
use serde::{Deserialize, Serialize};

/// Fixed documentation note attached to every refactor result
pub const DOCUMENTATION_NOTE: &str = "Generated from refactored code.";

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message of a conversation. The caller owns the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ConversationTurn {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }
}

/// Output of the refactor pipeline. Built only once every stage has finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefactorResult {
    pub original_code: String,
    pub refactored_code: String,
    /// Always [`DOCUMENTATION_NOTE`]
    pub documentation: String,
    pub unit_tests: String,
    pub analysis_report: AnalysisReport,
}

/// Output of a chat turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResult {
    pub answer: String,
}

impl ChatResult {
    /// Replacement code if the answer carries a python block.
    /// `None` means the caller keeps its current code.
    pub fn updated_code(&self) -> Option<String> {
        extract_code_block(&self.answer, "python")
    }
}
