//! Prompt construction
//!
//! All builders are pure: the same inputs always give the same prompt, and
//! every placeholder is filled before the text leaves this module.

use crate::types::ConversationTurn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Goal of a refactoring request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefactorStyle {
    #[default]
    Readability,
    Conciseness,
    /// Annotate only; the logic must not change
    Documentation,
}

impl RefactorStyle {
    /// Parse a style name; anything unrecognized is `Readability`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "conciseness" => RefactorStyle::Conciseness,
            "documentation" => RefactorStyle::Documentation,
            "readability" => RefactorStyle::Readability,
            other => {
                tracing::debug!(style = other, "unknown refactor style, using readability");
                RefactorStyle::Readability
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RefactorStyle::Readability => "readability",
            RefactorStyle::Conciseness => "conciseness",
            RefactorStyle::Documentation => "documentation",
        }
    }
}

impl From<&str> for RefactorStyle {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for RefactorStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Instruction asking the model to rewrite `code` in `style`
pub fn build_refactor_prompt(style: RefactorStyle, code: &str, context: &str) -> String {
    match style {
        RefactorStyle::Readability => format!(
            "**Context:** {context}\n\
             **Task:** Based on the context, refactor the following Python code to prioritize \
             **maximum readability and clarity**.\n\
             Break it down into smaller, well-named functions. Add comprehensive Google-style \
             docstrings and type hints.\n\
             \n\
             **Original Code:**\n\
             ```python\n\
             {code}\n\
             ```\n\
             **Your response should be ONLY the refactored Python code block.**\n"
        ),
        RefactorStyle::Conciseness => format!(
            "**Context:** {context}\n\
             **Task:** Based on the context, refactor the following Python code to be as \
             **concise and Pythonic as possible**.\n\
             Use modern Python features like list comprehensions, ternary operators, and other \
             idioms where appropriate, without sacrificing essential readability. Add minimal \
             docstrings and type hints.\n\
             \n\
             **Original Code:**\n\
             ```python\n\
             {code}\n\
             ```\n\
             **Your response should be ONLY the refactored Python code block.**\n"
        ),
        RefactorStyle::Documentation => format!(
            "**Context:** {context}\n\
             **Task:** Do not refactor the logic of the code. Your only task is to \
             **add comprehensive Google-style docstrings and type hints** to the following \
             Python code.\n\
             \n\
             **Original Code:**\n\
             ```python\n\
             {code}\n\
             ```\n\
             **Your response should be ONLY the commented and type-hinted Python code block.**\n"
        ),
    }
}

/// Instruction asking for pytest tests of freshly generated code
pub fn build_test_prompt(generated_code: &str) -> String {
    format!(
        "**Task:** Generate a set of `pytest` unit tests for the following Python code.\n\
         **Code:**\n\
         ```python\n\
         {generated_code}\n\
         ```\n\
         **Your response should be ONLY the Python code block for the tests.**\n"
    )
}

/// `role: content` lines in conversation order
pub fn format_transcript(history: &[ConversationTurn]) -> String {
    history
        .iter()
        .map(|turn| format!("{}: {}", turn.role, turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Instruction for a follow-up question about `code`
pub fn build_chat_prompt(code: &str, history: &[ConversationTurn], question: &str) -> String {
    let transcript = format_transcript(history);
    format!(
        "You are a \"Code-Aware Copilot\". Your role is to assist a user with their Python code.\n\
         \n\
         **Current Code Context:**\n\
         ```python\n\
         {code}\n\
         ```\n\
         \n\
         **Conversation History:**\n\
         {transcript}\n\
         \n\
         **User's Latest Question:**\n\
         {question}\n\
         \n\
         Based on all the information above (the current code, the history, and the new \
         question), provide a helpful response.\n\
         If the user asks you to modify the code, provide ONLY the updated code block in your \
         response.\n\
         Otherwise, answer their question clearly.\n"
    )
}

/// Body of the first fenced block tagged `lang`, if any
pub fn extract_code_block(text: &str, lang: &str) -> Option<String> {
    let mut lines = text.lines();
    while let Some(line) = lines.next() {
        let Some(tag) = line.trim_start().strip_prefix("```") else {
            continue;
        };
        if !tag.trim().eq_ignore_ascii_case(lang) {
            continue;
        }

        let mut body = Vec::new();
        for line in lines.by_ref() {
            if line.trim_start().starts_with("```") {
                return Some(body.join("\n"));
            }
            body.push(line);
        }
        // Unterminated fence
        return None;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TurnRole;
    use pretty_assertions::assert_eq;

    const CODE: &str = "def f(x):\n return x+1";

    #[test]
    fn test_style_parsing_falls_back_to_readability() {
        assert_eq!(RefactorStyle::parse("conciseness"), RefactorStyle::Conciseness);
        assert_eq!(RefactorStyle::parse(" Documentation "), RefactorStyle::Documentation);
        assert_eq!(RefactorStyle::parse("bogus"), RefactorStyle::Readability);
        assert_eq!(RefactorStyle::from(""), RefactorStyle::Readability);
    }

    #[test]
    fn test_refactor_prompt_is_pure() {
        let a = build_refactor_prompt(RefactorStyle::Conciseness, CODE, "ctx");
        let b = build_refactor_prompt(RefactorStyle::Conciseness, CODE, "ctx");
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_style_prompt_equals_readability() {
        assert_eq!(
            build_refactor_prompt(RefactorStyle::parse("fancy"), CODE, "ctx"),
            build_refactor_prompt(RefactorStyle::Readability, CODE, "ctx")
        );
    }

    #[test]
    fn test_refactor_prompt_embeds_code_and_context() {
        for style in [
            RefactorStyle::Readability,
            RefactorStyle::Conciseness,
            RefactorStyle::Documentation,
        ] {
            let prompt = build_refactor_prompt(style, CODE, "Keep it short.");
            assert!(prompt.contains(CODE), "{} prompt lacks code", style);
            assert!(prompt.contains("Keep it short."), "{} prompt lacks context", style);
            assert!(!prompt.contains("{code}"));
        }
    }

    #[test]
    fn test_styles_have_distinct_goals() {
        let readable = build_refactor_prompt(RefactorStyle::Readability, CODE, "");
        let concise = build_refactor_prompt(RefactorStyle::Conciseness, CODE, "");
        let docs = build_refactor_prompt(RefactorStyle::Documentation, CODE, "");
        assert!(readable.contains("smaller, well-named functions"));
        assert!(concise.contains("concise and Pythonic"));
        assert!(docs.contains("Do not refactor the logic"));
    }

    #[test]
    fn test_test_prompt_embeds_generated_code() {
        let prompt = build_test_prompt("def g(): pass");
        assert!(prompt.contains("def g(): pass"));
        assert!(prompt.contains("pytest"));
    }

    #[test]
    fn test_chat_prompt_contents() {
        let history = vec![
            ConversationTurn::new(TurnRole::User, "hi"),
            ConversationTurn::new(TurnRole::Assistant, "hello"),
        ];
        let prompt = build_chat_prompt("x=1", &history, "what does this do?");
        assert!(prompt.contains("x=1"));
        assert!(prompt.contains("user: hi\nassistant: hello"));
        assert!(prompt.contains("what does this do?"));
    }

    #[test]
    fn test_extract_first_matching_block() {
        let answer = "Sure:\n```text\nnot this\n```\n```python\ndef f(x):\n    return x\n```\n```python\nsecond\n```";
        assert_eq!(
            extract_code_block(answer, "python"),
            Some("def f(x):\n    return x".to_string())
        );
    }

    #[test]
    fn test_extract_without_block_is_none() {
        assert_eq!(extract_code_block("It adds one.", "python"), None);
        assert_eq!(extract_code_block("```python\nunterminated", "python"), None);
    }
}
