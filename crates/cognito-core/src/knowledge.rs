//! Context retrieval capability
//!
//! Best-practice guidance is stored as one markdown file per smell, named
//! `<smell>.md`, under a knowledge directory.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Returned when no smell was detected
pub const GENERIC_CONTEXT: &str =
    "General software engineering best practices recommend writing clean, readable, and maintainable code.";

/// Returned when a smell was given but the store has nothing for it
pub const NO_SPECIFIC_CONTEXT: &str = "No specific context found for this issue.";

/// Context retrieval capability boundary. Never fails.
pub trait ContextSource: Send + Sync {
    fn retrieve(&self, key: Option<&str>) -> String;

    /// Text used when retrieval could not finish in time
    fn fallback(&self, key: Option<&str>) -> String {
        match key {
            Some(k) if !k.is_empty() => NO_SPECIFIC_CONTEXT.to_string(),
            _ => GENERIC_CONTEXT.to_string(),
        }
    }
}

pub type SharedContextSource = Arc<dyn ContextSource>;

/// Directory-backed knowledge store
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    dir: PathBuf,
}

impl KnowledgeBase {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry for `key`; `None` for keys that are not plain names
    fn entry_path(&self, key: &str) -> Option<PathBuf> {
        let plain = key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        plain.then(|| self.dir.join(format!("{}.md", key)))
    }
}

impl ContextSource for KnowledgeBase {
    fn retrieve(&self, key: Option<&str>) -> String {
        let key = match key {
            Some(k) if !k.is_empty() => k,
            _ => return GENERIC_CONTEXT.to_string(),
        };

        let Some(path) = self.entry_path(key) else {
            tracing::warn!(key, "rejected knowledge key");
            return NO_SPECIFIC_CONTEXT.to_string();
        };

        match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(key, "no knowledge entry");
                NO_SPECIFIC_CONTEXT.to_string()
            }
            Err(e) => {
                tracing::warn!(key, path = %path.display(), error = %e, "failed to read knowledge entry");
                NO_SPECIFIC_CONTEXT.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store_with(entries: &[(&str, &str)]) -> (TempDir, KnowledgeBase) {
        let dir = TempDir::new().unwrap();
        for (key, text) in entries {
            std::fs::write(dir.path().join(format!("{}.md", key)), text).unwrap();
        }
        let kb = KnowledgeBase::new(dir.path());
        (dir, kb)
    }

    #[test]
    fn test_no_key_is_generic() {
        let (_dir, kb) = store_with(&[]);
        assert_eq!(kb.retrieve(None), GENERIC_CONTEXT);
        assert_eq!(kb.retrieve(Some("")), GENERIC_CONTEXT);
    }

    #[test]
    fn test_unknown_key_is_no_specific_context() {
        let (_dir, kb) = store_with(&[]);
        assert_eq!(kb.retrieve(Some("nonexistent_tag")), NO_SPECIFIC_CONTEXT);
        assert_ne!(GENERIC_CONTEXT, NO_SPECIFIC_CONTEXT);
    }

    #[test]
    fn test_known_key_returns_file_text() {
        let (_dir, kb) = store_with(&[("long_function", "# Keep functions short\n")]);
        assert_eq!(kb.retrieve(Some("long_function")), "# Keep functions short\n");
    }

    #[test]
    fn test_path_like_keys_are_rejected() {
        let (dir, kb) = store_with(&[]);
        std::fs::write(dir.path().join("secret.md"), "nope").unwrap();
        let nested = KnowledgeBase::new(dir.path().join("sub"));
        assert_eq!(nested.retrieve(Some("../secret")), NO_SPECIFIC_CONTEXT);
        assert_eq!(kb.retrieve(Some("secret")), "nope");
    }

    #[test]
    fn test_fallback_matches_retrieval_defaults() {
        let (_dir, kb) = store_with(&[]);
        assert_eq!(kb.fallback(None), GENERIC_CONTEXT);
        assert_eq!(kb.fallback(Some("long_function")), NO_SPECIFIC_CONTEXT);
    }

    #[test]
    fn test_shipped_entries_exist_for_every_smell() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../knowledge_base");
        let kb = KnowledgeBase::new(dir);
        for tag in crate::analysis::SmellTag::ALL {
            let text = kb.retrieve(Some(tag.as_str()));
            assert_ne!(text, NO_SPECIFIC_CONTEXT, "missing entry for {}", tag);
        }
    }
}
