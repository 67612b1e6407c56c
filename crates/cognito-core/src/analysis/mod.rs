//! Static analysis capability
//!
//! Produces an [`AnalysisReport`] for a snippet of Python source:
//! - block-level cyclomatic complexity (or [`ComplexityScore::Unavailable`])
//! - smells derived from thresholds on complexity and line count
//! - security findings from a pluggable [`SecurityScanner`]
//!
//! The two sub-analyses are independent. A parse failure only marks the
//! complexity as unavailable and a scanner failure only empties the findings;
//! [`Analyze::analyze`] itself never fails.

mod bandit;
mod complexity;
mod parser;
mod rules;
mod types;

pub use bandit::{parse_bandit_report, BanditScanner};
pub use complexity::{complexity_blocks, cyclomatic_complexity, BlockComplexity, BlockKind};
pub use rules::RuleScanner;
pub use types::{
    AnalysisReport, ComplexityScore, Confidence, SecurityFinding, Severity, SmellTag,
    SmellThresholds,
};

use crate::config::{AnalysisConfig, ScannerKind};
use std::sync::Arc;

/// Security scanner failure, absorbed by the analyzer
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("scratch file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to launch scanner: {0}")]
    Spawn(String),

    #[error("scanner failed: {0}")]
    Failed(String),

    #[error("unreadable scanner output: {0}")]
    Output(String),
}

/// A security scanner over raw source text
pub trait SecurityScanner: Send + Sync {
    fn name(&self) -> &str;

    /// Findings sorted by line, then rule id
    fn scan(&self, code: &str) -> Result<Vec<SecurityFinding>, ScanError>;
}

/// Analysis capability boundary
pub trait Analyze: Send + Sync {
    /// Analyze `code`; always returns a report
    fn analyze(&self, code: &str) -> AnalysisReport;

    /// Report used when analysis could not finish in time
    fn degraded(&self, code: &str) -> AnalysisReport {
        AnalysisReport::degraded(code, &SmellThresholds::default())
    }
}

pub type SharedAnalyzer = Arc<dyn Analyze>;

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\x0b'
            | '\x0c'
            | '\x1c'
            | '\x1d'
            | '\x1e'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Number of lines, splitting on every Unicode line boundary.
///
/// `\r\n` is one break. A trailing break does not start a new line, so
/// `""` has 0 lines and `"a\n"` has 1.
pub fn line_count(code: &str) -> usize {
    let breaks =
        code.chars().filter(|&c| is_line_break(c)).count() - code.matches("\r\n").count();
    match code.chars().next_back() {
        Some(last) if !is_line_break(last) => breaks + 1,
        _ => breaks,
    }
}

/// Detect smells in detection order: complexity first, then length
pub fn detect_smells(
    complexity: ComplexityScore,
    code: &str,
    thresholds: &SmellThresholds,
) -> Vec<SmellTag> {
    let mut smells = Vec::new();
    if complexity.exceeds(thresholds.complexity) {
        smells.push(SmellTag::HighCyclomaticComplexity);
    }
    if line_count(code) > thresholds.lines {
        smells.push(SmellTag::LongFunction);
    }
    smells
}

/// Default analysis capability: tree-sitter complexity plus a security scanner
pub struct CodeAnalyzer {
    thresholds: SmellThresholds,
    scanner: Box<dyn SecurityScanner>,
}

impl CodeAnalyzer {
    pub fn new(thresholds: SmellThresholds, scanner: Box<dyn SecurityScanner>) -> Self {
        Self {
            thresholds,
            scanner,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        let thresholds = SmellThresholds {
            complexity: config.complexity_threshold,
            lines: config.long_function_lines,
        };
        let scanner: Box<dyn SecurityScanner> = match config.scanner {
            ScannerKind::Builtin => Box::new(RuleScanner::new()),
            ScannerKind::Bandit => Box::new(BanditScanner::new(&config.bandit_command)),
        };
        Self::new(thresholds, scanner)
    }

    pub fn thresholds(&self) -> &SmellThresholds {
        &self.thresholds
    }
}

impl Default for CodeAnalyzer {
    fn default() -> Self {
        Self::new(SmellThresholds::default(), Box::new(RuleScanner::new()))
    }
}

impl Analyze for CodeAnalyzer {
    fn analyze(&self, code: &str) -> AnalysisReport {
        let complexity = cyclomatic_complexity(code);
        if complexity == ComplexityScore::Unavailable {
            tracing::warn!("complexity analysis unavailable for submitted code");
        }

        let smells = detect_smells(complexity, code, &self.thresholds);

        let security_findings = match self.scanner.scan(code) {
            Ok(findings) => findings,
            Err(err) => {
                tracing::warn!(scanner = self.scanner.name(), error = %err, "security scan failed");
                Vec::new()
            }
        };

        AnalysisReport {
            complexity,
            smells,
            security_findings,
        }
    }

    fn degraded(&self, code: &str) -> AnalysisReport {
        AnalysisReport::degraded(code, &self.thresholds)
    }
}
