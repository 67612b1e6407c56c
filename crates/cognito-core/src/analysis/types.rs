//! Analysis report types

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Summed block complexity, or a marker that it could not be computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexityScore {
    Score(u32),
    Unavailable,
}

impl ComplexityScore {
    /// Numeric value, if available
    pub fn value(&self) -> Option<u32> {
        match self {
            ComplexityScore::Score(n) => Some(*n),
            ComplexityScore::Unavailable => None,
        }
    }

    /// Strictly greater than `threshold`; an unavailable score never exceeds
    pub fn exceeds(&self, threshold: u32) -> bool {
        matches!(self, ComplexityScore::Score(n) if *n > threshold)
    }
}

impl fmt::Display for ComplexityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplexityScore::Score(n) => write!(f, "{}", n),
            ComplexityScore::Unavailable => write!(f, "unavailable"),
        }
    }
}

// A number when available, the string "unavailable" otherwise.
impl Serialize for ComplexityScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ComplexityScore::Score(n) => serializer.serialize_u32(*n),
            ComplexityScore::Unavailable => serializer.serialize_str("unavailable"),
        }
    }
}

/// Named code-quality concern; also the knowledge base lookup key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmellTag {
    HighCyclomaticComplexity,
    LongFunction,
}

impl SmellTag {
    pub const ALL: [SmellTag; 2] = [SmellTag::HighCyclomaticComplexity, SmellTag::LongFunction];

    pub fn as_str(&self) -> &'static str {
        match self {
            SmellTag::HighCyclomaticComplexity => "high_cyclomatic_complexity",
            SmellTag::LongFunction => "long_function",
        }
    }
}

impl fmt::Display for SmellTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SmellTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SmellTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| format!("Unknown smell: {}", s))
    }
}

/// Finding severity, bandit scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Undefined,
    Low,
    Medium,
    High,
}

/// Confidence that a finding is real, bandit scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    Undefined,
    Low,
    Medium,
    High,
}

fn parse_level(s: &str) -> u8 {
    match s.to_ascii_uppercase().as_str() {
        "LOW" => 1,
        "MEDIUM" => 2,
        "HIGH" => 3,
        _ => 0,
    }
}

impl From<&str> for Severity {
    fn from(s: &str) -> Self {
        match parse_level(s) {
            1 => Severity::Low,
            2 => Severity::Medium,
            3 => Severity::High,
            _ => Severity::Undefined,
        }
    }
}

impl From<&str> for Confidence {
    fn from(s: &str) -> Self {
        match parse_level(s) {
            1 => Confidence::Low,
            2 => Confidence::Medium,
            3 => Confidence::High,
            _ => Confidence::Undefined,
        }
    }
}

/// One security issue located in the analyzed source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityFinding {
    pub severity: Severity,
    pub confidence: Confidence,
    /// 1-based line number
    pub line: u32,
    /// Rule identifier, e.g. `B307`
    pub rule_id: String,
    pub description: String,
}

/// Thresholds above which smells are raised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmellThresholds {
    /// Complexity strictly above this raises `high_cyclomatic_complexity`
    pub complexity: u32,
    /// Line count strictly above this raises `long_function`
    pub lines: usize,
}

impl Default for SmellThresholds {
    fn default() -> Self {
        Self {
            complexity: 5,
            lines: 30,
        }
    }
}

/// Output of the analysis capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    #[serde(rename = "cyclomatic_complexity")]
    pub complexity: ComplexityScore,

    /// Detection order: complexity smell before length smell
    #[serde(rename = "identified_smells")]
    pub smells: Vec<SmellTag>,

    #[serde(rename = "security_issues")]
    pub security_findings: Vec<SecurityFinding>,
}

impl AnalysisReport {
    /// Report with no complexity and no findings; smells from line count only
    pub fn degraded(code: &str, thresholds: &SmellThresholds) -> Self {
        let complexity = ComplexityScore::Unavailable;
        Self {
            complexity,
            smells: super::detect_smells(complexity, code, thresholds),
            security_findings: Vec::new(),
        }
    }

    /// First detected smell, the one used for context retrieval
    pub fn primary_smell(&self) -> Option<SmellTag> {
        self.smells.first().copied()
    }
}
