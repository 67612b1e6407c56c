//! External `bandit` scanner
//!
//! The snippet is written to a scratch file, handed to `bandit -f json`, and
//! the report parsed back. The scratch file is removed when the scan returns,
//! on every path.

use super::{Confidence, ScanError, SecurityFinding, SecurityScanner, Severity};
use serde::Deserialize;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

#[derive(Debug, Deserialize)]
struct BanditReport {
    #[serde(default)]
    results: Vec<BanditResult>,
}

#[derive(Debug, Deserialize)]
struct BanditResult {
    #[serde(default)]
    issue_severity: String,
    #[serde(default)]
    issue_confidence: String,
    line_number: Option<u32>,
    #[serde(default)]
    test_id: String,
    #[serde(default)]
    issue_text: String,
}

/// Parse bandit's JSON report into findings sorted by line, then rule id
pub fn parse_bandit_report(output: &[u8]) -> Result<Vec<SecurityFinding>, ScanError> {
    let report: BanditReport =
        serde_json::from_slice(output).map_err(|e| ScanError::Output(e.to_string()))?;

    let mut findings: Vec<SecurityFinding> = report
        .results
        .into_iter()
        .filter_map(|r| {
            // Findings must point at a real line.
            let Some(line) = r.line_number.filter(|&n| n >= 1) else {
                tracing::warn!(rule = %r.test_id, "dropping bandit result without a line number");
                return None;
            };
            Some(SecurityFinding {
                severity: Severity::from(r.issue_severity.as_str()),
                confidence: Confidence::from(r.issue_confidence.as_str()),
                line,
                rule_id: r.test_id,
                description: r.issue_text,
            })
        })
        .collect();
    findings.sort_by(|a, b| (a.line, &a.rule_id).cmp(&(b.line, &b.rule_id)));
    Ok(findings)
}

/// Runs the `bandit` executable over a scratch copy of the snippet
#[derive(Debug, Clone)]
pub struct BanditScanner {
    command: String,
    scratch_dir: Option<PathBuf>,
}

impl BanditScanner {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            scratch_dir: None,
        }
    }

    /// Place scratch files in `dir` instead of the system temp directory
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    fn scratch_file(&self) -> std::io::Result<tempfile::NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("cognito-scan-").suffix(".py");
        match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
    }
}

impl SecurityScanner for BanditScanner {
    fn name(&self) -> &str {
        "bandit"
    }

    fn scan(&self, code: &str) -> Result<Vec<SecurityFinding>, ScanError> {
        // Dropping the handle deletes the file.
        let mut scratch = self.scratch_file()?;
        scratch.write_all(code.as_bytes())?;
        scratch.flush()?;

        tracing::debug!(command = %self.command, path = %scratch.path().display(), "running bandit");

        let output = Command::new(&self.command)
            .args(["-f", "json", "-q"])
            .arg(scratch.path())
            .output()
            .map_err(|e| ScanError::Spawn(format!("{}: {}", self.command, e)))?;

        // bandit exits 1 when it reports issues, so the status alone is not an error.
        if output.stdout.iter().all(u8::is_ascii_whitespace) {
            if output.status.success() {
                return Ok(Vec::new());
            }
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScanError::Failed(format!(
                "{} ({})",
                output.status,
                stderr.trim()
            )));
        }

        parse_bandit_report(&output.stdout)
    }
}
