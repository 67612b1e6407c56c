//! Refactor pipeline
//!
//! ```text
//! analyze ─→ select smell ─→ retrieve context ─→ generate refactor ─→ generate tests
//! ```
//!
//! Stages run strictly in order. Analysis and retrieval degrade to fallback
//! values when they overrun; a generation stage that overruns aborts the run.

use super::stage::{generate_bounded, run_bounded, StageTimeouts};
use crate::analysis::{AnalysisReport, SharedAnalyzer};
use crate::knowledge::SharedContextSource;
use crate::llm::SharedGenerator;
use crate::prompt::{build_refactor_prompt, build_test_prompt, RefactorStyle};
use crate::types::{RefactorResult, DOCUMENTATION_NOTE};
use crate::Result;

/// Sequences analysis, retrieval and generation into one refactor result
#[derive(Clone)]
pub struct RefactorOrchestrator {
    analyzer: SharedAnalyzer,
    context: SharedContextSource,
    generator: SharedGenerator,
    timeouts: StageTimeouts,
}

impl RefactorOrchestrator {
    pub fn new(
        analyzer: SharedAnalyzer,
        context: SharedContextSource,
        generator: SharedGenerator,
    ) -> Self {
        Self {
            analyzer,
            context,
            generator,
            timeouts: StageTimeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: StageTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn timeouts(&self) -> &StageTimeouts {
        &self.timeouts
    }

    /// Run the whole pipeline. Either every field of the result is filled or
    /// an error is returned; nothing partial escapes.
    pub async fn run(&self, code: &str, style: RefactorStyle) -> Result<RefactorResult> {
        tracing::debug!(
            style = %style,
            lines = crate::analysis::line_count(code),
            "refactor started"
        );

        let report = self.analyze(code).await?;
        tracing::debug!(
            complexity = %report.complexity,
            smells = report.smells.len(),
            findings = report.security_findings.len(),
            "analysis stage done"
        );

        let smell = report.primary_smell();
        tracing::debug!(smell = ?smell, "smell selected");

        let context = self.retrieve(smell.map(|s| s.as_str())).await?;
        tracing::debug!(context_len = context.len(), "retrieval stage done");

        let refactored_code = generate_bounded(
            &self.generator,
            "generate refactor",
            build_refactor_prompt(style, code, &context),
            self.timeouts.generation,
        )
        .await?;
        tracing::debug!(len = refactored_code.len(), "refactor generation done");

        let unit_tests = generate_bounded(
            &self.generator,
            "generate tests",
            build_test_prompt(&refactored_code),
            self.timeouts.generation,
        )
        .await?;
        tracing::debug!(len = unit_tests.len(), "test generation done");

        Ok(RefactorResult {
            original_code: code.to_string(),
            refactored_code,
            documentation: DOCUMENTATION_NOTE.to_string(),
            unit_tests,
            analysis_report: report,
        })
    }

    async fn analyze(&self, code: &str) -> Result<AnalysisReport> {
        let analyzer = self.analyzer.clone();
        let source = code.to_string();
        let report = run_bounded("analysis", self.timeouts.analysis, move || {
            analyzer.analyze(&source)
        })
        .await?;

        Ok(report.unwrap_or_else(|| {
            tracing::warn!("analysis overran its budget; using degraded report");
            self.analyzer.degraded(code)
        }))
    }

    async fn retrieve(&self, key: Option<&'static str>) -> Result<String> {
        let context = self.context.clone();
        let text = run_bounded("retrieval", self.timeouts.retrieval, move || {
            context.retrieve(key)
        })
        .await?;

        Ok(text.unwrap_or_else(|| {
            tracing::warn!(key = ?key, "retrieval overran its budget; using fallback context");
            self.context.fallback(key)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Analyze, CodeAnalyzer, ComplexityScore, SmellTag};
    use crate::knowledge::{ContextSource, KnowledgeBase, GENERIC_CONTEXT, NO_SPECIFIC_CONTEXT};
    use crate::llm::{inline_error, is_inline_error, Generate, LlmError};
    use crate::CognitoError;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tempfile::TempDir;

    /// Records prompts and answers with a numbered reply
    #[derive(Default)]
    struct RecordingGenerator {
        prompts: Mutex<Vec<String>>,
    }

    impl RecordingGenerator {
        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    impl Generate for RecordingGenerator {
        fn generate(&self, prompt: &str) -> String {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            format!("```python\n# reply {}\n```", prompts.len())
        }
    }

    struct FailingGenerator;

    impl Generate for FailingGenerator {
        fn generate(&self, _prompt: &str) -> String {
            inline_error(&LlmError::Connection("connection refused".to_string()))
        }
    }

    struct SleepyGenerator;

    impl Generate for SleepyGenerator {
        fn generate(&self, _prompt: &str) -> String {
            std::thread::sleep(Duration::from_millis(300));
            "late".to_string()
        }
    }

    struct SleepyAnalyzer;

    impl Analyze for SleepyAnalyzer {
        fn analyze(&self, _code: &str) -> AnalysisReport {
            std::thread::sleep(Duration::from_millis(300));
            AnalysisReport {
                complexity: ComplexityScore::Score(99),
                smells: vec![SmellTag::HighCyclomaticComplexity],
                security_findings: Vec::new(),
            }
        }
    }

    struct PanickingAnalyzer;

    impl Analyze for PanickingAnalyzer {
        fn analyze(&self, _code: &str) -> AnalysisReport {
            panic!("analyzer bug")
        }
    }

    /// Records the key it was asked for
    #[derive(Default)]
    struct KeyRecorder {
        keys: Mutex<Vec<Option<String>>>,
        delay: Duration,
    }

    impl ContextSource for KeyRecorder {
        fn retrieve(&self, key: Option<&str>) -> String {
            std::thread::sleep(self.delay);
            self.keys.lock().unwrap().push(key.map(str::to_string));
            format!("context for {:?}", key)
        }
    }

    fn quick_timeouts() -> StageTimeouts {
        StageTimeouts {
            analysis: Duration::from_millis(30),
            retrieval: Duration::from_millis(30),
            generation: Duration::from_millis(30),
        }
    }

    fn knowledge() -> (TempDir, SharedContextSource) {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("high_cyclomatic_complexity.md"),
            "Split branches into helpers.",
        )
        .unwrap();
        let kb: SharedContextSource = Arc::new(KnowledgeBase::new(dir.path()));
        (dir, kb)
    }

    fn branchy_function() -> String {
        let mut code = String::from("def pick(x):\n");
        for i in 0..6 {
            code.push_str(&format!("    if x == {}:\n        return {}\n", i, i));
        }
        code.push_str("    return -1\n");
        code
    }

    #[tokio::test]
    async fn test_simple_refactor_end_to_end() {
        let (_dir, kb) = knowledge();
        let generator = Arc::new(RecordingGenerator::default());
        let orchestrator =
            RefactorOrchestrator::new(Arc::new(CodeAnalyzer::default()), kb, generator.clone());

        let code = "def f(x):\n return x+1";
        let result = orchestrator
            .run(code, RefactorStyle::parse("conciseness"))
            .await
            .unwrap();

        assert_eq!(result.original_code, code);
        assert!(result.analysis_report.smells.is_empty());
        assert_eq!(result.analysis_report.complexity, ComplexityScore::Score(1));
        assert_eq!(result.documentation, DOCUMENTATION_NOTE);
        assert_eq!(result.refactored_code, "```python\n# reply 1\n```");
        assert_eq!(result.unit_tests, "```python\n# reply 2\n```");

        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 2);
        assert_eq!(
            prompts[0],
            build_refactor_prompt(RefactorStyle::Conciseness, code, GENERIC_CONTEXT)
        );
        assert_eq!(prompts[1], build_test_prompt(&result.refactored_code));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["original_code"], code);
        assert_eq!(json["analysis_report"]["identified_smells"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_first_smell_drives_retrieval() {
        let (_dir, kb) = knowledge();
        let generator = Arc::new(RecordingGenerator::default());
        let orchestrator =
            RefactorOrchestrator::new(Arc::new(CodeAnalyzer::default()), kb, generator.clone());

        let result = orchestrator
            .run(&branchy_function(), RefactorStyle::Readability)
            .await
            .unwrap();

        assert_eq!(
            result.analysis_report.primary_smell(),
            Some(SmellTag::HighCyclomaticComplexity)
        );
        assert!(generator.prompts()[0].contains("Split branches into helpers."));
    }

    #[tokio::test]
    async fn test_missing_knowledge_entry_uses_no_specific_context() {
        let dir = TempDir::new().unwrap();
        let generator = Arc::new(RecordingGenerator::default());
        let orchestrator = RefactorOrchestrator::new(
            Arc::new(CodeAnalyzer::default()),
            Arc::new(KnowledgeBase::new(dir.path())),
            generator.clone(),
        );

        orchestrator
            .run(&branchy_function(), RefactorStyle::Readability)
            .await
            .unwrap();
        assert!(generator.prompts()[0].contains(NO_SPECIFIC_CONTEXT));
    }

    #[tokio::test]
    async fn test_failing_generation_still_completes() {
        let (_dir, kb) = knowledge();
        let orchestrator = RefactorOrchestrator::new(
            Arc::new(CodeAnalyzer::default()),
            kb,
            Arc::new(FailingGenerator),
        );

        let result = orchestrator
            .run("def f(x):\n return x+1", RefactorStyle::Documentation)
            .await
            .unwrap();
        assert!(is_inline_error(&result.refactored_code));
        assert!(is_inline_error(&result.unit_tests));
        assert_eq!(result.documentation, DOCUMENTATION_NOTE);
    }

    #[tokio::test]
    async fn test_generation_timeout_aborts() {
        let (_dir, kb) = knowledge();
        let orchestrator = RefactorOrchestrator::new(
            Arc::new(CodeAnalyzer::default()),
            kb,
            Arc::new(SleepyGenerator),
        )
        .with_timeouts(StageTimeouts {
            generation: Duration::from_millis(20),
            ..StageTimeouts::default()
        });

        let err = orchestrator
            .run("x = 1", RefactorStyle::Readability)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CognitoError::Timeout {
                stage: "generate refactor",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_slow_analysis_degrades() {
        let retriever = Arc::new(KeyRecorder::default());
        let generator = Arc::new(RecordingGenerator::default());
        let orchestrator =
            RefactorOrchestrator::new(Arc::new(SleepyAnalyzer), retriever.clone(), generator)
                .with_timeouts(StageTimeouts {
                    generation: Duration::from_secs(5),
                    retrieval: Duration::from_secs(5),
                    ..quick_timeouts()
                });

        let result = orchestrator
            .run("x = 1", RefactorStyle::Readability)
            .await
            .unwrap();
        assert_eq!(result.analysis_report.complexity, ComplexityScore::Unavailable);
        assert!(result.analysis_report.smells.is_empty());
        assert_eq!(*retriever.keys.lock().unwrap(), vec![None]);
    }

    #[tokio::test]
    async fn test_slow_retrieval_falls_back() {
        let retriever = Arc::new(KeyRecorder {
            delay: Duration::from_millis(300),
            ..KeyRecorder::default()
        });
        let generator = Arc::new(RecordingGenerator::default());
        let orchestrator = RefactorOrchestrator::new(
            Arc::new(CodeAnalyzer::default()),
            retriever,
            generator.clone(),
        )
        .with_timeouts(StageTimeouts {
            analysis: Duration::from_secs(5),
            generation: Duration::from_secs(5),
            ..quick_timeouts()
        });

        orchestrator
            .run(&branchy_function(), RefactorStyle::Readability)
            .await
            .unwrap();
        assert!(generator.prompts()[0].contains(NO_SPECIFIC_CONTEXT));
    }

    #[tokio::test]
    async fn test_analyzer_panic_is_error() {
        let (_dir, kb) = knowledge();
        let generator = Arc::new(RecordingGenerator::default());
        let orchestrator =
            RefactorOrchestrator::new(Arc::new(PanickingAnalyzer), kb, generator.clone());

        let err = orchestrator
            .run("x = 1", RefactorStyle::Readability)
            .await
            .unwrap_err();
        assert!(matches!(err, CognitoError::Task { stage: "analysis", .. }));
        assert!(generator.prompts().is_empty());
    }
}
