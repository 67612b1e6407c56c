//! Bounded execution of capability calls
//!
//! Capabilities are blocking, so each call runs on tokio's blocking pool and
//! is raced against the stage's time budget. A stage that overruns is not
//! cancelled; its result is simply discarded.

use crate::config::PipelineConfig;
use crate::llm::SharedGenerator;
use crate::{CognitoError, Result};
use std::time::Duration;

/// Per-stage time budgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTimeouts {
    pub analysis: Duration,
    pub retrieval: Duration,
    pub generation: Duration,
}

impl Default for StageTimeouts {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

impl From<&PipelineConfig> for StageTimeouts {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            analysis: config.analysis(),
            retrieval: config.retrieval(),
            generation: config.generation(),
        }
    }
}

/// Run `work` on the blocking pool within `limit`.
///
/// `Ok(None)` when the budget ran out. A panic in `work` is a task failure.
pub(crate) async fn run_bounded<T, F>(stage: &'static str, limit: Duration, work: F) -> Result<Option<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    match tokio::time::timeout(limit, tokio::task::spawn_blocking(work)).await {
        Ok(Ok(value)) => Ok(Some(value)),
        Ok(Err(join_err)) => Err(CognitoError::task(stage, join_err.to_string())),
        Err(_) => {
            tracing::warn!(stage, limit_ms = limit.as_millis() as u64, "stage timed out");
            Ok(None)
        }
    }
}

/// One generation call. Running out of time is fatal; there is no fallback text.
pub(crate) async fn generate_bounded(
    generator: &SharedGenerator,
    stage: &'static str,
    prompt: String,
    limit: Duration,
) -> Result<String> {
    let generator = generator.clone();
    run_bounded(stage, limit, move || generator.generate(&prompt))
        .await?
        .ok_or(CognitoError::Timeout { stage, limit })
}
