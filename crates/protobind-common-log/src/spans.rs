//! Span helpers for pipeline stages.

use std::time::{Duration, Instant};

use tracing::{debug_span, info_span, Span};

/// Span covering one schema file's generation.
pub fn schema_span(name: &str) -> Span {
    info_span!("schema", name = %name)
}

/// Span covering a single external tool invocation.
pub fn tool_span(tool: &str, target: &str) -> Span {
    debug_span!("tool", name = %tool, target = %target)
}

/// Span covering an artifact write.
pub fn artifact_span(kind: &str, path: &str) -> Span {
    debug_span!("artifact", kind = %kind, path = %path)
}

/// Records how long a pipeline stage ran, at debug level, when dropped.
///
/// Dropping also covers stages left early through `?`.
pub struct StageTimer {
    stage: &'static str,
    started: Instant,
}

impl StageTimer {
    pub fn start(stage: &'static str) -> Self {
        Self {
            stage,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for StageTimer {
    fn drop(&mut self) {
        tracing::debug!(
            stage = self.stage,
            elapsed_ms = self.elapsed().as_millis() as u64,
            "stage finished"
        );
    }
}

/// Evaluate `$body` under a [`StageTimer`] named `$stage`.
#[macro_export]
macro_rules! timed {
    ($stage:expr, $body:expr) => {{
        let _timer = $crate::spans::StageTimer::start($stage);
        $body
    }};
}
