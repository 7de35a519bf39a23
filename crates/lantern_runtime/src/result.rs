//! Run results and the overall report.

use lantern_core::{Offset, RunId, SnippetError, Topic};
use lantern_log::LogLine;
use serde::{Deserialize, Serialize};

/// Outcome of one snippet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    /// Body and every callback finished without fault
    Succeeded,
    /// Body or a callback faulted
    Failed {
        /// Captured fault
        error: SnippetError,
    },
    /// Callbacks were still pending when the timeout elapsed
    Incomplete {
        /// Callbacks dropped without firing
        abandoned: usize,
    },
}

impl RunStatus {
    /// Short label for reports
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Succeeded => "pass",
            Self::Failed { .. } => "fail",
            Self::Incomplete { .. } => "incomplete",
        }
    }

    /// Whether the snippet succeeded
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Succeeded => write!(f, "pass"),
            Self::Failed { error } => write!(f, "fail ({})", error),
            Self::Incomplete { abandoned } => {
                write!(f, "incomplete ({} callbacks abandoned)", abandoned)
            }
        }
    }
}

/// Recorded outcome of one snippet execution. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    name: String,
    topic: Topic,
    lines: Vec<LogLine>,
    #[serde(flatten)]
    status: RunStatus,
    elapsed: Offset,
}

impl RunResult {
    /// Build a result
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        topic: Topic,
        lines: Vec<LogLine>,
        status: RunStatus,
        elapsed: Offset,
    ) -> Self {
        Self {
            name: name.into(),
            topic,
            lines,
            status,
            elapsed,
        }
    }

    /// Snippet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snippet topic
    #[must_use]
    pub const fn topic(&self) -> Topic {
        self.topic
    }

    /// Captured lines, ordered by sequence number
    #[must_use]
    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    /// Captured text only
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(LogLine::text).collect()
    }

    /// Outcome
    #[must_use]
    pub const fn status(&self) -> &RunStatus {
        &self.status
    }

    /// Offset of the last callback that fired
    #[must_use]
    pub const fn elapsed(&self) -> Offset {
        self.elapsed
    }

    /// Whether the snippet succeeded
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.status.is_success()
    }

    /// Whether the snippet faulted
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self.status, RunStatus::Failed { .. })
    }

    /// Whether callbacks were abandoned
    #[must_use]
    pub const fn is_incomplete(&self) -> bool {
        matches!(self.status, RunStatus::Incomplete { .. })
    }
}

/// Status counts for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Snippets executed
    pub total: u64,
    /// Snippets that succeeded
    pub succeeded: u64,
    /// Snippets that faulted
    pub failed: u64,
    /// Snippets with abandoned callbacks
    pub incomplete: u64,
}

impl RunSummary {
    /// Create an empty summary
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one outcome
    pub fn record(&mut self, status: &RunStatus) {
        self.total += 1;
        match status {
            RunStatus::Succeeded => self.succeeded += 1,
            RunStatus::Failed { .. } => self.failed += 1,
            RunStatus::Incomplete { .. } => self.incomplete += 1,
        }
    }

    /// Whether every snippet succeeded
    #[must_use]
    pub const fn all_succeeded(&self) -> bool {
        self.failed == 0 && self.incomplete == 0
    }

    /// Get success rate (0.0 - 1.0)
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.succeeded as f64 / self.total as f64
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} snippets: {} passed, {} failed, {} incomplete",
            self.total, self.succeeded, self.failed, self.incomplete
        )
    }
}

/// Ordered results of a whole run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    run_id: RunId,
    timeout_millis: u64,
    results: Vec<RunResult>,
    summary: RunSummary,
}

impl RunReport {
    /// Build a report; the summary is derived from the results
    #[must_use]
    pub fn new(run_id: RunId, timeout_millis: u64, results: Vec<RunResult>) -> Self {
        let mut summary = RunSummary::new();
        for result in &results {
            summary.record(result.status());
        }
        Self {
            run_id,
            timeout_millis,
            results,
            summary,
        }
    }

    /// Run identifier
    #[must_use]
    pub const fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Timeout the run used
    #[must_use]
    pub const fn timeout_millis(&self) -> u64 {
        self.timeout_millis
    }

    /// Results in registration order
    #[must_use]
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }

    /// Look up a result by snippet name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RunResult> {
        self.results.iter().find(|result| result.name() == name)
    }

    /// Status counts
    #[must_use]
    pub const fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Process exit code: 0 when every snippet succeeded, 1 otherwise
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        if self.summary.all_succeeded() { 0 } else { 1 }
    }

    /// Serialize the whole report
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lantern_log::Origin;

    fn make_result(name: &str, status: RunStatus) -> RunResult {
        let lines = vec![LogLine::new(0, "x", Offset::zero(), Origin::Sync)];
        RunResult::new(name, Topic::General, lines, status, Offset::zero())
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(RunStatus::Succeeded.label(), "pass");
        assert_eq!(
            RunStatus::Failed {
                error: SnippetError::unbound("x")
            }
            .label(),
            "fail"
        );
        assert_eq!(RunStatus::Incomplete { abandoned: 2 }.label(), "incomplete");
        assert_eq!(
            format!("{}", RunStatus::Incomplete { abandoned: 2 }),
            "incomplete (2 callbacks abandoned)"
        );
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = RunSummary::new();
        summary.record(&RunStatus::Succeeded);
        summary.record(&RunStatus::Succeeded);
        summary.record(&RunStatus::Incomplete { abandoned: 1 });
        summary.record(&RunStatus::Failed {
            error: SnippetError::fault("boom"),
        });

        assert_eq!(summary.total, 4);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.incomplete, 1);
        assert!(!summary.all_succeeded());
        assert!((summary.success_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_summary() {
        let summary = RunSummary::new();
        assert!(summary.all_succeeded());
        assert!((summary.success_rate() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_report_exit_code() {
        let ok = RunReport::new(
            RunId::new(),
            300,
            vec![make_result("a", RunStatus::Succeeded)],
        );
        assert_eq!(ok.exit_code(), 0);

        let incomplete = RunReport::new(
            RunId::new(),
            300,
            vec![
                make_result("a", RunStatus::Succeeded),
                make_result("b", RunStatus::Incomplete { abandoned: 3 }),
            ],
        );
        assert_eq!(incomplete.exit_code(), 1);
        assert!(incomplete.get("b").unwrap().is_incomplete());
        assert!(incomplete.get("c").is_none());
    }

    #[test]
    fn test_report_json_shape() {
        let report = RunReport::new(
            RunId::new(),
            300,
            vec![make_result(
                "faulty",
                RunStatus::Failed {
                    error: SnippetError::unbound("x"),
                },
            )],
        );
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        let first = &json["results"][0];
        assert_eq!(first["name"], "faulty");
        assert_eq!(first["status"], "failed");
        assert_eq!(first["error"]["kind"], "unbound");
        assert_eq!(json["summary"]["failed"], 1);
    }
}
