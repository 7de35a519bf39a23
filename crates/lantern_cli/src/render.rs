//! Text rendering of transcripts, reports and listings.

use console::style;
use lantern_core::Topic;
use lantern_log::{LineCursor, Origin};
use lantern_runtime::{RunReport, RunResult, RunStatus, Runner};
use std::fmt::Write;

fn status_label(status: &RunStatus) -> String {
    let label = status.to_string();
    match status {
        RunStatus::Succeeded => style(label).green().bold().to_string(),
        RunStatus::Failed { .. } => style(label).red().bold().to_string(),
        RunStatus::Incomplete { .. } => style(label).yellow().bold().to_string(),
    }
}

/// One snippet: header, numbered lines, status
pub fn result(result: &RunResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}",
        style(result.name()).cyan().bold(),
        style(format!("[{}]", result.topic())).dim()
    );

    let mut cursor = LineCursor::new(result.lines());
    while let Some(line) = cursor.next() {
        match line.origin() {
            Origin::Sync => {
                let _ = writeln!(out, "  {:>3} | {}", line.sequence(), line.text());
            }
            Origin::Deferred => {
                let _ = writeln!(
                    out,
                    "  {:>3} | {} {}",
                    line.sequence(),
                    line.text(),
                    style(line.at()).dim()
                );
            }
        }
    }
    let _ = writeln!(out, "  => {}", status_label(result.status()));
    out
}

/// Every result followed by the summary line
pub fn report(report: &RunReport) -> String {
    let mut out = String::new();
    for item in report.results() {
        out.push_str(&result(item));
        out.push('\n');
    }
    let summary = report.summary();
    let line = summary.to_string();
    let line = if summary.all_succeeded() {
        style(line).green()
    } else {
        style(line).red()
    };
    let _ = writeln!(out, "{}", line);
    out
}

/// Registered snippets with topic and summary
pub fn listing(runner: &Runner, topic: Option<Topic>) -> String {
    let selected: Vec<_> = runner
        .snippets()
        .filter(|snippet| topic.is_none_or(|t| t == snippet.topic()))
        .collect();
    let width = selected
        .iter()
        .map(|snippet| snippet.name().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for snippet in selected {
        let _ = writeln!(
            out,
            "{:<width$}  {:<12} {}",
            snippet.name(),
            snippet.topic().as_str(),
            snippet.summary(),
            width = width
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lantern_core::{Offset, RunId, SnippetError};
    use lantern_log::LogLine;
    use lantern_runtime::{FnSnippet, RunnerConfig, SnippetContext};

    fn plain() {
        console::set_colors_enabled(false);
    }

    fn sample(status: RunStatus) -> RunResult {
        let lines = vec![
            LogLine::new(0, "finished function", Offset::zero(), Origin::Sync),
            LogLine::new(1, "click event!", Offset::from_millis(0), Origin::Deferred),
        ];
        RunResult::new("eventQueue", Topic::Async, lines, status, Offset::zero())
    }

    #[test]
    fn test_result_text() {
        plain();
        let text = result(&sample(RunStatus::Succeeded));
        assert_eq!(
            text,
            "eventQueue [async]\n    0 | finished function\n    1 | click event! +0ms\n  => pass\n"
        );
    }

    #[test]
    fn test_report_ends_with_summary() {
        plain();
        let failed = RunStatus::Failed {
            error: SnippetError::unbound("x"),
        };
        let run_report = RunReport::new(
            RunId::new(),
            300,
            vec![sample(RunStatus::Succeeded), sample(failed)],
        );
        let text = report(&run_report);
        assert!(text.contains("=> fail (x is not defined)"));
        assert!(text.ends_with("2 snippets: 1 passed, 1 failed, 0 incomplete\n"));
    }

    #[test]
    fn test_listing_filters_by_topic() {
        plain();
        let mut runner = Runner::new(RunnerConfig::default()).unwrap();
        runner
            .register(
                FnSnippet::new("a", |_: &mut SnippetContext| Ok(()))
                    .with_topic(Topic::Scope)
                    .with_summary("first"),
            )
            .unwrap();
        runner
            .register(FnSnippet::new("bb", |_: &mut SnippetContext| Ok(())).with_topic(Topic::Async))
            .unwrap();

        let all = listing(&runner, None);
        assert_eq!(all.lines().count(), 2);
        assert!(all.starts_with("a   scope        first"));

        let scoped = listing(&runner, Some(Topic::Scope));
        assert_eq!(scoped.lines().count(), 1);
    }
}
