//! Sequential snippet runner.
//!
//! Snippets run one at a time in registration order. Each gets a fresh
//! sink and timer queue; deferred callbacks are drained (or abandoned at
//! the timeout) before the next snippet starts.

use crate::config::RunnerConfig;
use crate::result::{RunReport, RunResult, RunStatus};
use crate::snippet::{Snippet, SnippetContext};
use indexmap::IndexMap;
use lantern_core::{ConfigError, RegistryError, RunId, SnippetName, Topic};
use lantern_log::CaptureSink;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Selects a subset of registered snippets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetFilter {
    names: Vec<String>,
    topic: Option<Topic>,
}

impl SnippetFilter {
    /// Match everything
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to an exact name (may be repeated)
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    /// Restrict to one topic
    #[must_use]
    pub fn with_topic(mut self, topic: Topic) -> Self {
        self.topic = Some(topic);
        self
    }

    /// Whether a snippet passes the filter
    #[must_use]
    pub fn matches(&self, snippet: &dyn Snippet) -> bool {
        let name_ok = self.names.is_empty() || self.names.iter().any(|n| n == snippet.name());
        let topic_ok = self.topic.is_none_or(|topic| topic == snippet.topic());
        name_ok && topic_ok
    }

    /// Names the filter asks for explicitly
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Runner owning the snippet registry.
///
/// Registration happens before any run; the registry is never mutated
/// while snippets execute.
pub struct Runner {
    config: RunnerConfig,
    registry: IndexMap<SnippetName, Box<dyn Snippet>>,
}

impl Runner {
    /// Create a runner
    ///
    /// # Errors
    ///
    /// Returns error if the config does not validate
    pub fn new(config: RunnerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            registry: IndexMap::new(),
        })
    }

    /// Add a snippet to the end of the execution list
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if the name is taken, or
    /// [`RegistryError::InvalidName`] if it is empty or contains whitespace.
    pub fn register<S>(&mut self, snippet: S) -> Result<(), RegistryError>
    where
        S: Snippet + 'static,
    {
        self.register_boxed(Box::new(snippet))
    }

    /// Add an already boxed snippet
    ///
    /// # Errors
    ///
    /// Same as [`Runner::register`]
    pub fn register_boxed(&mut self, snippet: Box<dyn Snippet>) -> Result<(), RegistryError> {
        let name = SnippetName::new(snippet.name())?;
        if self.registry.contains_key(&name) {
            return Err(RegistryError::DuplicateName {
                name: name.to_string(),
            });
        }
        debug!(snippet = %name, topic = %snippet.topic(), "registered snippet");
        self.registry.insert(name, snippet);
        Ok(())
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Number of registered snippets
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Registered names in execution order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.registry.keys().map(SnippetName::as_str)
    }

    /// Registered snippets in execution order
    pub fn snippets(&self) -> impl Iterator<Item = &dyn Snippet> {
        self.registry.values().map(|snippet| snippet.as_ref())
    }

    /// Look up a snippet by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Snippet> {
        self.registry
            .iter()
            .find(|(key, _)| key.as_str() == name)
            .map(|(_, snippet)| snippet.as_ref())
    }

    /// Run every snippet in registration order
    pub async fn run_all(&self) -> RunReport {
        self.run_selected(|_| true).await
    }

    /// Run the snippets selected by `filter`, keeping registration order
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the filter names a snippet
    /// that is not registered.
    pub async fn run_matching(&self, filter: &SnippetFilter) -> Result<RunReport, RegistryError> {
        if let Some(missing) = filter.names().iter().find(|name| self.get(name).is_none()) {
            return Err(RegistryError::NotFound {
                name: missing.clone(),
            });
        }
        Ok(self.run_selected(|snippet| filter.matches(snippet)).await)
    }

    /// Run one snippet by name
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no snippet has this name
    pub async fn run_one(&self, name: &str) -> Result<RunResult, RegistryError> {
        let snippet = self.get(name).ok_or_else(|| RegistryError::NotFound {
            name: name.to_string(),
        })?;
        let mut sink = CaptureSink::new();
        Ok(self.execute(snippet, &mut sink).await)
    }

    /// Run every snippet against one caller-owned sink.
    ///
    /// Sequence numbers continue across snippets; each result holds only
    /// the lines its own snippet emitted.
    pub async fn run_all_shared(&self, sink: &mut CaptureSink) -> RunReport {
        let run_id = RunId::new();
        let mut results = Vec::with_capacity(self.registry.len());
        for snippet in self.snippets() {
            results.push(self.execute(snippet, sink).await);
        }
        self.finish(run_id, results)
    }

    async fn run_selected<P>(&self, mut select: P) -> RunReport
    where
        P: FnMut(&dyn Snippet) -> bool,
    {
        let run_id = RunId::new();
        info!(%run_id, snippets = self.registry.len(), timeout_ms = self.config.timeout_millis, "starting run");

        let mut results = Vec::new();
        for snippet in self.snippets().filter(|snippet| select(*snippet)) {
            let mut sink = CaptureSink::new();
            results.push(self.execute(snippet, &mut sink).await);
        }
        self.finish(run_id, results)
    }

    fn finish(&self, run_id: RunId, results: Vec<RunResult>) -> RunReport {
        let report = RunReport::new(run_id, self.config.timeout_millis, results);
        info!(%run_id, summary = %report.summary(), "run finished");
        report
    }

    /// Execute a single snippet: body first, then its deferred callbacks
    async fn execute(&self, snippet: &dyn Snippet, sink: &mut CaptureSink) -> RunResult {
        let name = snippet.name();
        let start = sink.len();
        let started = Instant::now();
        let mut ctx = SnippetContext::with_sink(std::mem::take(sink));

        debug!(snippet = name, "running snippet body");
        let status = match snippet.run(&mut ctx) {
            Ok(()) => drain(name, &mut ctx, started, self.config.timeout()).await,
            Err(error) => {
                let abandoned = ctx.abandon_pending();
                warn!(snippet = name, %error, abandoned, "snippet body failed");
                RunStatus::Failed { error }
            }
        };

        let elapsed = ctx.now();
        *sink = ctx.into_sink();
        let lines = sink.records()[start..].to_vec();
        debug!(snippet = name, lines = lines.len(), status = status.label(), "snippet finished");

        RunResult::new(name, snippet.topic(), lines, status, elapsed)
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("config", &self.config)
            .field("registry", &self.registry.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Fire pending callbacks in due order until the queue is empty, a
/// callback faults, or the next due offset lies past the budget.
///
/// Abandonment depends only on the logical due offset. Wall-clock lateness
/// of a wakeup never drops a callback that is due within the budget.
async fn drain(
    name: &str,
    ctx: &mut SnippetContext,
    started: Instant,
    budget: Duration,
) -> RunStatus {
    while let Some(deferred) = ctx.next_deferred() {
        if deferred.due.exceeds(budget) {
            let abandoned = 1 + ctx.abandon_pending();
            warn!(snippet = name, due = %deferred.due, abandoned, "timeout elapsed with callbacks pending");
            return RunStatus::Incomplete { abandoned };
        }

        tokio::time::sleep_until(started + deferred.due.as_duration()).await;
        ctx.advance_to(deferred.due);
        debug!(snippet = name, timer = %deferred.id, at = %deferred.due, "firing deferred callback");

        if let Err(error) = deferred.fire(ctx) {
            let abandoned = ctx.abandon_pending();
            warn!(snippet = name, %error, abandoned, "deferred callback failed");
            return RunStatus::Failed { error };
        }
    }
    RunStatus::Succeeded
}
