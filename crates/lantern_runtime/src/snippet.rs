//! Snippet contract and execution context.

use crate::timer::{Deferred, DeferredQueue, TimerId};
use lantern_core::{Offset, SnippetResult, Topic};
use lantern_log::{CaptureSink, Origin};

/// A named, self-contained demonstration.
///
/// Pure sequential snippets only call [`SnippetContext::emit`]. Deferred
/// snippets also schedule callbacks with [`SnippetContext::set_timeout`];
/// those fire after `run` returns, in due order.
///
/// Bodies and callbacks report faults by returning `Err`. The runner records
/// the failure and moves on to the next snippet. A panic is not a fault: it
/// unwinds out of the runner, and release builds abort the process.
pub trait Snippet {
    /// Unique registry name
    fn name(&self) -> &str;

    /// One-line description shown by listings
    fn summary(&self) -> &str {
        ""
    }

    /// Concept the snippet belongs to
    fn topic(&self) -> Topic {
        Topic::General
    }

    /// Perform the demonstration
    ///
    /// # Errors
    ///
    /// Returns a [`lantern_core::SnippetError`] when the body faults. Lines
    /// emitted before the fault are kept. Never panic to signal a fault.
    fn run(&self, ctx: &mut SnippetContext) -> SnippetResult;
}

/// Closure-backed snippet
pub struct FnSnippet<F> {
    name: String,
    summary: String,
    topic: Topic,
    body: F,
}

impl<F> FnSnippet<F>
where
    F: Fn(&mut SnippetContext) -> SnippetResult,
{
    /// Wrap a closure under `name`
    pub fn new(name: impl Into<String>, body: F) -> Self {
        Self {
            name: name.into(),
            summary: String::new(),
            topic: Topic::General,
            body,
        }
    }

    /// Set the listing summary
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Set the topic
    #[must_use]
    pub fn with_topic(mut self, topic: Topic) -> Self {
        self.topic = topic;
        self
    }
}

impl<F> Snippet for FnSnippet<F>
where
    F: Fn(&mut SnippetContext) -> SnippetResult,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> &str {
        &self.summary
    }

    fn topic(&self) -> Topic {
        self.topic
    }

    fn run(&self, ctx: &mut SnippetContext) -> SnippetResult {
        (self.body)(ctx)
    }
}

/// State handed to a snippet while it runs: its sink, its timer queue and
/// the current logical offset.
#[derive(Debug, Default)]
pub struct SnippetContext {
    sink: CaptureSink,
    timers: DeferredQueue,
    now: Offset,
}

impl SnippetContext {
    /// Context with a fresh sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context writing into an existing sink
    #[must_use]
    pub fn with_sink(mut sink: CaptureSink) -> Self {
        sink.stamp(Offset::zero(), Origin::Sync);
        Self {
            sink,
            timers: DeferredQueue::new(),
            now: Offset::zero(),
        }
    }

    /// Emit one line
    pub fn emit(&mut self, text: impl Into<String>) {
        self.sink.emit(text);
    }

    /// Emit each item on its own line
    pub fn emit_all<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for line in lines {
            self.sink.emit(line);
        }
    }

    /// Schedule `callback` to run `delay_ms` after the current offset
    pub fn set_timeout<F>(&mut self, delay_ms: u64, callback: F) -> TimerId
    where
        F: FnOnce(&mut SnippetContext) -> SnippetResult + 'static,
    {
        let due = self.now.saturating_add(delay_ms);
        let id = self.timers.schedule(due, Box::new(callback));
        tracing::trace!(timer = %id, due = %due, "scheduled deferred callback");
        id
    }

    /// Cancel a pending callback
    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        self.timers.cancel(id)
    }

    /// Number of callbacks still pending
    #[must_use]
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Current logical offset
    #[must_use]
    pub const fn now(&self) -> Offset {
        self.now
    }

    /// Lines captured so far
    #[must_use]
    pub fn sink(&self) -> &CaptureSink {
        &self.sink
    }

    /// Finalize into the sink
    #[must_use]
    pub fn into_sink(self) -> CaptureSink {
        self.sink
    }

    pub(crate) fn next_deferred(&mut self) -> Option<Deferred> {
        self.timers.pop_next()
    }

    pub(crate) fn advance_to(&mut self, at: Offset) {
        self.now = at;
        self.sink.stamp(at, Origin::Deferred);
    }

    pub(crate) fn abandon_pending(&mut self) -> usize {
        self.timers.clear()
    }
}
