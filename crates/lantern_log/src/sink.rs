//! Capture sink for emitted lines.

use crate::line::{LogLine, Origin};
use lantern_core::Offset;

/// Records emitted text in arrival order.
///
/// Every line is stamped with the sink's current offset and origin; the
/// runtime moves the stamp forward before each deferred callback fires.
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    lines: Vec<LogLine>,
    at: Offset,
    origin: Option<Origin>,
}

impl CaptureSink {
    /// Create an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` with the next sequence number.
    ///
    /// Accepts any string, including the empty one. Returns the sequence
    /// number assigned to the line.
    pub fn emit(&mut self, text: impl Into<String>) -> u64 {
        let sequence = self.lines.len() as u64;
        let line = LogLine::new(
            sequence,
            text,
            self.at,
            self.origin.unwrap_or(Origin::Sync),
        );
        tracing::trace!(sequence, at = %self.at, text = line.text(), "captured line");
        self.lines.push(line);
        sequence
    }

    /// Move the stamp applied to subsequent lines
    pub fn stamp(&mut self, at: Offset, origin: Origin) {
        self.at = at;
        self.origin = Some(origin);
    }

    /// Recorded strings in emission order.
    ///
    /// Each call starts a fresh iterator; nothing is consumed.
    #[must_use]
    pub fn lines(&self) -> Lines<'_> {
        Lines {
            inner: self.lines.iter(),
        }
    }

    /// Recorded lines with their metadata
    #[must_use]
    pub fn records(&self) -> &[LogLine] {
        &self.lines
    }

    /// Clear all recorded lines and restart numbering at 0
    pub fn reset(&mut self) {
        self.lines.clear();
        self.at = Offset::zero();
        self.origin = None;
    }

    /// Number of recorded lines
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Finalize into the recorded lines
    #[must_use]
    pub fn into_lines(self) -> Vec<LogLine> {
        self.lines
    }
}

/// Lazy iterator over recorded text
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    inner: std::slice::Iter<'a, LogLine>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(LogLine::text)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Lines<'_> {}

impl DoubleEndedIterator for Lines<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(LogLine::text)
    }
}
