//! Captured output lines.

use lantern_core::Offset;
use serde::{Deserialize, Serialize};

/// Where a line was emitted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// The snippet's synchronous body
    Sync,
    /// A deferred callback
    Deferred,
}

impl Origin {
    /// Whether the line came from a deferred callback
    #[must_use]
    pub const fn is_deferred(self) -> bool {
        matches!(self, Self::Deferred)
    }
}

/// A single emitted line. Never mutated after capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    sequence: u64,
    text: String,
    at: Offset,
    origin: Origin,
}

impl LogLine {
    /// Create a new line
    #[must_use]
    pub fn new(sequence: u64, text: impl Into<String>, at: Offset, origin: Origin) -> Self {
        Self {
            sequence,
            text: text.into(),
            at,
            origin,
        }
    }

    /// Position within the owning sink, starting at 0
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Emitted text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Logical offset at which the line was emitted
    #[must_use]
    pub const fn at(&self) -> Offset {
        self.at
    }

    /// Whether the line came from the body or a callback
    #[must_use]
    pub const fn origin(&self) -> Origin {
        self.origin
    }
}

impl std::fmt::Display for LogLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_accessors() {
        let line = LogLine::new(3, "click event!", Offset::from_millis(0), Origin::Deferred);
        assert_eq!(line.sequence(), 3);
        assert_eq!(line.text(), "click event!");
        assert_eq!(line.at(), Offset::zero());
        assert!(line.origin().is_deferred());
        assert_eq!(format!("{}", line), "click event!");
    }

    #[test]
    fn test_line_serialize() {
        let line = LogLine::new(0, "3", Offset::from_millis(100), Origin::Deferred);
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["sequence"], 0);
        assert_eq!(json["text"], "3");
        assert_eq!(json["at"], 100);
        assert_eq!(json["origin"], "deferred");
    }
}
