//! Logical time for LANTERN.
//!
//! Offsets are measured in milliseconds from the moment a snippet's body
//! starts. Deferred callbacks are ordered by the offset at which they fall
//! due, never by wall clock.

use serde::{Deserialize, Serialize};

/// Millisecond offset from the start of a snippet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Offset(u64);

impl Offset {
    /// The start of the snippet
    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Create from milliseconds
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Get raw milliseconds
    #[must_use]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Convert to a std duration
    #[must_use]
    pub const fn as_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.0)
    }

    /// Offset after waiting `millis` more
    #[must_use]
    pub const fn saturating_add(&self, millis: u64) -> Self {
        Self(self.0.saturating_add(millis))
    }

    /// Whether this offset lies past the given budget
    #[must_use]
    pub const fn exceeds(&self, budget: std::time::Duration) -> bool {
        (self.0 as u128) > budget.as_millis()
    }
}

impl Default for Offset {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Offset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "+{}ms", self.0)
    }
}

impl From<u64> for Offset {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_offset_zero() {
        assert_eq!(Offset::zero().as_millis(), 0);
        assert_eq!(Offset::default(), Offset::zero());
    }

    #[test]
    fn test_offset_add() {
        let t = Offset::from_millis(100);
        assert_eq!(t.saturating_add(50).as_millis(), 150);
        assert_eq!(t.as_millis(), 100);

        let max = Offset::from_millis(u64::MAX);
        assert_eq!(max.saturating_add(1).as_millis(), u64::MAX);
    }

    #[test]
    fn test_offset_ord() {
        assert!(Offset::from_millis(10) < Offset::from_millis(20));
        assert_eq!(Offset::from(5), Offset::from_millis(5));
    }

    #[test]
    fn test_offset_exceeds() {
        let budget = Duration::from_millis(300);
        assert!(!Offset::from_millis(300).exceeds(budget));
        assert!(Offset::from_millis(301).exceeds(budget));
    }

    #[test]
    fn test_offset_display() {
        assert_eq!(format!("{}", Offset::from_millis(42)), "+42ms");
    }
}
