//! Deferred callback queue.
//!
//! Each snippet owns one queue. Ordering is fully deterministic:
//! - Callbacks are keyed by `(due offset, registration id)` in a BTreeMap
//! - Equal due offsets fire in registration order
//! - No wall clock is consulted when ordering

use crate::snippet::SnippetContext;
use lantern_core::{Offset, SnippetResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Deferred continuation; receives the owning snippet's context
pub type Callback = Box<dyn FnOnce(&mut SnippetContext) -> SnippetResult>;

/// Handle returned when a callback is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

impl TimerId {
    /// Get raw registration number
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timer_{}", self.0)
    }
}

/// A callback popped from the queue, ready to fire
pub struct Deferred {
    /// Registration handle
    pub id: TimerId,
    /// Offset at which the callback falls due
    pub due: Offset,
    callback: Callback,
}

impl Deferred {
    /// Run the callback against the context
    ///
    /// # Errors
    ///
    /// Returns whatever fault the callback raises
    pub fn fire(self, ctx: &mut SnippetContext) -> SnippetResult {
        (self.callback)(ctx)
    }
}

impl std::fmt::Debug for Deferred {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deferred")
            .field("id", &self.id)
            .field("due", &self.due)
            .finish_non_exhaustive()
    }
}

/// Queue of pending callbacks for one snippet
#[derive(Default)]
pub struct DeferredQueue {
    pending: BTreeMap<(Offset, TimerId), Callback>,
    next_id: u64,
}

impl DeferredQueue {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a callback at an absolute offset
    pub fn schedule(&mut self, due: Offset, callback: Callback) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert((due, id), callback);
        id
    }

    /// Drop a pending callback. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(_, pending), _| *pending != id);
        self.pending.len() < before
    }

    /// Remove and return the earliest callback
    pub fn pop_next(&mut self) -> Option<Deferred> {
        let ((due, id), callback) = self.pending.pop_first()?;
        Some(Deferred { id, due, callback })
    }

    /// Due offset of the earliest callback
    #[must_use]
    pub fn peek_due(&self) -> Option<Offset> {
        self.pending.keys().next().map(|(due, _)| *due)
    }

    /// Drop every pending callback, returning how many were dropped
    pub fn clear(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    /// Number of pending callbacks
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl std::fmt::Debug for DeferredQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("pending", &self.pending.keys().collect::<Vec<_>>())
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn noop() -> Callback {
        Box::new(|_ctx| Ok(()))
    }

    #[test]
    fn test_queue_orders_by_due() {
        let mut queue = DeferredQueue::new();
        queue.schedule(Offset::from_millis(30), noop());
        queue.schedule(Offset::from_millis(10), noop());
        queue.schedule(Offset::from_millis(20), noop());

        let order: Vec<u64> = std::iter::from_fn(|| queue.pop_next())
            .map(|d| d.due.as_millis())
            .collect();
        assert_eq!(order, vec![10, 20, 30]);
    }

    #[test]
    fn test_queue_ties_in_registration_order() {
        let mut queue = DeferredQueue::new();
        let a = queue.schedule(Offset::from_millis(100), noop());
        let b = queue.schedule(Offset::from_millis(100), noop());
        let c = queue.schedule(Offset::from_millis(100), noop());

        assert_eq!(queue.pop_next().unwrap().id, a);
        assert_eq!(queue.pop_next().unwrap().id, b);
        assert_eq!(queue.pop_next().unwrap().id, c);
        assert!(queue.pop_next().is_none());
    }

    #[test]
    fn test_queue_cancel() {
        let mut queue = DeferredQueue::new();
        let a = queue.schedule(Offset::from_millis(5), noop());
        let b = queue.schedule(Offset::from_millis(6), noop());

        assert!(queue.cancel(a));
        assert!(!queue.cancel(a));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_next().unwrap().id, b);
    }

    #[test]
    fn test_queue_peek_and_clear() {
        let mut queue = DeferredQueue::new();
        assert!(queue.peek_due().is_none());

        queue.schedule(Offset::from_millis(7), noop());
        queue.schedule(Offset::from_millis(3), noop());
        assert_eq!(queue.peek_due(), Some(Offset::from_millis(3)));

        assert_eq!(queue.clear(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_timer_ids_unique_after_pop() {
        let mut queue = DeferredQueue::new();
        let a = queue.schedule(Offset::zero(), noop());
        queue.pop_next();
        let b = queue.schedule(Offset::zero(), noop());
        assert_ne!(a, b);
        assert_eq!(format!("{}", b), "timer_1");
    }

    proptest! {
        #[test]
        fn prop_pop_order_sorted(delays in proptest::collection::vec(0u64..500, 0..24)) {
            let mut queue = DeferredQueue::new();
            for delay in &delays {
                queue.schedule(Offset::from_millis(*delay), noop());
            }

            let popped: Vec<(Offset, TimerId)> = std::iter::from_fn(|| queue.pop_next())
                .map(|d| (d.due, d.id))
                .collect();

            prop_assert_eq!(popped.len(), delays.len());
            for pair in popped.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }
        }
    }
}
