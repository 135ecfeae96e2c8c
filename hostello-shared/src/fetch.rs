//! Small helpers for request/response bookkeeping on a single-threaded UI.

use std::cell::Cell;
use std::fmt::Display;
use std::rc::Rc;
use tracing::warn;

/// Collapse a settled result into a value, logging and substituting on failure.
///
/// Used after an all-settled join (`futures_util::join!`) so that one failed
/// endpoint only blanks the field it feeds.
pub trait SettledExt<T> {
    /// The success value, or `fallback` when the call was rejected.
    fn settle_or(self, field: &str, fallback: T) -> T;

    /// The success value, or `None` when the call was rejected.
    fn settle(self, field: &str) -> Option<T>;
}

impl<T, E: Display> SettledExt<T> for Result<T, E> {
    fn settle_or(self, field: &str, fallback: T) -> T {
        self.settle(field).unwrap_or(fallback)
    }

    fn settle(self, field: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(field, error = %error, "aggregate fetch slot rejected");
                None
            }
        }
    }
}

/// Shared flag telling async continuations whether their owner is still mounted.
#[derive(Debug, Clone)]
pub struct Liveness(Rc<Cell<bool>>);

impl Liveness {
    /// A live flag.
    #[must_use]
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    /// `false` once any clone called [`retire`](Self::retire).
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.0.get()
    }

    /// Mark the owner as torn down. Every clone observes it.
    pub fn retire(&self) {
        self.0.set(false);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Ticket handed out by [`RequestGeneration::issue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Monotonic counter used to drop responses that were overtaken by a newer request.
#[derive(Debug, Clone, Default)]
pub struct RequestGeneration(Rc<Cell<u64>>);

impl RequestGeneration {
    /// Counter with no request issued yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request; every previously issued ticket becomes stale.
    #[must_use]
    pub fn issue(&self) -> Ticket {
        let next = self.0.get().wrapping_add(1);
        self.0.set(next);
        Ticket(next)
    }

    /// Make every outstanding ticket stale without starting a request.
    ///
    /// Used after a local mutation that an in-flight response predates.
    pub fn invalidate(&self) {
        self.0.set(self.0.get().wrapping_add(1));
    }

    /// Whether `ticket` still belongs to the latest request.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.0.get() == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settle_or_substitutes_on_error() {
        let ok: Result<u32, String> = Ok(3);
        let failed: Result<u32, String> = Err("boom".to_string());
        assert_eq!(ok.settle_or("a", 0), 3);
        assert_eq!(failed.settle_or("b", 0), 0);
    }

    #[test]
    fn liveness_is_shared_between_clones() {
        let owner = Liveness::new();
        let task = owner.clone();
        assert!(task.is_alive());
        owner.retire();
        assert!(!task.is_alive());
    }

    #[test]
    fn newer_ticket_makes_older_stale() {
        let generation = RequestGeneration::new();
        let first = generation.issue();
        assert!(generation.is_current(first));
        let second = generation.issue();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[test]
    fn invalidate_stales_outstanding_ticket() {
        let generation = RequestGeneration::new();
        let ticket = generation.issue();
        generation.invalidate();
        assert!(!generation.is_current(ticket));
        assert!(generation.is_current(generation.issue()));
    }

    #[tokio::test]
    async fn all_settled_join_keeps_successful_slots() {
        async fn ok_slot() -> Result<Vec<u8>, String> {
            Ok(vec![1, 2])
        }
        async fn failed_slot() -> Result<Vec<u8>, String> {
            Err("down".to_string())
        }

        let (left, right) = futures_util::join!(ok_slot(), failed_slot());
        assert_eq!(left.settle_or("left", Vec::new()).len(), 2);
        assert!(right.settle("right").is_none());
    }
}
