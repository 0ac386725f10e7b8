//! Propose/report bookkeeping.
//!
//! Purpose
//! -------
//! Track the window of outstanding proposals between `propose()` and the
//! matching `report()` calls. Each proposal is stamped with its own
//! iteration index when issued, so phase and refit timing do not depend on
//! how many reports are still in flight.
//!
//! Key behaviors
//! -------------
//! - [`ProposalQueue::next_iteration`] is the index the next proposal will
//!   carry (`issued` so far).
//! - [`ProposalQueue::issue`] enqueues a candidate at the back.
//! - [`ProposalQueue::resolve`] pops the oldest candidate; reports arrive in
//!   proposal order.
//! - [`ProposalQueue::completed`] counts resolved pairs; this is the
//!   sampler's public iteration counter.
//!
//! Invariants & assumptions
//! ------------------------
//! - `completed + pending.len() == issued` at all times.
//! - Resolving with nothing outstanding is a protocol violation and leaves
//!   the queue untouched.
use crate::nested::errors::{NestedError, NestedResult};
use ndarray::Array1;
use std::collections::VecDeque;

/// One outstanding candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    pub iteration: usize,
    pub theta: Array1<f64>,
}

/// FIFO of outstanding proposals plus issue/complete counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProposalQueue {
    pending: VecDeque<Proposal>,
    issued: usize,
    completed: usize,
}

impl ProposalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Iteration index the next issued proposal will carry.
    pub fn next_iteration(&self) -> usize {
        self.issued
    }

    /// Enqueue `theta` at the current index and return that index.
    pub fn issue(&mut self, theta: Array1<f64>) -> usize {
        let iteration = self.issued;
        self.pending.push_back(Proposal { iteration, theta });
        self.issued += 1;
        iteration
    }

    /// Peek at the oldest outstanding proposal.
    pub fn front(&self) -> Option<&Proposal> {
        self.pending.front()
    }

    /// Pop the oldest outstanding proposal and count it as completed.
    ///
    /// # Errors
    /// - `ProtocolViolation` if nothing is outstanding.
    pub fn resolve(&mut self) -> NestedResult<Proposal> {
        let proposal = self.pending.pop_front().ok_or(NestedError::ProtocolViolation {
            reason: "report() called without an outstanding propose().",
        })?;
        self.completed += 1;
        Ok(proposal)
    }

    /// Number of completed propose/report pairs.
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Number of proposals issued but not yet reported.
    pub fn n_pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Check FIFO order and counter bookkeeping with two proposals in flight.
    //
    // Given
    // -----
    // - Two issued proposals, then two resolutions, then a third resolution.
    //
    // Expect
    // ------
    // - Iterations 0 then 1 come back in order.
    // - `completed` tracks resolutions; the extra resolution is a
    //   `ProtocolViolation` that leaves counters unchanged.
    fn proposal_queue_resolves_in_issue_order() {
        // Arrange
        let mut queue = ProposalQueue::new();

        // Act
        let i0 = queue.issue(array![0.0]);
        let i1 = queue.issue(array![1.0]);
        let pending_after_issue = queue.n_pending();
        let first = queue.resolve().unwrap();
        let second = queue.resolve().unwrap();
        let extra = queue.resolve();

        // Assert
        assert_eq!((i0, i1), (0, 1));
        assert_eq!(pending_after_issue, 2);
        assert_eq!(first.iteration, 0);
        assert_eq!(first.theta, array![0.0]);
        assert_eq!(second.iteration, 1);
        assert!(matches!(extra, Err(NestedError::ProtocolViolation { .. })));
        assert_eq!(queue.completed(), 2);
        assert_eq!(queue.next_iteration(), 2);
        assert_eq!(queue.n_pending(), 0);
    }
}
