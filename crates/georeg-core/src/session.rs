//! One-operation-at-a-time session reducer.
//!
//! Every issued request carries a monotonically increasing sequence
//! number; a settlement is accepted only for the latest issued ticket.
//! A stale response can therefore never overwrite newer state, and a
//! second submission is rejected while one is in flight.

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a request is already in flight")]
    Busy,
}

/// Opaque receipt for an issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
}

/// Session phase. Transitions are whole-state replacements, never partial
/// mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase<T> {
    Idle,
    InFlight { seq: u64 },
    Settled { seq: u64, outcome: Result<T, String> },
}

#[derive(Debug)]
pub struct Session<T> {
    next_seq: u64,
    phase: Phase<T>,
}

impl<T> Default for Session<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Session<T> {
    pub fn new() -> Self {
        Self {
            next_seq: 0,
            phase: Phase::Idle,
        }
    }

    /// Issue a ticket for a new request.
    ///
    /// Only one request may be outstanding; callers gate their submit
    /// action on this returning `Ok`.
    pub fn begin(&mut self) -> Result<Ticket, SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        self.next_seq += 1;
        self.phase = Phase::InFlight { seq: self.next_seq };
        Ok(Ticket { seq: self.next_seq })
    }

    /// Record the outcome for a ticket.
    ///
    /// Returns `false` and leaves state untouched when the ticket is not
    /// the one currently in flight, i.e. a stale response.
    pub fn settle(&mut self, ticket: Ticket, outcome: Result<T, String>) -> bool {
        match self.phase {
            Phase::InFlight { seq } if seq == ticket.seq => {
                self.phase = Phase::Settled { seq, outcome };
                true
            }
            _ => {
                debug!(seq = ticket.seq, "discarding stale settlement");
                false
            }
        }
    }

    /// Return to `Idle`, dropping any in-flight or settled state. A later
    /// settlement of an abandoned ticket is discarded.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
    }

    pub fn phase(&self) -> &Phase<T> {
        &self.phase
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::InFlight { .. })
    }

    pub fn outcome(&self) -> Option<&Result<T, String>> {
        match &self.phase {
            Phase::Settled { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    pub fn into_outcome(self) -> Option<Result<T, String>> {
        match self.phase {
            Phase::Settled { outcome, .. } => Some(outcome),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_settle_cycle() {
        let mut session: Session<u32> = Session::new();
        let ticket = session.begin().unwrap();
        assert!(session.is_busy());
        assert!(session.settle(ticket, Ok(7)));
        assert_eq!(session.outcome(), Some(&Ok(7)));
    }

    #[test]
    fn busy_while_in_flight() {
        let mut session: Session<u32> = Session::new();
        let _ticket = session.begin().unwrap();
        assert_eq!(session.begin(), Err(SessionError::Busy));
    }

    #[test]
    fn can_begin_again_after_settlement() {
        let mut session: Session<u32> = Session::new();
        let first = session.begin().unwrap();
        session.settle(first, Err("backend down".into()));
        assert!(session.begin().is_ok());
    }

    #[test]
    fn stale_settlement_discarded_after_reset() {
        let mut session: Session<u32> = Session::new();
        let stale = session.begin().unwrap();
        session.reset();
        let fresh = session.begin().unwrap();
        // Stale response arrives after a newer request was issued.
        assert!(!session.settle(stale, Ok(1)));
        assert!(session.is_busy());
        assert!(session.settle(fresh, Ok(2)));
        assert_eq!(session.outcome(), Some(&Ok(2)));
    }

    #[test]
    fn settle_when_idle_is_discarded() {
        let mut session: Session<u32> = Session::new();
        let ticket = session.begin().unwrap();
        session.reset();
        assert!(!session.settle(ticket, Ok(1)));
        assert_eq!(session.phase(), &Phase::Idle);
    }

    #[test]
    fn sequence_numbers_increase() {
        let mut session: Session<u32> = Session::new();
        let a = session.begin().unwrap();
        session.reset();
        let b = session.begin().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn error_outcome_preserved_verbatim() {
        let mut session: Session<u32> = Session::new();
        let ticket = session.begin().unwrap();
        session.settle(ticket, Err("500: retrieval backend offline".into()));
        assert_eq!(
            session.into_outcome(),
            Some(Err("500: retrieval backend offline".into()))
        );
    }
}
