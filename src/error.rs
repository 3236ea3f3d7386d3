//! Error types for solving.

use thiserror::Error;

use crate::cell::MAX_NUMBER;
use crate::config::Strategy;
use crate::location::Location;
use crate::oracle::OracleError;
use crate::validator::Violation;

/// Ways a puzzle can be rejected before any search runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Malformed {
    /// A number cell claimed more traps than a cell can have neighbors.
    #[error("{location} shows {n}, but a cell has at most {} neighbors", MAX_NUMBER)]
    NumberOutOfRange { location: Location, n: u8 },
    /// A number already touches more known traps than it shows.
    #[error("{location} shows {n} but already touches {traps} known traps")]
    TooManyTraps { location: Location, n: u8, traps: usize },
    /// A number cannot reach its count even if every unknown neighbor were a trap.
    #[error("{location} shows {n} but only {traps} known traps and {unknown} unknown cells surround it")]
    TooFewCandidates { location: Location, n: u8, traps: usize, unknown: usize },
    /// A revealed gem sits next to a revealed trap.
    #[error("gem at {gem} touches the trap at {trap}")]
    GemTouchesTrap { gem: Location, trap: Location },
    /// A revealed trap has nothing around it that could ever support it.
    #[error("trap at {location} has no number, trap or unknown neighbor")]
    IsolatedTrap { location: Location },
}

/// A search strategy ran out of options.
///
/// Only [`Unsatisfiable`](Exhausted::Unsatisfiable) proves there is no solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Exhausted {
    /// Every candidate was ruled out.
    #[error("no assignment satisfies the puzzle")]
    Unsatisfiable,
    /// The configured ceiling was hit first; `explored` counts masks or decisions.
    #[error("search stopped after {explored} candidates without finding a solution")]
    Truncated { explored: u64 },
}

/// Reasons [`Solver::solve`](crate::Solver::solve) may fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The puzzle failed [`check_puzzle`](crate::check_puzzle).
    #[error("malformed puzzle: {0}")]
    MalformedPuzzle(#[from] Malformed),
    /// Cardinality encoding produced more clauses than the configured ceiling. No partial clause set is kept.
    #[error("encoding needs more than {limit} clauses")]
    EncodingOverflow { limit: usize },
    /// Brute force or backtracking found nothing.
    #[error(transparent)]
    SearchExhausted(#[from] Exhausted),
    /// The satisfiability backend failed. This is never retried.
    #[error("satisfiability oracle unavailable: {0}")]
    OracleUnavailable(#[from] OracleError),
    /// A strategy produced an assignment whose decoded grid breaks a rule.
    #[error("{strategy} produced a solution the validator rejects: {violation}")]
    Rejected { strategy: Strategy, violation: Violation },
}

impl SolveError {
    /// Whether this failure proves the puzzle has no solution, as opposed to giving up or failing to run.
    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self, Self::SearchExhausted(Exhausted::Unsatisfiable))
    }
}
