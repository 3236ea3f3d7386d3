use std::time::{Duration, Instant};

use itertools::Itertools;
use strum::VariantArray;
use tracing::{debug, info};

use crate::assignment::{decode, Assignment};
use crate::backtracking::Backtracker;
use crate::brute_force;
use crate::cnf::ClauseSet;
use crate::config::{SolverConfig, Strategy};
use crate::encoder::CardinalityEncoder;
use crate::error::{Exhausted, SolveError};
use crate::grid::Grid;
use crate::oracle::{Oracle, OracleAnswer, VarisatOracle};
use crate::validator::{check_puzzle, validate};

/// A solved grid and how it was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    /// Traps and gems filled in; cells still [`Unknown`](crate::Cell::Unknown) are empty.
    pub grid: Grid,
    /// The trap decision for every unknown cell of the puzzle.
    pub assignment: Assignment,
    /// The strategy that produced the assignment.
    pub strategy: Strategy,
    /// Wall time from the pre-check through validation.
    pub elapsed: Duration,
}

/// Runs a [`Strategy`] on a [`Grid`] and checks the answer.
///
/// Every solve goes through the same steps:
/// 1. [`check_puzzle`] rejects puzzles that are malformed on their face;
/// 2. the strategy searches for a trap assignment;
/// 3. the assignment is [`decode`]d and [`validate`]d against the puzzle, whatever strategy produced it.
pub struct Solver<O: Oracle = VarisatOracle> {
    config: SolverConfig,
    oracle: O,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl Solver {
    /// A solver using [`VarisatOracle`].
    pub fn new(config: SolverConfig) -> Self {
        Self::with_oracle(config, VarisatOracle)
    }
}

impl<O: Oracle> Solver<O> {
    /// A solver asking `oracle` instead of [`VarisatOracle`] under [`Strategy::Oracle`].
    pub fn with_oracle(config: SolverConfig, oracle: O) -> Self {
        Self { config, oracle }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Check `grid` and encode it to clauses under this solver's configuration.
    pub fn encode(&self, grid: &Grid) -> Result<ClauseSet, SolveError> {
        check_puzzle(grid)?;
        CardinalityEncoder::with_config(grid, &self.config).encode()
    }

    /// Solve with the configured [`Strategy`].
    pub fn solve(&mut self, grid: &Grid) -> Result<Solution, SolveError> {
        self.solve_with(grid, self.config.strategy)
    }

    /// Solve with `strategy`, regardless of the configured one.
    ///
    /// Brute force and backtracking return the first solution in the same order, so they agree on every grid both
    /// finish. The oracle returns some solution, not necessarily that one.
    pub fn solve_with(&mut self, grid: &Grid, strategy: Strategy) -> Result<Solution, SolveError> {
        let started = Instant::now();
        check_puzzle(grid)?;

        let assignment = match strategy {
            Strategy::BruteForce => brute_force::search(grid, self.config.max_masks)?,
            Strategy::Backtracking => Backtracker::new(grid, self.config.max_steps).search()?,
            Strategy::Oracle => {
                let clauses = CardinalityEncoder::with_config(grid, &self.config).encode()?;
                match self.oracle.solve(&clauses)? {
                    OracleAnswer::Satisfiable(assignment) => assignment,
                    OracleAnswer::Unsatisfiable => return Err(Exhausted::Unsatisfiable.into()),
                }
            }
        };

        let solved = decode(grid, &assignment);
        validate(grid, &solved).map_err(|violation| {
            debug!(%strategy, %violation, "solution rejected");
            SolveError::Rejected { strategy, violation }
        })?;

        let elapsed = started.elapsed();
        info!(%strategy, ?elapsed, "solved grid");

        Ok(Solution {
            grid: solved,
            assignment,
            strategy,
            elapsed,
        })
    }

    /// Solve with every [`Strategy`] in turn, e.g. to check they agree.
    pub fn solve_all(&mut self, grid: &Grid) -> Vec<(Strategy, Result<Solution, SolveError>)> {
        Strategy::VARIANTS.iter()
            .map(|strategy| (*strategy, self.solve_with(grid, *strategy)))
            .collect_vec()
    }
}
