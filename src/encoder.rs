use std::collections::HashSet;

use itertools::Itertools;
use tracing::{debug, info};
use varisat::Var;

use crate::cell::Cell;
use crate::cnf::{canonical, Clause, ClauseSet};
use crate::config::SolverConfig;
use crate::error::SolveError;
use crate::grid::Grid;
use crate::location::Location;
use crate::logic::exactly;

/// Translates a [`Grid`] into the CNF formula its solutions satisfy.
///
/// # Logical setup
/// Each [`Unknown`](Cell::Unknown) cell has one variable, true when that cell is a trap.
///
/// For every number `n` with `t` known traps around it, exactly `n - t` of its unknown neighbors are traps.
/// This is the binomial encoding from [`exactly`]: any `n - t + 1` of them contain a non-trap, and any
/// `m - (n - t) + 1` of them contain a trap.
///
/// A trap must touch a number or another trap, since it cannot touch a gem. So:
/// - an unknown cell with no number or known trap around it is either safe or has a trap neighbor;
/// - a known trap with no number or trap around it has a trap among its unknown neighbors;
/// - no neighbor of a known gem is a trap.
///
/// An assignment satisfies the result exactly when its [`decode`](crate::decode)d grid passes [`validate`](crate::validate).
pub struct CardinalityEncoder<'a> {
    grid: &'a Grid,
    max_clauses: usize,
    at_least_one: bool,
}

impl<'a> From<&'a Grid> for CardinalityEncoder<'a> {
    fn from(grid: &'a Grid) -> Self {
        Self::with_config(grid, &SolverConfig::default())
    }
}

impl<'a> CardinalityEncoder<'a> {
    /// Encode with the clause ceiling and redundant clause choice of `config`.
    pub fn with_config(grid: &'a Grid, config: &SolverConfig) -> Self {
        Self {
            grid,
            max_clauses: config.max_clauses,
            at_least_one: config.at_least_one,
        }
    }

    fn unknown_neighbor_vars(&self, location: Location) -> Vec<Var> {
        self.grid.neighbors(location).into_iter()
            .filter_map(|neighbor| self.grid.variable_of(neighbor))
            .collect_vec()
    }

    fn insert(&self, unique: &mut HashSet<Clause>, clause: Clause) -> Result<(), SolveError> {
        unique.insert(canonical(clause));
        if unique.len() > self.max_clauses {
            return Err(SolveError::EncodingOverflow { limit: self.max_clauses });
        }

        Ok(())
    }

    /// Build the deduplicated, canonically ordered clause set for the grid.
    ///
    /// Fails with [`EncodingOverflow`](SolveError::EncodingOverflow) as soon as more unique clauses than the
    /// ceiling exist. Numbers the grid cannot satisfy (see [`check_puzzle`](crate::check_puzzle)) encode to the
    /// empty clause rather than an error.
    pub fn encode(&self) -> Result<ClauseSet, SolveError> {
        let mut unique = HashSet::new();

        for (location, cell) in self.grid.cells() {
            let vars = self.unknown_neighbor_vars(location);
            match cell {
                Cell::Number(n) => {
                    let known_traps = self.grid.neighbor_cells(location).filter(|(_, cell)| cell.is_trap()).count();
                    match usize::from(n).checked_sub(known_traps) {
                        Some(remaining) => {
                            for clause in exactly(&vars, remaining, self.at_least_one) {
                                self.insert(&mut unique, clause)?;
                            }
                        }
                        // already over; the empty clause
                        None => self.insert(&mut unique, Vec::new())?,
                    }
                }
                Cell::Unknown => {
                    if self.grid.touches_number_or_trap(location) {
                        continue;
                    }
                    if let Some(var) = self.grid.variable_of(location) {
                        // a trap here needs a trap neighbor
                        let mut clause = vec![var.negative()];
                        clause.extend(vars.iter().map(|neighbor| neighbor.positive()));
                        self.insert(&mut unique, clause)?;
                    }
                }
                Cell::Gem => {
                    for var in vars {
                        self.insert(&mut unique, vec![var.negative()])?;
                    }
                }
                Cell::Trap => {
                    if !self.grid.touches_number_or_trap(location) {
                        self.insert(&mut unique, vars.iter().map(|var| var.positive()).collect_vec())?;
                    }
                }
            }
        }

        let clauses = ClauseSet::new(self.grid.max_variable(), unique);
        info!(
            width = self.grid.width(),
            height = self.grid.height(),
            variables = clauses.var_count(),
            clauses = clauses.len(),
            "encoded grid"
        );
        debug!(unknown = self.grid.unknown_locations().len(), "variables in use");

        Ok(clauses)
    }
}
