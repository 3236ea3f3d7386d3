use itertools::Itertools;
use varisat::{Lit, Var};

use crate::cell::Cell;
use crate::grid::Grid;

/// A trap / not-trap decision per variable, or none yet.
///
/// Indexed by [`Var::index`]; a full assignment decides every variable of every unknown cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignment {
    values: Vec<Option<bool>>,
}

impl Assignment {
    /// An assignment over `var_count` variables with nothing decided.
    pub fn unassigned(var_count: usize) -> Self {
        Self { values: vec![None; var_count] }
    }

    /// Read back the decisions a solved grid implies for `puzzle`: every unknown cell of `puzzle` is decided,
    /// as a trap exactly when `solved` holds a [`Trap`](Cell::Trap) there.
    pub fn from_solution(puzzle: &Grid, solved: &Grid) -> Self {
        let mut assignment = Self::unassigned(puzzle.max_variable());
        for location in puzzle.unknown_locations() {
            if let Some(var) = puzzle.variable_of(location) {
                assignment.set(var, solved.get(location).is_some_and(|cell| cell.is_trap()));
            }
        }

        assignment
    }

    pub(crate) fn from_literals(var_count: usize, literals: &[Lit]) -> Self {
        let mut assignment = Self::unassigned(var_count);
        for lit in literals {
            assignment.set(lit.var(), lit.is_positive());
        }

        assignment
    }

    pub fn var_count(&self) -> usize {
        self.values.len()
    }

    /// Whether `var` is a trap, or `None` while undecided.
    pub fn get(&self, var: Var) -> Option<bool> {
        self.values.get(var.index()).copied().flatten()
    }

    /// Decide `var`, growing the assignment if `var` lies past its end.
    pub fn set(&mut self, var: Var, trap: bool) {
        if var.index() >= self.values.len() {
            self.values.resize(var.index() + 1, None);
        }
        self.values[var.index()] = Some(trap);
    }

    pub fn unset(&mut self, var: Var) {
        if let Some(value) = self.values.get_mut(var.index()) {
            *value = None;
        }
    }

    /// Whether `var` is decided as a trap. Undecided variables are not traps.
    pub fn is_trap(&self, var: Var) -> bool {
        self.get(var) == Some(true)
    }

    /// Variables decided as traps, in ascending order.
    pub fn traps(&self) -> impl Iterator<Item = Var> + '_ {
        self.values.iter()
            .positions(|value| *value == Some(true))
            .map(Var::from_index)
    }

    /// Whether every unknown cell of `grid` is decided.
    pub fn is_complete_for(&self, grid: &Grid) -> bool {
        grid.unknown_locations().into_iter()
            .filter_map(|location| grid.variable_of(location))
            .all(|var| self.get(var).is_some())
    }
}

/// Decode a full assignment into the solved grid.
///
/// Trap variables become [`Trap`](Cell::Trap) cells. Every other unknown cell becomes a [`Gem`](Cell::Gem) if it touches
/// no trap and touches a number or another gem, repeated until nothing changes; the rest stay [`Unknown`](Cell::Unknown), i.e. empty.
/// Undecided variables decode as not-traps.
pub fn decode(grid: &Grid, assignment: &Assignment) -> Grid {
    let mut solved = grid.clone();
    for location in grid.unknown_locations() {
        if grid.variable_of(location).is_some_and(|var| assignment.is_trap(var)) {
            solved.cells[location.as_index()] = Cell::Trap;
        }
    }

    solved.settle_gems();
    solved
}
