use std::fmt::{Display, Formatter};
use std::num::NonZero;
use std::str::FromStr;

use itertools::Itertools;
use ndarray::Array2;
use varisat::Var;

use crate::builder::{BuilderInvalidReason, GridBuilder};
use crate::cell::Cell;
use crate::error::SolveError;
use crate::location::{Dimension, Location};
use crate::shape;
use crate::solver::Solver;

/// An immutable rectangular puzzle grid.
///
/// [`Grid`]s should be built using a [`GridBuilder`] or parsed from the same text [`Display`] produces:
/// one row per line, one [`Cell::token`] per cell.
///
/// Every [`Unknown`](Cell::Unknown) cell owns one "is-trap" variable, numbered `row * width + col + 1`.
/// Indices belonging to other cells exist but never appear in a clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    pub(crate) cells: Array2<Cell>,
    // width, height
    pub(crate) dims: (Dimension, Dimension),
}

impl Grid {
    /// `(width, height)`.
    pub fn dims(&self) -> (Dimension, Dimension) {
        self.dims
    }

    pub fn width(&self) -> usize {
        self.dims.0.get()
    }

    pub fn height(&self) -> usize {
        self.dims.1.get()
    }

    /// The cell at `location`, or [`None`] if it lies outside the grid.
    pub fn get(&self, location: Location) -> Option<Cell> {
        self.cells.get(location.as_index()).copied()
    }

    /// Callers guarantee `location` is in bounds.
    #[inline]
    pub(crate) fn at(&self, location: Location) -> Cell {
        self.cells[location.as_index()]
    }

    /// Every cell with its location, in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Location, Cell)> + '_ {
        self.cells.indexed_iter().map(|(ind, cell)| (Location::from(ind), *cell))
    }

    /// Every location, in row-major order.
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        self.cells().map(|(location, _)| location)
    }

    /// The in-bounds Moore neighborhood of `location`, in row-major order.
    pub fn neighbors(&self, location: Location) -> Vec<Location> {
        shape::neighbors_of(location, self.dims)
    }

    pub(crate) fn neighbor_cells(&self, location: Location) -> impl Iterator<Item = (Location, Cell)> + '_ {
        self.neighbors(location).into_iter().map(|neighbor| (neighbor, self.at(neighbor)))
    }

    /// Unknown cells in row-major order; the order all search strategies visit them in.
    pub fn unknown_locations(&self) -> Vec<Location> {
        self.cells()
            .filter(|(_, cell)| cell.is_unknown())
            .map(|(location, _)| location)
            .collect_vec()
    }

    /// The declared variable count: one index per cell, used or not.
    pub fn max_variable(&self) -> usize {
        self.width() * self.height()
    }

    /// The "is-trap" variable of the unknown cell at `location`.
    /// Revealed and out-of-bounds cells have none.
    pub fn variable_of(&self, location: Location) -> Option<Var> {
        match self.get(location)? {
            Cell::Unknown => Some(Var::from_index(location.row() * self.width() + location.col())),
            _ => None,
        }
    }

    /// The location a variable index was assigned to, whether or not that cell is unknown.
    pub fn location_of(&self, var: Var) -> Location {
        Location(var.index() % self.width(), var.index() / self.width())
    }

    /// Whether any neighbor of `location` is a revealed number or a trap.
    /// A trap at `location` would satisfy the "not surrounded by empty cells" rule through such a neighbor alone.
    pub(crate) fn touches_number_or_trap(&self, location: Location) -> bool {
        self.neighbor_cells(location)
            .any(|(_, cell)| matches!(cell, Cell::Number(_) | Cell::Trap))
    }

    /// Turn every [`Unknown`](Cell::Unknown) cell with no trap neighbor and at least one number or gem neighbor into a [`Gem`](Cell::Gem),
    /// repeating until nothing changes.
    pub(crate) fn settle_gems(&mut self) {
        loop {
            let settled = self.cells()
                .filter(|(_, cell)| cell.is_unknown())
                .map(|(location, _)| location)
                .filter(|location| {
                    let mut anchored = false;
                    for (_, neighbor) in self.neighbor_cells(*location) {
                        match neighbor {
                            Cell::Trap => return false,
                            Cell::Number(_) | Cell::Gem => anchored = true,
                            Cell::Unknown => {}
                        }
                    }
                    anchored
                })
                .collect_vec();

            if settled.is_empty() {
                break;
            }

            for location in settled {
                self.cells[location.as_index()] = Cell::Gem;
            }
        }
    }

    /// Solves this grid with the default [`Solver`] configuration, returning the solved grid.
    ///
    /// See [`Solver::solve`] for the ways this can fail.
    pub fn solve(&self) -> Result<Grid, SolveError> {
        Solver::default().solve(self).map(|solution| solution.grid)
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut out = String::with_capacity(self.height() * (self.width() + 1));

        for row in self.cells.rows() {
            for cell in row {
                out.push(cell.token());
            }
            out.push('\n');
        }

        write!(f, "{}", out)
    }
}

impl FromStr for Grid {
    type Err = BuilderInvalidReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().collect_vec())
            .collect_vec();

        let height = NonZero::new(rows.len()).ok_or(BuilderInvalidReason::NoCells)?;
        let width = NonZero::new(rows[0].len()).ok_or(BuilderInvalidReason::NoCells)?;

        let mut builder = GridBuilder::with_dims((width, height));
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width.get() {
                return Err(BuilderInvalidReason::RaggedRow { row: y });
            }

            for (x, token) in row.iter().enumerate() {
                let cell = Cell::from_token(*token).ok_or(BuilderInvalidReason::UnknownToken(*token))?;
                builder.set(Location(x, y), cell);
            }
        }

        builder.build().map_err(|reasons| reasons.first().copied().unwrap_or(BuilderInvalidReason::NoCells))
    }
}
