use std::num::NonZero;

use ndarray::Array2;
use thiserror::Error;

use crate::cell::{Cell, MAX_NUMBER};
use crate::grid::Grid;
use crate::location::{Dimension, Location};
use crate::shape;

/// Reasons a builder may become invalid while building.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum BuilderInvalidReason {
    /// A cell was placed outside the bounds specified by `dims` on a builder.
    #[error("{location} is outside the grid")]
    FeatureOutOfBounds { location: Location },
    /// A number cell claimed more traps than a cell can have neighbors.
    #[error("{location} shows {n}, but a cell has at most {} neighbors", MAX_NUMBER)]
    NumberOutOfRange { location: Location, n: u8 },
    /// Text input used a character that is not a cell token.
    #[error("{0:?} is not a cell token")]
    UnknownToken(char),
    /// Text input had rows of differing widths.
    #[error("row {row} has a different width from the first row")]
    RaggedRow { row: usize },
    /// Text input had no cells at all.
    #[error("a grid needs at least one cell")]
    NoCells,
}

/// A builder for [`Grid`]s. All cells start [`Unknown`](Cell::Unknown).
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
/// Once a builder is invalid, every further placement does nothing.
#[derive(Clone)]
pub struct GridBuilder {
    // width, height
    dims: (Dimension, Dimension),
    cells: Array2<Cell>,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self::with_dims((NonZero::<usize>::MIN.saturating_add(4), NonZero::<usize>::MIN.saturating_add(4)))
    }
}

impl GridBuilder {
    /// Construct a new [`Self`] with the specified dimensions, specified in `(width, height)` order.
    pub fn with_dims(dims: (Dimension, Dimension)) -> Self {
        Self {
            dims,
            cells: Array2::from_shape_simple_fn((dims.1.get(), dims.0.get()), Cell::default),
            invalid_reasons: Default::default(),
        }
    }

    /// Place `cell` at `location`, replacing whatever was there.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state if `location` is out of bounds,
    /// or a [`NumberOutOfRange`](BuilderInvalidReason::NumberOutOfRange) one if `cell` is a number above [`MAX_NUMBER`].
    pub fn set(&mut self, location: Location, cell: Cell) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !shape::in_bounds(location, self.dims) {
            self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds { location });
            return self;
        }

        if let Cell::Number(n) = cell {
            if n > MAX_NUMBER {
                self.invalid_reasons.push(BuilderInvalidReason::NumberOutOfRange { location, n });
                return self;
            }
        }

        self.cells[location.as_index()] = cell;
        self
    }

    /// Reveal a number at `location`: the count of traps among its neighbors.
    pub fn add_number(&mut self, location: Location, n: u8) -> &mut Self {
        self.set(location, Cell::Number(n))
    }

    /// Mark `location` as a known trap.
    pub fn add_trap(&mut self, location: Location) -> &mut Self {
        self.set(location, Cell::Trap)
    }

    /// Mark `location` as a known gem.
    pub fn add_gem(&mut self, location: Location) -> &mut Self {
        self.set(location, Cell::Gem)
    }

    /// Return `location` to [`Unknown`](Cell::Unknown).
    pub fn clear(&mut self, location: Location) -> &mut Self {
        self.set(location, Cell::Unknown)
    }

    /// Check the validity of this builder, ensuring no [`BuilderInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`Grid`].
    /// If the builder is invalid for any reason, a reference to a [`Vec`] of [`BuilderInvalidReason`] will indicate why.
    pub fn build(&self) -> Result<Grid, &Vec<BuilderInvalidReason>> {
        if !self.invalid_reasons.is_empty() {
            return Err(&self.invalid_reasons);
        }

        Ok(Grid {
            cells: self.cells.clone(),
            dims: self.dims,
        })
    }
}
