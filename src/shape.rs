use itertools::Itertools;
use strum::VariantArray;

use crate::location::{Dimension, Location};

/// The eight steps of the Moore neighborhood.
///
/// [`VARIANTS`](VariantArray::VARIANTS) is declared in row-major order, so neighbors produced by
/// [`neighbors_of`] come out sorted top-to-bottom, left-to-right.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum MooreStep {
    UpLeft,
    Up,
    UpRight,
    Left,
    Right,
    DownLeft,
    Down,
    DownRight,
}

impl MooreStep {
    /// Attempt the step from `location` in the direction specified by `self` and return the resultant [`Location`].
    ///
    /// Stepping off the top or left edge wraps around to a huge coordinate, which no bounds check accepts.
    pub fn attempt_from(&self, location: Location) -> Location {
        match self {
            Self::UpLeft => location.offset_by((-1, -1)),
            Self::Up => location.offset_by((0, -1)),
            Self::UpRight => location.offset_by((1, -1)),
            Self::Left => location.offset_by((-1, 0)),
            Self::Right => location.offset_by((1, 0)),
            Self::DownLeft => location.offset_by((-1, 1)),
            Self::Down => location.offset_by((0, 1)),
            Self::DownRight => location.offset_by((1, 1)),
        }
    }
}

#[inline]
pub(crate) fn in_bounds(location: Location, dims: (Dimension, Dimension)) -> bool {
    location.0 < dims.0.get() && location.1 < dims.1.get()
}

/// All in-bounds neighbors of `location` on a grid of `dims` (`(width, height)`).
///
/// Corners have 3 neighbors, other edge cells 5 and interior cells 8.
pub fn neighbors_of(location: Location, dims: (Dimension, Dimension)) -> Vec<Location> {
    MooreStep::VARIANTS.iter()
        .map(|dir| dir.attempt_from(location))
        .filter(|neighbor| in_bounds(*neighbor, dims))
        .collect_vec()
}
