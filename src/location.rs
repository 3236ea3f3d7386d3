use std::fmt::{Display, Formatter};
use std::num::NonZero;

use ndarray::Ix;

pub(crate) type Coord = usize;
/// One side length of a [`Grid`](crate::Grid). Grids are never empty.
pub type Dimension = NonZero<Coord>;

#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
/// A location `(x, y)` on a grid. The top left corner is `Location(0, 0)`.
///
/// `x` is the column and `y` the row, so the derived ordering is column-major; use
/// [`Grid::locations`](crate::Grid::locations) for the row-major walk the solvers rely on.
pub struct Location(pub Coord, pub Coord);

impl Location {
    /// The row-major `(row, column)` index of this location into an [`ndarray::Array2`].
    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.1, self.0)
    }

    /// The row of this location.
    pub fn row(&self) -> Coord {
        self.1
    }

    /// The column of this location.
    pub fn col(&self) -> Coord {
        self.0
    }

    pub(crate) fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }
}

impl From<(Ix, Ix)> for Location {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.1, value.0)
    }
}

// (row,col), matching how puzzle files and clause descriptions name cells
impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row(), self.col())
    }
}
