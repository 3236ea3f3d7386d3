use thiserror::Error;

use crate::cell::{Cell, MAX_NUMBER};
use crate::error::Malformed;
use crate::grid::Grid;
use crate::location::Location;

/// The first rule a candidate solution breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    /// Sizes are `(width, height)`.
    #[error("candidate is {found:?} but the puzzle is {expected:?}")]
    ShapeMismatch { expected: (usize, usize), found: (usize, usize) },
    /// A revealed cell was changed, or a number appeared where the puzzle had an unknown cell.
    #[error("{location} is {expected} in the puzzle but {found} in the candidate")]
    AlteredCell { location: Location, expected: Cell, found: Cell },
    /// Rule 1.
    #[error("{location} shows {expected} but touches {found} traps")]
    NumberMismatch { location: Location, expected: u8, found: usize },
    /// Rule 2.
    #[error("gem at {location} touches the trap at {trap}")]
    GemNextToTrap { location: Location, trap: Location },
    /// Rule 2, for gems the candidate adds.
    #[error("gem at {location} is surrounded by empty cells")]
    IsolatedGem { location: Location },
    /// Rule 3.
    #[error("trap at {location} is surrounded by empty cells")]
    IsolatedTrap { location: Location },
}

/// Reject puzzles no assignment could satisfy for a reason visible without search.
pub fn check_puzzle(grid: &Grid) -> Result<(), Malformed> {
    for (location, cell) in grid.cells() {
        match cell {
            Cell::Number(n) => {
                if n > MAX_NUMBER {
                    return Err(Malformed::NumberOutOfRange { location, n });
                }

                let traps = grid.neighbor_cells(location).filter(|(_, cell)| cell.is_trap()).count();
                let unknown = grid.neighbor_cells(location).filter(|(_, cell)| cell.is_unknown()).count();
                if traps > usize::from(n) {
                    return Err(Malformed::TooManyTraps { location, n, traps });
                }
                if usize::from(n) - traps > unknown {
                    return Err(Malformed::TooFewCandidates { location, n, traps, unknown });
                }
            }
            Cell::Gem => {
                if let Some((trap, _)) = grid.neighbor_cells(location).find(|(_, cell)| cell.is_trap()) {
                    return Err(Malformed::GemTouchesTrap { gem: location, trap });
                }
            }
            Cell::Trap => {
                if !grid.touches_number_or_trap(location)
                    && !grid.neighbor_cells(location).any(|(_, cell)| cell.is_unknown()) {
                    return Err(Malformed::IsolatedTrap { location });
                }
            }
            Cell::Unknown => {}
        }
    }

    Ok(())
}

/// Check `candidate` against every rule of `puzzle`, independently of how it was produced.
///
/// 1. every number shows exactly its count of trap neighbors;
/// 2. every gem touches no trap, and every gem the candidate adds touches at least one non-empty cell;
/// 3. every trap touches at least one non-empty cell.
///
/// Revealed cells of `puzzle` must be unchanged, and `candidate` may not reveal new numbers.
/// Gems revealed in `puzzle` are given, so they need no non-empty neighbor.
/// Cells left [`Unknown`](Cell::Unknown) count as empty.
pub fn validate(puzzle: &Grid, candidate: &Grid) -> Result<(), Violation> {
    if puzzle.dims() != candidate.dims() {
        return Err(Violation::ShapeMismatch {
            expected: (puzzle.width(), puzzle.height()),
            found: (candidate.width(), candidate.height()),
        });
    }

    for ((location, expected), (_, found)) in puzzle.cells().zip(candidate.cells()) {
        let altered = match expected {
            Cell::Unknown => found.number().is_some(),
            _ => expected != found,
        };
        if altered {
            return Err(Violation::AlteredCell { location, expected, found });
        }
    }

    for (location, cell) in candidate.cells() {
        if let Cell::Number(expected) = cell {
            let found = candidate.neighbor_cells(location).filter(|(_, cell)| cell.is_trap()).count();
            if found != usize::from(expected) {
                return Err(Violation::NumberMismatch { location, expected, found });
            }
        }
    }

    for (location, _) in candidate.cells().filter(|(_, cell)| cell.is_gem()) {
        if let Some((trap, _)) = candidate.neighbor_cells(location).find(|(_, cell)| cell.is_trap()) {
            return Err(Violation::GemNextToTrap { location, trap });
        }
        if puzzle.at(location).is_unknown() && candidate.neighbor_cells(location).all(|(_, cell)| cell.is_unknown()) {
            return Err(Violation::IsolatedGem { location });
        }
    }

    for (location, _) in candidate.cells().filter(|(_, cell)| cell.is_trap()) {
        if candidate.neighbor_cells(location).all(|(_, cell)| cell.is_unknown()) {
            return Err(Violation::IsolatedTrap { location });
        }
    }

    Ok(())
}
