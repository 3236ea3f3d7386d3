use itertools::Itertools;
use ndarray::Array2;
use tracing::debug;

use crate::assignment::{decode, Assignment};
use crate::cell::Cell;
use crate::error::Exhausted;
use crate::grid::Grid;
use crate::location::Location;
use crate::validator::validate;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Mark {
    Unassigned,
    Trap,
    /// Not a trap. Whether it shows as a gem or as empty is left to [`decode`].
    Safe,
}

/// One decision and everything propagation forced because of it.
struct Frame {
    slot: usize,
    value: Mark,
    forced: Vec<usize>,
}

struct NumberConstraint {
    n: usize,
    known_traps: usize,
    slots: Vec<usize>,
}

enum Support {
    Held,
    Open,
    Forced(usize),
    Conflict,
}

// a trap needing support is held by a trap neighbor, or must get one from the open slots around it
fn support(marks: &[Mark], neighbors: &[usize]) -> Support {
    if neighbors.iter().any(|slot| marks[*slot] == Mark::Trap) {
        return Support::Held;
    }

    let open = neighbors.iter().filter(|slot| marks[**slot] == Mark::Unassigned).collect_vec();
    match open.as_slice() {
        [] => Support::Conflict,
        [only] => Support::Forced(**only),
        _ => Support::Open,
    }
}

fn assign(marks: &mut [Mark], forced: &mut Vec<usize>, slot: usize, value: Mark) {
    marks[slot] = value;
    forced.push(slot);
}

/// Depth-first search over the unknown cells of a grid, in row-major order with [`Safe`](Mark::Safe) tried before
/// [`Trap`](Mark::Trap).
///
/// Every decision is followed by propagation to a fixed point, which only forces what every solution below the
/// decision agrees on. The first complete assignment reached is therefore the one brute force would find first.
pub(crate) struct Backtracker<'a> {
    grid: &'a Grid,
    /// Unknown cells, indexed by slot.
    slots: Vec<Location>,
    marks: Vec<Mark>,
    numbers: Vec<NumberConstraint>,
    /// Neighbor slots of every slot.
    slot_neighbors: Vec<Vec<usize>>,
    /// Slots with a number or known trap neighbor; a trap there needs nothing else.
    supported: Vec<bool>,
    beside_gem: Vec<bool>,
    /// Neighbor slots of each known trap with no number or trap around it.
    unsupported_traps: Vec<Vec<usize>>,
    max_steps: u64,
}

impl<'a> Backtracker<'a> {
    pub(crate) fn new(grid: &'a Grid, max_steps: u64) -> Self {
        let slots = grid.unknown_locations();
        let mut slot_of = Array2::<Option<usize>>::from_elem((grid.height(), grid.width()), None);
        for (slot, location) in slots.iter().enumerate() {
            slot_of[location.as_index()] = Some(slot);
        }
        let neighbor_slots = |location: Location| grid.neighbors(location).into_iter()
            .filter_map(|neighbor| slot_of[neighbor.as_index()])
            .collect_vec();

        let mut numbers = Vec::new();
        let mut unsupported_traps = Vec::new();
        for (location, cell) in grid.cells() {
            match cell {
                Cell::Number(n) => numbers.push(NumberConstraint {
                    n: usize::from(n),
                    known_traps: grid.neighbor_cells(location).filter(|(_, cell)| cell.is_trap()).count(),
                    slots: neighbor_slots(location),
                }),
                Cell::Trap if !grid.touches_number_or_trap(location) => unsupported_traps.push(neighbor_slots(location)),
                _ => {}
            }
        }

        Self {
            grid,
            marks: vec![Mark::Unassigned; slots.len()],
            numbers,
            slot_neighbors: slots.iter().map(|location| neighbor_slots(*location)).collect_vec(),
            supported: slots.iter().map(|location| grid.touches_number_or_trap(*location)).collect_vec(),
            beside_gem: slots.iter()
                .map(|location| grid.neighbor_cells(*location).any(|(_, cell)| cell.is_gem()))
                .collect_vec(),
            unsupported_traps,
            slots,
            max_steps,
        }
    }

    /// Force what the current marks imply until nothing changes.
    /// Returns `false` on a conflict, leaving whatever was forced so far recorded in `forced`.
    fn propagate(&mut self, forced: &mut Vec<usize>) -> bool {
        let Self { marks, numbers, slot_neighbors, supported, beside_gem, unsupported_traps, .. } = self;

        loop {
            let mut changed = false;

            for number in numbers.iter() {
                let traps = number.known_traps + number.slots.iter().filter(|slot| marks[**slot] == Mark::Trap).count();
                let open = number.slots.iter().copied().filter(|slot| marks[*slot] == Mark::Unassigned).collect_vec();
                if traps > number.n || traps + open.len() < number.n {
                    return false;
                }
                if open.is_empty() {
                    continue;
                }

                let value = if traps == number.n {
                    Mark::Safe
                } else if traps + open.len() == number.n {
                    Mark::Trap
                } else {
                    continue;
                };
                for slot in open {
                    assign(marks, forced, slot, value);
                }
                changed = true;
            }

            for slot in 0..marks.len() {
                if beside_gem[slot] {
                    match marks[slot] {
                        Mark::Trap => return false,
                        Mark::Unassigned => {
                            assign(marks, forced, slot, Mark::Safe);
                            changed = true;
                        }
                        Mark::Safe => {}
                    }
                }
                if supported[slot] {
                    continue;
                }

                match marks[slot] {
                    Mark::Unassigned => {
                        if slot_neighbors[slot].iter().all(|neighbor| marks[*neighbor] == Mark::Safe) {
                            assign(marks, forced, slot, Mark::Safe);
                            changed = true;
                        }
                    }
                    Mark::Trap => match support(marks, &slot_neighbors[slot]) {
                        Support::Conflict => return false,
                        Support::Forced(neighbor) => {
                            assign(marks, forced, neighbor, Mark::Trap);
                            changed = true;
                        }
                        Support::Held | Support::Open => {}
                    },
                    Mark::Safe => {}
                }
            }

            for neighbors in unsupported_traps.iter() {
                match support(marks, neighbors) {
                    Support::Conflict => return false,
                    Support::Forced(neighbor) => {
                        assign(marks, forced, neighbor, Mark::Trap);
                        changed = true;
                    }
                    Support::Held | Support::Open => {}
                }
            }

            if !changed {
                return true;
            }
        }
    }

    /// Mark `slot`, propagate, and record the frame whether or not propagation succeeded.
    fn commit(&mut self, stack: &mut Vec<Frame>, slot: usize, value: Mark) -> bool {
        self.marks[slot] = value;
        let mut forced = Vec::new();
        let consistent = self.propagate(&mut forced);
        stack.push(Frame { slot, value, forced });

        consistent
    }

    fn undo(&mut self, frame: &Frame) {
        self.marks[frame.slot] = Mark::Unassigned;
        for slot in &frame.forced {
            self.marks[*slot] = Mark::Unassigned;
        }
    }

    fn assignment(&self) -> Assignment {
        let mut assignment = Assignment::unassigned(self.grid.max_variable());
        for (location, mark) in self.slots.iter().zip(&self.marks) {
            if let Some(var) = self.grid.variable_of(*location) {
                assignment.set(var, *mark == Mark::Trap);
            }
        }

        assignment
    }

    /// Search until a complete assignment validates, every branch is refuted, or `max_steps` decisions were made.
    pub(crate) fn search(mut self) -> Result<Assignment, Exhausted> {
        let mut root = Vec::new();
        if !self.propagate(&mut root) {
            debug!("contradiction before any decision");
            return Err(Exhausted::Unsatisfiable);
        }

        let mut stack: Vec<Frame> = Vec::new();
        let mut steps = 0u64;
        let mut backtracks = 0u64;
        let mut descending = true;

        loop {
            if descending {
                let Some(slot) = self.marks.iter().position(|mark| *mark == Mark::Unassigned) else {
                    let assignment = self.assignment();
                    if validate(self.grid, &decode(self.grid, &assignment)).is_ok() {
                        debug!(steps, backtracks, "backtracking found a solution");
                        return Ok(assignment);
                    }
                    descending = false;
                    continue;
                };

                if steps >= self.max_steps {
                    return Err(Exhausted::Truncated { explored: steps });
                }
                steps += 1;
                descending = self.commit(&mut stack, slot, Mark::Safe);
            } else {
                let Some(frame) = stack.pop() else {
                    debug!(steps, backtracks, "every branch refuted");
                    return Err(Exhausted::Unsatisfiable);
                };
                self.undo(&frame);
                backtracks += 1;

                // a refuted trap means its parent is refuted too
                if frame.value == Mark::Safe {
                    if steps >= self.max_steps {
                        return Err(Exhausted::Truncated { explored: steps });
                    }
                    steps += 1;
                    descending = self.commit(&mut stack, frame.slot, Mark::Trap);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Exhausted;
    use crate::grid::Grid;

    use super::{Backtracker, Mark};

    #[test]
    fn forced_cells_need_no_decisions() {
        // the 1 needs the corner, the 0 clears the rest
        let grid: Grid = "_10_\n110_".parse().unwrap();
        let assignment = Backtracker::new(&grid, 0).search().unwrap();
        assert_eq!(assignment.traps().map(|var| grid.location_of(var).to_string()).collect::<Vec<_>>(), vec!["(0,0)"]);
    }

    #[test]
    fn undo_releases_forced_cells() {
        let grid: Grid = "_2_\n1__\n___".parse().unwrap();
        let mut backtracker = Backtracker::new(&grid, 10);
        let mut stack = Vec::new();

        // a trap in the corner saturates the 1
        assert!(backtracker.commit(&mut stack, 0, Mark::Trap));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack[0].forced, vec![2, 4, 5]);
        assert_eq!(backtracker.marks[0], Mark::Trap);
        for slot in [2, 4, 5] {
            assert_eq!(backtracker.marks[slot], Mark::Safe);
        }

        let frame = stack.pop().unwrap();
        backtracker.undo(&frame);
        assert!(backtracker.marks.iter().all(|mark| *mark == Mark::Unassigned));
    }

    #[test]
    fn refuted_at_root() {
        let grid: Grid = "1_0".parse().unwrap();
        assert_eq!(Backtracker::new(&grid, 10).search(), Err(Exhausted::Unsatisfiable));
    }

    #[test]
    fn lone_unknown_cell_is_safe() {
        // a trap here would touch nothing but the number-free edge of the grid
        let grid: Grid = "_".parse().unwrap();
        let assignment = Backtracker::new(&grid, 0).search().unwrap();
        assert_eq!(assignment.traps().count(), 0);
    }

    #[test]
    fn known_trap_pulls_in_its_only_neighbor() {
        let grid: Grid = "T_\n__\n__\n_1".parse().unwrap();
        // safe, safe, then the last cell beside the known trap has to be one
        let assignment = Backtracker::new(&grid, 100).search().unwrap();
        let traps = assignment.traps().map(|var| grid.location_of(var).to_string()).collect::<Vec<_>>();
        assert_eq!(traps[0], "(1,1)");
    }
}
