use itertools::Itertools;
use tracing::{debug, trace, warn};
use varisat::Var;

use crate::assignment::{decode, Assignment};
use crate::error::Exhausted;
use crate::grid::Grid;
use crate::validator::validate;

const PROGRESS_INTERVAL: u64 = 100_000;

// the first variable is the most significant bit
fn assignment_of(var_count: usize, vars: &[Var], mask: u64) -> Assignment {
    let mut assignment = Assignment::unassigned(var_count);
    for (idx, var) in vars.iter().enumerate() {
        let shift = vars.len() - 1 - idx;
        assignment.set(*var, shift < u64::BITS as usize && (mask >> shift) & 1 == 1);
    }

    assignment
}

/// Try trap masks over the unknown cells of `grid` in ascending order, returning the first whose decoded grid validates.
///
/// At most `max_masks` masks are tried. Running out of masks before `2^m` is a [`Truncated`](Exhausted::Truncated) search,
/// not a proof of unsatisfiability.
pub(crate) fn search(grid: &Grid, max_masks: u64) -> Result<Assignment, Exhausted> {
    let vars = grid.unknown_locations().into_iter()
        .filter_map(|location| grid.variable_of(location))
        .collect_vec();
    let total = u32::try_from(vars.len()).ok().and_then(|m| 1u64.checked_shl(m));
    let limit = total.map_or(max_masks, |total| total.min(max_masks));

    if total.map_or(true, |total| total > max_masks) {
        warn!(unknown = vars.len(), max_masks, "more masks than the ceiling allows; the search may be truncated");
    }

    for mask in 0..limit {
        if mask > 0 && mask % PROGRESS_INTERVAL == 0 {
            trace!(mask, limit, "brute force progress");
        }

        let assignment = assignment_of(grid.max_variable(), &vars, mask);
        if validate(grid, &decode(grid, &assignment)).is_ok() {
            debug!(mask, explored = mask + 1, "brute force found a solution");
            return Ok(assignment);
        }
    }

    if total == Some(limit) {
        Err(Exhausted::Unsatisfiable)
    } else {
        Err(Exhausted::Truncated { explored: limit })
    }
}

#[cfg(test)]
mod tests {
    use varisat::Var;

    use super::assignment_of;

    #[test]
    fn first_variable_is_most_significant() {
        let vars = [Var::from_index(0), Var::from_index(4), Var::from_index(5)];
        let assignment = assignment_of(6, &vars, 0b100);
        assert_eq!(assignment.traps().collect::<Vec<_>>(), vec![Var::from_index(0)]);

        let assignment = assignment_of(6, &vars, 0b011);
        assert_eq!(assignment.traps().collect::<Vec<_>>(), vec![Var::from_index(4), Var::from_index(5)]);
        assert_eq!(assignment.get(Var::from_index(0)), Some(false));
        assert_eq!(assignment.get(Var::from_index(1)), None);
    }
}
