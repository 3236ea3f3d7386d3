//! Cross-strategy agreement on small random grids.

use std::num::NonZero;

use proptest::prelude::*;

use crate::{check_puzzle, validate, Cell, Grid, GridBuilder, Location, Solver};

fn cell() -> impl Strategy<Value = Cell> {
    prop_oneof![
        3 => Just(Cell::Unknown),
        2 => (0u8..=3).prop_map(Cell::Number),
        1 => Just(Cell::Trap),
        1 => Just(Cell::Gem),
    ]
}

/// Grids of up to 4x3 cells, so brute force stays under 4096 masks.
fn small_grid() -> impl Strategy<Value = Grid> {
    (1usize..=4, 1usize..=3)
        .prop_flat_map(|(width, height)| (Just(width), Just(height), prop::collection::vec(cell(), width * height)))
        .prop_map(|(width, height, cells)| {
            let mut builder = GridBuilder::with_dims((NonZero::new(width).unwrap(), NonZero::new(height).unwrap()));
            for (i, cell) in cells.into_iter().enumerate() {
                builder.set(Location(i % width, i / width), cell);
            }
            builder.build().unwrap()
        })
}

proptest! {
    // revealed traps and gems make many grids malformed
    #![proptest_config(ProptestConfig { max_global_rejects: 8192, ..ProptestConfig::with_cases(128) })]

    /// Backtracking only prunes what cannot lead to a solution, so it finds the same first solution as brute force.
    #[test]
    fn backtracking_matches_brute_force(grid in small_grid()) {
        prop_assume!(check_puzzle(&grid).is_ok());
        let mut solver = Solver::default();

        let brute = solver.solve_with(&grid, crate::Strategy::BruteForce);
        let backtracking = solver.solve_with(&grid, crate::Strategy::Backtracking);
        match (brute, backtracking) {
            (Ok(brute), Ok(backtracking)) => prop_assert_eq!(brute.grid, backtracking.grid),
            (Err(brute), Err(backtracking)) => {
                prop_assert!(brute.is_unsatisfiable());
                prop_assert!(backtracking.is_unsatisfiable());
            }
            (brute, backtracking) => prop_assert!(false, "brute force {:?}, backtracking {:?}", brute, backtracking),
        }
    }

    /// The encoding admits a model exactly when some assignment validates.
    #[test]
    fn oracle_agrees_on_satisfiability(grid in small_grid()) {
        prop_assume!(check_puzzle(&grid).is_ok());
        let mut solver = Solver::default();

        let brute = solver.solve_with(&grid, crate::Strategy::BruteForce);
        let oracle = solver.solve_with(&grid, crate::Strategy::Oracle);
        prop_assert_eq!(brute.is_ok(), oracle.is_ok(), "brute force {:?}, oracle {:?}", brute, oracle);
        if let Ok(solution) = oracle {
            prop_assert_eq!(validate(&grid, &solution.grid), Ok(()));
        } else {
            prop_assert!(oracle.is_err_and(|e| e.is_unsatisfiable()));
        }
    }

    /// Whatever brute force finds also satisfies every clause of the encoding.
    #[test]
    fn solutions_satisfy_encoding(grid in small_grid()) {
        prop_assume!(check_puzzle(&grid).is_ok());
        let mut solver = Solver::default();

        let clauses = solver.encode(&grid).unwrap();
        if let Ok(solution) = solver.solve_with(&grid, crate::Strategy::BruteForce) {
            prop_assert!(clauses.is_satisfied_by(&solution.assignment));
        }
    }
}
