#![warn(missing_docs)]

//! # `gemhunt`
//!
//! A solver for Gem Hunter, a grid puzzle in the family of Minesweeper.
//! Some cells of a rectangular grid reveal a number: how many of their eight neighbors hide a trap.
//! Solving means deciding which of the remaining cells are traps, such that
//! 1. every number counts its trap neighbors exactly;
//! 2. every gem touches no trap and is not surrounded by empty cells;
//! 3. every trap is not surrounded by empty cells.
//!
//! Begin by building a [`Grid`] with a [`GridBuilder`] or by parsing its text form (`_` unknown, `0`-`8` numbers,
//! `T` traps, `G` gems, one row per line). Then call [`solve()`](Grid::solve), or configure a [`Solver`] to pick the
//! [`Strategy`] and its limits.
//!
//! # Internals
//! Every unknown cell owns one Boolean "is a trap" variable. A solution is an [`Assignment`] of those variables;
//! [`decode`] turns it into a solved grid, and [`validate`] checks that grid against the rules above, independently
//! of how it was found.
//!
//! Three strategies search for an assignment:
//! - brute force enumerates every trap mask in lexicographic order;
//! - backtracking walks the same order depth-first, pruning with constraint propagation;
//! - the oracle strategy encodes the grid into CNF with a [`CardinalityEncoder`] and asks an external SAT solver.
//!
//! The encoding uses the binomial form of "exactly k of these neighbors are traps" for each number.
//! It can be exported as DIMACS through [`ClauseSet`] for use with other solvers.

pub use assignment::{decode, Assignment};
pub use builder::GridBuilder;
pub use cell::Cell;
pub use cnf::ClauseSet;
pub use config::{SolverConfig, Strategy};
pub use encoder::CardinalityEncoder;
pub use error::{Exhausted, Malformed, SolveError};
pub use grid::Grid;
pub use location::{Dimension, Location};
pub use oracle::{Oracle, OracleAnswer, OracleError, VarisatOracle};
pub use solver::{Solution, Solver};
pub use validator::{check_puzzle, validate, Violation};

pub(crate) mod location;
pub(crate) mod logic;
pub mod shape;
pub(crate) mod cell;
pub mod builder;
pub(crate) mod grid;
pub mod cnf;
pub(crate) mod encoder;
pub(crate) mod assignment;
pub(crate) mod validator;
pub mod oracle;
pub(crate) mod brute_force;
pub(crate) mod backtracking;
pub(crate) mod config;
pub mod error;
pub(crate) mod solver;
