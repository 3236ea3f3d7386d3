use strum::{Display, EnumString, VariantArray};

/// A way to search for a trap assignment.
///
/// Parses from and displays as `brute-force`, `backtracking` or `oracle`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Display, EnumString, VariantArray)]
#[strum(serialize_all = "kebab-case")]
pub enum Strategy {
    /// Try every assignment in lexicographic order, gem before trap, first unknown cell most significant.
    BruteForce,
    /// Depth-first search with constraint propagation, visiting cells in the same order as [`BruteForce`](Strategy::BruteForce).
    Backtracking,
    /// Encode to CNF and hand the clauses to an [`Oracle`](crate::oracle::Oracle).
    #[default]
    Oracle,
}

/// Tunables for a [`Solver`](crate::Solver).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SolverConfig {
    /// The strategy [`Solver::solve`](crate::Solver::solve) uses.
    pub strategy: Strategy,
    /// The most masks brute force tries before giving up.
    pub max_masks: u64,
    /// The most decisions backtracking makes before giving up.
    pub max_steps: u64,
    /// The most unique clauses an encoding may have.
    pub max_clauses: usize,
    /// Also emit the redundant "at least one neighbor is a trap" clause for numbers that need some but not all of their unknown neighbors.
    pub at_least_one: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            max_masks: 1_000_000,
            max_steps: 1_000_000,
            max_clauses: 1_000_000,
            at_least_one: true,
        }
    }
}

impl SolverConfig {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_masks(mut self, max_masks: u64) -> Self {
        self.max_masks = max_masks;
        self
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_max_clauses(mut self, max_clauses: usize) -> Self {
        self.max_clauses = max_clauses;
        self
    }

    pub fn with_at_least_one(mut self, at_least_one: bool) -> Self {
        self.at_least_one = at_least_one;
        self
    }
}
