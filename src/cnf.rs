use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::io;

use itertools::Itertools;
use thiserror::Error;
use varisat::{CnfFormula, ExtendFormula, Lit};

use crate::assignment::Assignment;
use crate::grid::Grid;

/// A disjunction of literals over distinct variables, kept in canonical order.
pub type Clause = Vec<Lit>;

/// Reasons DIMACS text may fail to parse.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum DimacsError {
    /// No `p cnf` line precedes the clauses.
    #[error("DIMACS header 'p cnf ...' not found")]
    MissingHeader,
    #[error("invalid DIMACS header {0:?}")]
    InvalidHeader(String),
    #[error("invalid literal {0:?}")]
    InvalidLiteral(String),
    /// A literal names a variable past the header's count.
    #[error("literal {literal} exceeds the {var_count} declared variables")]
    VariableOutOfRange { literal: isize, var_count: usize },
    #[error("header declares {declared} clauses but {found} were given")]
    ClauseCountMismatch { declared: usize, found: usize },
    #[error("last clause is not terminated by 0")]
    UnterminatedClause,
}

// variable first; a variable's positive literal sorts before its negative one
fn literal_key(lit: &Lit) -> (usize, bool) {
    (lit.var().index(), lit.is_negative())
}

fn compare_clauses(a: &Clause, b: &Clause) -> Ordering {
    a.len().cmp(&b.len())
        .then_with(|| a.iter().map(literal_key).cmp(b.iter().map(literal_key)))
}

pub(crate) fn canonical(mut clause: Clause) -> Clause {
    clause.sort_by_key(literal_key);
    clause.dedup();
    clause
}

/// A deduplicated CNF formula with its declared variable count.
///
/// Clauses are sorted by length, then lexicographically by literal, so equal inputs always serialize to identical DIMACS.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClauseSet {
    var_count: usize,
    clauses: Vec<Clause>,
}

impl ClauseSet {
    /// `unique` must hold canonical clauses, see [`canonical`].
    pub(crate) fn new(var_count: usize, unique: HashSet<Clause>) -> Self {
        let mut clauses = unique.into_iter().collect_vec();
        clauses.sort_by(compare_clauses);

        Self { var_count, clauses }
    }

    /// Declared variables, including those no clause mentions.
    pub fn var_count(&self) -> usize {
        self.var_count
    }

    /// Clauses in canonical order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// For each declared variable by index, whether it appears in any clause.
    pub fn mentioned(&self) -> Vec<bool> {
        let mut mentioned = vec![false; self.var_count];
        for lit in self.clauses.iter().flatten() {
            if let Some(seen) = mentioned.get_mut(lit.var().index()) {
                *seen = true;
            }
        }

        mentioned
    }

    /// Whether every clause has a literal made true by `assignment`. Undecided variables satisfy nothing.
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.clauses.iter().all(|clause| clause.iter()
            .any(|lit| assignment.get(lit.var()) == Some(lit.is_positive())))
    }

    /// The clauses as a [`varisat`] formula over all declared variables.
    pub fn to_formula(&self) -> CnfFormula {
        let mut formula = CnfFormula::new();
        formula.set_var_count(self.var_count);
        for clause in &self.clauses {
            formula.add_clause(clause);
        }

        formula
    }

    /// Write these clauses as DIMACS CNF: a `p cnf <variables> <clauses>` header, then one 0-terminated line per clause.
    pub fn write_dimacs<W: io::Write>(&self, target: &mut W) -> io::Result<()> {
        write!(target, "{}", self)
    }

    /// [`write_dimacs`](Self::write_dimacs) into a string.
    pub fn to_dimacs(&self) -> String {
        self.to_string()
    }

    /// Parse DIMACS CNF, canonicalizing as [`CardinalityEncoder`](crate::CardinalityEncoder) output is: duplicate clauses
    /// are merged and the result is sorted.
    pub fn from_dimacs(text: &str) -> Result<Self, DimacsError> {
        let mut header: Option<(usize, usize)> = None;
        let mut clauses = Vec::new();
        let mut clause = Vec::new();

        for line in text.lines().map(str::trim) {
            // comments and blank lines
            if line.is_empty() || line.starts_with('c') {
                continue;
            }

            if line.starts_with('p') {
                let parts = line.split_whitespace().collect_vec();
                if parts.len() != 4 || parts[1] != "cnf" {
                    return Err(DimacsError::InvalidHeader(line.to_string()));
                }
                let var_count = parts[2].parse().map_err(|_| DimacsError::InvalidHeader(line.to_string()))?;
                let clause_count = parts[3].parse().map_err(|_| DimacsError::InvalidHeader(line.to_string()))?;
                header = Some((var_count, clause_count));
                continue;
            }

            let (var_count, _) = header.ok_or(DimacsError::MissingHeader)?;
            for token in line.split_whitespace() {
                let literal: isize = token.parse().map_err(|_| DimacsError::InvalidLiteral(token.to_string()))?;
                if literal == 0 {
                    clauses.push(std::mem::take(&mut clause));
                } else if literal.unsigned_abs() > var_count {
                    return Err(DimacsError::VariableOutOfRange { literal, var_count });
                } else {
                    clause.push(Lit::from_dimacs(literal));
                }
            }
        }

        let (var_count, declared) = header.ok_or(DimacsError::MissingHeader)?;
        if !clause.is_empty() {
            return Err(DimacsError::UnterminatedClause);
        }
        if clauses.len() != declared {
            return Err(DimacsError::ClauseCountMismatch { declared, found: clauses.len() });
        }

        Ok(Self::new(var_count, clauses.into_iter().map(canonical).collect()))
    }

    /// Render each clause over the cells of `grid`, one per line, e.g. `(¬T(0,0) ∨ T(1,1))`.
    pub fn describe(&self, grid: &Grid) -> String {
        self.clauses.iter()
            .map(|clause| format!("({})", clause.iter()
                .map(|lit| format!("{}T{}", if lit.is_negative() { "¬" } else { "" }, grid.location_of(lit.var())))
                .join(" ∨ ")))
            .join("\n")
    }
}

impl Display for ClauseSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "p cnf {} {}", self.var_count, self.clauses.len())?;
        for clause in &self.clauses {
            for lit in clause {
                write!(f, "{} ", lit.to_dimacs())?;
            }
            writeln!(f, "0")?;
        }

        Ok(())
    }
}
