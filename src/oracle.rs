//! Satisfiability backends for [`Strategy::Oracle`](crate::Strategy::Oracle).

use thiserror::Error;
use tracing::debug;
use varisat::{Solver, Var};

use crate::assignment::Assignment;
use crate::cnf::ClauseSet;

/// What a backend concluded about a clause set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OracleAnswer {
    /// A model deciding every variable the clause set declares.
    Satisfiable(Assignment),
    /// No model exists.
    Unsatisfiable,
}

/// Reasons a backend could not answer.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OracleError {
    /// The backend itself reported an error.
    #[error("backend failed: {0}")]
    Backend(String),
    /// Variables are numbered from 1, as in DIMACS.
    #[error("model leaves variable {0} undecided though a clause uses it")]
    PartialModel(usize),
}

/// A black box deciding satisfiability of a [`ClauseSet`].
pub trait Oracle {
    /// Decide `clauses`, returning a model over all of their declared variables when one exists.
    fn solve(&mut self, clauses: &ClauseSet) -> Result<OracleAnswer, OracleError>;
}

/// An [`Oracle`] backed by the [`varisat`] CDCL solver. A fresh solver is used for every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct VarisatOracle;

impl Oracle for VarisatOracle {
    fn solve(&mut self, clauses: &ClauseSet) -> Result<OracleAnswer, OracleError> {
        let mut solver = Solver::new();
        solver.add_formula(&clauses.to_formula());

        let satisfiable = solver.solve().map_err(|e| OracleError::Backend(format!("{e:?}")))?;
        if !satisfiable {
            debug!(clauses = clauses.len(), "oracle found no model");
            return Ok(OracleAnswer::Unsatisfiable);
        }

        let model = solver.model()
            .ok_or_else(|| OracleError::Backend("satisfiable without a model".to_string()))?;
        let mut assignment = Assignment::from_literals(clauses.var_count(), &model);

        // unconstrained variables, e.g. those of revealed cells, are not traps whatever the model says
        for (index, mentioned) in clauses.mentioned().into_iter().enumerate() {
            let var = Var::from_index(index);
            if !mentioned {
                assignment.set(var, false);
            } else if assignment.get(var).is_none() {
                return Err(OracleError::PartialModel(index + 1));
            }
        }

        Ok(OracleAnswer::Satisfiable(assignment))
    }
}
