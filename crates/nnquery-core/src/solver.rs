//! Solver trait and the result type shared by solver backends.
//!
//! A backend receives a finished [`InputQuery`] and reports an
//! [`ExitCode`], a variable assignment and [`Statistics`]. UNSAT and
//! TIMEOUT are ordinary results; only failures to run the engine are
//! errors.

use crate::query::{InputQuery, QueryFormat};
use nnquery_expr::VariableId;
use nnquery_solver::{ExitCode, SolverError, SolverOptions, Statistics};
use std::collections::BTreeMap;
use std::path::Path;

/// Outcome of one solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    pub exit_code: ExitCode,
    /// Witness values; empty unless the query was satisfiable.
    pub values: BTreeMap<VariableId, f64>,
    pub statistics: Statistics,
}

impl SolveResult {
    pub fn new(exit_code: ExitCode, values: BTreeMap<VariableId, f64>, statistics: Statistics) -> Self {
        Self {
            exit_code,
            values,
            statistics,
        }
    }

    /// Result without an assignment.
    pub fn without_values(exit_code: ExitCode, statistics: Statistics) -> Self {
        Self::new(exit_code, BTreeMap::new(), statistics)
    }

    pub fn is_sat(&self) -> bool {
        self.exit_code.is_sat()
    }

    pub fn has_assignment(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn value(&self, variable: VariableId) -> Option<f64> {
        self.values.get(&variable).copied()
    }
}

/// Trait that all solver backends must implement.
pub trait Solver {
    /// Solve the given query. `log_path`, when set, receives the engine's
    /// own log output.
    fn solve(
        &mut self,
        query: &InputQuery,
        options: &SolverOptions,
        log_path: Option<&Path>,
    ) -> Result<SolveResult, SolverError>;

    /// Persist a query in the engine's native format.
    fn save_query(&self, query: &InputQuery, path: &Path) -> Result<(), SolverError> {
        query
            .save(path, QueryFormat::Marabou)
            .map_err(|e| SolverError::Io(e.to_string()))
    }
}
