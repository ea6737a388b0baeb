//! Solver input query.
//!
//! [`InputQuery`] is the structure handed to a solver backend: variable
//! count, input/output designations, equations, piecewise constraints and
//! bounds. Every registration checks variable indices against the declared
//! variable count, so a query that exists is well-formed.
//!
//! - [`error`]: Query errors
//! - [`check`]: Checking an assignment against a query
//! - [`file`]: Query persistence (solver text format and JSON)

mod check;
mod error;
mod file;

use crate::constraint::PiecewiseConstraint;
use nnquery_expr::{Equation, VariableId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use error::QueryError;
pub use file::QueryFormat;

/// Tolerance used when checking solver witnesses.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputQuery {
    num_variables: usize,
    // Position in the flattened input/output arrays -> variable
    input_variables: BTreeMap<usize, VariableId>,
    output_variables: BTreeMap<usize, VariableId>,
    equations: Vec<Equation>,
    constraints: Vec<PiecewiseConstraint>,
    lower_bounds: BTreeMap<VariableId, f64>,
    upper_bounds: BTreeMap<VariableId, f64>,
}

impl InputQuery {
    /// Create an empty query with no variables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the size of the variable space.
    pub fn set_number_of_variables(&mut self, count: usize) {
        self.num_variables = count;
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    fn ensure_in_range(&self, variable: VariableId, context: &'static str) -> Result<(), QueryError> {
        if variable.index() < self.num_variables {
            Ok(())
        } else {
            Err(QueryError::VariableOutOfRange {
                variable,
                num_variables: self.num_variables,
                context,
            })
        }
    }

    /// Designate `variable` as network input number `index`.
    pub fn mark_input_variable(&mut self, variable: VariableId, index: usize) -> Result<(), QueryError> {
        self.ensure_in_range(variable, "input designation")?;
        self.input_variables.insert(index, variable);
        Ok(())
    }

    /// Designate `variable` as network output number `index`.
    pub fn mark_output_variable(&mut self, variable: VariableId, index: usize) -> Result<(), QueryError> {
        self.ensure_in_range(variable, "output designation")?;
        self.output_variables.insert(index, variable);
        Ok(())
    }

    /// Register an equation.
    pub fn add_equation(&mut self, equation: Equation) -> Result<(), QueryError> {
        for variable in equation.variables() {
            self.ensure_in_range(variable, "equation")?;
        }
        self.equations.push(equation);
        Ok(())
    }

    /// Register a piecewise constraint.
    pub fn add_constraint(&mut self, constraint: PiecewiseConstraint) -> Result<(), QueryError> {
        let context = constraint.kind();
        for variable in constraint.variables() {
            self.ensure_in_range(variable, context)?;
        }
        self.constraints.push(constraint);
        Ok(())
    }

    pub fn set_lower_bound(&mut self, variable: VariableId, value: f64) -> Result<(), QueryError> {
        self.ensure_in_range(variable, "lower bound")?;
        self.lower_bounds.insert(variable, value);
        Ok(())
    }

    pub fn set_upper_bound(&mut self, variable: VariableId, value: f64) -> Result<(), QueryError> {
        self.ensure_in_range(variable, "upper bound")?;
        self.upper_bounds.insert(variable, value);
        Ok(())
    }

    /// Pin a variable to a single value (lower = upper = value).
    pub fn fix_variable(&mut self, variable: VariableId, value: f64) -> Result<(), QueryError> {
        self.set_lower_bound(variable, value)?;
        self.set_upper_bound(variable, value)
    }

    // ── Accessors ───────────────────────────────────────────

    /// Input variables in designation order.
    pub fn input_variables(&self) -> Vec<VariableId> {
        self.input_variables.values().copied().collect()
    }

    /// Output variables in designation order.
    pub fn output_variables(&self) -> Vec<VariableId> {
        self.output_variables.values().copied().collect()
    }

    pub fn input_variable(&self, index: usize) -> Option<VariableId> {
        self.input_variables.get(&index).copied()
    }

    pub fn output_variable(&self, index: usize) -> Option<VariableId> {
        self.output_variables.get(&index).copied()
    }

    pub fn num_input_variables(&self) -> usize {
        self.input_variables.len()
    }

    pub fn num_output_variables(&self) -> usize {
        self.output_variables.len()
    }

    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    pub fn constraints(&self) -> &[PiecewiseConstraint] {
        &self.constraints
    }

    pub fn lower_bounds(&self) -> &BTreeMap<VariableId, f64> {
        &self.lower_bounds
    }

    pub fn upper_bounds(&self) -> &BTreeMap<VariableId, f64> {
        &self.upper_bounds
    }

    pub fn lower_bound(&self, variable: VariableId) -> Option<f64> {
        self.lower_bounds.get(&variable).copied()
    }

    pub fn upper_bound(&self, variable: VariableId) -> Option<f64> {
        self.upper_bounds.get(&variable).copied()
    }

    /// Re-check every variable reference, e.g. after deserializing.
    pub fn validate(&self) -> Result<(), QueryError> {
        for variable in self.input_variables.values() {
            self.ensure_in_range(*variable, "input designation")?;
        }
        for variable in self.output_variables.values() {
            self.ensure_in_range(*variable, "output designation")?;
        }
        for equation in &self.equations {
            for variable in equation.variables() {
                self.ensure_in_range(variable, "equation")?;
            }
        }
        for constraint in &self.constraints {
            for variable in constraint.variables() {
                self.ensure_in_range(variable, constraint.kind())?;
            }
        }
        for variable in self.lower_bounds.keys() {
            self.ensure_in_range(*variable, "lower bound")?;
        }
        for variable in self.upper_bounds.keys() {
            self.ensure_in_range(*variable, "upper bound")?;
        }
        Ok(())
    }
}
