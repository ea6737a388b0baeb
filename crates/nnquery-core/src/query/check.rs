//! Checking a solver witness against the query it came from.

use super::{InputQuery, QueryError};
use nnquery_expr::VariableId;
use std::collections::BTreeMap;

impl InputQuery {
    /// Verify that an assignment satisfies every bound, equation and
    /// constraint of the query within `tolerance`.
    ///
    /// Variables that no registration mentions may be left unassigned.
    pub fn check_assignment(
        &self,
        values: &BTreeMap<VariableId, f64>,
        tolerance: f64,
    ) -> Result<(), QueryError> {
        for (variable, bound) in &self.lower_bounds {
            let value = lookup(values, *variable, "lower bound")?;
            if value < bound - tolerance {
                return Err(QueryError::violation(format!(
                    "lower bound {variable} >= {bound} (value {value})"
                )));
            }
        }
        for (variable, bound) in &self.upper_bounds {
            let value = lookup(values, *variable, "upper bound")?;
            if value > bound + tolerance {
                return Err(QueryError::violation(format!(
                    "upper bound {variable} <= {bound} (value {value})"
                )));
            }
        }
        for (index, equation) in self.equations.iter().enumerate() {
            match equation.is_satisfied(values, tolerance) {
                Some(true) => {}
                Some(false) => {
                    return Err(QueryError::violation(format!(
                        "equation {index}: {equation}"
                    )));
                }
                None => {
                    return Err(QueryError::violation(format!(
                        "equation {index}: unassigned variable"
                    )));
                }
            }
        }
        for (index, constraint) in self.constraints.iter().enumerate() {
            match constraint.is_satisfied(values, tolerance) {
                Some(true) => {}
                Some(false) => {
                    return Err(QueryError::violation(format!(
                        "{} constraint {index}",
                        constraint.kind()
                    )));
                }
                None => {
                    return Err(QueryError::violation(format!(
                        "{} constraint {index}: unassigned variable",
                        constraint.kind()
                    )));
                }
            }
        }
        Ok(())
    }
}

fn lookup(
    values: &BTreeMap<VariableId, f64>,
    variable: VariableId,
    context: &str,
) -> Result<f64, QueryError> {
    values
        .get(&variable)
        .copied()
        .ok_or_else(|| QueryError::violation(format!("{context} on {variable}: unassigned variable")))
}
