//! Input query construction.

use crate::constraint::PiecewiseConstraint;
use crate::query::{InputQuery, QueryError};
use std::time::Instant;

use super::Network;

impl Network {
    /// Build the solver input query from the accumulated state.
    ///
    /// Registration order is fixed: variable count, input marks, output
    /// marks, network equations, property equations, then ReLU, sigmoid,
    /// max, abs, sign and disjunction constraints, then lower and upper
    /// bounds. Building twice from the same state yields equal queries.
    pub fn input_query(&self) -> Result<InputQuery, QueryError> {
        let started = Instant::now();
        let mut query = InputQuery::new();
        query.set_number_of_variables(self.num_variables());

        let inputs = self.input_variables.iter().flat_map(|arr| arr.flat());
        for (index, var) in inputs.enumerate() {
            query.mark_input_variable(*var, index)?;
        }
        let outputs = self.output_variables.iter().flat_map(|arr| arr.flat());
        for (index, var) in outputs.enumerate() {
            query.mark_output_variable(*var, index)?;
        }

        for equation in self.equations.iter().chain(&self.property_equations) {
            query.add_equation(equation.clone())?;
        }

        for relu in &self.relus {
            query.add_constraint(PiecewiseConstraint::Relu(*relu))?;
        }
        for sigmoid in &self.sigmoids {
            query.add_constraint(PiecewiseConstraint::Sigmoid(*sigmoid))?;
        }
        for max in &self.maxes {
            query.add_constraint(PiecewiseConstraint::Max(max.clone()))?;
        }
        for abs in &self.abs_constraints {
            query.add_constraint(PiecewiseConstraint::Abs(*abs))?;
        }
        for sign in &self.sign_constraints {
            query.add_constraint(PiecewiseConstraint::Sign(*sign))?;
        }
        for disjunction in &self.disjunctions {
            query.add_constraint(PiecewiseConstraint::Disjunction(disjunction.clone()))?;
        }

        for (var, value) in &self.lower_bounds {
            query.set_lower_bound(*var, *value)?;
        }
        for (var, value) in &self.upper_bounds {
            query.set_upper_bound(*var, *value)?;
        }

        tracing::debug!(
            component = "network",
            operation = "input_query",
            status = "success",
            num_variables = query.num_variables(),
            num_equations = query.equations().len(),
            num_constraints = query.constraints().len(),
            num_inputs = query.num_input_variables(),
            num_outputs = query.num_output_variables(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Built input query"
        );
        Ok(query)
    }
}
