//! Backward (gradient) query expansion.
//!
//! The backward query doubles the variable space: variable `v` gets a shadow
//! gradient variable `v + n`, where `n` is the forward variable count.
//! Linear layers contribute through the gradient accumulator; every ReLU
//! contributes a pair of implications on its subgradient:
//!
//! ```text
//! x >  t  =>  g_x = g_y      encoded as  [x <= t]  or  [g_x - g_y = 0]
//! x < -t  =>  g_x = 0        encoded as  [x >= -t] or  [g_x = 0]
//! ```
//!
//! Inside `[-t, t]` the subgradient is left free.

use crate::constraint::{Disjunction, PiecewiseConstraint};
use crate::query::{InputQuery, QueryError};
use nnquery_expr::{Equation, EquationType, VariableId};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::Network;
use super::error::NetworkError;

/// Options for [`Network::backward_query`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GradientOptions {
    /// Half-width of the band around zero in which a ReLU's subgradient is
    /// unconstrained. `0.0` only frees the subgradient at exactly zero.
    pub zero_tolerance: f64,
}

impl GradientOptions {
    pub fn with_zero_tolerance(mut self, tolerance: f64) -> Self {
        self.zero_tolerance = tolerance;
        self
    }
}

impl Network {
    /// Build the forward query extended with gradient variables and
    /// constraints.
    pub fn backward_query(&self, options: &GradientOptions) -> Result<InputQuery, NetworkError> {
        let started = Instant::now();
        if self.gradient_terms.values().all(Vec::is_empty) {
            return Err(QueryError::NoGradientTerms.into());
        }

        let mut query = self.input_query()?;
        let num_forward = self.num_variables();
        let offset = self.next_variable;
        query.set_number_of_variables(2 * num_forward);

        let mut num_gradient_equations = 0usize;
        for (target, terms) in &self.gradient_terms {
            if terms.is_empty() {
                continue;
            }
            let mut equation = Equation::new(EquationType::Eq);
            for (source, coefficient) in terms {
                equation.add_addend(*coefficient, shadow(*source, offset)?);
            }
            equation.add_addend(-1.0, shadow(*target, offset)?);
            query.add_equation(equation)?;
            num_gradient_equations += 1;
        }

        let t = options.zero_tolerance;
        for relu in &self.relus {
            let gx = shadow(relu.input, offset)?;
            let gy = shadow(relu.output, offset)?;
            query.add_constraint(positive_branch(relu.input, gx, gy, t))?;
            query.add_constraint(negative_branch(relu.input, gx, t))?;
        }

        tracing::debug!(
            component = "network",
            operation = "backward_query",
            status = "success",
            num_variables = query.num_variables(),
            num_gradient_equations,
            num_relus = self.relus.len(),
            zero_tolerance = t,
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Built backward query"
        );
        Ok(query)
    }
}

fn shadow(var: VariableId, offset: u32) -> Result<VariableId, QueryError> {
    var.shifted(offset).ok_or(QueryError::VariableOutOfRange {
        variable: var,
        num_variables: 2 * offset as usize,
        context: "gradient shadow",
    })
}

// [x <= t] or [g_x - g_y = 0]
fn positive_branch(x: VariableId, gx: VariableId, gy: VariableId, t: f64) -> PiecewiseConstraint {
    let mut inactive = Equation::new(EquationType::Le);
    inactive.add_addend(1.0, x);
    inactive.set_scalar(t);

    let mut pass_through = Equation::new(EquationType::Eq);
    pass_through.add_addend(1.0, gx);
    pass_through.add_addend(-1.0, gy);

    PiecewiseConstraint::Disjunction(Disjunction::new(vec![
        vec![inactive],
        vec![pass_through],
    ]))
}

// [x >= -t] or [g_x = 0]
fn negative_branch(x: VariableId, gx: VariableId, t: f64) -> PiecewiseConstraint {
    let mut active = Equation::new(EquationType::Ge);
    active.add_addend(1.0, x);
    active.set_scalar(-t);

    let mut blocked = Equation::new(EquationType::Eq);
    blocked.add_addend(1.0, gx);

    PiecewiseConstraint::Disjunction(Disjunction::new(vec![
        vec![active],
        vec![blocked],
    ]))
}
