//! Network builder methods for adding variables, equations, constraints and bounds.
//!
//! Every method is an append or an overwrite; no validation against the
//! variable count happens here. Indices are checked when the input query is
//! built.

use crate::constraint::{
    AbsConstraint, Disjunction, MaxConstraint, ReluConstraint, SignConstraint, SigmoidConstraint,
};
use crate::types::VarArray;
use nnquery_expr::{Equation, VariableId, equality, inequality};

use super::error::NetworkError;
use super::{EquationScope, Network};

impl Network {
    /// Allocate the next variable.
    pub fn new_variable(&mut self) -> VariableId {
        let id = VariableId::new(self.next_variable);
        self.next_variable += 1;
        id
    }

    /// Allocate the next gradient variable.
    ///
    /// Gradient variables are counted separately; their index space starts
    /// at zero independently of [`Network::new_variable`].
    pub fn new_gradient_variable(&mut self) -> VariableId {
        let id = VariableId::new(self.next_gradient_variable);
        self.next_gradient_variable += 1;
        id
    }

    /// Append an equation to the network or property list.
    pub fn add_equation(&mut self, equation: Equation, scope: EquationScope) {
        tracing::trace!(
            component = "network",
            operation = "add_equation",
            scope = scope.as_str(),
            equation = %equation,
            "Added equation"
        );
        match scope {
            EquationScope::Network => self.equations.push(equation),
            EquationScope::Property => self.property_equations.push(equation),
        }
    }

    /// Append `Σ coefficients[i] * variables[i] = scalar`.
    pub fn add_equality(
        &mut self,
        variables: &[VariableId],
        coefficients: &[f64],
        scalar: f64,
        scope: EquationScope,
    ) -> Result<(), NetworkError> {
        let equation = equality(variables, coefficients, scalar)?;
        self.add_equation(equation, scope);
        Ok(())
    }

    /// Append `Σ coefficients[i] * variables[i] <= scalar`.
    pub fn add_inequality(
        &mut self,
        variables: &[VariableId],
        coefficients: &[f64],
        scalar: f64,
        scope: EquationScope,
    ) -> Result<(), NetworkError> {
        let equation = inequality(variables, coefficients, scalar)?;
        self.add_equation(equation, scope);
        Ok(())
    }

    /// Set (or overwrite) the lower bound of a variable.
    pub fn set_lower_bound(&mut self, variable: VariableId, value: f64) {
        self.lower_bounds.insert(variable, value);
    }

    /// Set (or overwrite) the upper bound of a variable.
    pub fn set_upper_bound(&mut self, variable: VariableId, value: f64) {
        self.upper_bounds.insert(variable, value);
    }

    /// `output = max(0, input)`
    pub fn add_relu(&mut self, input: VariableId, output: VariableId) {
        self.relus.push(ReluConstraint { input, output });
    }

    /// `output = sigmoid(input)`
    pub fn add_sigmoid(&mut self, input: VariableId, output: VariableId) {
        self.sigmoids.push(SigmoidConstraint { input, output });
    }

    /// `output = max(elements)`. Duplicate elements collapse.
    pub fn add_max(&mut self, elements: &[VariableId], output: VariableId) {
        self.maxes.push(MaxConstraint {
            inputs: elements.iter().copied().collect(),
            output,
        });
    }

    /// `output = |input|`
    pub fn add_abs(&mut self, input: VariableId, output: VariableId) {
        self.abs_constraints.push(AbsConstraint { input, output });
    }

    /// `output = sign(input)`, with `sign(0) = 1`.
    pub fn add_sign(&mut self, input: VariableId, output: VariableId) {
        self.sign_constraints.push(SignConstraint { input, output });
    }

    /// At least one of `disjuncts` holds; each disjunct is a conjunction.
    pub fn add_disjunction(&mut self, disjuncts: Vec<Vec<Equation>>) {
        self.disjunctions.push(Disjunction::new(disjuncts));
    }

    /// Replace the input designation.
    pub fn set_input_variables(&mut self, arrays: Vec<VarArray>) {
        self.input_variables = arrays;
    }

    /// Replace the output designation.
    pub fn set_output_variables(&mut self, arrays: Vec<VarArray>) {
        self.output_variables = arrays;
    }

    /// Record `coefficient * gradient(source)` as a contribution to
    /// `gradient(target)`.
    pub fn add_gradient_term(&mut self, target: VariableId, source: VariableId, coefficient: f64) {
        self.gradient_terms
            .entry(target)
            .or_default()
            .push((source, coefficient));
    }
}
