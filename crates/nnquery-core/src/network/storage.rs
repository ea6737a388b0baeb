//! Read-only views of the accumulated network state.

use crate::constraint::{
    AbsConstraint, Disjunction, MaxConstraint, ReluConstraint, SignConstraint, SigmoidConstraint,
};
use crate::types::VarArray;
use nnquery_expr::{Equation, VariableId};
use std::collections::BTreeMap;

use super::Network;

impl Network {
    /// Number of variables allocated so far.
    pub fn num_variables(&self) -> usize {
        self.next_variable as usize
    }

    /// Number of gradient variables allocated so far.
    pub fn num_gradient_variables(&self) -> usize {
        self.next_gradient_variable as usize
    }

    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    pub fn property_equations(&self) -> &[Equation] {
        &self.property_equations
    }

    pub fn relus(&self) -> &[ReluConstraint] {
        &self.relus
    }

    pub fn sigmoids(&self) -> &[SigmoidConstraint] {
        &self.sigmoids
    }

    pub fn maxes(&self) -> &[MaxConstraint] {
        &self.maxes
    }

    pub fn abs_constraints(&self) -> &[AbsConstraint] {
        &self.abs_constraints
    }

    pub fn sign_constraints(&self) -> &[SignConstraint] {
        &self.sign_constraints
    }

    pub fn disjunctions(&self) -> &[Disjunction] {
        &self.disjunctions
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

    pub fn lower_bound_exists(&self, variable: VariableId) -> bool {
        self.lower_bounds.contains_key(&variable)
    }

    pub fn upper_bound_exists(&self, variable: VariableId) -> bool {
        self.upper_bounds.contains_key(&variable)
    }

    pub fn input_variables(&self) -> &[VarArray] {
        &self.input_variables
    }

    pub fn output_variables(&self) -> &[VarArray] {
        &self.output_variables
    }

    /// Gradient accumulator: target -> `(source, coefficient)` pairs.
    pub fn gradient_terms(&self) -> &BTreeMap<VariableId, Vec<(VariableId, f64)>> {
        &self.gradient_terms
    }

    /// Total number of piecewise constraints across every kind.
    pub fn num_constraints(&self) -> usize {
        self.relus.len()
            + self.sigmoids.len()
            + self.maxes.len()
            + self.abs_constraints.len()
            + self.sign_constraints.len()
            + self.disjunctions.len()
    }
}
