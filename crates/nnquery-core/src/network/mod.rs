//! Network accumulator.
//!
//! A [`Network`] collects everything a format-specific parser emits while
//! walking a neural network: variables, equations, piecewise constraints,
//! bounds, input/output designations and gradient terms. The accumulated
//! state is turned into an [`InputQuery`](crate::query::InputQuery) on demand
//! and can be solved or evaluated through a [`Solver`](crate::solver::Solver).
//!
//! # Module Organization
//!
//! - [`error`]: Network error types
//! - [`builder`]: Methods for adding variables, equations, constraints and bounds
//! - [`storage`]: Read-only views of the accumulated state
//! - [`build`]: Input query construction
//! - [`gradient`]: Backward (gradient) query expansion
//! - [`evaluate`]: Solve, evaluate and robustness helpers

mod build;
mod builder;
mod error;
mod evaluate;
mod gradient;
mod storage;

use crate::constraint::{
    AbsConstraint, Disjunction, MaxConstraint, ReluConstraint, SignConstraint, SigmoidConstraint,
};
use crate::types::VarArray;
use nnquery_expr::{Equation, VariableId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use error::NetworkError;
pub use evaluate::{DirectEvaluate, Evaluation, RobustnessResult};
pub use gradient::GradientOptions;

/// Which equation list an equation belongs to.
///
/// Property equations describe the query being asked of the network and are
/// removed by [`Network::clear_property`]; network equations are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquationScope {
    #[default]
    Network,
    Property,
}

impl EquationScope {
    pub fn as_str(self) -> &'static str {
        match self {
            EquationScope::Network => "network",
            EquationScope::Property => "property",
        }
    }
}

/// Accumulated network encoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Network {
    pub(crate) next_variable: u32,
    pub(crate) next_gradient_variable: u32,
    pub(crate) equations: Vec<Equation>,
    pub(crate) property_equations: Vec<Equation>,
    pub(crate) relus: Vec<ReluConstraint>,
    pub(crate) sigmoids: Vec<SigmoidConstraint>,
    pub(crate) maxes: Vec<MaxConstraint>,
    pub(crate) abs_constraints: Vec<AbsConstraint>,
    pub(crate) sign_constraints: Vec<SignConstraint>,
    pub(crate) disjunctions: Vec<Disjunction>,
    pub(crate) lower_bounds: BTreeMap<VariableId, f64>,
    pub(crate) upper_bounds: BTreeMap<VariableId, f64>,
    pub(crate) input_variables: Vec<VarArray>,
    pub(crate) output_variables: Vec<VarArray>,
    // gradient target -> (source, coefficient)
    pub(crate) gradient_terms: BTreeMap<VariableId, Vec<(VariableId, f64)>>,
}

impl Network {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to the empty state, variable counters included.
    pub fn clear(&mut self) {
        *self = Self::new();
        tracing::debug!(
            component = "network",
            operation = "clear",
            status = "success",
            "Cleared network"
        );
    }

    /// Drop the property: bounds and property equations.
    ///
    /// Network equations, constraints, designations and counters survive, so
    /// a different property can be posed against the same encoding.
    pub fn clear_property(&mut self) {
        let removed_equations = self.property_equations.len();
        let removed_bounds = self.lower_bounds.len() + self.upper_bounds.len();
        self.property_equations.clear();
        self.lower_bounds.clear();
        self.upper_bounds.clear();
        tracing::debug!(
            component = "network",
            operation = "clear_property",
            status = "success",
            removed_equations,
            removed_bounds,
            "Cleared property"
        );
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use nnquery_expr::EquationType;

    mod backward;
    mod evaluate;
    mod robustness;
    mod support;

    #[test]
    fn new_network_is_empty() {
        let network = Network::new();
        assert_eq!(network.num_variables(), 0);
        assert_eq!(network.num_gradient_variables(), 0);
        assert!(network.equations().is_empty());
        assert!(network.property_equations().is_empty());
        assert!(network.input_variables().is_empty());
    }

    #[test]
    fn variables_are_allocated_sequentially() {
        let mut network = Network::new();
        let a = network.new_variable();
        let b = network.new_variable();
        assert_eq!((a.inner(), b.inner()), (0, 1));
        assert_eq!(network.num_variables(), 2);

        let g = network.new_gradient_variable();
        assert_eq!(g.inner(), 0);
        assert_eq!(network.num_gradient_variables(), 1);
        assert_eq!(network.num_variables(), 2);
    }

    #[test]
    fn scope_selects_equation_list() {
        let mut network = Network::new();
        let x = network.new_variable();
        network
            .add_equality(&[x], &[1.0], 2.0, EquationScope::Network)
            .unwrap();
        network
            .add_inequality(&[x], &[1.0], 3.0, EquationScope::Property)
            .unwrap();

        assert_eq!(network.equations().len(), 1);
        assert_eq!(network.property_equations().len(), 1);
        assert_eq!(
            network.property_equations()[0].equation_type(),
            EquationType::Le
        );
    }

    #[test]
    fn mismatched_terms_are_rejected() {
        let mut network = Network::new();
        let x = network.new_variable();
        let err = network
            .add_equality(&[x], &[1.0, 2.0], 0.0, EquationScope::Network)
            .unwrap_err();
        assert_eq!(err.code(), "EQUATION_MISMATCHED_LENGTHS");
        assert!(network.equations().is_empty());
    }

    #[test]
    fn replayed_addends_keep_pairing_and_scalar() {
        let mut network = Network::new();
        let vars: Vec<VariableId> = (0..3).map(|_| network.new_variable()).collect();
        let coeffs = [0.25, -3.0, 7.5];
        network
            .add_equality(&vars, &coeffs, -1.125, EquationScope::Network)
            .unwrap();

        let eq = &network.equations()[0];
        let expected: Vec<(f64, VariableId)> = coeffs.iter().copied().zip(vars).collect();
        assert_eq!(eq.addends(), expected.as_slice());
        assert_eq!(eq.scalar(), -1.125);
    }

    #[test]
    fn bounds_overwrite_and_report_existence() {
        let mut network = Network::new();
        let x = network.new_variable();
        assert!(!network.lower_bound_exists(x));
        network.set_lower_bound(x, -1.0);
        network.set_lower_bound(x, -2.0);
        network.set_upper_bound(x, 4.0);
        assert!(network.lower_bound_exists(x));
        assert!(network.upper_bound_exists(x));
        assert_eq!(network.lower_bound(x), Some(-2.0));
        assert_eq!(network.upper_bound(x), Some(4.0));
        assert_eq!(network.lower_bounds().len(), 1);
    }

    #[test]
    fn clear_property_keeps_network_equations() {
        let mut network = Network::new();
        let x = network.new_variable();
        let y = network.new_variable();
        network
            .add_equality(&[x, y], &[1.0, -1.0], 0.0, EquationScope::Network)
            .unwrap();
        network
            .add_inequality(&[y], &[-1.0], 0.0, EquationScope::Property)
            .unwrap();
        network.add_relu(x, y);
        network.set_lower_bound(x, 0.0);
        network.set_upper_bound(y, 1.0);

        network.clear_property();

        assert_eq!(network.equations().len(), 1);
        assert!(network.property_equations().is_empty());
        assert!(network.lower_bounds().is_empty());
        assert!(network.upper_bounds().is_empty());
        assert_eq!(network.relus().len(), 1);
        assert_eq!(network.num_variables(), 2);
    }

    #[test]
    fn clear_resets_counters() {
        let mut network = Network::new();
        let x = network.new_variable();
        network.new_gradient_variable();
        network.add_gradient_term(x, x, 1.0);
        network.set_input_variables(vec![VarArray::vector(vec![x])]);

        network.clear();

        assert_eq!(network, Network::new());
        assert_eq!(network.new_variable().inner(), 0);
    }

    #[test]
    fn constraint_lists_keep_registration_order() {
        let mut network = Network::new();
        let v: Vec<VariableId> = (0..6).map(|_| network.new_variable()).collect();
        network.add_relu(v[0], v[1]);
        network.add_relu(v[2], v[3]);
        network.add_sigmoid(v[1], v[4]);
        network.add_max(&[v[3], v[1]], v[5]);
        network.add_abs(v[0], v[2]);
        network.add_sign(v[4], v[5]);

        assert_eq!(network.relus()[0].input, v[0]);
        assert_eq!(network.relus()[1].input, v[2]);
        assert_eq!(network.sigmoids().len(), 1);
        assert_eq!(
            network.maxes()[0].inputs.iter().copied().collect::<Vec<_>>(),
            vec![v[1], v[3]]
        );
        assert_eq!(network.abs_constraints()[0].output, v[2]);
        assert_eq!(network.sign_constraints()[0].input, v[4]);
    }

    #[test]
    fn gradient_terms_accumulate_per_target() {
        let mut network = Network::new();
        let v: Vec<VariableId> = (0..3).map(|_| network.new_variable()).collect();
        network.add_gradient_term(v[0], v[1], 2.0);
        network.add_gradient_term(v[0], v[2], -1.0);
        network.add_gradient_term(v[1], v[2], 0.5);

        assert_eq!(
            network.gradient_terms().get(&v[0]).map(Vec::as_slice),
            Some([(v[1], 2.0), (v[2], -1.0)].as_slice())
        );
        assert_eq!(network.gradient_terms().len(), 2);
    }
}
