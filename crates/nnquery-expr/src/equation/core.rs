//! Core equation record: ordered addends, comparator and scalar.
//!
//! Addends keep insertion order and are never merged; the solver receives
//! them exactly as they were added.

use crate::equation::error::EquationError;
use crate::equation::kind::EquationType;
use crate::ids::VariableId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Equation {
    equation_type: EquationType,
    addends: Vec<(f64, VariableId)>,
    scalar: f64,
}

impl Equation {
    // ── Constructors ────────────────────────────────────────

    /// Empty equation with the given comparator and a zero scalar.
    pub fn new(equation_type: EquationType) -> Self {
        Self {
            equation_type,
            addends: Vec::new(),
            scalar: 0.0,
        }
    }

    /// Equation from parallel variable and coefficient slices.
    pub fn from_terms(
        equation_type: EquationType,
        variables: &[VariableId],
        coefficients: &[f64],
        scalar: f64,
    ) -> Result<Self, EquationError> {
        if variables.len() != coefficients.len() {
            return Err(EquationError::MismatchedLengths {
                variables: variables.len(),
                coefficients: coefficients.len(),
            });
        }
        let addends = coefficients
            .iter()
            .copied()
            .zip(variables.iter().copied())
            .collect();
        Ok(Self {
            equation_type,
            addends,
            scalar,
        })
    }

    // ── Mutation ────────────────────────────────────────────

    /// Append `coefficient * variable` to the left-hand side.
    pub fn add_addend(&mut self, coefficient: f64, variable: VariableId) {
        self.addends.push((coefficient, variable));
    }

    /// Set the right-hand side.
    pub fn set_scalar(&mut self, scalar: f64) {
        self.scalar = scalar;
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn equation_type(&self) -> EquationType {
        self.equation_type
    }

    pub fn addends(&self) -> &[(f64, VariableId)] {
        &self.addends
    }

    pub fn scalar(&self) -> f64 {
        self.scalar
    }

    /// Variables referenced by the left-hand side, in addend order.
    pub fn variables(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.addends.iter().map(|(_, var)| *var)
    }

    // ── Evaluation ──────────────────────────────────────────

    /// Left-hand side under an assignment. `None` if a variable is unassigned.
    pub fn evaluate_lhs(&self, values: &BTreeMap<VariableId, f64>) -> Option<f64> {
        self.addends
            .iter()
            .try_fold(0.0, |acc, (coeff, var)| Some(acc + coeff * values.get(var)?))
    }

    /// Whether the equation holds under an assignment.
    pub fn is_satisfied(&self, values: &BTreeMap<VariableId, f64>, tolerance: f64) -> Option<bool> {
        let lhs = self.evaluate_lhs(values)?;
        Some(self.equation_type.holds(lhs, self.scalar, tolerance))
    }
}

impl std::fmt::Display for Equation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let terms = self
            .addends
            .iter()
            .map(|(coeff, var)| format!("{coeff}*{var}"))
            .collect::<Vec<_>>()
            .join(" + ");
        write!(
            f,
            "{} {} {}",
            terms,
            self.equation_type.symbol(),
            self.scalar
        )
    }
}
