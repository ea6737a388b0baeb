//! Piecewise-linear (and sigmoid) constraint records.
//!
//! The network keeps one ordered sequence per kind; the input query keeps a
//! single sequence of [`PiecewiseConstraint`] in registration order.

use nnquery_expr::{Equation, VariableId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// `output = max(0, input)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReluConstraint {
    pub input: VariableId,
    pub output: VariableId,
}

/// `output = 1 / (1 + exp(-input))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigmoidConstraint {
    pub input: VariableId,
    pub output: VariableId,
}

/// `output = |input|`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsConstraint {
    pub input: VariableId,
    pub output: VariableId,
}

/// `output = 1` if `input >= 0`, else `-1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignConstraint {
    pub input: VariableId,
    pub output: VariableId,
}

/// `output = max(inputs)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxConstraint {
    pub inputs: BTreeSet<VariableId>,
    pub output: VariableId,
}

/// At least one disjunct holds; a disjunct is a conjunction of equations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Disjunction {
    disjuncts: Vec<Vec<Equation>>,
}

impl Disjunction {
    pub fn new(disjuncts: Vec<Vec<Equation>>) -> Self {
        Self { disjuncts }
    }

    pub fn disjuncts(&self) -> &[Vec<Equation>] {
        &self.disjuncts
    }

    pub fn len(&self) -> usize {
        self.disjuncts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.disjuncts.is_empty()
    }

    /// Every equation of every disjunct, in order.
    pub fn equations(&self) -> impl Iterator<Item = &Equation> + '_ {
        self.disjuncts.iter().flatten()
    }

    /// Indices of the disjuncts that hold under an assignment.
    ///
    /// `None` if a referenced variable is unassigned.
    pub fn satisfied_disjuncts(
        &self,
        values: &BTreeMap<VariableId, f64>,
        tolerance: f64,
    ) -> Option<Vec<usize>> {
        let mut satisfied = Vec::new();
        for (index, disjunct) in self.disjuncts.iter().enumerate() {
            let mut holds = true;
            for equation in disjunct {
                holds &= equation.is_satisfied(values, tolerance)?;
            }
            if holds {
                satisfied.push(index);
            }
        }
        Some(satisfied)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PiecewiseConstraint {
    Relu(ReluConstraint),
    Sigmoid(SigmoidConstraint),
    Max(MaxConstraint),
    Abs(AbsConstraint),
    Sign(SignConstraint),
    Disjunction(Disjunction),
}

impl PiecewiseConstraint {
    pub fn kind(&self) -> &'static str {
        match self {
            PiecewiseConstraint::Relu(_) => "relu",
            PiecewiseConstraint::Sigmoid(_) => "sigmoid",
            PiecewiseConstraint::Max(_) => "max",
            PiecewiseConstraint::Abs(_) => "abs",
            PiecewiseConstraint::Sign(_) => "sign",
            PiecewiseConstraint::Disjunction(_) => "disjunction",
        }
    }

    /// Every variable the constraint references.
    pub fn variables(&self) -> Vec<VariableId> {
        match self {
            PiecewiseConstraint::Relu(c) => vec![c.input, c.output],
            PiecewiseConstraint::Sigmoid(c) => vec![c.input, c.output],
            PiecewiseConstraint::Abs(c) => vec![c.input, c.output],
            PiecewiseConstraint::Sign(c) => vec![c.input, c.output],
            PiecewiseConstraint::Max(c) => {
                let mut vars: Vec<VariableId> = c.inputs.iter().copied().collect();
                vars.push(c.output);
                vars
            }
            PiecewiseConstraint::Disjunction(d) => {
                d.equations().flat_map(|eq| eq.variables()).collect()
            }
        }
    }

    /// Whether the constraint holds under an assignment.
    ///
    /// `None` if a referenced variable is unassigned.
    pub fn is_satisfied(&self, values: &BTreeMap<VariableId, f64>, tolerance: f64) -> Option<bool> {
        let value = |var: &VariableId| values.get(var).copied();
        let close = |a: f64, b: f64| (a - b).abs() <= tolerance;
        match self {
            PiecewiseConstraint::Relu(c) => Some(close(value(&c.output)?, value(&c.input)?.max(0.0))),
            PiecewiseConstraint::Sigmoid(c) => {
                let input = value(&c.input)?;
                Some(close(value(&c.output)?, 1.0 / (1.0 + (-input).exp())))
            }
            PiecewiseConstraint::Abs(c) => Some(close(value(&c.output)?, value(&c.input)?.abs())),
            PiecewiseConstraint::Sign(c) => {
                let expected = if value(&c.input)? >= 0.0 { 1.0 } else { -1.0 };
                Some(close(value(&c.output)?, expected))
            }
            PiecewiseConstraint::Max(c) => {
                let mut max = f64::NEG_INFINITY;
                for input in &c.inputs {
                    max = max.max(value(input)?);
                }
                Some(close(value(&c.output)?, max))
            }
            PiecewiseConstraint::Disjunction(d) => {
                Some(!d.satisfied_disjuncts(values, tolerance)?.is_empty())
            }
        }
    }
}
