//! Solve, evaluate and robustness helpers.

use crate::constraint::{MaxConstraint, PiecewiseConstraint};
use crate::query::{InputQuery, QueryFormat};
use crate::solver::{SolveResult, Solver};
use crate::types::{ValueArray, VarArray};
use nnquery_expr::VariableId;
use nnquery_solver::{SolverOptions, Statistics};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use super::Network;
use super::error::NetworkError;

/// Forward pass computed without a solver.
///
/// Format-specific front ends implement this with the framework the network
/// was loaded from, so solver evaluations can be compared against it.
pub trait DirectEvaluate {
    fn evaluate(&self, inputs: &[ValueArray]) -> Result<Vec<ValueArray>, NetworkError>;
}

/// Outcome of a local robustness check.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RobustnessResult {
    /// Counterexample assignment; empty when none was found.
    pub values: BTreeMap<VariableId, f64>,
    /// Statistics of the last solve performed.
    pub statistics: Statistics,
    /// Class that reaches the maximum output under the counterexample.
    pub max_class: Option<usize>,
}

/// How [`Network::evaluate`] computes outputs.
pub enum Evaluation<'a> {
    /// Pin the inputs on the built query and solve it.
    Solver {
        solver: &'a mut dyn Solver,
        options: &'a SolverOptions,
        log_path: Option<&'a Path>,
    },
    /// Run a forward pass outside the solver.
    Direct(&'a dyn DirectEvaluate),
}

impl RobustnessResult {
    /// True when no counterexample was found and no solve timed out.
    pub fn is_robust(&self) -> bool {
        self.max_class.is_none() && !self.statistics.has_timed_out()
    }
}

impl Network {
    /// Build the input query and solve it.
    pub fn solve<S: Solver + ?Sized>(
        &self,
        solver: &mut S,
        options: &SolverOptions,
        log_path: Option<&Path>,
    ) -> Result<SolveResult, NetworkError> {
        let query = self.input_query()?;
        let result = run_solver(solver, &query, options, log_path, "solve")?;
        if result.is_sat() {
            self.log_witness(&result.values);
        }
        Ok(result)
    }

    /// Evaluate the network at a point by pinning every input variable and
    /// solving.
    ///
    /// Returns `None` when the solver reports no assignment; otherwise the
    /// output values in the shapes of the output arrays.
    pub fn evaluate_with_solver<S: Solver + ?Sized>(
        &self,
        inputs: &[ValueArray],
        solver: &mut S,
        options: &SolverOptions,
        log_path: Option<&Path>,
    ) -> Result<Option<Vec<ValueArray>>, NetworkError> {
        check_arrays(&self.input_variables, inputs)?;

        let mut query = self.input_query()?;
        for (vars, values) in self.input_variables.iter().zip(inputs) {
            for (var, value) in vars.flat().iter().zip(values.flat()) {
                query.fix_variable(*var, *value)?;
            }
        }

        let result = run_solver(solver, &query, options, log_path, "evaluate_with_solver")?;
        if !result.has_assignment() {
            return Ok(None);
        }

        let outputs = self
            .output_variables
            .iter()
            .map(|vars| read_values(vars, &result.values))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(outputs))
    }

    /// Evaluate the network at a point with a solver or a direct forward
    /// pass.
    ///
    /// `None` only comes from the solver path, when no assignment exists.
    pub fn evaluate(
        &self,
        inputs: &[ValueArray],
        method: Evaluation<'_>,
    ) -> Result<Option<Vec<ValueArray>>, NetworkError> {
        match method {
            Evaluation::Solver {
                solver,
                options,
                log_path,
            } => self.evaluate_with_solver(inputs, solver, options, log_path),
            Evaluation::Direct(reference) => self.evaluate_direct(inputs, reference).map(Some),
        }
    }

    /// Forward pass through `reference`, checked against the declared input
    /// and output arrays.
    pub fn evaluate_direct<R: DirectEvaluate + ?Sized>(
        &self,
        inputs: &[ValueArray],
        reference: &R,
    ) -> Result<Vec<ValueArray>, NetworkError> {
        check_arrays(&self.input_variables, inputs)?;
        let outputs = reference.evaluate(inputs)?;
        check_arrays(&self.output_variables, &outputs)?;
        Ok(outputs)
    }

    /// Search for an input within `epsilon` (L-inf) of `input` whose
    /// classification differs from `original_class`.
    ///
    /// On success the box bounds are written to the network as property
    /// bounds and stay in place afterwards; on error the network is left
    /// unchanged. Call [`Network::clear_property`] to pose a
    /// different property. Without `target_class`, every other class `k` is
    /// tried in order against `out[k] >= out[original_class]` and the first
    /// satisfiable class is reported; a timeout stops the search. With
    /// `target_class`, a single query asks for `out[target_class]` to be the
    /// maximum output.
    #[allow(clippy::too_many_arguments)]
    pub fn evaluate_local_robustness<S: Solver + ?Sized>(
        &mut self,
        input: &ValueArray,
        epsilon: f64,
        original_class: usize,
        target_class: Option<usize>,
        solver: &mut S,
        options: &SolverOptions,
        log_path: Option<&Path>,
    ) -> Result<RobustnessResult, NetworkError> {
        let started = Instant::now();
        if self.input_variables.len() != 1 {
            return Err(NetworkError::UnsupportedInputCount {
                count: self.input_variables.len(),
            });
        }
        if self.output_variables.len() != 1 {
            return Err(NetworkError::UnsupportedOutputCount {
                count: self.output_variables.len(),
            });
        }
        let input_vars = self.input_variables[0].clone();
        if input_vars.shape() != input.shape() {
            return Err(NetworkError::ShapeMismatch {
                expected: input_vars.shape().to_vec(),
                actual: input.shape().to_vec(),
            });
        }
        let outputs: Vec<VariableId> = self.output_variables[0].flat().to_vec();
        let num_classes = outputs.len();
        for class in std::iter::once(original_class).chain(target_class) {
            if class >= num_classes {
                return Err(NetworkError::InvalidClass { class, num_classes });
            }
        }

        let mut base = self.input_query()?;
        for (var, value) in input_vars.flat().iter().zip(input.flat()) {
            base.set_lower_bound(*var, value - epsilon)?;
            base.set_upper_bound(*var, value + epsilon)?;
        }

        let mut outcome = RobustnessResult::default();
        match target_class {
            Some(target) => {
                let dominance = MaxConstraint {
                    inputs: outputs.iter().copied().collect(),
                    output: outputs[target],
                };
                let result = solve_with(solver, &base, dominance, options, log_path)?;
                if !result.statistics.has_timed_out() && result.has_assignment() {
                    outcome.max_class = Some(target);
                }
                outcome.values = result.values;
                outcome.statistics = result.statistics;
            }
            None => {
                for class in (0..num_classes).filter(|k| *k != original_class) {
                    let dominance = MaxConstraint {
                        inputs: [outputs[class], outputs[original_class]].into_iter().collect(),
                        output: outputs[class],
                    };
                    let result = solve_with(solver, &base, dominance, options, log_path)?;
                    let timed_out = result.statistics.has_timed_out();
                    let found = result.has_assignment();
                    outcome.values = result.values;
                    outcome.statistics = result.statistics;
                    if timed_out {
                        tracing::warn!(
                            component = "network",
                            operation = "evaluate_local_robustness",
                            status = "timeout",
                            class,
                            "Robustness search stopped on timeout"
                        );
                        break;
                    }
                    if found {
                        outcome.max_class = Some(class);
                        break;
                    }
                }
            }
        }

        // Box bounds reach the network only once every solve has returned.
        for (var, value) in input_vars.flat().iter().zip(input.flat()) {
            self.set_lower_bound(*var, value - epsilon);
            self.set_upper_bound(*var, value + epsilon);
        }
        if outcome.max_class.is_some() {
            self.log_witness(&outcome.values);
        }
        tracing::debug!(
            component = "network",
            operation = "evaluate_local_robustness",
            status = "success",
            epsilon,
            original_class,
            target_class = ?target_class,
            max_class = ?outcome.max_class,
            timed_out = outcome.statistics.has_timed_out(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Evaluated local robustness"
        );
        Ok(outcome)
    }

    /// Persist the built input query.
    pub fn save_query(&self, path: &Path, format: QueryFormat) -> Result<(), NetworkError> {
        self.input_query()?.save(path, format)?;
        Ok(())
    }

    /// Element-wise absolute difference between the solver evaluation and a
    /// direct forward pass.
    ///
    /// Returns `None` when the solver finds no assignment for the inputs.
    pub fn find_error<S: Solver + ?Sized, R: DirectEvaluate + ?Sized>(
        &self,
        inputs: &[ValueArray],
        reference: &R,
        solver: &mut S,
        options: &SolverOptions,
        log_path: Option<&Path>,
    ) -> Result<Option<Vec<ValueArray>>, NetworkError> {
        let Some(solved) = self.evaluate_with_solver(inputs, solver, options, log_path)? else {
            return Ok(None);
        };
        let direct = self.evaluate_direct(inputs, reference)?;

        let mut errors = Vec::with_capacity(solved.len());
        for (ours, theirs) in solved.iter().zip(&direct) {
            let diff = ours
                .flat()
                .iter()
                .zip(theirs.flat())
                .map(|(a, b)| (a - b).abs())
                .collect();
            errors.push(ValueArray::new(ours.shape().to_vec(), diff)?);
        }
        Ok(Some(errors))
    }

    fn log_witness(&self, values: &BTreeMap<VariableId, f64>) {
        let inputs = self.input_variables.iter().flat_map(|arr| arr.flat());
        for (index, var) in inputs.enumerate() {
            tracing::info!(
                component = "network",
                operation = "witness",
                role = "input",
                index,
                value = values.get(var).copied(),
                "Witness input"
            );
        }
        let outputs = self.output_variables.iter().flat_map(|arr| arr.flat());
        for (index, var) in outputs.enumerate() {
            tracing::info!(
                component = "network",
                operation = "witness",
                role = "output",
                index,
                value = values.get(var).copied(),
                "Witness output"
            );
        }
    }
}

fn run_solver<S: Solver + ?Sized>(
    solver: &mut S,
    query: &InputQuery,
    options: &SolverOptions,
    log_path: Option<&Path>,
    operation: &'static str,
) -> Result<SolveResult, NetworkError> {
    let result = solver.solve(query, options, log_path)?;
    if result.exit_code.is_sat() {
        tracing::debug!(
            component = "network",
            operation,
            status = "success",
            exit_code = result.exit_code.as_str(),
            num_values = result.values.len(),
            solve_time_seconds = result.statistics.solve_time_seconds,
            "Solved input query"
        );
    } else {
        tracing::warn!(
            component = "network",
            operation,
            status = result.exit_code.as_str(),
            timed_out = result.statistics.has_timed_out(),
            solve_time_seconds = result.statistics.solve_time_seconds,
            "Solve finished without an assignment"
        );
    }
    Ok(result)
}

fn solve_with<S: Solver + ?Sized>(
    solver: &mut S,
    base: &InputQuery,
    dominance: MaxConstraint,
    options: &SolverOptions,
    log_path: Option<&Path>,
) -> Result<SolveResult, NetworkError> {
    let mut query = base.clone();
    query.add_constraint(PiecewiseConstraint::Max(dominance))?;
    run_solver(solver, &query, options, log_path, "evaluate_local_robustness")
}

fn check_arrays(declared: &[VarArray], given: &[ValueArray]) -> Result<(), NetworkError> {
    if declared.len() != given.len() {
        return Err(NetworkError::ArrayCountMismatch {
            expected: declared.len(),
            actual: given.len(),
        });
    }
    for (vars, values) in declared.iter().zip(given) {
        if vars.shape() != values.shape() {
            return Err(NetworkError::ShapeMismatch {
                expected: vars.shape().to_vec(),
                actual: values.shape().to_vec(),
            });
        }
    }
    Ok(())
}

fn read_values(
    vars: &VarArray,
    values: &BTreeMap<VariableId, f64>,
) -> Result<ValueArray, NetworkError> {
    vars.try_map(|var| {
        values
            .get(var)
            .copied()
            .ok_or(NetworkError::MissingValue(*var))
    })
}
