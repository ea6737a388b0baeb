use super::support::{ScriptedSolver, affine_network, sat, unsat};
use crate::network::{DirectEvaluate, EquationScope, Evaluation, Network, NetworkError};
use crate::query::{DEFAULT_TOLERANCE, InputQuery, QueryFormat};
use crate::types::{ValueArray, VarArray};
use nnquery_solver::{ExitCode, SolverOptions};
use std::path::Path;

#[test]
fn identity_equation_solves_to_its_scalar() {
    let mut network = Network::new();
    let x = network.new_variable();
    network
        .add_equality(&[x], &[1.0], 5.0, EquationScope::Network)
        .unwrap();
    network.set_output_variables(vec![VarArray::vector(vec![x])]);

    let mut solver = ScriptedSolver::new(vec![sat(&[(x, 5.0)])]);
    let result = network
        .solve(&mut solver, &SolverOptions::new(), None)
        .unwrap();

    assert_eq!(result.exit_code, ExitCode::Sat);
    assert_eq!(result.value(x), Some(5.0));
    let query = &solver.queries[0];
    assert_eq!(query.output_variables(), vec![x]);
    assert!(query.check_assignment(&result.values, DEFAULT_TOLERANCE).is_ok());
}

#[test]
fn solve_forwards_log_path() {
    let (network, _, _) = affine_network();
    let mut solver = ScriptedSolver::new(vec![unsat()]);
    let result = network
        .solve(&mut solver, &SolverOptions::new(), Some(Path::new("run.log")))
        .unwrap();
    assert!(!result.has_assignment());
    assert_eq!(solver.log_paths, vec![Some(Path::new("run.log").to_path_buf())]);
}

#[test]
fn evaluate_pins_inputs_and_reshapes_outputs() {
    let mut network = Network::new();
    let inputs = VarArray::contiguous(network.new_variable(), vec![2]).unwrap();
    network.new_variable();
    let outputs = VarArray::contiguous(network.new_variable(), vec![1, 2]).unwrap();
    network.new_variable();
    for (x, y) in inputs.flat().iter().zip(outputs.flat()) {
        network
            .add_equality(&[*x, *y], &[3.0, -1.0], 0.0, EquationScope::Network)
            .unwrap();
    }
    network.set_input_variables(vec![inputs.clone()]);
    network.set_output_variables(vec![outputs.clone()]);

    let (x0, x1) = (inputs.flat()[0], inputs.flat()[1]);
    let (y0, y1) = (outputs.flat()[0], outputs.flat()[1]);
    let mut solver = ScriptedSolver::new(vec![sat(&[(x0, 1.0), (x1, -2.0), (y0, 3.0), (y1, -6.0)])]);

    let values = network
        .evaluate_with_solver(
            &[ValueArray::vector(vec![1.0, -2.0])],
            &mut solver,
            &SolverOptions::new(),
            None,
        )
        .unwrap()
        .unwrap();

    assert_eq!(values.len(), 1);
    assert_eq!(values[0].shape(), &[1, 2]);
    assert_eq!(values[0].flat(), &[3.0, -6.0]);

    let query = &solver.queries[0];
    assert_eq!(query.lower_bound(x0), Some(1.0));
    assert_eq!(query.upper_bound(x0), Some(1.0));
    assert_eq!(query.lower_bound(x1), Some(-2.0));
    assert_eq!(query.upper_bound(x1), Some(-2.0));
    // Pinning happens on the query only.
    assert!(network.lower_bounds().is_empty());
}

#[test]
fn evaluate_returns_none_without_assignment() {
    let (network, _, _) = affine_network();
    let mut solver = ScriptedSolver::new(vec![unsat()]);
    let values = network
        .evaluate_with_solver(
            &[ValueArray::vector(vec![0.5])],
            &mut solver,
            &SolverOptions::new(),
            None,
        )
        .unwrap();
    assert!(values.is_none());
}

#[test]
fn evaluate_rejects_wrong_shape_and_count() {
    let (network, _, _) = affine_network();
    let mut solver = ScriptedSolver::default();

    let err = network
        .evaluate_with_solver(
            &[ValueArray::vector(vec![0.5, 1.0])],
            &mut solver,
            &SolverOptions::new(),
            None,
        )
        .unwrap_err();
    assert_eq!(
        err,
        NetworkError::ShapeMismatch {
            expected: vec![1],
            actual: vec![2]
        }
    );

    let err = network
        .evaluate_with_solver(&[], &mut solver, &SolverOptions::new(), None)
        .unwrap_err();
    assert_eq!(err.code(), "NETWORK_ARRAY_COUNT_MISMATCH");
    assert!(solver.queries.is_empty());
}

#[test]
fn evaluate_reports_missing_output_value() {
    let (network, x, y) = affine_network();
    let mut solver = ScriptedSolver::new(vec![sat(&[(x, 0.5)])]);
    let err = network
        .evaluate_with_solver(
            &[ValueArray::vector(vec![0.5])],
            &mut solver,
            &SolverOptions::new(),
            None,
        )
        .unwrap_err();
    assert_eq!(err, NetworkError::MissingValue(y));
}

struct AffineReference;

impl DirectEvaluate for AffineReference {
    fn evaluate(&self, inputs: &[ValueArray]) -> Result<Vec<ValueArray>, NetworkError> {
        Ok(inputs.iter().map(|arr| arr.map(|x| 2.0 * x + 1.0)).collect())
    }
}

#[test]
fn find_error_compares_against_direct_evaluation() {
    let (network, x, y) = affine_network();
    let mut solver = ScriptedSolver::new(vec![sat(&[(x, 0.5), (y, 2.25)])]);
    let errors = network
        .find_error(
            &[ValueArray::vector(vec![0.5])],
            &AffineReference,
            &mut solver,
            &SolverOptions::new(),
            None,
        )
        .unwrap()
        .unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].flat(), &[0.25]);
}

#[test]
fn find_error_is_none_when_solver_finds_nothing() {
    let (network, _, _) = affine_network();
    let mut solver = ScriptedSolver::new(vec![unsat()]);
    let errors = network
        .find_error(
            &[ValueArray::vector(vec![0.5])],
            &AffineReference,
            &mut solver,
            &SolverOptions::new(),
            None,
        )
        .unwrap();
    assert!(errors.is_none());
}

#[test]
fn evaluate_dispatches_to_solver_or_direct_pass() {
    let (network, x, y) = affine_network();
    let inputs = [ValueArray::vector(vec![0.5])];
    let mut solver = ScriptedSolver::new(vec![sat(&[(x, 0.5), (y, 2.0)])]);
    let options = SolverOptions::new();

    let solved = network
        .evaluate(
            &inputs,
            Evaluation::Solver {
                solver: &mut solver,
                options: &options,
                log_path: None,
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(solved[0].flat(), &[2.0]);
    assert_eq!(solver.queries.len(), 1);

    let direct = network
        .evaluate(&inputs, Evaluation::Direct(&AffineReference))
        .unwrap()
        .unwrap();
    assert_eq!(direct[0].flat(), &[2.0]);
    assert_eq!(solver.queries.len(), 1);
}

struct TwoOutputs;

impl DirectEvaluate for TwoOutputs {
    fn evaluate(&self, inputs: &[ValueArray]) -> Result<Vec<ValueArray>, NetworkError> {
        Ok(vec![inputs[0].clone(), inputs[0].clone()])
    }
}

#[test]
fn direct_evaluation_is_checked_against_declared_arrays() {
    let (network, _, _) = affine_network();

    let err = network
        .evaluate_direct(&[ValueArray::vector(vec![0.5, 1.0])], &AffineReference)
        .unwrap_err();
    assert_eq!(
        err,
        NetworkError::ShapeMismatch {
            expected: vec![1],
            actual: vec![2]
        }
    );

    let err = network
        .evaluate_direct(&[ValueArray::vector(vec![0.5])], &TwoOutputs)
        .unwrap_err();
    assert_eq!(err, NetworkError::ArrayCountMismatch { expected: 1, actual: 2 });
}

#[test]
fn save_query_roundtrips_both_formats() {
    let (mut network, x, y) = affine_network();
    network.add_relu(x, y);
    network.set_lower_bound(x, -0.5);
    let expected = network.input_query().unwrap();
    let dir = tempfile::tempdir().unwrap();

    for format in [QueryFormat::Marabou, QueryFormat::Json] {
        let path = dir.path().join(format!("query.{format}"));
        network.save_query(&path, format).unwrap();
        assert_eq!(InputQuery::load(&path, format).unwrap(), expected);
    }
}

#[test]
fn save_query_surfaces_build_errors() {
    let mut network = Network::new();
    network.add_relu(
        nnquery_expr::VariableId::new(0),
        nnquery_expr::VariableId::new(1),
    );
    let dir = tempfile::tempdir().unwrap();
    let err = network
        .save_query(&dir.path().join("q.txt"), QueryFormat::Marabou)
        .unwrap_err();
    assert_eq!(err.code(), "QUERY_VARIABLE_OUT_OF_RANGE");
}
