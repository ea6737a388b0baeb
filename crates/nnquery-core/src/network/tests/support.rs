use crate::network::{EquationScope, Network};
use crate::query::InputQuery;
use crate::solver::{SolveResult, Solver};
use crate::types::VarArray;
use nnquery_expr::VariableId;
use nnquery_solver::{ExitCode, SolverError, SolverOptions, Statistics};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Records every query it receives and replays canned results in order.
#[derive(Default)]
pub(super) struct ScriptedSolver {
    pub queries: Vec<InputQuery>,
    pub log_paths: Vec<Option<PathBuf>>,
    responses: VecDeque<SolveResult>,
}

impl ScriptedSolver {
    pub fn new(responses: Vec<SolveResult>) -> Self {
        Self {
            responses: responses.into(),
            ..Self::default()
        }
    }
}

impl Solver for ScriptedSolver {
    fn solve(
        &mut self,
        query: &InputQuery,
        _options: &SolverOptions,
        log_path: Option<&Path>,
    ) -> Result<SolveResult, SolverError> {
        self.queries.push(query.clone());
        self.log_paths.push(log_path.map(Path::to_path_buf));
        self.responses
            .pop_front()
            .ok_or_else(|| SolverError::SolverSpecific("no scripted response left".to_string()))
    }
}

pub(super) fn sat(pairs: &[(VariableId, f64)]) -> SolveResult {
    SolveResult::new(
        ExitCode::Sat,
        pairs.iter().copied().collect(),
        Statistics::completed(0.01),
    )
}

pub(super) fn unsat() -> SolveResult {
    SolveResult::without_values(ExitCode::Unsat, Statistics::completed(0.01))
}

pub(super) fn timeout() -> SolveResult {
    SolveResult::without_values(ExitCode::Timeout, Statistics::timed_out(5.0))
}

/// `x` designated as input, `y = 2x + 1` designated as output.
pub(super) fn affine_network() -> (Network, VariableId, VariableId) {
    let mut network = Network::new();
    let x = network.new_variable();
    let y = network.new_variable();
    network
        .add_equality(&[x, y], &[2.0, -1.0], -1.0, EquationScope::Network)
        .unwrap();
    network.set_input_variables(vec![VarArray::vector(vec![x])]);
    network.set_output_variables(vec![VarArray::vector(vec![y])]);
    (network, x, y)
}

/// One input `x` in shape `[1, 1]` and `weights.len()` outputs `y_k = w_k * x`.
pub(super) fn linear_classifier(weights: &[f64]) -> (Network, VariableId, Vec<VariableId>) {
    let mut network = Network::new();
    let x = network.new_variable();
    let outputs: Vec<VariableId> = weights.iter().map(|_| network.new_variable()).collect();
    for (weight, y) in weights.iter().zip(&outputs) {
        network
            .add_equality(&[x, *y], &[*weight, -1.0], 0.0, EquationScope::Network)
            .unwrap();
    }
    network.set_input_variables(vec![VarArray::new(vec![1, 1], vec![x]).unwrap()]);
    network.set_output_variables(vec![VarArray::vector(outputs.clone())]);
    (network, x, outputs)
}
