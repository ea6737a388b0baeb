//! Marabou backend configuration.

use nnquery_solver::SolverOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How the backend locates and invokes the Marabou binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarabouConfig {
    /// Explicit binary path; skips environment and `PATH` lookup.
    pub binary_path: Option<PathBuf>,
    /// Directory for temporary query files. System temp dir when unset.
    pub work_dir: Option<PathBuf>,
    /// Arguments appended verbatim after the generated ones.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl MarabouConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary_path = Some(path.into());
        self
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    pub fn with_extra_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }
}

/// Command-line arguments for one run on `query_path`.
pub(crate) fn command_args(
    config: &MarabouConfig,
    options: &SolverOptions,
    query_path: &Path,
) -> Vec<String> {
    let mut args = vec![
        "--input-query".to_string(),
        query_path.display().to_string(),
    ];
    if let Some(seconds) = options.timeout_seconds {
        args.push("--timeout".to_string());
        args.push(seconds.to_string());
    }
    if let Some(workers) = options.num_workers {
        args.push("--num-workers".to_string());
        args.push(workers.to_string());
    }
    if let Some(level) = options.verbosity {
        args.push("--verbosity".to_string());
        args.push(level.to_string());
    }
    if options.snc == Some(true) {
        args.push("--snc".to_string());
    }
    if let Some(divides) = options.initial_divides {
        args.push("--initial-divides".to_string());
        args.push(divides.to_string());
    }
    if options.solve_with_milp == Some(true) {
        args.push("--milp".to_string());
    }
    if let Some(strategy) = options.tightening_strategy {
        args.push("--tightening-strategy".to_string());
        args.push(strategy.as_str().to_string());
    }
    args.extend(config.extra_args.iter().cloned());
    args
}
