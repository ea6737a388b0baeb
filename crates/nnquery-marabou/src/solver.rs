//! Marabou process backend.

use crate::config::{MarabouConfig, command_args};
use crate::detection::{detect_marabou, marabou_version};
use crate::output::MarabouOutput;
use nnquery_core::query::{InputQuery, QueryFormat};
use nnquery_core::solver::{SolveResult, Solver};
use nnquery_expr::VariableId;
use nnquery_solver::{ExitCode, SolverError, SolverOptions, Statistics};
use nnquery_tools::{capture_rss_bytes, rss_delta};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;
use tracing::{debug, warn};

/// Solver that runs the Marabou binary on a query file.
#[derive(Debug, Clone)]
pub struct MarabouSolver {
    config: MarabouConfig,
    binary: PathBuf,
    version: Option<String>,
}

impl MarabouSolver {
    /// Locate the binary and create a solver.
    pub fn new(config: MarabouConfig) -> Result<Self, SolverError> {
        let binary = detect_marabou(&config)?;
        let version = marabou_version(&binary);
        debug!(
            component = "marabou",
            operation = "init",
            status = "success",
            binary = %binary.display(),
            version = version.as_deref().unwrap_or("unknown"),
            "Located Marabou binary"
        );
        Ok(Self {
            config,
            binary,
            version,
        })
    }

    /// Solver with default configuration.
    pub fn detect() -> Result<Self, SolverError> {
        Self::new(MarabouConfig::default())
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn config(&self) -> &MarabouConfig {
        &self.config
    }

    fn write_query_file(&self, query: &InputQuery) -> Result<tempfile::TempPath, SolverError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("nnquery-").suffix(".ipq");
        let file = match &self.config.work_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| SolverError::Io(format!("Failed to create query file: {e}")))?;

        let path = file.into_temp_path();
        query
            .save(&path, QueryFormat::Marabou)
            .map_err(|e| SolverError::Io(e.to_string()))?;
        Ok(path)
    }
}

impl Solver for MarabouSolver {
    fn solve(
        &mut self,
        query: &InputQuery,
        options: &SolverOptions,
        log_path: Option<&Path>,
    ) -> Result<SolveResult, SolverError> {
        let query_path = self.write_query_file(query)?;
        let args = command_args(&self.config, options, &query_path);

        let rss_before = capture_rss_bytes("solve_start");
        let started = Instant::now();
        debug!(
            component = "marabou",
            operation = "solve",
            status = "started",
            binary = %self.binary.display(),
            num_variables = query.num_variables(),
            num_equations = query.equations().len(),
            num_constraints = query.constraints().len(),
            rss_bytes = ?rss_before,
            "Starting Marabou process"
        );

        let output = Command::new(&self.binary)
            .args(&args)
            .output()
            .map_err(|e| {
                SolverError::Process(format!("Failed to run {}: {e}", self.binary.display()))
            })?;
        let elapsed = started.elapsed().as_secs_f64();
        let rss_after = capture_rss_bytes("solve_end");
        let stdout = String::from_utf8_lossy(&output.stdout);

        if let Some(path) = log_path {
            std::fs::write(path, stdout.as_bytes()).map_err(|e| {
                SolverError::Io(format!("Failed to write solver log {}: {e}", path.display()))
            })?;
        }

        let parsed = MarabouOutput::parse(&stdout)?;
        let Some(exit_code) = parsed.exit_code else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SolverError::Process(format!(
                "Marabou exited with {} without reporting a result: {}",
                output.status,
                stderr.trim()
            )));
        };

        let values = if exit_code.is_sat() {
            collect_values(query, &parsed)?
        } else {
            BTreeMap::new()
        };

        let mut statistics = if exit_code.is_timeout() {
            Statistics::timed_out(elapsed)
        } else {
            Statistics::completed(elapsed)
        };
        if let Some(code) = output.status.code() {
            statistics = statistics.with_metadata("process_exit_code", f64::from(code));
        }

        if exit_code.is_conclusive() {
            debug!(
                component = "marabou",
                operation = "solve",
                status = "success",
                exit_code = exit_code.as_str(),
                num_values = values.len(),
                duration_ms = elapsed * 1000.0,
                rss_bytes = ?rss_after,
                rss_delta_bytes = ?rss_delta(rss_before, rss_after),
                "Marabou solve completed"
            );
        } else {
            warn!(
                component = "marabou",
                operation = "solve",
                status = "warn",
                exit_code = exit_code.as_str(),
                duration_ms = elapsed * 1000.0,
                rss_bytes = ?rss_after,
                rss_delta_bytes = ?rss_delta(rss_before, rss_after),
                "Marabou solve was inconclusive"
            );
        }

        Ok(SolveResult::new(exit_code, values, statistics))
    }
}

// Marabou only reports inputs and outputs by position.
fn collect_values(
    query: &InputQuery,
    parsed: &MarabouOutput,
) -> Result<BTreeMap<VariableId, f64>, SolverError> {
    let mut values = BTreeMap::new();
    for (index, value) in &parsed.inputs {
        let var = query.input_variable(*index).ok_or_else(|| {
            SolverError::Output(format!("Marabou reported unknown input x{index}"))
        })?;
        values.insert(var, *value);
    }
    for (index, value) in &parsed.outputs {
        let var = query.output_variable(*index).ok_or_else(|| {
            SolverError::Output(format!("Marabou reported unknown output y{index}"))
        })?;
        values.insert(var, *value);
    }
    Ok(values)
}
