//! Parsing of Marabou's standard output.
//!
//! A run prints progress and statistics, one status line, and on `sat` the
//! input and output assignment:
//!
//! ```text
//! sat
//! Input assignment:
//!     x0 = 0.500000
//! Output:
//!     y0 = 2.000000
//! ```

use nnquery_solver::{ExitCode, SolverError};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Status and assignment extracted from one run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarabouOutput {
    pub exit_code: Option<ExitCode>,
    /// Input position -> value
    pub inputs: BTreeMap<usize, f64>,
    /// Output position -> value
    pub outputs: BTreeMap<usize, f64>,
}

impl MarabouOutput {
    /// Parse captured stdout.
    pub fn parse(stdout: &str) -> Result<Self, SolverError> {
        let mut parsed = MarabouOutput::default();
        for (line_no, raw) in stdout.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(code) = parse_status(line) {
                // The first status line wins; later ones come from statistics dumps.
                parsed.exit_code.get_or_insert(code);
                continue;
            }
            if let Some((index, value)) = parse_assignment(line, 'x', line_no)? {
                parsed.inputs.insert(index, value);
            } else if let Some((index, value)) = parse_assignment(line, 'y', line_no)? {
                parsed.outputs.insert(index, value);
            }
        }
        Ok(parsed)
    }
}

fn parse_status(line: &str) -> Option<ExitCode> {
    if let Ok(code) = ExitCode::from_str(line) {
        return Some(code);
    }
    match line {
        "Timeout" => Some(ExitCode::Timeout),
        "Error" => Some(ExitCode::Error),
        _ if line.starts_with("UNKNOWN EXIT CODE") => Some(ExitCode::Unknown),
        _ => None,
    }
}

// `x3 = 0.25` -> (3, 0.25); lines of any other shape are ignored.
fn parse_assignment(
    line: &str,
    prefix: char,
    line_no: usize,
) -> Result<Option<(usize, f64)>, SolverError> {
    let Some(rest) = line.strip_prefix(prefix) else {
        return Ok(None);
    };
    let Some((index, value)) = rest.split_once('=') else {
        return Ok(None);
    };
    let Ok(index) = index.trim().parse::<usize>() else {
        return Ok(None);
    };
    let value = value.trim().parse::<f64>().map_err(|_| {
        SolverError::Output(format!(
            "line {}: invalid value in assignment '{}'",
            line_no + 1,
            line
        ))
    })?;
    Ok(Some((index, value)))
}
